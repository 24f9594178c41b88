use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::user::Profile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DemandLevel {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarketOutlook {
    Positive,
    Neutral,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub role: String,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndustryInsights {
    pub salary_ranges: Vec<SalaryRange>,
    pub growth_rate: f64,
    pub demand_level: DemandLevel,
    pub top_skills: Vec<String>,
    pub market_outlook: MarketOutlook,
    pub key_trends: Vec<String>,
    pub recommended_skills: Vec<String>,
}

/// Aggregate returned by `GET /user/dashboard`. The stats object is rendered as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardData {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub profile: Option<Profile>,
    #[serde(default)]
    pub stats: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillDemand {
    #[serde(alias = "skill")]
    pub name: String,
    #[serde(default)]
    pub demand: f64,
    #[serde(default)]
    pub growth: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillsDemand {
    #[serde(default)]
    pub skills: Vec<SkillDemand>,
}
