use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// ATS analysis returned by `POST /resume/upload`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeAnalysis {
    pub ats_score: u32,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub missing_keywords: Vec<String>,
    #[serde(default)]
    pub strengths: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedResume {
    #[serde(default, alias = "_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub ats_score: Option<u32>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}
