//! Dashboard: backend aggregates plus AI-generated industry insights.
//!
//! Insight generation never fails from the caller's point of view: any completion or
//! parse failure is logged and replaced by a static snapshot.

use tracing::{info, warn};

use crate::errors::AppError;
use crate::gateway::ApiClient;
use crate::llm_client::prompts::{INSIGHTS_PARAMS, INSIGHTS_TEMPLATE};
use crate::llm_client::{complete_json, Completion};
use crate::models::dashboard::{
    DashboardData, DemandLevel, IndustryInsights, MarketOutlook, SalaryRange, SkillsDemand,
};
use crate::models::user::User;

pub const DEFAULT_INDUSTRY: &str = "Technology";
/// How many skill-demand entries the dashboard shows.
pub const SKILLS_SHOWN: usize = 8;

/// Asks the completion API for insights on `industry`, falling back to
/// [`fallback_insights`] on any failure.
pub async fn generate_ai_insights(llm: &dyn Completion, industry: &str) -> IndustryInsights {
    let prompt = INSIGHTS_TEMPLATE.replace("{industry}", industry);
    match complete_json::<IndustryInsights>(llm, &prompt, INSIGHTS_PARAMS).await {
        Ok(insights) => {
            info!("Generated AI insights for industry '{industry}'");
            insights
        }
        Err(e) => {
            warn!("AI insights for '{industry}' unavailable, serving fallback: {e}");
            fallback_insights()
        }
    }
}

/// Insights for the signed-in user's industry (or [`DEFAULT_INDUSTRY`]).
pub async fn industry_insights(
    api: &ApiClient,
    llm: &dyn Completion,
) -> Result<IndustryInsights, AppError> {
    let user: User = api
        .get("/user/dashboard/public")
        .await
        .map_err(|e| e.context("Failed to get industry insights"))?;

    let industry = user.industry().unwrap_or(DEFAULT_INDUSTRY);
    Ok(generate_ai_insights(llm, industry).await)
}

pub async fn dashboard(api: &ApiClient) -> Result<DashboardData, AppError> {
    api.get("/user/dashboard")
        .await
        .map_err(|e| e.context("Failed to fetch dashboard data"))
}

/// Skill demand entries, truncated to [`SKILLS_SHOWN`].
pub async fn skills_demand(api: &ApiClient) -> Result<SkillsDemand, AppError> {
    let mut demand: SkillsDemand = api
        .get("/skills/demand")
        .await
        .map_err(|e| e.context("Failed to fetch skills data"))?;
    demand.skills.truncate(SKILLS_SHOWN);
    Ok(demand)
}

/// Static snapshot served when the completion API cannot produce insights.
pub fn fallback_insights() -> IndustryInsights {
    let range = |role: &str, min: f64, max: f64, median: f64| SalaryRange {
        role: role.to_string(),
        min,
        max,
        median,
        location: "US".to_string(),
    };
    let strings = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();

    IndustryInsights {
        salary_ranges: vec![
            range("Frontend Developer", 60_000.0, 120_000.0, 85_000.0),
            range("Backend Developer", 70_000.0, 140_000.0, 95_000.0),
            range("Full Stack Developer", 65_000.0, 130_000.0, 90_000.0),
            range("DevOps Engineer", 80_000.0, 150_000.0, 110_000.0),
            range("Data Scientist", 85_000.0, 160_000.0, 115_000.0),
        ],
        growth_rate: 15.0,
        demand_level: DemandLevel::High,
        top_skills: strings(&["JavaScript", "Python", "React", "Node.js", "AWS"]),
        market_outlook: MarketOutlook::Positive,
        key_trends: strings(&[
            "AI Integration",
            "Cloud Computing",
            "Remote Work",
            "Microservices",
            "DevOps",
        ]),
        recommended_skills: strings(&[
            "TypeScript",
            "Docker",
            "Kubernetes",
            "GraphQL",
            "Machine Learning",
        ]),
    }
}
