use tracing::info;

use crate::errors::AppError;
use crate::features::dashboard::generate_ai_insights;
use crate::gateway::ApiClient;
use crate::llm_client::Completion;
use crate::models::user::{OnboardingStatus, ProfileUpdate, User};

/// Updates the profile. A newly chosen industry gets its insights generated first so the
/// dashboard has something to show; that step cannot fail.
pub async fn update_profile(
    api: &ApiClient,
    llm: &dyn Completion,
    update: &ProfileUpdate,
) -> Result<User, AppError> {
    if let Some(industry) = update.industry.as_deref().filter(|i| !i.trim().is_empty()) {
        generate_ai_insights(llm, industry).await;
    }

    let user: User = api
        .put("/user/profile", update)
        .await
        .map_err(|e| e.context("Failed to update profile"))?;
    info!("Profile updated for {}", user.email);
    Ok(user)
}

/// A user is onboarded once their profile names an industry.
pub async fn onboarding_status(api: &ApiClient) -> Result<OnboardingStatus, AppError> {
    let user: User = api
        .get("/user/dashboard")
        .await
        .map_err(|e| e.context("Failed to check onboarding status"))?;

    Ok(OnboardingStatus {
        is_onboarded: user.industry().is_some(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedCompletion;
    use crate::testing::StubBackend;

    #[tokio::test]
    async fn test_not_onboarded_without_industry() {
        let backend = StubBackend::start().await;
        let status = onboarding_status(&backend.client()).await.unwrap();
        assert!(!status.is_onboarded);
    }

    #[tokio::test]
    async fn test_update_with_industry_generates_insights_then_onboards() {
        let backend = StubBackend::start().await;
        let api = backend.client();
        let llm = ScriptedCompletion::failing();

        let update = ProfileUpdate {
            industry: Some("Finance".to_string()),
            experience: Some(4),
            bio: None,
            skills: vec!["SQL".to_string()],
        };
        let user = update_profile(&api, &llm, &update).await.unwrap();

        assert_eq!(user.industry(), Some("Finance"));
        assert_eq!(llm.call_count(), 1);
        assert!(onboarding_status(&api).await.unwrap().is_onboarded);
        assert_eq!(backend.state().profile_updates[0]["experience"], 4);
    }

    #[tokio::test]
    async fn test_update_without_industry_skips_insights() {
        let backend = StubBackend::start().await;
        let llm = ScriptedCompletion::failing();
        let update = ProfileUpdate {
            bio: Some("Backend engineer".to_string()),
            ..ProfileUpdate::default()
        };
        update_profile(&backend.client(), &llm, &update).await.unwrap();
        assert_eq!(llm.call_count(), 0);
    }
}
