use serde::Serialize;
use tracing::{error, info};

use crate::errors::AppError;
use crate::gateway::{segment, ApiClient};
use crate::llm_client::prompts::{fill, COVER_LETTER_PARAMS, COVER_LETTER_TEMPLATE};
use crate::llm_client::Completion;
use crate::models::cover_letter::{CoverLetter, CoverLetterRequest};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NewCoverLetter<'a> {
    #[serde(flatten)]
    request: &'a CoverLetterRequest,
    content: &'a str,
}

/// Generates a cover letter with the completion API and stores it in the backend.
pub async fn generate(
    api: &ApiClient,
    llm: &dyn Completion,
    request: &CoverLetterRequest,
) -> Result<CoverLetter, AppError> {
    validate(request)?;

    let prompt = fill(
        COVER_LETTER_TEMPLATE,
        &[
            ("job_title", request.job_title.as_str()),
            ("company_name", request.company_name.as_str()),
            ("job_description", request.job_description.as_str()),
        ],
    );

    let content = llm
        .complete(&prompt, COVER_LETTER_PARAMS)
        .await
        .map_err(|e| {
            error!("Error generating cover letter: {e}");
            AppError::Llm("Failed to generate cover letter".to_string())
        })?;

    let letter: CoverLetter = api
        .post(
            "/skills/cover-letter",
            &NewCoverLetter {
                request,
                content: content.trim(),
            },
        )
        .await
        .map_err(|e| e.context("Failed to generate cover letter"))?;

    info!(
        "Cover letter for {} at {} stored",
        letter.job_title, letter.company_name
    );
    Ok(letter)
}

pub async fn list(api: &ApiClient) -> Result<Vec<CoverLetter>, AppError> {
    api.get("/skills/cover-letters")
        .await
        .map_err(|e| e.context("Failed to fetch cover letters"))
}

pub async fn get(api: &ApiClient, id: &str) -> Result<CoverLetter, AppError> {
    api.get(&format!("/skills/cover-letter/{}", segment(id)))
        .await
        .map_err(|e| e.context("Failed to fetch cover letter"))
}

pub async fn delete(api: &ApiClient, id: &str) -> Result<(), AppError> {
    let _: serde_json::Value = api
        .delete(&format!("/skills/cover-letter/{}", segment(id)))
        .await
        .map_err(|e| e.context("Failed to delete cover letter"))?;
    Ok(())
}

fn validate(request: &CoverLetterRequest) -> Result<(), AppError> {
    let missing = [
        ("jobTitle", &request.job_title),
        ("companyName", &request.company_name),
        ("jobDescription", &request.job_description),
    ]
    .into_iter()
    .filter(|(_, value)| value.trim().is_empty())
    .map(|(name, _)| name)
    .collect::<Vec<_>>();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Missing required field(s): {}",
            missing.join(", ")
        )))
    }
}
