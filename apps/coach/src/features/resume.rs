//! Resume upload/analysis, saved versions, and AI rewriting of individual sections.

use std::path::PathBuf;

use reqwest::multipart::Form;
use tracing::info;

use crate::errors::AppError;
use crate::gateway::{content_type_for, file_part, ApiClient};
use crate::llm_client::prompts::{fill, RESUME_IMPROVE_PARAMS, RESUME_IMPROVE_TEMPLATE};
use crate::llm_client::Completion;
use crate::models::resume::{ResumeAnalysis, SavedResume};

/// What the user picked in the upload form. `file` is `None` until a file is selected.
#[derive(Debug, Clone, Default)]
pub struct ResumeUpload {
    pub file: Option<PathBuf>,
    pub job_description: String,
}

/// Uploads the selected resume for ATS analysis.
///
/// Rejected locally, before any request, when no file is selected or the file is
/// not a PDF/DOCX.
pub async fn analyze(api: &ApiClient, upload: &ResumeUpload) -> Result<ResumeAnalysis, AppError> {
    let path = upload
        .file
        .as_ref()
        .ok_or_else(|| AppError::Validation("Please select a resume file".to_string()))?;

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| AppError::Validation(format!("Invalid file path: {}", path.display())))?
        .to_string();
    content_type_for(&file_name)?;

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| AppError::Validation(format!("Cannot read {}: {e}", path.display())))?;

    analyze_bytes(api, &file_name, bytes, &upload.job_description).await
}

/// Sends already-loaded resume bytes as `multipart/form-data` (`resume`, `jobDescription`).
pub async fn analyze_bytes(
    api: &ApiClient,
    file_name: &str,
    bytes: Vec<u8>,
    job_description: &str,
) -> Result<ResumeAnalysis, AppError> {
    if bytes.is_empty() {
        return Err(AppError::Validation("The selected resume file is empty".to_string()));
    }

    let form = Form::new()
        .part("resume", file_part(bytes, file_name)?)
        .text("jobDescription", job_description.to_string());

    let analysis: ResumeAnalysis = api
        .post_multipart("/resume/upload", form)
        .await
        .map_err(|e| e.context("Failed to analyze resume. Please try again."))?;

    info!("Resume {file_name} analyzed: ATS score {}", analysis.ats_score);
    Ok(analysis)
}

pub async fn save(api: &ApiClient, content: &str) -> Result<SavedResume, AppError> {
    if content.trim().is_empty() {
        return Err(AppError::Validation("Resume content cannot be empty".to_string()));
    }
    api.post("/resume/save", &serde_json::json!({ "content": content }))
        .await
        .map_err(|e| e.context("Failed to save resume"))
}

pub async fn history(api: &ApiClient) -> Result<Vec<SavedResume>, AppError> {
    api.get("/resume/history")
        .await
        .map_err(|e| e.context("Failed to fetch resume"))
}

/// Rewrites one resume section (`kind` is e.g. "experience" or "project").
pub async fn improve_with_ai(
    llm: &dyn Completion,
    current: &str,
    kind: &str,
) -> Result<String, AppError> {
    if current.trim().is_empty() {
        return Err(AppError::Validation("Nothing to improve: content is empty".to_string()));
    }

    let prompt = fill(RESUME_IMPROVE_TEMPLATE, &[("kind", kind), ("current", current)]);

    let improved = llm.complete(&prompt, RESUME_IMPROVE_PARAMS).await.map_err(|e| {
        tracing::error!("Error improving content: {e}");
        AppError::Llm("Failed to improve content".to_string())
    })?;

    Ok(improved.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedCompletion;
    use crate::testing::StubBackend;

    #[tokio::test]
    async fn test_upload_without_file_never_reaches_backend() {
        let backend = StubBackend::start().await;
        let upload = ResumeUpload {
            file: None,
            job_description: "Full Stack Developer".to_string(),
        };

        let err = analyze(&backend.client(), &upload).await.unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert!(backend.state().uploads.is_empty());
    }

    #[tokio::test]
    async fn test_unsupported_format_is_rejected_locally() {
        let backend = StubBackend::start().await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.txt");
        std::fs::write(&path, "plain text").unwrap();

        let upload = ResumeUpload {
            file: Some(path),
            job_description: String::new(),
        };
        let err = analyze(&backend.client(), &upload).await.unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert!(backend.state().uploads.is_empty());
    }

    #[tokio::test]
    async fn test_pdf_upload_returns_analysis() {
        let backend = StubBackend::start().await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.pdf");
        std::fs::write(&path, b"%PDF-1.4 fake").unwrap();

        let upload = ResumeUpload {
            file: Some(path),
            job_description: "React, Node.js and MongoDB".to_string(),
        };
        let analysis = analyze(&backend.client(), &upload).await.unwrap();

        assert_eq!(analysis.ats_score, 72);
        assert_eq!(analysis.missing_keywords, vec!["AWS", "MongoDB"]);
        let uploads = &backend.state().uploads;
        assert_eq!(uploads[0].0, "resume.pdf");
        assert_eq!(uploads[0].1, "React, Node.js and MongoDB");
    }

    #[tokio::test]
    async fn test_save_then_history() {
        let backend = StubBackend::start().await;
        let api = backend.client();
        save(&api, "# Ada Lovelace").await.unwrap();
        let saved = history(&api).await.unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].content, "# Ada Lovelace");
    }

    #[tokio::test]
    async fn test_improve_with_ai_trims_reply() {
        let llm = ScriptedCompletion::replying(&["  Led migration of 12 services to Kubernetes.\n"]);
        let improved = improve_with_ai(&llm, "moved services to k8s", "experience")
            .await
            .unwrap();
        assert_eq!(improved, "Led migration of 12 services to Kubernetes.");

        let calls = llm.calls.lock().unwrap();
        assert!(calls[0].0.contains("improve the following experience description"));
        assert_eq!(calls[0].1.max_tokens, Some(200));
    }

    #[tokio::test]
    async fn test_improve_with_ai_surfaces_failure() {
        let llm = ScriptedCompletion::failing();
        let err = improve_with_ai(&llm, "wrote code", "project").await.unwrap_err();
        assert_eq!(err.to_string(), "Failed to improve content");
    }
}
