use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::features::{auth, cover_letter, dashboard, interview, resume, user};
use crate::models::cover_letter::{CoverLetter, CoverLetterRequest};
use crate::models::dashboard::IndustryInsights;
use crate::models::interview::{Assessment, GeneratedQuestion, GeneratedQuiz};
use crate::models::resume::{ResumeAnalysis, SavedResume};
use crate::models::user::{
    AuthResponse, LoginRequest, OnboardingStatus, ProfileUpdate, RegisterRequest, User,
};
use crate::routes::bearer::BearerToken;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SaveResultRequest {
    pub questions: Vec<GeneratedQuestion>,
    #[serde(default)]
    pub answers: Vec<Option<String>>,
    pub score: f64,
}

#[derive(Deserialize)]
pub struct SaveResumeRequest {
    pub content: String,
}

#[derive(Deserialize)]
pub struct ImproveRequest {
    pub current: String,
    #[serde(rename = "type", alias = "kind")]
    pub kind: String,
}

#[derive(Serialize)]
pub struct ImprovedContent {
    pub content: String,
}

/// POST /actions/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    Ok(Json(auth::login(&state.api, &req).await?))
}

/// POST /actions/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    Ok(Json(auth::register(&state.api, &req).await?))
}

/// GET /actions/user/onboarding
pub async fn handle_onboarding_status(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<OnboardingStatus>, AppError> {
    let status = user::onboarding_status(&state.api_for(token)).await?;
    Ok(Json(status))
}

/// PUT /actions/user/profile
pub async fn handle_update_profile(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<User>, AppError> {
    let user = user::update_profile(&state.api_for(token), state.llm.as_ref(), &update).await?;
    Ok(Json(user))
}

/// GET /actions/insights
pub async fn handle_insights(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<IndustryInsights>, AppError> {
    let insights = dashboard::industry_insights(&state.api_for(token), state.llm.as_ref()).await?;
    Ok(Json(insights))
}

/// GET /actions/insights/:industry
pub async fn handle_industry_insights(
    State(state): State<AppState>,
    Path(industry): Path<String>,
) -> Json<IndustryInsights> {
    Json(dashboard::generate_ai_insights(state.llm.as_ref(), &industry).await)
}

/// GET /actions/cover-letters
pub async fn handle_list_cover_letters(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<Vec<CoverLetter>>, AppError> {
    Ok(Json(cover_letter::list(&state.api_for(token)).await?))
}

/// POST /actions/cover-letters
pub async fn handle_generate_cover_letter(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Json(req): Json<CoverLetterRequest>,
) -> Result<(StatusCode, Json<CoverLetter>), AppError> {
    let letter =
        cover_letter::generate(&state.api_for(token), state.llm.as_ref(), &req).await?;
    Ok((StatusCode::CREATED, Json(letter)))
}

/// GET /actions/cover-letters/:id
pub async fn handle_get_cover_letter(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Path(id): Path<String>,
) -> Result<Json<CoverLetter>, AppError> {
    Ok(Json(cover_letter::get(&state.api_for(token), &id).await?))
}

/// DELETE /actions/cover-letters/:id
pub async fn handle_delete_cover_letter(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    cover_letter::delete(&state.api_for(token), &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /actions/interview/quiz
pub async fn handle_generate_quiz(
    State(state): State<AppState>,
) -> Result<Json<GeneratedQuiz>, AppError> {
    let questions = interview::generate_quiz(state.llm.as_ref()).await?;
    Ok(Json(GeneratedQuiz { questions }))
}

/// POST /actions/interview/results
pub async fn handle_save_quiz_result(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Json(req): Json<SaveResultRequest>,
) -> Result<Json<Assessment>, AppError> {
    let assessment = interview::save_quiz_result(
        &state.api_for(token),
        state.llm.as_ref(),
        &req.questions,
        &req.answers,
        req.score,
    )
    .await?;
    Ok(Json(assessment))
}

/// GET /actions/interview/assessments
pub async fn handle_assessments(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<Vec<Assessment>>, AppError> {
    Ok(Json(interview::assessments(&state.api_for(token)).await?))
}

/// GET /actions/resume
pub async fn handle_resume_history(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<Vec<SavedResume>>, AppError> {
    Ok(Json(resume::history(&state.api_for(token)).await?))
}

/// POST /actions/resume
pub async fn handle_save_resume(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    Json(req): Json<SaveResumeRequest>,
) -> Result<Json<SavedResume>, AppError> {
    Ok(Json(resume::save(&state.api_for(token), &req.content).await?))
}

/// POST /actions/resume/improve
pub async fn handle_improve_resume(
    State(state): State<AppState>,
    Json(req): Json<ImproveRequest>,
) -> Result<Json<ImprovedContent>, AppError> {
    let content = resume::improve_with_ai(state.llm.as_ref(), &req.current, &req.kind).await?;
    Ok(Json(ImprovedContent { content }))
}

/// POST /actions/resume/analyze
///
/// Expects `multipart/form-data` with a `resume` file and an optional
/// `jobDescription` text field, forwarded unchanged to the backend.
pub async fn handle_analyze_resume(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
    mut multipart: Multipart,
) -> Result<Json<ResumeAnalysis>, AppError> {
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut job_description = String::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
    {
        match field.name() {
            Some("resume") => {
                let file_name = field.file_name().unwrap_or("resume.pdf").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?;
                file = Some((file_name, bytes.to_vec()));
            }
            Some("jobDescription") => {
                job_description = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?;
            }
            _ => {}
        }
    }

    let (file_name, bytes) =
        file.ok_or_else(|| AppError::Validation("Please select a resume file".to_string()))?;
    let analysis =
        resume::analyze_bytes(&state.api_for(token), &file_name, bytes, &job_description).await?;
    Ok(Json(analysis))
}
