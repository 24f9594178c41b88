//! Category quizzes: catalog, statistics, seeding, question batches and scoring.

use crate::errors::AppError;
use crate::gateway::{segment, ApiClient};
use crate::models::quiz::{
    CategoryList, QuestionBatch, QuizCategory, QuizQuestion, QuizResult, QuizStats,
    QuizSubmission, SeedResponse,
};

pub async fn categories(api: &ApiClient) -> Result<Vec<QuizCategory>, AppError> {
    let list: CategoryList = api
        .get("/quiz/categories")
        .await
        .map_err(|e| e.context("Failed to fetch quiz data"))?;
    Ok(list.categories)
}

pub async fn stats(api: &ApiClient) -> Result<QuizStats, AppError> {
    api.get("/quiz/stats")
        .await
        .map_err(|e| e.context("Failed to fetch quiz data"))
}

pub async fn seed(api: &ApiClient) -> Result<SeedResponse, AppError> {
    let response: SeedResponse = api
        .post_empty("/seed-quiz")
        .await
        .map_err(|e| e.context("Failed to seed quiz data"))?;
    if !response.success {
        return Err(AppError::network("Failed to seed quiz data"));
    }
    Ok(response)
}

/// Fetches at most `limit` questions for `category`.
///
/// The limit is sent to the backend and enforced again here, so a category with N
/// questions always yields `min(N, limit)`.
pub async fn questions(
    api: &ApiClient,
    category: &str,
    limit: usize,
) -> Result<Vec<QuizQuestion>, AppError> {
    let batch: QuestionBatch = api
        .get_with_query(&format!("/quiz/{}", segment(category)), &[("limit", limit)])
        .await
        .map_err(|e| e.context("Failed to fetch questions"))?;

    let mut questions = batch.questions;
    questions.truncate(limit);
    Ok(questions)
}

pub async fn submit(api: &ApiClient, submission: &QuizSubmission) -> Result<QuizResult, AppError> {
    api.post("/quiz/submit", submission)
        .await
        .map_err(|e| e.context("Failed to submit quiz"))
}
