//! Interview practice: AI-generated question sets, per-question answers, and
//! assessment records with an optional improvement tip.

use tracing::error;

use crate::errors::AppError;
use crate::gateway::{segment, ApiClient};
use crate::llm_client::prompts::{
    IMPROVEMENT_TIP_PARAMS, IMPROVEMENT_TIP_TEMPLATE, QUIZ_PARAMS, QUIZ_TEMPLATE,
};
use crate::llm_client::{complete_json, Completion, LlmError};
use crate::models::interview::{
    Assessment, AssessmentPayload, GeneratedQuestion, GeneratedQuiz, QuestionResult,
};
use crate::models::quiz::{AnswerResult, AnswerSubmission, QuizQuestion};

pub const ASSESSMENT_CATEGORY: &str = "Technical";
const OPTIONS_PER_QUESTION: usize = 4;

/// Generates a fresh multiple-choice question set with the completion API.
pub async fn generate_quiz(llm: &dyn Completion) -> Result<Vec<GeneratedQuestion>, AppError> {
    let quiz: GeneratedQuiz = complete_json(llm, QUIZ_TEMPLATE, QUIZ_PARAMS)
        .await
        .map_err(|e| {
            error!("Error generating quiz: {e}");
            match e {
                LlmError::Parse(_) => {
                    AppError::Parse("Failed to generate quiz questions".to_string())
                }
                _ => AppError::Llm("Failed to generate quiz questions".to_string()),
            }
        })?;

    let malformed = quiz.questions.iter().any(|q| {
        q.options.len() != OPTIONS_PER_QUESTION || !q.options.contains(&q.correct_answer)
    });
    if quiz.questions.is_empty() || malformed {
        return Err(AppError::Parse("Failed to generate quiz questions".to_string()));
    }

    Ok(quiz.questions)
}

/// Grades `answers` against `questions` (missing answers count as wrong).
pub fn grade(questions: &[GeneratedQuestion], answers: &[Option<String>]) -> Vec<QuestionResult> {
    questions
        .iter()
        .enumerate()
        .map(|(index, q)| {
            let user_answer = answers.get(index).cloned().flatten();
            QuestionResult {
                question: q.question.clone(),
                answer: q.correct_answer.clone(),
                is_correct: user_answer.as_deref() == Some(q.correct_answer.as_str()),
                user_answer,
                explanation: q.explanation.clone(),
            }
        })
        .collect()
}

/// Grades and stores a generated-quiz attempt.
///
/// An improvement tip is requested only when something was answered wrong. Nothing
/// is stored when the tip cannot be generated.
pub async fn save_quiz_result(
    api: &ApiClient,
    llm: &dyn Completion,
    questions: &[GeneratedQuestion],
    answers: &[Option<String>],
    score: f64,
) -> Result<Assessment, AppError> {
    let results = grade(questions, answers);
    let wrong: Vec<&QuestionResult> = results.iter().filter(|r| !r.is_correct).collect();

    let improvement_tip = if wrong.is_empty() {
        None
    } else {
        let listing = wrong
            .iter()
            .map(|r| {
                format!(
                    "Question: \"{}\"\nCorrect Answer: \"{}\"\nUser Answer: \"{}\"",
                    r.question,
                    r.answer,
                    r.user_answer.as_deref().unwrap_or("(no answer)")
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n");
        let prompt = IMPROVEMENT_TIP_TEMPLATE.replace("{wrong_answers}", &listing);

        let tip = llm
            .complete(&prompt, IMPROVEMENT_TIP_PARAMS)
            .await
            .map_err(|e| {
                error!("Error generating improvement tip: {e}");
                AppError::Llm("Failed to save quiz result".to_string())
            })?;
        Some(tip.trim().to_string())
    };

    let payload = AssessmentPayload {
        quiz_score: score,
        questions: results,
        category: ASSESSMENT_CATEGORY.to_string(),
        improvement_tip,
    };

    api.post("/interview/quiz/result", &payload)
        .await
        .map_err(|e| e.context("Failed to save quiz result"))
}

pub async fn assessments(api: &ApiClient) -> Result<Vec<Assessment>, AppError> {
    api.get("/interview/performance")
        .await
        .map_err(|e| e.context("Failed to fetch assessments"))
}

/// Fetches at most `limit` stored interview questions for `category`.
pub async fn questions(
    api: &ApiClient,
    category: &str,
    limit: usize,
) -> Result<Vec<QuizQuestion>, AppError> {
    let mut questions: Vec<QuizQuestion> = api
        .get_with_query(
            &format!("/interview/quiz/{}", segment(category)),
            &[("limit", limit)],
        )
        .await
        .map_err(|e| e.context("Failed to fetch questions"))?;
    questions.truncate(limit);
    Ok(questions)
}

pub async fn submit_answer(
    api: &ApiClient,
    submission: &AnswerSubmission,
) -> Result<AnswerResult, AppError> {
    api.post("/interview/quiz/submit", submission)
        .await
        .map_err(|e| e.context("Failed to submit answer"))
}
