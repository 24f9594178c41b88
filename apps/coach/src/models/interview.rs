use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A question produced by the completion API. The correct answer is the option text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    #[serde(default)]
    pub explanation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedQuiz {
    pub questions: Vec<GeneratedQuestion>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResult {
    pub question: String,
    pub answer: String,
    pub user_answer: Option<String>,
    pub is_correct: bool,
    pub explanation: String,
}

/// Payload for `POST /interview/quiz/result`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentPayload {
    pub quiz_score: f64,
    pub questions: Vec<QuestionResult>,
    pub category: String,
    pub improvement_tip: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    #[serde(default, alias = "_id")]
    pub id: Option<String>,
    pub quiz_score: f64,
    #[serde(default)]
    pub questions: Vec<QuestionResult>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub improvement_tip: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
