use serde::{Deserialize, Serialize};

/// A multiple-choice question as served by the backend.
///
/// `correct_answer` is an option index; the backend may withhold it from clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    #[serde(default, alias = "_id")]
    pub id: Option<String>,
    pub question: String,
    pub options: Vec<String>,
    #[serde(default)]
    pub correct_answer: Option<usize>,
    #[serde(default)]
    pub explanation: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionBatch {
    #[serde(default)]
    pub questions: Vec<QuizQuestion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizCategory {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "count")]
    pub question_count: Option<u32>,
    #[serde(default)]
    pub difficulty: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryList {
    #[serde(default)]
    pub categories: Vec<QuizCategory>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizStats {
    #[serde(default)]
    pub total_quizzes: u32,
    #[serde(default)]
    pub average_score: f64,
    #[serde(default)]
    pub best_score: f64,
}

/// Whole-quiz submission for the full-category mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSubmission {
    pub category: String,
    pub answers: Vec<Option<usize>>,
    pub time_spent: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOutcome {
    #[serde(default, alias = "questionId")]
    pub question_id: Option<String>,
    pub is_correct: bool,
    #[serde(default)]
    pub correct_answer: Option<usize>,
    #[serde(default)]
    pub user_answer: Option<usize>,
}

/// Score breakdown returned by `POST /quiz/submit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub score: u32,
    pub correct_answers: u32,
    pub total_questions: u32,
    #[serde(default)]
    pub results: Vec<QuestionOutcome>,
    #[serde(default)]
    pub improvement_tip: Option<String>,
}

/// Single-answer submission for the interview mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerSubmission {
    pub quiz_id: Option<String>,
    pub selected_answer: Option<usize>,
    pub time_spent: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResult {
    pub is_correct: bool,
    #[serde(default)]
    pub correct_answer: Option<usize>,
    #[serde(default)]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}
