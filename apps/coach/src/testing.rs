//! In-process stand-in for the REST backend, served on an ephemeral port.
//!
//! Implements just enough of the backend's endpoints for the gateway, feature
//! modules and actions service to be exercised over real HTTP.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    extract::{Multipart, Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::gateway::ApiClient;
use crate::models::quiz::{AnswerResult, AnswerSubmission, QuizQuestion, QuizSubmission};

#[derive(Debug, Default)]
pub struct StubState {
    pub seeded: bool,
    pub industry: Option<String>,
    pub quiz_submissions: Vec<QuizSubmission>,
    pub answer_submissions: Vec<AnswerSubmission>,
    pub uploads: Vec<(String, String)>,
    pub saved_resumes: Vec<String>,
    pub cover_letters: Vec<Value>,
    pub assessments: Vec<Value>,
    pub profile_updates: Vec<Value>,
    /// `Authorization` header of the last dashboard request.
    pub last_authorization: Option<String>,
}

#[derive(Clone)]
struct Shared(Arc<Mutex<StubState>>);

pub struct StubBackend {
    addr: SocketAddr,
    state: Arc<Mutex<StubState>>,
}

impl StubBackend {
    pub async fn start() -> Self {
        let state = Arc::new(Mutex::new(StubState::default()));
        let app = router(Shared(state.clone()));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::new(&self.url(), 5).unwrap()
    }

    pub fn state(&self) -> MutexGuard<'_, StubState> {
        self.state.lock().unwrap()
    }
}

/// Seeded question bank: 7 JavaScript questions, 3 Python questions.
pub fn question_bank(category: &str) -> Vec<QuizQuestion> {
    let count = match category {
        "JavaScript" => 7,
        "Python" => 3,
        _ => 0,
    };
    (0..count)
        .map(|i| QuizQuestion {
            id: Some(format!("{category}-{i}")),
            question: format!("{category} question {i}?"),
            options: vec![
                "A".to_string(),
                "B".to_string(),
                "C".to_string(),
                "D".to_string(),
            ],
            correct_answer: Some(i % 4),
            explanation: Some(format!("Because option {}", i % 4)),
            difficulty: Some("easy".to_string()),
            category: Some(category.to_string()),
        })
        .collect()
}

fn find_question(quiz_id: &str) -> Option<QuizQuestion> {
    let (category, _) = quiz_id.split_once('-')?;
    question_bank(category)
        .into_iter()
        .find(|q| q.id.as_deref() == Some(quiz_id))
}

fn stub_user(industry: Option<&str>) -> Value {
    json!({
        "_id": "user-1",
        "name": "Test User",
        "email": "test@example.com",
        "profile": { "industry": industry, "skills": ["Rust"] }
    })
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/echo-auth", get(echo_auth))
        .route("/auth/login", post(auth))
        .route("/auth/register", post(auth))
        .route("/user/dashboard", get(dashboard))
        .route("/user/dashboard/public", get(dashboard))
        .route("/user/profile", axum::routing::put(update_profile))
        .route("/seed-quiz", post(seed))
        .route("/quiz/categories", get(categories))
        .route("/quiz/stats", get(quiz_stats))
        .route("/quiz/submit", post(submit_quiz))
        .route("/quiz/:category", get(category_questions))
        .route("/interview/quiz/submit", post(submit_answer))
        .route("/interview/quiz/result", post(save_assessment))
        .route("/interview/quiz/:category", get(interview_questions))
        .route("/interview/performance", get(assessments))
        .route("/resume/upload", post(upload_resume))
        .route("/resume/save", post(save_resume))
        .route("/resume/history", get(resume_history))
        .route("/skills/demand", get(skills_demand))
        .route("/skills/cover-letter", post(create_cover_letter))
        .route("/skills/cover-letters", get(list_cover_letters))
        .route(
            "/skills/cover-letter/:id",
            get(get_cover_letter).delete(delete_cover_letter),
        )
        .with_state(state)
}

async fn echo_auth(headers: HeaderMap) -> Json<Value> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    Json(json!({ "authorization": auth }))
}

async fn auth(Json(body): Json<Value>) -> Result<Json<Value>, StatusCode> {
    if body["password"].as_str() == Some("wrong") {
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(Json(json!({ "token": "stub-token", "user": stub_user(None) })))
}

async fn dashboard(State(Shared(state)): State<Shared>, headers: HeaderMap) -> Json<Value> {
    let mut state = state.lock().unwrap();
    state.last_authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let mut user = stub_user(state.industry.as_deref());
    user["stats"] = json!({ "quizzesTaken": state.quiz_submissions.len() });
    Json(user)
}

async fn update_profile(
    State(Shared(state)): State<Shared>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let mut state = state.lock().unwrap();
    state.industry = body["industry"].as_str().map(str::to_string);
    state.profile_updates.push(body);
    Json(stub_user(state.industry.as_deref()))
}

async fn seed(State(Shared(state)): State<Shared>) -> Json<Value> {
    state.lock().unwrap().seeded = true;
    Json(json!({ "success": true, "message": "Quiz data seeded" }))
}

async fn categories() -> Json<Value> {
    Json(json!({
        "categories": [
            { "name": "JavaScript", "questionCount": 7, "difficulty": "Medium" },
            { "name": "Python", "questionCount": 3, "difficulty": "Easy" }
        ]
    }))
}

async fn quiz_stats(State(Shared(state)): State<Shared>) -> Json<Value> {
    let taken = state.lock().unwrap().quiz_submissions.len();
    Json(json!({ "totalQuizzes": taken, "averageScore": 80.0, "bestScore": 100.0 }))
}

/// Ignores any `limit` so the client-side cap is what bounds the batch.
async fn category_questions(Path(category): Path<String>) -> Json<Value> {
    Json(json!({ "questions": question_bank(&category) }))
}

async fn interview_questions(Path(category): Path<String>) -> Json<Vec<QuizQuestion>> {
    Json(question_bank(&category))
}

async fn submit_quiz(
    State(Shared(state)): State<Shared>,
    Json(submission): Json<QuizSubmission>,
) -> Json<Value> {
    let bank = question_bank(&submission.category);
    let total = submission.answers.len();
    let results: Vec<Value> = submission
        .answers
        .iter()
        .zip(bank.iter())
        .map(|(answer, question)| {
            json!({
                "questionId": question.id,
                "isCorrect": *answer == question.correct_answer,
                "correctAnswer": question.correct_answer,
                "userAnswer": answer,
            })
        })
        .collect();
    let correct = results
        .iter()
        .filter(|r| r["isCorrect"].as_bool() == Some(true))
        .count();
    let score = if total > 0 {
        ((correct as f64 / total as f64) * 100.0).round() as u32
    } else {
        0
    };

    state.lock().unwrap().quiz_submissions.push(submission);

    Json(json!({
        "score": score,
        "correctAnswers": correct,
        "totalQuestions": total,
        "results": results,
    }))
}

async fn submit_answer(
    State(Shared(state)): State<Shared>,
    Json(submission): Json<AnswerSubmission>,
) -> Result<Json<AnswerResult>, StatusCode> {
    let question = submission
        .quiz_id
        .as_deref()
        .and_then(find_question)
        .ok_or(StatusCode::NOT_FOUND)?;
    let result = AnswerResult {
        is_correct: submission.selected_answer.is_some()
            && submission.selected_answer == question.correct_answer,
        correct_answer: question.correct_answer,
        explanation: question.explanation.clone(),
    };
    state.lock().unwrap().answer_submissions.push(submission);
    Ok(Json(result))
}

async fn save_assessment(
    State(Shared(state)): State<Shared>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let mut saved = body.clone();
    saved["_id"] = json!("assessment-1");
    state.lock().unwrap().assessments.push(saved.clone());
    Json(saved)
}

async fn assessments(State(Shared(state)): State<Shared>) -> Json<Vec<Value>> {
    Json(state.lock().unwrap().assessments.clone())
}

async fn upload_resume(
    State(Shared(state)): State<Shared>,
    mut multipart: Multipart,
) -> Result<Json<Value>, StatusCode> {
    let mut file_name = String::new();
    let mut job_description = String::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| StatusCode::BAD_REQUEST)?
    {
        match field.name() {
            Some("resume") => {
                file_name = field.file_name().unwrap_or_default().to_string();
                field.bytes().await.map_err(|_| StatusCode::BAD_REQUEST)?;
            }
            Some("jobDescription") => {
                job_description = field.text().await.map_err(|_| StatusCode::BAD_REQUEST)?;
            }
            _ => {}
        }
    }
    if file_name.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    state.lock().unwrap().uploads.push((file_name, job_description));
    Ok(Json(json!({
        "atsScore": 72,
        "suggestions": ["Quantify achievements", "Add a skills section"],
        "missingKeywords": ["AWS", "MongoDB"],
        "strengths": ["Clear structure"]
    })))
}

async fn save_resume(
    State(Shared(state)): State<Shared>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let content = body["content"].as_str().unwrap_or_default().to_string();
    state.lock().unwrap().saved_resumes.push(content.clone());
    Json(json!({ "_id": "resume-1", "content": content }))
}

async fn resume_history(State(Shared(state)): State<Shared>) -> Json<Vec<Value>> {
    let state = state.lock().unwrap();
    Json(
        state
            .saved_resumes
            .iter()
            .enumerate()
            .map(|(i, c)| json!({ "_id": format!("resume-{}", i + 1), "content": c }))
            .collect(),
    )
}

async fn skills_demand() -> Json<Value> {
    let skills: Vec<Value> = (0..10)
        .map(|i| json!({ "skill": format!("Skill {i}"), "demand": 90 - i }))
        .collect();
    Json(json!({ "skills": skills }))
}

async fn create_cover_letter(
    State(Shared(state)): State<Shared>,
    Json(mut body): Json<Value>,
) -> Json<Value> {
    let mut state = state.lock().unwrap();
    body["_id"] = json!(format!("cl-{}", state.cover_letters.len() + 1));
    state.cover_letters.push(body.clone());
    Json(body)
}

async fn list_cover_letters(State(Shared(state)): State<Shared>) -> Json<Vec<Value>> {
    Json(state.lock().unwrap().cover_letters.clone())
}

async fn get_cover_letter(
    State(Shared(state)): State<Shared>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    state
        .lock()
        .unwrap()
        .cover_letters
        .iter()
        .find(|c| c["_id"].as_str() == Some(id.as_str()))
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn delete_cover_letter(
    State(Shared(state)): State<Shared>,
    Path(id): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    let mut state = state.lock().unwrap();
    let before = state.cover_letters.len();
    state
        .cover_letters
        .retain(|c| c["_id"].as_str() != Some(id.as_str()));
    if state.cover_letters.len() == before {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(json!({ "message": "Cover letter deleted" })))
}
