use async_trait::async_trait;

use crate::errors::AppError;
use crate::features::{interview, quiz};
use crate::gateway::ApiClient;
use crate::models::quiz::{
    AnswerResult, AnswerSubmission, QuizQuestion, QuizResult, QuizSubmission,
};
use crate::quiz::QuizMode;

/// Where a quiz session gets its questions and sends its answers.
#[async_trait]
pub trait QuizBackend: Send + Sync {
    async fn fetch_questions(
        &self,
        mode: QuizMode,
        category: &str,
        limit: usize,
    ) -> Result<Vec<QuizQuestion>, AppError>;

    async fn submit_quiz(&self, submission: &QuizSubmission) -> Result<QuizResult, AppError>;

    async fn submit_answer(&self, submission: &AnswerSubmission)
        -> Result<AnswerResult, AppError>;
}

#[async_trait]
impl QuizBackend for ApiClient {
    async fn fetch_questions(
        &self,
        mode: QuizMode,
        category: &str,
        limit: usize,
    ) -> Result<Vec<QuizQuestion>, AppError> {
        match mode {
            QuizMode::SingleQuestion => interview::questions(self, category, limit).await,
            QuizMode::FullCategory => quiz::questions(self, category, limit).await,
        }
    }

    async fn submit_quiz(&self, submission: &QuizSubmission) -> Result<QuizResult, AppError> {
        quiz::submit(self, submission).await
    }

    async fn submit_answer(
        &self,
        submission: &AnswerSubmission,
    ) -> Result<AnswerResult, AppError> {
        interview::submit_answer(self, submission).await
    }
}

#[cfg(test)]
pub mod fake {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::testing::question_bank;

    /// In-memory backend that grades against `question_bank` and counts calls.
    #[derive(Clone, Default)]
    pub struct FakeBackend {
        pub fail_fetch: Arc<AtomicBool>,
        pub fail_submit: Arc<AtomicBool>,
        pub quiz_submissions: Arc<Mutex<Vec<QuizSubmission>>>,
        pub answer_submissions: Arc<Mutex<Vec<AnswerSubmission>>>,
        pub fetches: Arc<AtomicUsize>,
    }

    impl FakeBackend {
        pub fn set_fail_submit(&self, fail: bool) {
            self.fail_submit.store(fail, Ordering::SeqCst);
        }

        pub fn quiz_submission_count(&self) -> usize {
            self.quiz_submissions.lock().unwrap().len()
        }

        pub fn answer_submission_count(&self) -> usize {
            self.answer_submissions.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl QuizBackend for FakeBackend {
        async fn fetch_questions(
            &self,
            _mode: QuizMode,
            category: &str,
            limit: usize,
        ) -> Result<Vec<QuizQuestion>, AppError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.fail_fetch.load(Ordering::SeqCst) {
                return Err(AppError::network("Failed to fetch questions"));
            }
            let mut bank = question_bank(category);
            bank.truncate(limit);
            Ok(bank)
        }

        async fn submit_quiz(&self, submission: &QuizSubmission) -> Result<QuizResult, AppError> {
            if self.fail_submit.load(Ordering::SeqCst) {
                return Err(AppError::network("Failed to submit quiz"));
            }
            let bank = question_bank(&submission.category);
            let correct = submission
                .answers
                .iter()
                .zip(bank.iter())
                .filter(|(a, q)| **a == q.correct_answer)
                .count() as u32;
            let total = submission.answers.len() as u32;
            self.quiz_submissions.lock().unwrap().push(submission.clone());
            Ok(QuizResult {
                score: crate::quiz::percentage(correct, total),
                correct_answers: correct,
                total_questions: total,
                results: Vec::new(),
                improvement_tip: None,
            })
        }

        async fn submit_answer(
            &self,
            submission: &AnswerSubmission,
        ) -> Result<AnswerResult, AppError> {
            if self.fail_submit.load(Ordering::SeqCst) {
                return Err(AppError::network("Failed to submit answer"));
            }
            let question = submission
                .quiz_id
                .as_deref()
                .and_then(|id| {
                    let (category, _) = id.split_once('-')?;
                    question_bank(category)
                        .into_iter()
                        .find(|q| q.id.as_deref() == Some(id))
                })
                .ok_or_else(|| AppError::NotFound("question".to_string()))?;
            self.answer_submissions
                .lock()
                .unwrap()
                .push(submission.clone());
            Ok(AnswerResult {
                is_correct: submission.selected_answer.is_some()
                    && submission.selected_answer == question.correct_answer,
                correct_answer: question.correct_answer,
                explanation: question.explanation,
            })
        }
    }
}
