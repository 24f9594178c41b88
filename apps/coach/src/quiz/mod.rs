//! Quiz session controller. Drives a timed multiple-choice quiz from category
//! selection to a scored result.
//!
//! `idle → configuring(category) → in-progress → completed`
//!
//! The controller is a plain state machine; `driver` wires it to a one-second
//! ticker and a stream of user commands.

pub mod backend;
pub mod controller;
pub mod countdown;
pub mod driver;

use thiserror::Error;

use crate::errors::AppError;

pub use backend::QuizBackend;
pub use controller::{QuizOutcome, QuizSession};
pub use driver::{run_session, Command, SessionEvent};

/// Questions requested per session.
pub const QUESTION_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizMode {
    /// Interview practice: each question is timed and submitted on its own.
    SingleQuestion,
    /// Category quiz: one budget for the whole set, submitted at the end.
    FullCategory,
}

impl QuizMode {
    /// Countdown budget in seconds: per question, or for the whole quiz.
    pub const fn budget_secs(self) -> u32 {
        match self {
            QuizMode::SingleQuestion => 60,
            QuizMode::FullCategory => 300,
        }
    }
}

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("Failed to fetch questions: {0}")]
    Fetch(#[source] AppError),

    #[error("Failed to submit quiz: {0}")]
    Submission(#[source] AppError),

    #[error("{unanswered} question(s) still unanswered")]
    Incomplete { unanswered: usize },

    #[error("Option {option} does not exist (question has {available} options)")]
    InvalidOption { option: usize, available: usize },

    #[error("Submit the current answer first")]
    AnswerPending,

    #[error("This question has already been submitted")]
    AlreadySubmitted,

    #[error("Cannot {action} while the quiz is {state}")]
    InvalidState {
        action: &'static str,
        state: &'static str,
    },
}

/// Rounded percentage, 0 when `total` is 0.
pub fn percentage(value: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    ((f64::from(value) / f64::from(total)) * 100.0).round() as u32
}
