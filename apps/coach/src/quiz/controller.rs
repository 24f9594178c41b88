use tracing::{debug, info};

use crate::errors::AppError;
use crate::models::quiz::{AnswerResult, AnswerSubmission, QuizQuestion, QuizResult, QuizSubmission};
use crate::quiz::countdown::{Countdown, Tick};
use crate::quiz::{percentage, QuizBackend, QuizError, QuizMode, QUESTION_LIMIT};

/// Questions, answers and timer of a started quiz.
#[derive(Debug, Clone)]
pub struct Round {
    category: String,
    questions: Vec<QuizQuestion>,
    answers: Vec<Option<usize>>,
    /// Per-question feedback, single-question mode only.
    reviews: Vec<Option<AnswerResult>>,
    current: usize,
    countdown: Countdown,
}

impl Round {
    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn answers(&self) -> &[Option<usize>] {
        &self.answers
    }

    pub fn reviews(&self) -> &[Option<AnswerResult>] {
        &self.reviews
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> &QuizQuestion {
        &self.questions[self.current]
    }

    pub fn remaining(&self) -> u32 {
        self.countdown.remaining()
    }

    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_some()).count()
    }

    fn unanswered_count(&self) -> usize {
        self.answers.len() - self.answered_count()
    }

    fn last_index(&self) -> usize {
        self.questions.len() - 1
    }

    fn time_left(&self) -> bool {
        self.countdown.remaining() > 0
    }
}

#[derive(Debug, Clone)]
pub enum SessionState {
    Idle,
    Configuring { category: String },
    InProgress(Round),
    Completed { round: Round, outcome: QuizOutcome },
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Configuring { .. } => "being configured",
            SessionState::InProgress(_) => "in progress",
            SessionState::Completed { .. } => "completed",
        }
    }
}

/// Final score of a session.
#[derive(Debug, Clone, PartialEq)]
pub enum QuizOutcome {
    /// Backend-scored category quiz.
    Category(QuizResult),
    /// Per-question feedback collected during interview practice.
    Interview { reviews: Vec<AnswerResult> },
}

impl QuizOutcome {
    pub fn correct_answers(&self) -> u32 {
        match self {
            QuizOutcome::Category(result) => result.correct_answers,
            QuizOutcome::Interview { reviews } => {
                reviews.iter().filter(|r| r.is_correct).count() as u32
            }
        }
    }

    pub fn total_questions(&self) -> u32 {
        match self {
            QuizOutcome::Category(result) => result.total_questions,
            QuizOutcome::Interview { reviews } => reviews.len() as u32,
        }
    }

    pub fn score(&self) -> u32 {
        match self {
            QuizOutcome::Category(result) => result.score,
            QuizOutcome::Interview { .. } => {
                percentage(self.correct_answers(), self.total_questions())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// A single-question answer was graded; more questions remain.
    Answered { index: usize, result: AnswerResult },
    Completed(QuizOutcome),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickReport {
    /// No countdown is running.
    Idle,
    Running(u32),
    /// The countdown ran out and the quiz was submitted on the user's behalf.
    Submitted(Submission),
}

/// A quiz session state machine over a [`QuizBackend`].
pub struct QuizSession<B> {
    backend: B,
    mode: QuizMode,
    state: SessionState,
}

impl<B: QuizBackend> QuizSession<B> {
    pub fn new(backend: B, mode: QuizMode) -> Self {
        Self {
            backend,
            mode,
            state: SessionState::Idle,
        }
    }

    pub fn mode(&self) -> QuizMode {
        self.mode
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// The started round, in progress or completed.
    pub fn round(&self) -> Option<&Round> {
        match &self.state {
            SessionState::InProgress(round) | SessionState::Completed { round, .. } => Some(round),
            _ => None,
        }
    }

    pub fn outcome(&self) -> Option<&QuizOutcome> {
        match &self.state {
            SessionState::Completed { outcome, .. } => Some(outcome),
            _ => None,
        }
    }

    /// Chooses (or re-chooses) the category before the quiz starts.
    pub fn configure(&mut self, category: &str) -> Result<(), QuizError> {
        match self.state {
            SessionState::Idle | SessionState::Configuring { .. } => {
                self.state = SessionState::Configuring {
                    category: category.trim().to_string(),
                };
                Ok(())
            }
            _ => Err(self.invalid("choose a category")),
        }
    }

    /// Fetches the question batch and starts the countdown.
    ///
    /// On failure the session stays in configuring so the user can retry or pick
    /// another category.
    pub async fn start(&mut self) -> Result<usize, QuizError> {
        let category = match &self.state {
            SessionState::Configuring { category } => category.clone(),
            _ => return Err(self.invalid("start")),
        };

        let mut questions = self
            .backend
            .fetch_questions(self.mode, &category, QUESTION_LIMIT)
            .await
            .map_err(QuizError::Fetch)?;
        questions.truncate(QUESTION_LIMIT);
        if questions.is_empty() {
            return Err(QuizError::Fetch(AppError::NotFound(format!(
                "No questions available for {category}"
            ))));
        }

        let count = questions.len();
        info!(category = %category, questions = count, mode = ?self.mode, "Quiz started");
        self.state = SessionState::InProgress(Round {
            category,
            answers: vec![None; count],
            reviews: vec![None; count],
            questions,
            current: 0,
            countdown: Countdown::start(self.mode.budget_secs()),
        });
        Ok(count)
    }

    /// Records `option` as the answer to the current question.
    pub fn select_answer(&mut self, option: usize) -> Result<(), QuizError> {
        let mode = self.mode;
        let round = self.round_mut("select an answer")?;

        let available = round.current_question().options.len();
        if option >= available {
            return Err(QuizError::InvalidOption { option, available });
        }
        if mode == QuizMode::SingleQuestion && round.reviews[round.current].is_some() {
            return Err(QuizError::AlreadySubmitted);
        }
        round.answers[round.current] = Some(option);
        Ok(())
    }

    /// Advances the countdown by one second, submitting when it reaches zero.
    ///
    /// A failed deadline submission leaves the round in progress with the timer
    /// stopped; [`QuizSession::submit`] retries it.
    pub async fn tick(&mut self) -> Result<TickReport, QuizError> {
        let SessionState::InProgress(round) = &mut self.state else {
            return Ok(TickReport::Idle);
        };
        match round.countdown.tick() {
            Tick::Stopped => Ok(TickReport::Idle),
            Tick::Running(remaining) => Ok(TickReport::Running(remaining)),
            Tick::Expired => {
                info!(category = %round.category, "Time is up, submitting");
                self.submit_now().await.map(TickReport::Submitted)
            }
        }
    }

    /// Submits on the user's request.
    ///
    /// While time remains, a category quiz needs every question answered; after
    /// the deadline whatever was answered is sent. An interview question may be
    /// submitted without a selection and counts as incorrect.
    pub async fn submit(&mut self) -> Result<Submission, QuizError> {
        let mode = self.mode;
        let round = self.round_mut("submit")?;
        match mode {
            QuizMode::FullCategory => {
                let unanswered = round.unanswered_count();
                if unanswered > 0 && round.time_left() {
                    return Err(QuizError::Incomplete { unanswered });
                }
            }
            QuizMode::SingleQuestion => {
                if round.reviews[round.current].is_some() {
                    return Err(QuizError::AlreadySubmitted);
                }
            }
        }
        self.submit_now().await
    }

    /// Moves to the next question. Returns whether the position changed.
    ///
    /// In single-question mode the current question must be submitted first, and
    /// moving on restarts the per-question countdown.
    pub fn next(&mut self) -> Result<bool, QuizError> {
        let mode = self.mode;
        let round = self.round_mut("move to the next question")?;
        if mode == QuizMode::SingleQuestion && round.reviews[round.current].is_none() {
            return Err(QuizError::AnswerPending);
        }
        if round.current >= round.last_index() {
            return Ok(false);
        }
        round.current += 1;
        if mode == QuizMode::SingleQuestion {
            round.countdown.reset();
        }
        Ok(true)
    }

    /// Moves back one question. Interview questions cannot be revisited.
    pub fn previous(&mut self) -> Result<bool, QuizError> {
        let mode = self.mode;
        let round = self.round_mut("move to the previous question")?;
        if mode == QuizMode::SingleQuestion || round.current == 0 {
            return Ok(false);
        }
        round.current -= 1;
        Ok(true)
    }

    /// Drops the round without submitting anything.
    pub fn abandon(&mut self) {
        if let SessionState::InProgress(round) = &self.state {
            debug!(category = %round.category, "Quiz abandoned");
        }
        self.state = SessionState::Idle;
    }

    async fn submit_now(&mut self) -> Result<Submission, QuizError> {
        let state = self.state.name();
        let SessionState::InProgress(round) = &mut self.state else {
            return Err(QuizError::InvalidState {
                action: "submit",
                state,
            });
        };

        match self.mode {
            QuizMode::FullCategory => {
                let submission = QuizSubmission {
                    category: round.category.clone(),
                    answers: round.answers.clone(),
                    time_spent: round.countdown.elapsed(),
                };
                let result = self
                    .backend
                    .submit_quiz(&submission)
                    .await
                    .map_err(QuizError::Submission)?;
                round.countdown.stop();
                info!(score = result.score, time_spent = submission.time_spent, "Quiz submitted");

                let outcome = QuizOutcome::Category(result);
                self.finish(outcome.clone());
                Ok(Submission::Completed(outcome))
            }
            QuizMode::SingleQuestion => {
                let index = round.current;
                let submission = AnswerSubmission {
                    quiz_id: round.questions[index].id.clone(),
                    selected_answer: round.answers[index],
                    time_spent: round.countdown.elapsed(),
                };
                let result = self
                    .backend
                    .submit_answer(&submission)
                    .await
                    .map_err(QuizError::Submission)?;
                round.countdown.stop();
                round.reviews[index] = Some(result.clone());
                debug!(index, correct = result.is_correct, "Answer submitted");

                if index < round.last_index() {
                    return Ok(Submission::Answered { index, result });
                }
                let outcome = QuizOutcome::Interview {
                    reviews: round.reviews.iter().flatten().cloned().collect(),
                };
                self.finish(outcome.clone());
                Ok(Submission::Completed(outcome))
            }
        }
    }

    fn finish(&mut self, outcome: QuizOutcome) {
        if let SessionState::InProgress(round) =
            std::mem::replace(&mut self.state, SessionState::Idle)
        {
            self.state = SessionState::Completed { round, outcome };
        }
    }

    fn round_mut(&mut self, action: &'static str) -> Result<&mut Round, QuizError> {
        let state = self.state.name();
        match &mut self.state {
            SessionState::InProgress(round) => Ok(round),
            _ => Err(QuizError::InvalidState { action, state }),
        }
    }

    fn invalid(&self, action: &'static str) -> QuizError {
        QuizError::InvalidState {
            action,
            state: self.state.name(),
        }
    }
}
