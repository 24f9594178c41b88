use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::warn;

use crate::models::quiz::{AnswerResult, QuizQuestion};
use crate::quiz::controller::{QuizOutcome, QuizSession, Submission, TickReport};
use crate::quiz::{QuizBackend, QuizError};

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// User input while a round is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Select(usize),
    Next,
    Previous,
    Submit,
    Quit,
}

/// What the presentation layer should show.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Question {
        index: usize,
        total: usize,
        question: QuizQuestion,
        selected: Option<usize>,
        remaining: u32,
    },
    Tick { remaining: u32 },
    Selected { index: usize, option: usize },
    Answered { index: usize, result: AnswerResult },
    Completed(QuizOutcome),
    /// A rejected command or failed submission; the round continues.
    Notice(String),
    Abandoned,
}

/// Runs a started round until it completes or the user quits.
///
/// Ticks once per second and applies commands as they arrive. Returns `None` when
/// the round was abandoned, including when the command channel closes.
pub async fn run_session<B: QuizBackend>(
    session: &mut QuizSession<B>,
    mut commands: mpsc::Receiver<Command>,
    events: mpsc::UnboundedSender<SessionEvent>,
) -> Result<Option<QuizOutcome>, QuizError> {
    if session.round().is_none() || session.outcome().is_some() {
        return Err(QuizError::InvalidState {
            action: "run",
            state: session.state().name(),
        });
    }

    let emit = |event: SessionEvent| {
        // The receiver going away only means nobody is watching.
        let _ = events.send(event);
    };
    show_question(session, &emit);

    let mut ticker = time::interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        if let Some(outcome) = session.outcome() {
            return Ok(Some(outcome.clone()));
        }

        tokio::select! {
            _ = ticker.tick() => match session.tick().await {
                Ok(TickReport::Idle) => {}
                Ok(TickReport::Running(remaining)) => emit(SessionEvent::Tick { remaining }),
                Ok(TickReport::Submitted(submission)) => report(submission, &emit),
                Err(e) => {
                    warn!("Deadline submission failed: {e}");
                    emit(SessionEvent::Notice(e.to_string()));
                }
            },
            command = commands.recv() => {
                let command = command.unwrap_or(Command::Quit);
                match command {
                    Command::Quit => {
                        session.abandon();
                        emit(SessionEvent::Abandoned);
                        return Ok(None);
                    }
                    Command::Select(option) => match session.select_answer(option) {
                        Ok(()) => {
                            let index = session.round().map_or(0, |r| r.current_index());
                            emit(SessionEvent::Selected { index, option });
                        }
                        Err(e) => emit(SessionEvent::Notice(e.to_string())),
                    },
                    Command::Next => match session.next() {
                        Ok(true) => show_question(session, &emit),
                        Ok(false) => {}
                        Err(e) => emit(SessionEvent::Notice(e.to_string())),
                    },
                    Command::Previous => match session.previous() {
                        Ok(true) => show_question(session, &emit),
                        Ok(false) => {}
                        Err(e) => emit(SessionEvent::Notice(e.to_string())),
                    },
                    Command::Submit => match session.submit().await {
                        Ok(submission) => report(submission, &emit),
                        Err(e) => emit(SessionEvent::Notice(e.to_string())),
                    },
                }
            }
        }
    }
}

fn show_question<B: QuizBackend>(session: &QuizSession<B>, emit: &impl Fn(SessionEvent)) {
    if let Some(round) = session.round() {
        let index = round.current_index();
        emit(SessionEvent::Question {
            index,
            total: round.questions().len(),
            question: round.current_question().clone(),
            selected: round.answers()[index],
            remaining: round.remaining(),
        });
    }
}

fn report(submission: Submission, emit: &impl Fn(SessionEvent)) {
    match submission {
        Submission::Answered { index, result } => emit(SessionEvent::Answered { index, result }),
        Submission::Completed(outcome) => emit(SessionEvent::Completed(outcome)),
    }
}
