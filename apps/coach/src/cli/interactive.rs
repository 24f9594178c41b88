//! Interactive quiz loops on the terminal.

use std::io::{self, BufRead, Write};

use anyhow::Context;
use tokio::sync::mpsc;

use crate::cli::render;
use crate::features::interview;
use crate::gateway::ApiClient;
use crate::llm_client::Completion;
use crate::models::quiz::QuizQuestion;
use crate::quiz::{run_session, Command, QuizBackend, QuizMode, QuizSession, SessionEvent};

const HELP: &str = "Answer with 1-4, then: [n]ext, [p]revious, [s]ubmit, [q]uit";

/// Maps one line of user input to a quiz command.
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim().to_ascii_lowercase();
    match line.as_str() {
        "n" | "next" => Some(Command::Next),
        "p" | "prev" | "previous" => Some(Command::Previous),
        "s" | "submit" => Some(Command::Submit),
        "q" | "quit" | "exit" => Some(Command::Quit),
        other => other
            .parse::<usize>()
            .ok()
            .filter(|n| *n >= 1)
            .map(|n| Command::Select(n - 1)),
    }
}

/// Runs a timed quiz against `backend`, reading commands from stdin.
pub async fn take_quiz<B: QuizBackend>(
    backend: B,
    mode: QuizMode,
    category: &str,
    json: bool,
) -> anyhow::Result<()> {
    let mut session = QuizSession::new(backend, mode);
    session.configure(category)?;
    let count = session.start().await?;

    let (category, questions): (String, Vec<QuizQuestion>) = session
        .round()
        .map(|r| (r.category().to_string(), r.questions().to_vec()))
        .unwrap_or_default();
    if !json {
        let budget = match session.mode() {
            QuizMode::SingleQuestion => "1 minute per question",
            QuizMode::FullCategory => "5 minutes in total",
        };
        println!("{category}: {count} questions, {budget}.\n{HELP}");
    }

    let (command_tx, command_rx) = mpsc::channel(16);
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();

    // Blocking stdin lives on its own thread so the process can exit while a read is pending.
    std::thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            match parse_command(&line) {
                Some(command) => {
                    if command_tx.blocking_send(command).is_err() {
                        break;
                    }
                }
                None => eprintln!("{HELP}"),
            }
        }
    });

    let printer = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            if !json {
                print_event(&questions, event);
            }
        }
    });

    let outcome = run_session(&mut session, command_rx, event_tx).await?;
    printer.await.context("quiz output task failed")?;

    match outcome {
        Some(outcome) if json => println!("{}", render::json(&outcome_json(&outcome))),
        Some(_) => {
            if let (QuizMode::SingleQuestion, Some(round)) = (session.mode(), session.round()) {
                print!("{}", render::review_summary(round.questions(), round.reviews()));
            }
        }
        None => println!("Quiz abandoned, nothing was submitted."),
    }
    Ok(())
}

fn outcome_json(outcome: &crate::quiz::QuizOutcome) -> serde_json::Value {
    serde_json::json!({
        "score": outcome.score(),
        "correctAnswers": outcome.correct_answers(),
        "totalQuestions": outcome.total_questions(),
    })
}

fn print_event(questions: &[QuizQuestion], event: SessionEvent) {
    match event {
        SessionEvent::Question {
            index,
            total,
            question,
            selected,
            remaining,
        } => print!("{}", render::question(index, total, &question, selected, remaining)),
        SessionEvent::Tick { remaining } => {
            if remaining % 60 == 0 || remaining == 30 || remaining <= 10 {
                println!("  {} left", crate::quiz::countdown::format_time(remaining));
            }
        }
        SessionEvent::Selected { option, .. } => println!("  Selected {}", option + 1),
        SessionEvent::Answered { index, result } => {
            if let Some(question) = questions.get(index) {
                print!("{}", render::answer_feedback(question, &result));
            }
            println!("Type n for the next question.");
        }
        SessionEvent::Completed(outcome) => print!("{}", render::outcome(&outcome)),
        SessionEvent::Notice(message) => eprintln!("! {message}"),
        SessionEvent::Abandoned => {}
    }
}

async fn read_line(prompt: &str) -> anyhow::Result<String> {
    print!("{prompt}");
    io::stdout().flush()?;
    let line = tokio::task::spawn_blocking(|| {
        let mut buf = String::new();
        io::stdin().read_line(&mut buf).map(|_| buf)
    })
    .await??;
    Ok(line)
}

/// Walks through an AI-generated question set, then grades and saves it.
pub async fn generated_interview(
    api: &ApiClient,
    llm: &dyn Completion,
    json: bool,
) -> anyhow::Result<()> {
    println!("Generating questions...");
    let questions = interview::generate_quiz(llm).await?;

    let mut answers = Vec::with_capacity(questions.len());
    for (i, question) in questions.iter().enumerate() {
        println!("\nQuestion {} of {}\n{}", i + 1, questions.len(), question.question);
        for (n, option) in question.options.iter().enumerate() {
            println!("   {}) {option}", n + 1);
        }
        let line = read_line("Your answer (blank to skip): ").await?;
        let answer = line
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|n| question.options.get(n))
            .cloned();
        answers.push(answer);
    }

    let correct = interview::grade(&questions, &answers)
        .iter()
        .filter(|r| r.is_correct)
        .count();
    let score = correct as f64 / questions.len() as f64 * 100.0;

    let assessment = interview::save_quiz_result(api, llm, &questions, &answers, score).await?;
    if json {
        println!("{}", render::json(&assessment));
        return Ok(());
    }

    println!("\nScore: {score:.0}%  ({correct} of {} correct)", questions.len());
    for result in assessment.questions.iter().filter(|r| !r.is_correct) {
        println!("\n{}\n  Answer: {}\n  {}", result.question, result.answer, result.explanation);
    }
    if let Some(tip) = &assessment.improvement_tip {
        println!("\nTip: {tip}");
    }
    Ok(())
}
