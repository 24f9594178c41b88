//! Plain-text formatting for command output. Every function returns the text so
//! the caller decides where it goes.

use std::fmt::Write;

use serde::Serialize;

use crate::models::cover_letter::CoverLetter;
use crate::models::dashboard::{DashboardData, IndustryInsights, SkillsDemand};
use crate::models::interview::Assessment;
use crate::models::quiz::{AnswerResult, QuizCategory, QuizQuestion, QuizStats};
use crate::models::resume::{ResumeAnalysis, SavedResume};
use crate::models::user::User;
use crate::quiz::countdown::format_time;
use crate::quiz::QuizOutcome;

const OPTION_LABELS: [char; 6] = ['1', '2', '3', '4', '5', '6'];

pub fn json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("<unserializable: {e}>"))
}

fn bullet_list(out: &mut String, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(out, "{heading}:");
    for item in items {
        let _ = writeln!(out, "  - {item}");
    }
}

pub fn user(user: &User) -> String {
    let mut out = format!("{} <{}>\n", user.name, user.email);
    match user.industry() {
        Some(industry) => {
            let _ = writeln!(out, "Industry: {industry}");
        }
        None => out.push_str("Profile incomplete: run `coach profile --industry <name>`\n"),
    }
    if let Some(profile) = &user.profile {
        if let Some(years) = profile.experience {
            let _ = writeln!(out, "Experience: {years} years");
        }
        if !profile.skills.is_empty() {
            let _ = writeln!(out, "Skills: {}", profile.skills.join(", "));
        }
    }
    out
}

pub fn dashboard(data: &DashboardData) -> String {
    let mut out = String::new();
    if let Some(name) = &data.name {
        let _ = writeln!(out, "Welcome back, {name}");
    }
    if let Some(industry) = data.profile.as_ref().and_then(|p| p.industry.as_deref()) {
        let _ = writeln!(out, "Industry: {industry}");
    }
    if let Some(stats) = data.stats.as_object() {
        for (key, value) in stats {
            let _ = writeln!(out, "{key}: {value}");
        }
    }
    out
}

pub fn insights(insights: &IndustryInsights) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Market outlook: {:?}   Growth: {:.1}%   Demand: {:?}",
        insights.market_outlook, insights.growth_rate, insights.demand_level
    );
    if !insights.salary_ranges.is_empty() {
        out.push_str("Salary ranges:\n");
        for range in &insights.salary_ranges {
            let _ = writeln!(
                out,
                "  {:<22} {:>9.0} - {:>9.0} (median {:.0}, {})",
                range.role, range.min, range.max, range.median, range.location
            );
        }
    }
    bullet_list(&mut out, "Top skills", &insights.top_skills);
    bullet_list(&mut out, "Key trends", &insights.key_trends);
    bullet_list(&mut out, "Recommended skills", &insights.recommended_skills);
    out
}

pub fn skills(demand: &SkillsDemand) -> String {
    let mut out = String::new();
    for skill in &demand.skills {
        let _ = write!(out, "{:<20} {:>5.0}", skill.name, skill.demand);
        if let Some(growth) = skill.growth {
            let _ = write!(out, "  (+{growth:.0}%)");
        }
        out.push('\n');
    }
    out
}

pub fn categories(categories: &[QuizCategory]) -> String {
    if categories.is_empty() {
        return "No quiz categories yet. Run `coach quiz seed` to load sample questions.\n"
            .to_string();
    }
    let mut out = String::new();
    for category in categories {
        let _ = write!(out, "{}", category.name);
        if let Some(count) = category.question_count {
            let _ = write!(out, " ({count} questions)");
        }
        if let Some(difficulty) = &category.difficulty {
            let _ = write!(out, " [{difficulty}]");
        }
        out.push('\n');
        if let Some(description) = &category.description {
            let _ = writeln!(out, "    {description}");
        }
    }
    out
}

pub fn stats(stats: &QuizStats) -> String {
    format!(
        "Quizzes taken: {}\nAverage score: {:.1}%\nBest score: {:.1}%\n",
        stats.total_quizzes, stats.average_score, stats.best_score
    )
}

pub fn question(
    index: usize,
    total: usize,
    question: &QuizQuestion,
    selected: Option<usize>,
    remaining: u32,
) -> String {
    let mut out = format!(
        "\nQuestion {} of {}   [{} left]\n{}\n",
        index + 1,
        total,
        format_time(remaining),
        question.question
    );
    for (i, option) in question.options.iter().enumerate() {
        let label = OPTION_LABELS.get(i).copied().unwrap_or('?');
        let marker = if selected == Some(i) { '>' } else { ' ' };
        let _ = writeln!(out, " {marker} {label}) {option}");
    }
    out
}

pub fn answer_feedback(question: &QuizQuestion, result: &AnswerResult) -> String {
    let mut out = if result.is_correct {
        "Correct!\n".to_string()
    } else {
        let correct = result
            .correct_answer
            .and_then(|i| question.options.get(i))
            .map(String::as_str)
            .unwrap_or("unknown");
        format!("Incorrect. The answer was: {correct}\n")
    };
    if let Some(explanation) = &result.explanation {
        let _ = writeln!(out, "{explanation}");
    }
    out
}

/// One line per interview question: whether it was answered correctly.
pub fn review_summary(questions: &[QuizQuestion], reviews: &[Option<AnswerResult>]) -> String {
    let mut out = String::from("\nReview:\n");
    for (i, question) in questions.iter().enumerate() {
        let mark = match reviews.get(i).cloned().flatten() {
            Some(result) if result.is_correct => "correct",
            Some(_) => "wrong",
            None => "skipped",
        };
        let _ = writeln!(out, "  {}. [{mark}] {}", i + 1, question.question);
    }
    out
}

pub fn outcome(outcome: &QuizOutcome) -> String {
    let mut out = format!(
        "\nScore: {}%  ({} of {} correct)\n",
        outcome.score(),
        outcome.correct_answers(),
        outcome.total_questions()
    );
    if let QuizOutcome::Category(result) = outcome {
        if let Some(tip) = &result.improvement_tip {
            let _ = writeln!(out, "Tip: {tip}");
        }
    }
    out
}

pub fn analysis(analysis: &ResumeAnalysis) -> String {
    let mut out = format!("ATS score: {}/100\n", analysis.ats_score);
    bullet_list(&mut out, "Strengths", &analysis.strengths);
    bullet_list(&mut out, "Suggestions", &analysis.suggestions);
    bullet_list(&mut out, "Missing keywords", &analysis.missing_keywords);
    out
}

pub fn resumes(resumes: &[SavedResume]) -> String {
    if resumes.is_empty() {
        return "No saved resumes.\n".to_string();
    }
    let mut out = String::new();
    for resume in resumes {
        let id = resume.id.as_deref().unwrap_or("-");
        let updated = resume
            .updated_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        let first_line = resume.content.lines().next().unwrap_or_default();
        let _ = writeln!(out, "{id:<26} {updated:<16} {first_line}");
    }
    out
}

pub fn cover_letters(letters: &[CoverLetter]) -> String {
    if letters.is_empty() {
        return "No cover letters yet.\n".to_string();
    }
    let mut out = String::new();
    for letter in letters {
        let id = letter.id.as_deref().unwrap_or("-");
        let created = letter
            .created_at
            .map(|t| t.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "{id:<26} {created:<10} {} at {}",
            letter.job_title, letter.company_name
        );
    }
    out
}

pub fn cover_letter(letter: &CoverLetter) -> String {
    format!(
        "{} at {}\n\n{}\n",
        letter.job_title, letter.company_name, letter.content
    )
}

pub fn assessments(assessments: &[Assessment]) -> String {
    if assessments.is_empty() {
        return "No assessments yet.\n".to_string();
    }
    let mut out = String::new();
    for assessment in assessments {
        let date = assessment
            .created_at
            .map(|t| t.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "{date:<10} {:>5.1}%  {}",
            assessment.quiz_score,
            assessment.category.as_deref().unwrap_or("")
        );
        if let Some(tip) = &assessment.improvement_tip {
            let _ = writeln!(out, "           Tip: {tip}");
        }
    }
    out
}
