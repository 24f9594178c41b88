use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP actions service.
    Serve,
    /// Log in and store the session token.
    Login(LoginArgs),
    /// Create an account and store the session token.
    Register(RegisterArgs),
    /// Forget the stored session.
    Logout,
    /// Show who is logged in.
    Whoami,
    /// Check whether the profile is complete.
    Onboarding,
    /// Update the profile (industry, experience, bio, skills).
    Profile(ProfileArgs),
    /// Dashboard overview.
    Dashboard,
    /// AI industry insights.
    Insights(InsightsArgs),
    /// Most in-demand skills.
    Skills,
    /// Category quizzes.
    Quiz {
        #[command(subcommand)]
        action: QuizCommands,
    },
    /// Interview practice.
    Interview {
        #[command(subcommand)]
        action: InterviewCommands,
    },
    /// Resume analysis and editing.
    Resume {
        #[command(subcommand)]
        action: ResumeCommands,
    },
    /// Cover letters.
    CoverLetter {
        #[command(subcommand)]
        action: CoverLetterCommands,
    },
}

#[derive(Clone, Debug, Args)]
pub struct LoginArgs {
    #[arg(long)]
    pub email: String,
    #[arg(long, env = "COACH_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Clone, Debug, Args)]
pub struct RegisterArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long, env = "COACH_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Clone, Debug, Args)]
pub struct ProfileArgs {
    #[arg(long)]
    pub industry: Option<String>,
    /// Years of experience.
    #[arg(long)]
    pub experience: Option<u32>,
    #[arg(long)]
    pub bio: Option<String>,
    /// Repeat for several skills.
    #[arg(long = "skill")]
    pub skills: Vec<String>,
}

#[derive(Clone, Debug, Args)]
pub struct InsightsArgs {
    /// Industry to ask about instead of the profile's.
    #[arg(long)]
    pub industry: Option<String>,
}

#[derive(Clone, Debug, Subcommand)]
pub enum QuizCommands {
    /// List quiz categories.
    Categories,
    /// Quiz statistics for the current user.
    Stats,
    /// Load sample questions into the backend.
    Seed,
    /// Take a timed quiz (5 questions, 5 minutes).
    Take {
        category: String,
    },
}

#[derive(Clone, Debug, Subcommand)]
pub enum InterviewCommands {
    /// Timed practice, one question per minute.
    Practice {
        category: String,
    },
    /// Answer an AI-generated question set and save the assessment.
    Generate,
    /// Past assessments.
    Assessments,
}

#[derive(Clone, Debug, Subcommand)]
pub enum ResumeCommands {
    /// ATS analysis of a PDF or DOCX resume.
    Analyze {
        file: PathBuf,
        #[arg(long, default_value = "")]
        job_description: String,
    },
    /// Save resume content from a text or markdown file.
    Save {
        file: PathBuf,
    },
    /// Saved resume versions.
    History,
    /// Rewrite a section with AI.
    Improve {
        /// Section kind, e.g. experience or project.
        #[arg(long, default_value = "experience")]
        kind: String,
        text: String,
    },
}

#[derive(Clone, Debug, Subcommand)]
pub enum CoverLetterCommands {
    /// Generate and store a cover letter.
    Generate(CoverLetterArgs),
    List,
    Show {
        id: String,
    },
    Delete {
        id: String,
    },
}

#[derive(Clone, Debug, Args)]
pub struct CoverLetterArgs {
    #[arg(long)]
    pub job_title: String,
    #[arg(long)]
    pub company: String,
    /// Job description text, or `@path` to read it from a file.
    #[arg(long)]
    pub description: String,
}
