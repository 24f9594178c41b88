use clap::Parser;

pub mod commands;
pub mod interactive;
pub mod render;
pub mod run;

pub use commands::Commands;

/// Top-level CLI parser for the `coach` binary.
#[derive(Debug, Parser)]
#[command(name = "coach", version, about = "Career coach - resumes, cover letters, interview practice")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Print raw JSON instead of formatted text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}
