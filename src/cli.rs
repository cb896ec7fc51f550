//! CLI interface for the resume coach

use crate::llm::prompts::Mode;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "resume-coach")]
#[command(about = "Conversational resume review and mock interview assistant")]
#[command(
    long_about = "Chat with an expert recruiter about your resume and a target job description, or practice a mock interview against it"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat session
    Chat {
        /// Path to resume document (PDF)
        #[arg(short, long)]
        resume: Option<PathBuf>,

        /// Path to job description file (TXT, MD)
        #[arg(short, long)]
        job: Option<PathBuf>,

        /// Assistant persona for the session
        #[arg(short, long, value_enum, default_value_t = Mode::CareerCoach)]
        mode: Mode,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,
}

/// In-session commands, the CLI stand-in for the sidebar controls.
#[derive(Debug, PartialEq)]
pub enum SlashCommand {
    Resume(PathBuf),
    Job(PathBuf),
    Mode(Mode),
    Status,
    Quit,
}

/// Parse a chat line as a slash command. `None` means the line is a chat
/// turn; `Some(Err(..))` is a usage message for the user.
pub fn parse_slash_command(line: &str) -> Option<Result<SlashCommand, String>> {
    let trimmed = line.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let command = parts.next().unwrap_or_default();
    let arg = parts.next().map(str::trim).unwrap_or_default();

    let parsed = match command {
        "/resume" => {
            if arg.is_empty() {
                Err("Usage: /resume <path-to-pdf>".to_string())
            } else {
                let path = PathBuf::from(arg);
                validate_file_extension(&path, &["pdf"])
                    .map(|_| SlashCommand::Resume(path))
                    .map_err(|e| format!("Resume file: {}", e))
            }
        }
        "/job" => {
            if arg.is_empty() {
                Err("Usage: /job <path-to-txt-or-md>".to_string())
            } else {
                let path = PathBuf::from(arg);
                validate_file_extension(&path, &["txt", "md"])
                    .map(|_| SlashCommand::Job(path))
                    .map_err(|e| format!("Job description file: {}", e))
            }
        }
        "/mode" => Mode::from_str(arg, true)
            .map(SlashCommand::Mode)
            .map_err(|_| "Usage: /mode <coach|interviewer>".to_string()),
        "/status" => Ok(SlashCommand::Status),
        "/quit" | "/exit" => Ok(SlashCommand::Quit),
        other => Err(format!(
            "Unknown command: {}. Available: /resume, /job, /mode, /status, /quit",
            other
        )),
    };

    Some(parsed)
}

/// Validate file extension
pub fn validate_file_extension(path: &PathBuf, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}
