//! CLI interface for resume insight

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "resume-insight")]
#[command(about = "Resume role prediction, skill gap analysis and resume Q&A")]
#[command(long_about = "Predict the best-fitting job role for a resume, list matched and missing skills for that role, estimate the experience level, and answer free-form questions about the resume")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a resume: top roles, skill gaps and experience level
    Analyze {
        /// Path to resume file (PDF, DOCX, TXT)
        #[arg(short, long)]
        resume: PathBuf,

        /// Artifact bundle to classify with (defaults to the configured bundle)
        #[arg(short, long)]
        bundle: Option<String>,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file; without a path, "<resume>_insights_<timestamp>.<ext>" is used
        #[arg(short, long, num_args = 0..=1)]
        save: Option<Option<PathBuf>>,

        /// Include metadata and a resume preview
        #[arg(short, long)]
        detailed: bool,
    },

    /// Ask a single question about a resume
    Ask {
        /// Path to resume file (PDF, DOCX, TXT)
        #[arg(short, long)]
        resume: PathBuf,

        /// The question to ask
        #[arg(short, long)]
        question: String,
    },

    /// Analyze a resume, then answer questions from stdin until EOF or "exit".
    /// "load <path>" switches to another resume.
    Chat {
        /// Path to resume file (PDF, DOCX, TXT)
        #[arg(short, long)]
        resume: PathBuf,

        /// Artifact bundle to classify with
        #[arg(short, long)]
        bundle: Option<String>,
    },

    /// List roles and their expected skills
    Roles {
        /// Show a single role
        #[arg(short, long)]
        role: Option<String>,
    },

    /// Classifier artifact bundle management
    Artifacts {
        #[command(subcommand)]
        action: ArtifactAction,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ArtifactAction {
    /// List installed bundles
    List,

    /// Show bundle information
    Info {
        /// Bundle name
        name: String,
    },

    /// Download a bundle from a Hugging Face Hub repository
    Download {
        /// Repository ID, e.g. "org/resume-role-classifier"
        repo: String,

        /// Local bundle name (defaults to the last path segment of the repository)
        #[arg(short, long)]
        name: Option<String>,

        /// Force re-download if the bundle exists
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file path
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<crate::config::OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(crate::config::OutputFormat::Console),
        "json" => Ok(crate::config::OutputFormat::Json),
        "markdown" | "md" => Ok(crate::config::OutputFormat::Markdown),
        _ => Err(format!("Invalid output format: {}. Supported: console, json, markdown", format)),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
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

/// One line typed into the interactive chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatInput {
    Exit,
    Load(PathBuf),
    Question(String),
}

/// Interpret a chat line; "exit" ends the session and "load <path>" swaps the resume
pub fn parse_chat_line(line: &str) -> ChatInput {
    let line = line.trim();
    if line.eq_ignore_ascii_case("exit") {
        return ChatInput::Exit;
    }

    match line.split_once(char::is_whitespace) {
        Some((command, path)) if command.eq_ignore_ascii_case("load") && !path.trim().is_empty() => {
            ChatInput::Load(PathBuf::from(path.trim()))
        }
        _ => ChatInput::Question(line.to_string()),
    }
}

/// Local bundle name for a Hub repository ID
pub fn bundle_name_from_repo(repo: &str) -> String {
    repo.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(repo)
        .to_string()
}
