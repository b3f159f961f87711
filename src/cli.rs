//! CLI interface for the resume matcher

use crate::config::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "resume-matcher")]
#[command(about = "Extract a structured profile from a resume and rank job postings against it")]
#[command(long_about = "Extract text from PDF or text resumes, derive skills, titles, education and experience level, and score job postings by skill overlap")]
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
    /// Print the normalized text of a resume
    Extract {
        /// Path to resume file (PDF, TXT, MD)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Extract a structured profile from a resume
    Analyze {
        /// Path to resume file (PDF, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Show skills grouped by category
        #[arg(short, long)]
        detailed: bool,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Rank job postings against a resume
    Match {
        /// Path to resume file (PDF, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// JSON file with job postings or vacancy records
        #[arg(short, long)]
        jobs: PathBuf,

        /// Search text used to filter postings
        #[arg(short, long)]
        query: Option<String>,

        /// Filter postings with the query generated from the profile
        #[arg(long, conflicts_with = "query")]
        auto_query: bool,

        /// Only keep postings in this location
        #[arg(short, long)]
        location: Option<String>,

        /// Zero-based results page of the job source
        #[arg(long, default_value_t = 0)]
        page: usize,

        /// Postings fetched per page (at most 100)
        #[arg(long, default_value_t = 100)]
        per_page: usize,

        /// Maximum number of matches to show
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Show matched and missing skills per posting
        #[arg(short, long)]
        detailed: bool,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,
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

    /// Print the configuration file location
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
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

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_match_command() {
        let cli = Cli::parse_from([
            "resume-matcher", "match", "--resume", "cv.pdf", "--jobs", "jobs.json", "-n", "5", "--output", "json",
        ]);
        match cli.command {
            Commands::Match { resume, limit, output, auto_query, .. } => {
                assert_eq!(resume, PathBuf::from("cv.pdf"));
                assert_eq!(limit, Some(5));
                assert_eq!(output.as_deref(), Some("json"));
                assert!(!auto_query);
            }
            _ => panic!("expected match command"),
        }
    }

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("MD"), Ok(OutputFormat::Markdown));
        assert!(parse_output_format("html").is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension(Path::new("cv.PDF"), &["pdf", "txt"]).is_ok());
        assert!(validate_file_extension(Path::new("cv.docx"), &["pdf", "txt"]).is_err());
        assert!(validate_file_extension(Path::new("cv"), &["pdf"]).is_err());
    }
}
