//! Error handling for the resume matcher

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// One failed attempt of an extraction backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendFailure {
    pub backend: String,
    pub reason: String,
}

impl fmt::Display for BackendFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.backend, self.reason)
    }
}

#[derive(Error, Debug)]
pub enum ResumeMatcherError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not extract readable text from this file ({})", format_attempts(.attempts))]
    ExtractionFailed { attempts: Vec<BackendFailure> },

    #[error("File format not supported: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Output formatting error: {0}")]
    OutputFormatting(String),
}

pub type Result<T> = std::result::Result<T, ResumeMatcherError>;

/// Convert anyhow errors to our custom error type
impl From<anyhow::Error> for ResumeMatcherError {
    fn from(err: anyhow::Error) -> Self {
        ResumeMatcherError::Processing(err.to_string())
    }
}

fn format_attempts(attempts: &[BackendFailure]) -> String {
    if attempts.is_empty() {
        return "no backends attempted".to_string();
    }
    attempts
        .iter()
        .map(|a| a.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_failed_lists_attempts() {
        let err = ResumeMatcherError::ExtractionFailed {
            attempts: vec![
                BackendFailure { backend: "pdf-extract".to_string(), reason: "bad xref".to_string() },
                BackendFailure { backend: "lopdf".to_string(), reason: "empty text".to_string() },
            ],
        };
        let message = err.to_string();
        assert!(message.starts_with("Could not extract readable text from this file"));
        assert!(message.contains("pdf-extract: bad xref"));
        assert!(message.contains("lopdf: empty text"));
    }

    #[test]
    fn test_anyhow_conversion() {
        let err: ResumeMatcherError = anyhow::anyhow!("boom").into();
        assert!(matches!(err, ResumeMatcherError::Processing(ref m) if m == "boom"));
    }
}
