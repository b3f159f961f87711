//! Configuration management for the resume matcher

use crate::error::{Result, ResumeMatcherError};
use crate::input::text_extractor::KNOWN_PDF_BACKENDS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub extraction: ExtractionConfig,
    pub analysis: AnalysisConfig,
    pub scoring: ScoringConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// PDF backends in the order they are tried
    pub backends: Vec<String>,
    pub backend_timeout_secs: u64,
    pub max_file_size: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub mid_level_years: f32,
    pub senior_level_years: f32,
    pub confidence_weights: ConfidenceWeights,
    pub custom_skills: Vec<String>,
    /// Year used for open-ended ranges ("2020 - present"). Current year when unset.
    pub reference_year: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfidenceWeights {
    pub skills: f32,
    pub job_titles: f32,
    pub education: f32,
    pub experience: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Score given to every job when the profile has no skills
    pub empty_profile_score: f64,
    pub min_score: f64,
    pub max_results: usize,
    pub parallel_threshold: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            backends: KNOWN_PDF_BACKENDS.iter().map(|b| b.to_string()).collect(),
            backend_timeout_secs: 30,
            max_file_size: 50 * 1024 * 1024,
        }
    }
}

impl Default for ConfidenceWeights {
    fn default() -> Self {
        Self {
            skills: 0.4,
            job_titles: 0.2,
            education: 0.2,
            experience: 0.2,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            mid_level_years: 3.0,
            senior_level_years: 6.0,
            confidence_weights: ConfidenceWeights::default(),
            custom_skills: Vec::new(),
            reference_year: None,
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            empty_profile_score: 50.0,
            min_score: 5.0,
            max_results: 50,
            parallel_threshold: 256,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            detailed: false,
            color_output: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            extraction: ExtractionConfig::default(),
            analysis: AnalysisConfig::default(),
            scoring: ScoringConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Load from `config_path`, writing defaults there on first use
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| ResumeMatcherError::Configuration(format!("Failed to parse config: {}", e)))?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ResumeMatcherError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-matcher")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        if self.extraction.backends.is_empty() {
            return Err(ResumeMatcherError::Configuration(
                "extraction.backends must list at least one backend".to_string(),
            ));
        }
        for backend in &self.extraction.backends {
            if !KNOWN_PDF_BACKENDS.contains(&backend.as_str()) {
                return Err(ResumeMatcherError::Configuration(format!(
                    "Unknown extraction backend '{}'. Known: {}",
                    backend,
                    KNOWN_PDF_BACKENDS.join(", ")
                )));
            }
        }
        if self.extraction.backend_timeout_secs == 0 {
            return Err(ResumeMatcherError::Configuration(
                "extraction.backend_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.analysis.mid_level_years < 0.0
            || self.analysis.senior_level_years <= self.analysis.mid_level_years
        {
            return Err(ResumeMatcherError::Configuration(
                "analysis.senior_level_years must exceed analysis.mid_level_years".to_string(),
            ));
        }
        let scores = [
            ("scoring.empty_profile_score", self.scoring.empty_profile_score),
            ("scoring.min_score", self.scoring.min_score),
        ];
        for (name, value) in scores {
            if !(0.0..=100.0).contains(&value) {
                return Err(ResumeMatcherError::Configuration(format!(
                    "{} must be within 0..=100, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.scoring.empty_profile_score, 50.0);
        assert_eq!(config.extraction.backends, vec!["pdf-extract", "lopdf", "raw-strings"]);
    }

    #[test]
    fn test_load_creates_default_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.analysis.senior_level_years, 6.0);

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.scoring.max_results, config.scoring.max_results);
    }

    #[test]
    fn test_rejects_unknown_backend() {
        let mut config = Config::default();
        config.extraction.backends.push("tesseract".to_string());
        assert!(matches!(config.validate(), Err(ResumeMatcherError::Configuration(_))));
    }

    #[test]
    fn test_rejects_inverted_thresholds() {
        let mut config = Config::default();
        config.analysis.senior_level_years = 2.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_out_of_range_score() {
        let mut config = Config::default();
        config.scoring.empty_profile_score = 120.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_configuration_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "extraction = 12").unwrap();
        assert!(matches!(Config::load_from(&path), Err(ResumeMatcherError::Configuration(_))));
    }
}
