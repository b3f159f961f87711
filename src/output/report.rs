//! Report structures handed to the formatters

use crate::processing::insights::{CareerSummary, ProfileInsights};
use crate::processing::matcher::MatchResult;
use crate::processing::profile::ResumeProfile;
use crate::processing::vocabulary::SkillCategory;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::SystemTime;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// When the report was generated
    pub generated_at: SystemTime,

    /// Version of the matcher used
    pub matcher_version: String,

    /// Resume file analyzed
    pub resume_file: String,

    /// Backend that produced the resume text
    pub extraction_backend: String,

    /// Total processing time
    pub processing_time_ms: u64,
}

impl ReportMetadata {
    pub fn new(resume_file: &str, extraction_backend: &str, processing_time_ms: u64) -> Self {
        Self {
            generated_at: SystemTime::now(),
            matcher_version: env!("CARGO_PKG_VERSION").to_string(),
            resume_file: resume_file.to_string(),
            extraction_backend: extraction_backend.to_string(),
            processing_time_ms,
        }
    }
}

/// A profile on its own, as printed by `analyze`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileReport {
    pub profile: ResumeProfile,
    pub skills_by_category: BTreeMap<SkillCategory, Vec<String>>,
    pub insights: ProfileInsights,
    pub metadata: ReportMetadata,
}

/// A profile together with its ranked job matches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    pub profile: ResumeProfile,

    /// Query the postings were filtered with, if any
    pub search_query: Option<String>,

    /// Postings scored before filtering
    pub jobs_considered: usize,

    pub matches: Vec<MatchResult>,
    pub career: CareerSummary,
    pub metadata: ReportMetadata,
}

impl MatchReport {
    pub fn best_score(&self) -> Option<f64> {
        self.matches.first().map(|m| m.score)
    }

    pub fn average_score(&self) -> f64 {
        if self.matches.is_empty() {
            return 0.0;
        }
        self.matches.iter().map(|m| m.score).sum::<f64>() / self.matches.len() as f64
    }
}
