//! Resume matcher library

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod processing;

pub use config::Config;
pub use error::{Result, ResumeMatcherError};
pub use input::{Extraction, ExtractionChain};
pub use processing::extractor::ProfileExtractor;
pub use processing::insights::{CareerSummary, ProfileInsights};
pub use processing::matcher::{ConfidenceLevel, JobMatcher, JobPosting, MatchResult};
pub use processing::profile::{EducationEntry, ExperienceLevel, ResumeProfile};
