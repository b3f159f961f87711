//! Job search queries and job sources

use crate::error::{Result, ResumeMatcherError};
use crate::processing::matcher::{HhVacancy, JobPosting};
use crate::processing::profile::ResumeProfile;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Largest page the job-search API hands out
pub const MAX_PER_PAGE: usize = 100;

const FALLBACK_QUERY: &str = "developer";

/// Search text for a profile: its first job title, else its first two skills
pub fn generate_search_query(profile: &ResumeProfile) -> String {
    if let Some(title) = profile.job_titles.first() {
        return title.clone();
    }
    let skills: Vec<&str> = profile.skills.iter().take(2).map(String::as_str).collect();
    if skills.is_empty() {
        FALLBACK_QUERY.to_string()
    } else {
        skills.join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSearchRequest {
    pub text: String,
    pub location: Option<String>,
    /// Zero-based page index
    pub page: usize,
    pub per_page: usize,
}

impl JobSearchRequest {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            location: None,
            page: 0,
            per_page: MAX_PER_PAGE,
        }
    }

    pub fn for_profile(profile: &ResumeProfile) -> Self {
        Self::new(&generate_search_query(profile))
    }

    pub fn with_location(mut self, location: Option<String>) -> Self {
        self.location = location.filter(|l| !l.trim().is_empty());
        self
    }

    pub fn with_page(mut self, page: usize, per_page: usize) -> Self {
        self.page = page;
        self.per_page = per_page.clamp(1, MAX_PER_PAGE);
        self
    }
}

/// Anything that can answer a job search
pub trait JobSource {
    fn search(&self, request: &JobSearchRequest) -> Result<Vec<JobPosting>>;
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JobRecord {
    Vacancy(HhVacancy),
    Posting(JobPosting),
}

impl From<JobRecord> for JobPosting {
    fn from(record: JobRecord) -> Self {
        match record {
            JobRecord::Vacancy(vacancy) => vacancy.into(),
            JobRecord::Posting(posting) => posting,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JobFile {
    List(Vec<JobRecord>),
    Page { items: Vec<JobRecord> },
}

/// Job postings loaded from a JSON file: either an array of records or an
/// API page object with an `items` array. Records may be flat postings or
/// vacancy-shaped.
#[derive(Debug, Clone)]
pub struct FileJobSource {
    path: PathBuf,
    postings: Vec<JobPosting>,
}

impl FileJobSource {
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ResumeMatcherError::InvalidInput(format!(
                "Job file does not exist: {}",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(path)?;
        let postings = Self::parse(&content)?;
        info!("Loaded {} job postings from {}", postings.len(), path.display());
        Ok(Self {
            path: path.to_path_buf(),
            postings,
        })
    }

    pub fn parse(content: &str) -> Result<Vec<JobPosting>> {
        let records = match serde_json::from_str::<JobFile>(content)? {
            JobFile::List(records) => records,
            JobFile::Page { items } => items,
        };
        Ok(records.into_iter().map(JobPosting::from).collect())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn postings(&self) -> &[JobPosting] {
        &self.postings
    }

    fn matches(request: &JobSearchRequest, posting: &JobPosting) -> bool {
        if let Some(location) = &request.location {
            let wanted = location.to_lowercase();
            let found = posting
                .location
                .as_deref()
                .map(|l| l.to_lowercase().contains(&wanted))
                .unwrap_or(false);
            if !found {
                return false;
            }
        }

        let terms: Vec<String> = request
            .text
            .split_whitespace()
            .map(str::to_lowercase)
            .filter(|t| t.len() >= 2)
            .collect();
        if terms.is_empty() {
            return true;
        }
        let blob = posting.search_blob();
        terms.iter().any(|term| blob.contains(term.as_str()))
    }
}

impl JobSource for FileJobSource {
    fn search(&self, request: &JobSearchRequest) -> Result<Vec<JobPosting>> {
        let hits: Vec<JobPosting> = self
            .postings
            .iter()
            .filter(|posting| Self::matches(request, posting))
            .skip(request.page.saturating_mul(request.per_page))
            .take(request.per_page)
            .cloned()
            .collect();
        debug!(
            "Search '{}' (page {}) returned {} postings",
            request.text,
            request.page,
            hits.len()
        );
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const JOBS: &str = r#"[
        {"title": "Python Developer", "company": "Acme", "description": "Django and AWS", "location": "Berlin"},
        {"name": "Rust Engineer", "employer": {"name": "Ferrous"}, "snippet": {"requirement": "Rust, Tokio"}, "area": {"name": "Remote"}},
        {"title": "Data Analyst", "description": "SQL dashboards", "location": "Berlin"}
    ]"#;

    #[test]
    fn test_query_prefers_title_then_skills() {
        let mut profile = ResumeProfile::with_skills(["Python", "Django", "AWS"]);
        assert_eq!(generate_search_query(&profile), "AWS Django");

        profile.job_titles.push("Backend Developer".to_string());
        assert_eq!(generate_search_query(&profile), "Backend Developer");

        assert_eq!(generate_search_query(&ResumeProfile::default()), "developer");
    }

    #[test]
    fn test_parses_flat_and_vacancy_records() {
        let postings = FileJobSource::parse(JOBS).unwrap();
        assert_eq!(postings.len(), 3);
        assert_eq!(postings[1].title, "Rust Engineer");
        assert_eq!(postings[1].company, "Ferrous");
        assert_eq!(postings[1].requirements, "Rust, Tokio");
    }

    #[test]
    fn test_parses_api_page() {
        let page = r#"{"found": 1, "items": [{"name": "QA Engineer"}]}"#;
        let postings = FileJobSource::parse(page).unwrap();
        assert_eq!(postings[0].title, "QA Engineer");
    }

    #[test]
    fn test_invalid_json_is_serialization_error() {
        assert!(matches!(
            FileJobSource::parse("{not json"),
            Err(ResumeMatcherError::Serialization(_))
        ));
    }

    #[test]
    fn test_search_filters_and_paginates() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("jobs.json");
        std::fs::write(&path, JOBS).unwrap();
        let source = FileJobSource::from_path(&path).unwrap();

        let berlin = source
            .search(&JobSearchRequest::new("").with_location(Some("berlin".to_string())))
            .unwrap();
        assert_eq!(berlin.len(), 2);

        let python = source.search(&JobSearchRequest::new("python")).unwrap();
        assert_eq!(python.len(), 1);
        assert_eq!(python[0].title, "Python Developer");

        let second_page = source.search(&JobSearchRequest::new("").with_page(1, 2)).unwrap();
        assert_eq!(second_page.len(), 1);
        assert_eq!(second_page[0].title, "Data Analyst");
    }

    #[test]
    fn test_page_far_past_the_end_is_empty() {
        let postings = FileJobSource::parse(JOBS).unwrap();
        let source = FileJobSource {
            path: PathBuf::from("jobs.json"),
            postings,
        };
        let request = JobSearchRequest::new("").with_page(usize::MAX, MAX_PER_PAGE);
        assert!(source.search(&request).unwrap().is_empty());
    }

    #[test]
    fn test_request_for_profile_uses_generated_query() {
        let mut profile = ResumeProfile::with_skills(["Rust"]);
        profile.job_titles.push("Platform Engineer".to_string());
        let request = JobSearchRequest::for_profile(&profile);
        assert_eq!(request.text, "Platform Engineer");
        assert_eq!(request.page, 0);
        assert_eq!(request.per_page, MAX_PER_PAGE);
    }
}
