//! Job postings, skill-overlap scoring and ranking

use crate::config::ScoringConfig;
use crate::processing::profile::ResumeProfile;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::OnceLock;
use std::thread;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: String,
    #[serde(default)]
    pub location: Option<String>,
}

impl JobPosting {
    pub fn new(title: &str, description: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            ..Self::default()
        }
    }

    /// Lowercase text every skill is looked up in
    pub fn search_blob(&self) -> String {
        format!("{}\n{}\n{}", self.title, self.description, self.requirements).to_lowercase()
    }
}

/// Vacancy record as returned by the job-search API
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HhVacancy {
    pub name: String,
    #[serde(default)]
    pub employer: Option<HhNamed>,
    #[serde(default)]
    pub snippet: Option<HhSnippet>,
    #[serde(default)]
    pub area: Option<HhNamed>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HhNamed {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HhSnippet {
    #[serde(default)]
    pub requirement: Option<String>,
    #[serde(default)]
    pub responsibility: Option<String>,
}

impl From<HhVacancy> for JobPosting {
    fn from(vacancy: HhVacancy) -> Self {
        let snippet = vacancy.snippet.unwrap_or_default();
        let requirements = snippet.requirement.as_deref().map(html_to_text).unwrap_or_default();
        let description = vacancy
            .description
            .as_deref()
            .or(snippet.responsibility.as_deref())
            .map(html_to_text)
            .unwrap_or_default();

        Self {
            title: vacancy.name,
            company: vacancy.employer.map(|e| e.name).unwrap_or_default(),
            description,
            requirements,
            location: vacancy.area.map(|a| a.name).filter(|n| !n.is_empty()),
        }
    }
}

fn html_to_text(html: &str) -> String {
    static TAGS: OnceLock<Regex> = OnceLock::new();
    static BREAKS: OnceLock<Regex> = OnceLock::new();
    let tags = TAGS.get_or_init(|| Regex::new(r"<[^>]*>").expect("Invalid tag regex"));
    let breaks = BREAKS.get_or_init(|| {
        Regex::new(r"(?i)<br\s*/?>|</(?:p|li|div|h[1-6])\s*>").expect("Invalid line break regex")
    });

    let text = breaks.replace_all(html, "\n");
    let text = tags.replace_all(&text, "");
    let text = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");

    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
    VeryLow,
}

impl ConfidenceLevel {
    pub fn from_score(score: f64, matched: usize) -> Self {
        if score >= 80.0 && matched >= 3 {
            ConfidenceLevel::High
        } else if score >= 60.0 && matched >= 2 {
            ConfidenceLevel::Medium
        } else if score >= 40.0 && matched >= 1 {
            ConfidenceLevel::Low
        } else {
            ConfidenceLevel::VeryLow
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfidenceLevel::High => write!(f, "high"),
            ConfidenceLevel::Medium => write!(f, "medium"),
            ConfidenceLevel::Low => write!(f, "low"),
            ConfidenceLevel::VeryLow => write!(f, "very low"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub job: JobPosting,
    /// Share of profile skills found in the posting, 0..=100
    pub score: f64,
    pub matched_skills: BTreeSet<String>,
    pub missing_skills: BTreeSet<String>,
    pub confidence_level: ConfidenceLevel,
    pub explanation: String,
}

/// Scores résumé profiles against job postings by skill overlap
#[derive(Debug, Clone, Default)]
pub struct JobMatcher {
    config: ScoringConfig,
}

impl JobMatcher {
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    pub fn score(&self, profile: &ResumeProfile, job: &JobPosting) -> MatchResult {
        let blob = job.search_blob();
        let (matched_skills, missing_skills): (BTreeSet<String>, BTreeSet<String>) = profile
            .skills
            .iter()
            .cloned()
            .partition(|skill| blob.contains(&skill.to_lowercase()));

        let score = if profile.skills.is_empty() {
            self.config.empty_profile_score
        } else {
            (matched_skills.len() as f64 / profile.skills.len() as f64 * 100.0).clamp(0.0, 100.0)
        };

        let explanation = explain(profile.skills.len(), &matched_skills);
        MatchResult {
            job: job.clone(),
            score,
            confidence_level: ConfidenceLevel::from_score(score, matched_skills.len()),
            matched_skills,
            missing_skills,
            explanation,
        }
    }

    /// Score every posting and order by descending score. Ties keep input order.
    pub fn rank_jobs(&self, profile: &ResumeProfile, jobs: &[JobPosting]) -> Vec<MatchResult> {
        let mut results = if jobs.len() > self.config.parallel_threshold {
            self.score_parallel(profile, jobs)
        } else {
            jobs.iter().map(|job| self.score(profile, job)).collect()
        };

        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results
    }

    /// Ranked results at or above `min_score`, at most `max_results` of them
    pub fn top_matches(&self, profile: &ResumeProfile, jobs: &[JobPosting]) -> Vec<MatchResult> {
        let ranked = self.rank_jobs(profile, jobs);
        let total = ranked.len();
        let top: Vec<MatchResult> = ranked
            .into_iter()
            .filter(|result| result.score >= self.config.min_score)
            .take(self.config.max_results)
            .collect();
        debug!("Kept {} of {} ranked postings", top.len(), total);
        top
    }

    fn score_parallel(&self, profile: &ResumeProfile, jobs: &[JobPosting]) -> Vec<MatchResult> {
        let workers = thread::available_parallelism().map(|n| n.get()).unwrap_or(4);
        let chunk_size = jobs.len().div_ceil(workers).max(1);
        debug!("Scoring {} postings on {} workers", jobs.len(), workers);

        thread::scope(|scope| {
            let handles: Vec<_> = jobs
                .chunks(chunk_size)
                .map(|chunk| {
                    scope.spawn(move || {
                        chunk.iter().map(|job| self.score(profile, job)).collect::<Vec<_>>()
                    })
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|handle| handle.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
                .collect()
        })
    }
}

fn explain(total: usize, matched: &BTreeSet<String>) -> String {
    if total == 0 {
        return "No skills were extracted from the resume; neutral score applied".to_string();
    }

    let ratio = matched.len() as f64 / total as f64;
    let listed: Vec<&str> = matched.iter().take(5).map(String::as_str).collect();
    if ratio >= 0.7 {
        format!("Strong skills alignment with {} matching skills: {}", matched.len(), listed.join(", "))
    } else if ratio >= 0.4 {
        format!("Good skills match with {} relevant skills: {}", matched.len(), listed.join(", "))
    } else if !matched.is_empty() {
        format!("Some skills overlap ({} of {}): {}", matched.len(), total, listed.join(", "))
    } else {
        "Limited skills overlap".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> ResumeProfile {
        ResumeProfile::with_skills(["Python", "Django", "AWS"])
    }

    #[test]
    fn test_score_partial_overlap() {
        let job = JobPosting::new("Backend Developer", "We use python and Django every day");
        let result = JobMatcher::default().score(&profile(), &job);

        assert!((result.score - 66.7).abs() < 0.1);
        assert_eq!(result.matched_skills, ["Django", "Python"].iter().map(|s| s.to_string()).collect());
        assert_eq!(result.missing_skills, ["AWS"].iter().map(|s| s.to_string()).collect());
        assert_eq!(result.confidence_level, ConfidenceLevel::Medium);
    }

    #[test]
    fn test_matched_and_missing_partition_profile() {
        let profile = profile();
        let job = JobPosting {
            requirements: "AWS certification".to_string(),
            ..JobPosting::new("Cloud engineer", "")
        };
        let result = JobMatcher::default().score(&profile, &job);
        let union: BTreeSet<String> = result.matched_skills.union(&result.missing_skills).cloned().collect();
        assert_eq!(union, profile.skills);
        assert!(result.matched_skills.is_disjoint(&result.missing_skills));
    }

    #[test]
    fn test_empty_profile_gets_neutral_score() {
        let matcher = JobMatcher::new(&ScoringConfig::default());
        let result = matcher.score(&ResumeProfile::default(), &JobPosting::new("Anything", "at all"));
        assert_eq!(result.score, 50.0);
        assert!(result.matched_skills.is_empty());
        assert!(result.missing_skills.is_empty());
    }

    #[test]
    fn test_rank_is_stable_and_descending() {
        let jobs = vec![
            JobPosting::new("A", "nothing relevant"),
            JobPosting::new("B", "python"),
            JobPosting::new("C", "python django aws"),
            JobPosting::new("D", "django"),
        ];
        let ranked = JobMatcher::default().rank_jobs(&profile(), &jobs);
        let titles: Vec<&str> = ranked.iter().map(|r| r.job.title.as_str()).collect();
        assert_eq!(titles, vec!["C", "B", "D", "A"]);
    }

    #[test]
    fn test_parallel_rank_matches_sequential() {
        let jobs: Vec<JobPosting> = (0..300)
            .map(|i| {
                let description = match i % 4 {
                    0 => "python",
                    1 => "python django",
                    2 => "aws django python",
                    _ => "cobol",
                };
                JobPosting::new(&format!("job {}", i), description)
            })
            .collect();

        let sequential = JobMatcher::new(&ScoringConfig {
            parallel_threshold: usize::MAX,
            ..ScoringConfig::default()
        })
        .rank_jobs(&profile(), &jobs);
        let parallel = JobMatcher::new(&ScoringConfig {
            parallel_threshold: 10,
            ..ScoringConfig::default()
        })
        .rank_jobs(&profile(), &jobs);

        assert_eq!(sequential, parallel);
        assert_eq!(parallel.len(), jobs.len());
    }

    #[test]
    fn test_top_matches_filters_and_truncates() {
        let config = ScoringConfig {
            min_score: 30.0,
            max_results: 1,
            ..ScoringConfig::default()
        };
        let jobs = vec![
            JobPosting::new("low", "cobol"),
            JobPosting::new("mid", "python"),
            JobPosting::new("high", "python django"),
        ];
        let top = JobMatcher::new(&config).top_matches(&profile(), &jobs);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].job.title, "high");
    }

    #[test]
    fn test_vacancy_conversion() {
        let json = r#"{
            "name": "Python Developer",
            "employer": {"name": "Yandex"},
            "snippet": {"requirement": "Experience with <highlighttext>Django</highlighttext> &amp; AWS", "responsibility": "Build APIs"},
            "area": {"name": "Moscow"}
        }"#;
        let vacancy: HhVacancy = serde_json::from_str(json).unwrap();
        let job = JobPosting::from(vacancy);

        assert_eq!(job.title, "Python Developer");
        assert_eq!(job.company, "Yandex");
        assert_eq!(job.requirements, "Experience with Django & AWS");
        assert_eq!(job.description, "Build APIs");
        assert_eq!(job.location.as_deref(), Some("Moscow"));
    }

    #[test]
    fn test_html_line_breaks_in_every_spelling() {
        let text = html_to_text("Rust<br>Tokio<br/>Serde<br />Axum<BR>Tower<p>Hyper</p>");
        assert_eq!(text, "Rust\nTokio\nSerde\nAxum\nTower\nHyper");
    }

    #[test]
    fn test_confidence_levels() {
        assert_eq!(ConfidenceLevel::from_score(90.0, 4), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_score(90.0, 1), ConfidenceLevel::Low);
        assert_eq!(ConfidenceLevel::from_score(10.0, 1), ConfidenceLevel::VeryLow);
    }
}
