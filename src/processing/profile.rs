//! Structured résumé profile

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeProfile {
    pub skills: BTreeSet<String>,
    pub job_titles: Vec<String>,
    pub education: Vec<EducationEntry>,
    pub experience_level: ExperienceLevel,
    #[serde(default)]
    pub years_of_experience: f32,
    /// Share of profile facets that could be extracted, in [0, 1]
    pub confidence_score: f32,
}

/// One education record; components that were not found are empty strings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub degree: String,
    pub institution: String,
    pub year: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Entry,
    Mid,
    Senior,
    Unknown,
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ExperienceLevel::Entry => write!(f, "Entry"),
            ExperienceLevel::Mid => write!(f, "Mid"),
            ExperienceLevel::Senior => write!(f, "Senior"),
            ExperienceLevel::Unknown => write!(f, "Unknown"),
        }
    }
}

impl Default for ResumeProfile {
    fn default() -> Self {
        Self {
            skills: BTreeSet::new(),
            job_titles: Vec::new(),
            education: Vec::new(),
            experience_level: ExperienceLevel::Unknown,
            years_of_experience: 0.0,
            confidence_score: 0.0,
        }
    }
}

impl ResumeProfile {
    /// Profile holding only a skill set, as stored profiles are often reloaded
    pub fn with_skills<I, S>(skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            skills: skills.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty() && self.job_titles.is_empty() && self.education.is_empty()
    }
}

/// Inclusive span of calendar years
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub fn years(&self) -> i32 {
        self.end - self.start
    }
}

/// Total years covered by `ranges`, counting overlaps once
pub fn merged_years(ranges: &[YearRange]) -> f32 {
    let mut sorted = ranges.to_vec();
    sorted.sort();

    let mut total = 0;
    let mut current: Option<YearRange> = None;
    for range in sorted {
        current = match current {
            Some(open) if range.start <= open.end => Some(YearRange {
                start: open.start,
                end: open.end.max(range.end),
            }),
            Some(open) => {
                total += open.years();
                Some(range)
            }
            None => Some(range),
        };
    }
    if let Some(open) = current {
        total += open.years();
    }
    total as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_experience_level_serializes_lowercase() {
        let json = serde_json::to_string(&ExperienceLevel::Senior).unwrap();
        assert_eq!(json, "\"senior\"");
        let level: ExperienceLevel = serde_json::from_str("\"mid\"").unwrap();
        assert_eq!(level, ExperienceLevel::Mid);
    }

    #[test]
    fn test_merged_years_counts_overlap_once() {
        let ranges = [
            YearRange { start: 2015, end: 2018 },
            YearRange { start: 2017, end: 2020 },
            YearRange { start: 2021, end: 2023 },
        ];
        assert_eq!(merged_years(&ranges), 7.0);
        assert_eq!(merged_years(&[]), 0.0);
    }

    #[test]
    fn test_with_skills() {
        let profile = ResumeProfile::with_skills(["Python", "Django"]);
        assert_eq!(profile.skills.len(), 2);
        assert_eq!(profile.experience_level, ExperienceLevel::Unknown);
        assert!(!profile.is_empty());
        assert!(ResumeProfile::default().is_empty());
    }
}
