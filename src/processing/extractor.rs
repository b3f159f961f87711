//! Rule-based profile extraction from résumé text

use crate::config::AnalysisConfig;
use crate::error::{Result, ResumeMatcherError};
use crate::processing::document::{NumberedLine, ResumeDocument, SectionDetector, SectionType};
use crate::processing::profile::{
    merged_years, EducationEntry, ExperienceLevel, ResumeProfile, YearRange,
};
use crate::processing::skill_matcher::SkillMatcher;
use crate::processing::text_processor::TextProcessor;
use crate::processing::vocabulary::Vocabulary;
use chrono::Datelike;
use log::debug;
use regex::Regex;
use std::collections::HashSet;

const EARLIEST_YEAR: i32 = 1950;
/// Future years accepted for expected graduation dates
const FUTURE_YEARS: i32 = 10;
const MAX_STATED_YEARS: f32 = 50.0;

const MONTH_PREFIX: &str =
    r"(?:(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+|\d{1,2}[/.])?";

const TITLE_PATTERNS: &[&str] = &[
    r"(?i)\b(?:(?:senior|sr\.?|lead|principal|staff|junior|jr\.?|middle)\s+)?(?:software|frontend|front-end|backend|back-end|full[\s-]?stack|mobile|ios|android|web|cloud|data|devops|ml|machine learning|ai|systems?|network|security|qa|test|platform|site reliability|embedded|game)\s+(?:developer|engineer|architect|programmer)\b",
    r"(?i)\b(?:(?:senior|lead|chief)\s+)?(?:ux/ui|ui/ux|ux|ui|product|project|program|technical|engineering|it|marketing|sales)\s+(?:designer|manager|lead|director)\b",
    r"(?i)\b(?:(?:senior|junior|lead)\s+)?(?:data|business|systems|financial|marketing|research)\s+(?:analyst|scientist)\b",
    r"(?i)\b(?:scrum|agile|product|delivery)\s+(?:master|owner|coach)\b",
];

const STATED_YEARS_PATTERNS: &[&str] = &[
    r"(?i)\b(\d{1,2})\+?\s*(?:years?|yrs?)\b(?:\s+of)?(?:\s+(?:professional|industry|commercial|relevant|hands-on|work))?\s+experience",
    r"(?i)\bexperience\s*(?:of|:)?\s*(\d{1,2})\+?\s*(?:years?|yrs?)\b",
];

const ACRONYMS: &[&str] = &["ui", "ux", "ux/ui", "ui/ux", "qa", "ml", "ai", "it", "ios"];

/// A year or year range found on a line
#[derive(Debug, Clone, PartialEq)]
struct YearMention {
    line: usize,
    range: YearRange,
    ranged: bool,
    label: String,
}

#[derive(Debug, Clone)]
struct Mention {
    line: usize,
    text: String,
}

pub struct ProfileExtractor {
    config: AnalysisConfig,
    skill_matcher: SkillMatcher,
    sections: SectionDetector,
    degree_regex: Regex,
    institution_regex: Regex,
    year_regex: Regex,
    segment_separator: Regex,
    title_regexes: Vec<Regex>,
    generic_role_regex: Regex,
    stated_years_regexes: Vec<Regex>,
    processor: TextProcessor,
}

impl ProfileExtractor {
    pub fn new(config: &AnalysisConfig) -> Result<Self> {
        let vocabulary = Vocabulary::new().with_custom_skills(&config.custom_skills);

        let degree_regex = build_regex(&keyword_pattern(vocabulary.degree_keywords()))?;
        let institution_regex = build_regex(&format!(
            r"{}|\b(?:{})\b",
            keyword_pattern(vocabulary.institution_keywords()),
            vocabulary
                .institution_names()
                .iter()
                .map(|n| regex::escape(n))
                .collect::<Vec<_>>()
                .join("|")
        ))?;
        let year_regex = build_regex(&format!(
            r"(?i)\b{m}(?P<start>(?:19|20)\d{{2}})\b(?:\s*(?:-|\x{{2013}}|\x{{2014}}|to|until)\s*(?:{m}(?P<end>(?:19|20)\d{{2}})\b|(?P<open>present|current|now|ongoing|today)\b))?",
            m = MONTH_PREFIX
        ))?;

        Ok(Self {
            config: config.clone(),
            skill_matcher: SkillMatcher::new(vocabulary)?,
            sections: SectionDetector::new(),
            degree_regex,
            institution_regex,
            year_regex,
            segment_separator: build_regex(r"(?i)\s*[,|;]\s*|\s+-\s+|\s+(?:at|from|@)\s+")?,
            title_regexes: TITLE_PATTERNS.iter().map(|p| build_regex(p)).collect::<Result<_>>()?,
            generic_role_regex: build_regex(
                r"\b(?:Developer|Engineer|Designer|Manager|Analyst|Consultant|Architect|Director)\b",
            )?,
            stated_years_regexes: STATED_YEARS_PATTERNS
                .iter()
                .map(|p| build_regex(p))
                .collect::<Result<_>>()?,
            processor: TextProcessor::new(),
        })
    }

    pub fn skill_matcher(&self) -> &SkillMatcher {
        &self.skill_matcher
    }

    /// Year used to close open-ended ranges and bound plausible years
    pub fn reference_year(&self) -> i32 {
        self.config
            .reference_year
            .unwrap_or_else(|| chrono::Local::now().year())
    }

    /// Text is normalized first, so raw or stored résumé text behaves the
    /// same as text coming out of the extraction chain.
    pub fn extract_profile(&self, text: &str) -> ResumeProfile {
        if text.trim().is_empty() {
            return ResumeProfile::default();
        }
        let normalized = self.processor.normalize(text);
        let text = normalized.as_str();

        let document = ResumeDocument::parse(text, &self.sections);
        let skills = self.skill_matcher.find_skills(text);
        let job_titles = self.extract_job_titles(text);
        let education = self.extract_education(&document);
        let experience = self.estimate_experience(&document);

        let (experience_level, years_of_experience) = match experience {
            Some(years) => (self.level_for(years), years),
            None => (ExperienceLevel::Entry, 0.0),
        };

        let weights = &self.config.confidence_weights;
        let mut confidence = 0.0;
        if !skills.is_empty() {
            confidence += weights.skills;
        }
        if !job_titles.is_empty() {
            confidence += weights.job_titles;
        }
        if !education.is_empty() {
            confidence += weights.education;
        }
        if experience.is_some() {
            confidence += weights.experience;
        }

        debug!(
            "Extracted {} skills, {} titles, {} education entries, {:?} years",
            skills.len(),
            job_titles.len(),
            education.len(),
            experience
        );

        ResumeProfile {
            skills,
            job_titles,
            education,
            experience_level,
            years_of_experience,
            confidence_score: confidence.clamp(0.0, 1.0),
        }
    }

    pub fn level_for(&self, years: f32) -> ExperienceLevel {
        if years >= self.config.senior_level_years {
            ExperienceLevel::Senior
        } else if years >= self.config.mid_level_years {
            ExperienceLevel::Mid
        } else {
            ExperienceLevel::Entry
        }
    }

    /// Job titles in order of first appearance, title-cased and deduplicated
    pub fn extract_job_titles(&self, text: &str) -> Vec<String> {
        let mut found: Vec<(usize, String)> = Vec::new();
        for regex in &self.title_regexes {
            for mat in regex.find_iter(text) {
                found.push((mat.start(), title_case(mat.as_str())));
            }
        }

        if found.is_empty() {
            found = self.generic_titles(text);
        }

        found.sort_by_key(|(position, _)| *position);

        let mut seen = HashSet::new();
        found
            .into_iter()
            .filter(|(_, title)| seen.insert(title.to_lowercase()))
            .map(|(_, title)| title)
            .collect()
    }

    /// Short lines naming a role, used when no known title pattern matched
    fn generic_titles(&self, text: &str) -> Vec<(usize, String)> {
        let mut offset = 0;
        let mut titles = Vec::new();
        for line in text.lines() {
            let position = offset;
            offset += line.len() + 1;

            if titles.len() == 3 || self.sections.classify(line).is_some() {
                continue;
            }
            let head = self
                .segment_separator
                .split(line.trim())
                .next()
                .unwrap_or("")
                .trim_matches(|c: char| !c.is_alphanumeric());
            let words = head.split_whitespace().count();
            if (1..=5).contains(&words) && self.generic_role_regex.is_match(head) {
                titles.push((position, title_case(head)));
            }
        }
        titles
    }

    pub fn extract_education(&self, document: &ResumeDocument) -> Vec<EducationEntry> {
        let lines = document.section_lines(SectionType::Education);
        if lines.is_empty() {
            return Vec::new();
        }

        let mut degrees = Vec::new();
        let mut institutions = Vec::new();
        let mut years = Vec::new();

        for line in lines {
            years.extend(self.year_mentions(line));

            let stripped = self.year_regex.replace_all(&line.text, "");
            let segments: Vec<&str> = self
                .segment_separator
                .split(&stripped)
                .map(clean_segment)
                .filter(|s| !s.is_empty())
                .collect();

            // Degree first: "High School Diploma" also reads as an institution
            let degree = segments.iter().position(|s| self.degree_regex.is_match(s));
            let institution = segments
                .iter()
                .enumerate()
                .find(|(i, s)| Some(*i) != degree && self.institution_regex.is_match(s))
                .map(|(_, s)| s);
            let degree = degree.map(|i| segments[i]);

            if let Some(degree) = degree {
                degrees.push(Mention { line: line.number, text: degree.to_string() });
            }
            if let Some(institution) = institution {
                institutions.push(Mention { line: line.number, text: institution.to_string() });
            }
        }

        let degree_lines: Vec<usize> = degrees.iter().map(|m| m.line).collect();
        let institution_lines: Vec<usize> = institutions.iter().map(|m| m.line).collect();
        let year_lines: Vec<usize> = years.iter().map(|y| y.line).collect();

        let mut used_institutions = vec![false; institutions.len()];
        let mut used_years = vec![false; years.len()];
        let degree_institutions = pair_by_distance(&degree_lines, &institution_lines, &mut used_institutions);
        let degree_years = pair_by_distance(&degree_lines, &year_lines, &mut used_years);

        let mut entries: Vec<(usize, EducationEntry)> = Vec::new();
        for (index, degree) in degrees.iter().enumerate() {
            entries.push((
                degree.line,
                EducationEntry {
                    degree: degree.text.clone(),
                    institution: degree_institutions[index]
                        .map(|i| institutions[i].text.clone())
                        .unwrap_or_default(),
                    year: degree_years[index].map(|y| years[y].label.clone()).unwrap_or_default(),
                },
            ));
        }

        let orphans: Vec<&Mention> = institutions
            .iter()
            .zip(&used_institutions)
            .filter(|(_, used)| !**used)
            .map(|(mention, _)| mention)
            .collect();
        let orphan_lines: Vec<usize> = orphans.iter().map(|m| m.line).collect();
        let orphan_years = pair_by_distance(&orphan_lines, &year_lines, &mut used_years);

        for (index, institution) in orphans.iter().enumerate() {
            entries.push((
                institution.line,
                EducationEntry {
                    degree: String::new(),
                    institution: institution.text.clone(),
                    year: orphan_years[index].map(|y| years[y].label.clone()).unwrap_or_default(),
                },
            ));
        }

        entries.sort_by_key(|(line, _)| *line);
        entries.into_iter().map(|(_, entry)| entry).collect()
    }

    /// Years of experience, or `None` when the text offers no evidence
    pub fn estimate_experience(&self, document: &ResumeDocument) -> Option<f32> {
        let lines: Vec<NumberedLine> = if document.has_section(SectionType::Experience) {
            document
                .section_lines(SectionType::Experience)
                .into_iter()
                .cloned()
                .collect()
        } else {
            document.lines_outside(SectionType::Education)
        };

        let ranges: Vec<YearRange> = lines
            .iter()
            .flat_map(|line| self.year_mentions(line))
            .filter(|mention| mention.ranged)
            .map(|mention| mention.range)
            .collect();

        let from_ranges = if ranges.is_empty() {
            None
        } else {
            Some(merged_years(&ranges))
        };
        let stated = self.stated_years(&document.content);

        match (from_ranges, stated) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        }
    }

    /// Largest "N years of experience" figure in the text
    fn stated_years(&self, text: &str) -> Option<f32> {
        self.stated_years_regexes
            .iter()
            .flat_map(|regex| regex.captures_iter(text))
            .filter_map(|caps| caps.get(1)?.as_str().parse::<f32>().ok())
            .filter(|years| *years > 0.0 && *years <= MAX_STATED_YEARS)
            .fold(None, |best: Option<f32>, years| Some(best.map_or(years, |b| b.max(years))))
    }

    /// Valid year mentions on a line; implausible or inverted ones are dropped
    fn year_mentions(&self, line: &NumberedLine) -> Vec<YearMention> {
        let reference = self.reference_year();
        let plausible = EARLIEST_YEAR..=reference + FUTURE_YEARS;
        let mut mentions = Vec::new();

        for caps in self.year_regex.captures_iter(&line.text) {
            let Some(start) = caps.name("start").and_then(|m| m.as_str().parse::<i32>().ok()) else {
                continue;
            };
            if !plausible.contains(&start) {
                debug!("Skipping implausible year {} on line {}", start, line.number);
                continue;
            }

            let mention = if let Some(end) = caps.name("end") {
                let Ok(end) = end.as_str().parse::<i32>() else {
                    continue;
                };
                if !plausible.contains(&end) || end < start {
                    debug!("Skipping malformed range {}-{} on line {}", start, end, line.number);
                    continue;
                }
                YearMention {
                    line: line.number,
                    range: YearRange { start, end },
                    ranged: true,
                    label: format!("{}-{}", start, end),
                }
            } else if let Some(open) = caps.name("open") {
                YearMention {
                    line: line.number,
                    range: YearRange { start, end: reference.max(start) },
                    ranged: true,
                    label: format!("{}-{}", start, open.as_str().to_lowercase()),
                }
            } else {
                YearMention {
                    line: line.number,
                    range: YearRange { start, end: start },
                    ranged: false,
                    label: start.to_string(),
                }
            };
            mentions.push(mention);
        }

        mentions
    }
}

fn build_regex(pattern: &str) -> Result<Regex> {
    Regex::new(pattern)
        .map_err(|e| ResumeMatcherError::Processing(format!("Invalid extraction pattern: {}", e)))
}

/// Case-insensitive alternation of keywords anchored on word boundaries
fn keyword_pattern(keywords: &[String]) -> String {
    let alternatives: Vec<String> = keywords
        .iter()
        .map(|k| {
            let escaped = regex::escape(k);
            if k.ends_with(|c: char| c.is_alphanumeric()) {
                format!(r"{}\b", escaped)
            } else {
                escaped
            }
        })
        .collect();
    format!(r"(?i:\b(?:{}))", alternatives.join("|"))
}

/// Pair each anchor line with the closest free candidate line. The globally
/// closest pairs are fixed first; ties go to earlier lines.
fn pair_by_distance(anchors: &[usize], candidates: &[usize], taken: &mut [bool]) -> Vec<Option<usize>> {
    let mut pairs: Vec<(usize, usize, usize)> = Vec::new();
    for (a, anchor) in anchors.iter().enumerate() {
        for (c, candidate) in candidates.iter().enumerate() {
            if !taken[c] {
                pairs.push((anchor.abs_diff(*candidate), a, c));
            }
        }
    }
    pairs.sort_unstable();

    let mut assigned = vec![None; anchors.len()];
    for (_, a, c) in pairs {
        if assigned[a].is_none() && !taken[c] {
            assigned[a] = Some(c);
            taken[c] = true;
        }
    }
    assigned
}

fn clean_segment(segment: &str) -> &str {
    segment.trim_matches(|c: char| c.is_whitespace() || matches!(c, ',' | '-' | ':' | '(' | ')' | '|'))
}

fn title_case(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| {
            if ACRONYMS.contains(&word.to_lowercase().as_str()) {
                if word.eq_ignore_ascii_case("ios") {
                    "iOS".to_string()
                } else {
                    word.to_uppercase()
                }
            } else {
                word.split('-').map(capitalize).collect::<Vec<_>>().join("-")
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
        None => String::new(),
    }
}
