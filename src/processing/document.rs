//! Résumé document structure and section detection

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionType {
    Skills,
    Experience,
    Education,
    Summary,
    Projects,
    Certifications,
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SectionType::Skills => write!(f, "Skills"),
            SectionType::Experience => write!(f, "Experience"),
            SectionType::Education => write!(f, "Education"),
            SectionType::Summary => write!(f, "Summary"),
            SectionType::Projects => write!(f, "Projects"),
            SectionType::Certifications => write!(f, "Certifications"),
        }
    }
}

/// A line of document text with its zero-based line number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberedLine {
    pub number: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSection {
    pub section_type: SectionType,
    /// Line holding the header
    pub start_line: usize,
    /// First line after the section (exclusive)
    pub end_line: usize,
    /// Body lines, including text that followed the header on the same line
    pub lines: Vec<NumberedLine>,
}

impl DocumentSection {
    pub fn content(&self) -> String {
        self.lines.iter().map(|l| l.text.as_str()).collect::<Vec<_>>().join("\n")
    }

    pub fn contains_line(&self, number: usize) -> bool {
        number >= self.start_line && number < self.end_line
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeDocument {
    pub content: String,
    pub sections: Vec<DocumentSection>,
}

const SECTION_HEADERS: &[(SectionType, &[&str])] = &[
    (
        SectionType::Experience,
        &[
            "experience", "work experience", "professional experience", "relevant experience",
            "employment", "employment history", "work history", "career history", "career",
        ],
    ),
    (
        SectionType::Education,
        &[
            "education", "academic background", "educational background", "academic qualifications",
            "qualifications", "education and training", "education & training",
        ],
    ),
    (
        SectionType::Skills,
        &[
            "skills", "technical skills", "key skills", "core competencies", "competencies",
            "expertise", "technologies", "tech stack", "skills & abilities", "skills and abilities",
        ],
    ),
    (
        SectionType::Summary,
        &[
            "summary", "professional summary", "profile", "objective", "career objective", "about",
            "about me", "overview",
        ],
    ),
    (SectionType::Projects, &["projects", "personal projects", "key projects", "portfolio"]),
    (
        SectionType::Certifications,
        &[
            "certifications", "certificates", "licenses", "licenses & certifications",
            "certifications & licenses", "courses", "training",
        ],
    ),
];

/// Recognises header lines such as "WORK EXPERIENCE", "## Education" or "Skills: Rust, Go"
#[derive(Debug, Clone)]
pub struct SectionDetector {
    header_regex: Regex,
    lookup: HashMap<String, SectionType>,
}

impl Default for SectionDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionDetector {
    pub fn new() -> Self {
        let mut lookup = HashMap::new();
        let mut names: Vec<&str> = Vec::new();
        for (section_type, synonyms) in SECTION_HEADERS {
            for synonym in *synonyms {
                lookup.insert(synonym.to_string(), *section_type);
                names.push(*synonym);
            }
        }
        // Longest first so "work experience" wins over "experience"
        names.sort_by(|a, b| b.len().cmp(&a.len()));
        let alternatives: Vec<String> = names.iter().map(|n| regex::escape(n)).collect();

        let pattern = format!(
            r"(?i)^\s*(?:#+\s*)?(?P<head>{})\s*(?::\s*(?P<rest>.*))?$",
            alternatives.join("|")
        );
        let header_regex = Regex::new(&pattern).expect("Invalid section header regex");

        Self { header_regex, lookup }
    }

    /// Section type of a header line plus any inline text after the colon
    pub fn classify<'a>(&self, line: &'a str) -> Option<(SectionType, Option<&'a str>)> {
        let caps = self.header_regex.captures(line)?;
        let head = caps.name("head")?.as_str().to_lowercase();
        let section_type = *self.lookup.get(&head)?;
        let rest = caps
            .name("rest")
            .map(|m| m.as_str().trim())
            .filter(|s| !s.is_empty());
        Some((section_type, rest))
    }

    pub fn detect(&self, content: &str) -> Vec<DocumentSection> {
        let lines: Vec<&str> = content.lines().collect();
        let mut sections: Vec<DocumentSection> = Vec::new();

        for (number, line) in lines.iter().enumerate() {
            match self.classify(line) {
                Some((section_type, rest)) => {
                    if let Some(open) = sections.last_mut() {
                        open.end_line = number;
                    }
                    let mut body = Vec::new();
                    if let Some(rest) = rest {
                        body.push(NumberedLine { number, text: rest.to_string() });
                    }
                    sections.push(DocumentSection {
                        section_type,
                        start_line: number,
                        end_line: lines.len(),
                        lines: body,
                    });
                }
                None => {
                    if let Some(open) = sections.last_mut() {
                        let text = line.trim();
                        if !text.is_empty() {
                            open.lines.push(NumberedLine { number, text: text.to_string() });
                        }
                    }
                }
            }
        }

        sections
    }
}

impl ResumeDocument {
    pub fn parse(content: &str, detector: &SectionDetector) -> Self {
        Self {
            content: content.to_string(),
            sections: detector.detect(content),
        }
    }

    pub fn sections_of(&self, section_type: SectionType) -> impl Iterator<Item = &DocumentSection> {
        self.sections.iter().filter(move |s| s.section_type == section_type)
    }

    pub fn has_section(&self, section_type: SectionType) -> bool {
        self.sections_of(section_type).next().is_some()
    }

    /// Body lines of every section of the given type, in document order
    pub fn section_lines(&self, section_type: SectionType) -> Vec<&NumberedLine> {
        self.sections_of(section_type).flat_map(|s| s.lines.iter()).collect()
    }

    /// Every non-empty line that is not part of a section of the given type
    pub fn lines_outside(&self, section_type: SectionType) -> Vec<NumberedLine> {
        let excluded: Vec<&DocumentSection> = self.sections_of(section_type).collect();
        self.content
            .lines()
            .enumerate()
            .filter(|(number, line)| {
                !line.trim().is_empty() && !excluded.iter().any(|s| s.contains_line(*number))
            })
            .map(|(number, line)| NumberedLine { number, text: line.trim().to_string() })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESUME: &str = "Jane Doe\n\
        jane@example.com\n\
        SUMMARY\n\
        Backend developer.\n\
        Work Experience\n\
        Senior Software Engineer, Acme 2018 - present\n\
        EDUCATION:\n\
        BSc Computer Science\n\
        MIT 2014-2018\n\
        Skills: Rust, Go";

    #[test]
    fn test_detects_sections_in_order() {
        let document = ResumeDocument::parse(RESUME, &SectionDetector::new());
        let types: Vec<SectionType> = document.sections.iter().map(|s| s.section_type).collect();
        assert_eq!(
            types,
            vec![
                SectionType::Summary,
                SectionType::Experience,
                SectionType::Education,
                SectionType::Skills
            ]
        );
    }

    #[test]
    fn test_section_spans_until_next_header() {
        let document = ResumeDocument::parse(RESUME, &SectionDetector::new());
        let education: Vec<&str> = document
            .section_lines(SectionType::Education)
            .iter()
            .map(|l| l.text.as_str())
            .collect();
        assert_eq!(education, vec!["BSc Computer Science", "MIT 2014-2018"]);
    }

    #[test]
    fn test_inline_header_content() {
        let document = ResumeDocument::parse(RESUME, &SectionDetector::new());
        let skills = document.sections_of(SectionType::Skills).next().unwrap();
        assert_eq!(skills.content(), "Rust, Go");
    }

    #[test]
    fn test_sentences_are_not_headers() {
        let detector = SectionDetector::new();
        assert!(detector.classify("Experience with distributed systems").is_none());
        assert!(detector.classify("## Technical Skills").is_some());
        assert_eq!(detector.classify("Work History").map(|c| c.0), Some(SectionType::Experience));
    }

    #[test]
    fn test_missing_sections() {
        let document = ResumeDocument::parse("Just a line of text", &SectionDetector::new());
        assert!(document.sections.is_empty());
        assert!(!document.has_section(SectionType::Education));
        assert_eq!(document.lines_outside(SectionType::Education).len(), 1);
    }
}
