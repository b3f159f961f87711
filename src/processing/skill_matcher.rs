//! Vocabulary-driven skill detection

use crate::error::{Result, ResumeMatcherError};
use crate::processing::text_processor::TextProcessor;
use crate::processing::vocabulary::{match_mode, MatchMode, SkillCategory, Vocabulary};
use aho_corasick::{AhoCorasick, MatchKind};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// Finds vocabulary skills in free text and reports them under their canonical names
#[derive(Debug, Clone)]
pub struct SkillMatcher {
    vocabulary: Vocabulary,
    partial_matcher: AhoCorasick,
    /// Pattern id -> index into the vocabulary skills
    partial_owners: Vec<usize>,
    /// Lowercase token -> index into the vocabulary skills
    whole_words: HashMap<String, usize>,
    /// One-letter names ("C", "R") and the pattern that finds them
    letters: HashMap<String, usize>,
    letter_regex: Option<Regex>,
    processor: TextProcessor,
}

impl SkillMatcher {
    pub fn new(vocabulary: Vocabulary) -> Result<Self> {
        let mut patterns = Vec::new();
        let mut partial_owners = Vec::new();
        let mut whole_words = HashMap::new();
        let mut letters = HashMap::new();

        for (index, entry) in vocabulary.skills().iter().enumerate() {
            for term in entry.terms() {
                match match_mode(term) {
                    MatchMode::Partial => {
                        patterns.push(term.to_string());
                        partial_owners.push(index);
                    }
                    MatchMode::WholeWord if term.chars().count() == 1 => {
                        letters.entry(term.to_lowercase()).or_insert(index);
                    }
                    MatchMode::WholeWord => {
                        whole_words.entry(term.to_lowercase()).or_insert(index);
                    }
                }
            }
        }

        let letter_regex = if letters.is_empty() {
            None
        } else {
            let mut alternatives: Vec<String> = letters.keys().map(|l| regex::escape(l)).collect();
            alternatives.sort();
            let pattern = format!(r"(?i)\b(?:{})\b", alternatives.join("|"));
            Some(Regex::new(&pattern).map_err(|e| {
                ResumeMatcherError::Processing(format!("Failed to build skill matcher: {}", e))
            })?)
        };

        // Overlapping search needs the standard match kind: "PostgreSQL" must
        // still report "SQL".
        let partial_matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::Standard)
            .build(&patterns)
            .map_err(|e| ResumeMatcherError::Processing(format!("Failed to build skill matcher: {}", e)))?;

        Ok(Self {
            vocabulary,
            partial_matcher,
            partial_owners,
            whole_words,
            letters,
            letter_regex,
            processor: TextProcessor::new(),
        })
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Canonical names of every skill mentioned in `text`
    pub fn find_skills(&self, text: &str) -> BTreeSet<String> {
        let skills = self.vocabulary.skills();
        let mut found = BTreeSet::new();

        for mat in self.partial_matcher.find_overlapping_iter(text) {
            let owner = self.partial_owners[mat.pattern().as_usize()];
            found.insert(skills[owner].name.clone());
        }

        let tokens: HashSet<String> = self.processor.tokenize(text).into_iter().collect();
        for token in &tokens {
            if let Some(&owner) = self.whole_words.get(token) {
                found.insert(skills[owner].name.clone());
            }
        }

        if let Some(letter_regex) = &self.letter_regex {
            for mat in letter_regex.find_iter(text) {
                if !in_list_context(text, mat.start(), mat.end()) {
                    continue;
                }
                if let Some(&owner) = self.letters.get(&mat.as_str().to_lowercase()) {
                    found.insert(skills[owner].name.clone());
                }
            }
        }

        found
    }

    /// Group skills by vocabulary category; unknown names land in `Custom`
    pub fn categorize<'a, I>(&self, skills: I) -> BTreeMap<SkillCategory, Vec<String>>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut grouped: BTreeMap<SkillCategory, Vec<String>> = BTreeMap::new();
        for skill in skills {
            let category = self.vocabulary.category_of(skill).unwrap_or(SkillCategory::Custom);
            grouped.entry(category).or_default().push(skill.clone());
        }
        grouped
    }
}

/// A one-letter name counts only inside a list ("Go, R, Python"), alone on a
/// line, or right before "programming"/"language". "vitamin C" and "R&D" do not.
fn in_list_context(text: &str, start: usize, end: usize) -> bool {
    const LIST_MARKS: &[char] = &[',', ';', '/', '|', '(', ')', ':', '\n', '\r'];

    let after = &text[end..];
    if after.starts_with(|c: char| matches!(c, '#' | '+' | '&' | '\'' | '-'))
        || text[..start].ends_with(['-', '&'])
    {
        return false;
    }

    let before = text[..start].trim_end_matches([' ', '\t']).chars().last();
    let after = after.trim_start_matches([' ', '\t']);
    let next = after.chars().next();

    let marks = |c: Option<char>| c.map_or(true, |c| LIST_MARKS.contains(&c));
    if marks(before) || marks(next) {
        return true;
    }
    let lower = after.to_lowercase();
    lower.starts_with("programming") || lower.starts_with("language")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> SkillMatcher {
        SkillMatcher::new(Vocabulary::new()).unwrap()
    }

    #[test]
    fn test_finds_skills_case_insensitively() {
        let skills = matcher().find_skills("Skills: python, DJANGO, PostgreSQL and aws");
        for expected in ["Python", "Django", "PostgreSQL", "AWS"] {
            assert!(skills.contains(expected), "missing {}", expected);
        }
    }

    #[test]
    fn test_overlapping_terms_are_all_reported() {
        let skills = matcher().find_skills("Worked with PostgreSQL daily");
        assert!(skills.contains("PostgreSQL"));
        assert!(skills.contains("SQL"));
    }

    #[test]
    fn test_aliases_map_to_canonical_names() {
        let skills = matcher().find_skills("Deployed golang services to k8s backed by postgres");
        assert!(skills.contains("Go"));
        assert!(skills.contains("Kubernetes"));
        assert!(skills.contains("PostgreSQL"));
        assert!(!skills.contains("golang"));
    }

    #[test]
    fn test_short_names_need_whole_tokens() {
        let matcher = matcher();
        let skills = matcher.find_skills("Good at algorithms, argued for trust and excellent laws");
        assert!(!skills.contains("Go"));
        assert!(!skills.contains("R"));
        assert!(!skills.contains("Rust"));
        assert!(!skills.contains("Excel"));
        assert!(!skills.contains("AWS"));

        let skills = matcher.find_skills("Languages: Go, R, C#, C++ and Rust");
        for expected in ["Go", "R", "C#", "C++", "Rust"] {
            assert!(skills.contains(expected), "missing {}", expected);
        }
    }

    #[test]
    fn test_everyday_words_do_not_trigger_framework_names() {
        let matcher = matcher();
        let skills = matcher.find_skills("Redistributed systems and reactive design");
        assert!(!skills.contains("React"));
        assert!(!skills.contains("Redis"));

        let skills = matcher.find_skills("Built UIs in React backed by Redis");
        assert!(skills.contains("React"));
        assert!(skills.contains("Redis"));
    }

    #[test]
    fn test_single_letters_need_list_context() {
        let matcher = matcher();
        let skills = matcher.find_skills("Led R&D initiatives in vitamin C research");
        assert!(!skills.contains("C"));
        assert!(!skills.contains("R"));

        let skills = matcher.find_skills("Statistics in R programming\nC\nEmbedded work (C)");
        assert!(skills.contains("R"));
        assert!(skills.contains("C"));

        let skills = matcher.find_skills("Languages: C#, C++, Objective-C");
        assert!(!skills.contains("C"));
        assert!(matcher.find_skills("Languages: Go, R.").contains("R"));
    }

    #[test]
    fn test_custom_skills_are_detected() {
        let vocabulary = Vocabulary::new().with_custom_skills(&["Solidity"]);
        let matcher = SkillMatcher::new(vocabulary).unwrap();
        assert!(matcher.find_skills("Smart contracts in solidity").contains("Solidity"));
    }

    #[test]
    fn test_categorize() {
        let matcher = matcher();
        let skills: BTreeSet<String> = ["Python", "Docker", "Solidity"].iter().map(|s| s.to_string()).collect();
        let grouped = matcher.categorize(&skills);
        assert_eq!(grouped[&SkillCategory::Language], vec!["Python".to_string()]);
        assert_eq!(grouped[&SkillCategory::DevOps], vec!["Docker".to_string()]);
        assert_eq!(grouped[&SkillCategory::Custom], vec!["Solidity".to_string()]);
    }
}
