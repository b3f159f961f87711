//! Text processing and normalization

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone)]
pub struct TextProcessor {
    horizontal_ws: Regex,
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextProcessor {
    pub fn new() -> Self {
        let horizontal_ws = Regex::new(r"[^\S\n]+").expect("Invalid whitespace regex");
        Self { horizontal_ws }
    }

    /// Clean extracted text while keeping its line structure.
    ///
    /// NUL bytes, replacement characters and BOMs are dropped, typographic
    /// punctuation is mapped to ASCII, horizontal whitespace collapses to a
    /// single space and runs of blank lines collapse to one.
    pub fn normalize(&self, text: &str) -> String {
        let unified = text.replace("\r\n", "\n");
        let cleaned = self.normalize_unicode(&unified);

        let mut out = String::with_capacity(cleaned.len());
        let mut pending_blank = false;

        for line in cleaned.split('\n') {
            let line = self.horizontal_ws.replace_all(line, " ");
            let line = line.trim();

            if line.is_empty() {
                pending_blank = !out.is_empty();
                continue;
            }
            if !out.is_empty() {
                out.push('\n');
                if pending_blank {
                    out.push('\n');
                }
            }
            pending_blank = false;
            out.push_str(line);
        }

        out
    }

    /// Lowercase word tokens. Trailing `+`/`#` stay attached so that
    /// "C++" and "C#" survive as single tokens.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let mut tokens: Vec<String> = Vec::new();
        let mut glue = false;

        for segment in text.split_word_bounds() {
            if (segment == "+" || segment == "#") && glue {
                if let Some(last) = tokens.last_mut() {
                    last.push_str(segment);
                }
                continue;
            }
            glue = false;
            if segment.chars().any(|c| c.is_alphanumeric()) {
                tokens.push(segment.to_lowercase());
                glue = true;
            }
        }

        tokens
    }

    /// Word count used for quick sanity checks on extracted text
    pub fn word_count(&self, text: &str) -> usize {
        text.unicode_words().count()
    }

    fn normalize_unicode(&self, text: &str) -> String {
        text.chars()
            .filter_map(|c| match c {
                '\u{0}' | '\u{FFFD}' | '\u{FEFF}' | '\u{200B}' => None,
                '\r' | '\u{2028}' | '\u{2029}' => Some('\n'),
                '\u{2018}' | '\u{2019}' => Some('\''),
                '\u{201C}' | '\u{201D}' => Some('"'),
                '\u{2013}' | '\u{2014}' => Some('-'),
                '\u{2026}' => Some('.'),
                '\u{00A0}' => Some(' '),
                '\u{2022}' | '\u{25CF}' | '\u{25AA}' => Some('-'),
                c if c.is_control() && c != '\n' && c != '\t' => Some(' '),
                c => Some(c),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_artifacts() {
        let processor = TextProcessor::new();
        let text = "\u{FEFF}John\u{0} Doe \u{FFFD}\r\nSoftware\t\tEngineer";
        assert_eq!(processor.normalize(text), "John Doe\nSoftware Engineer");
    }

    #[test]
    fn test_normalize_collapses_blank_lines() {
        let processor = TextProcessor::new();
        let text = "\n\nSKILLS\n\n\n\n  Python  \n \n\nEDUCATION\n\n";
        assert_eq!(processor.normalize(text), "SKILLS\n\nPython\n\nEDUCATION");
    }

    #[test]
    fn test_normalize_maps_typography() {
        let processor = TextProcessor::new();
        let text = "2015\u{2013}2019 \u{201C}lead\u{201D} \u{2022} it\u{2019}s";
        assert_eq!(processor.normalize(text), "2015-2019 \"lead\" - it's");
    }

    #[test]
    fn test_normalize_empty_input() {
        let processor = TextProcessor::new();
        assert_eq!(processor.normalize(" \u{0}\n\t\n"), "");
    }

    #[test]
    fn test_tokenization_keeps_symbols() {
        let processor = TextProcessor::new();
        let tokens = processor.tokenize("Skills: C#, C++ and Go (R for stats).");

        assert!(tokens.contains(&"c#".to_string()));
        assert!(tokens.contains(&"c++".to_string()));
        assert!(tokens.contains(&"go".to_string()));
        assert!(tokens.contains(&"r".to_string()));
        assert!(!tokens.contains(&"(".to_string()));
    }

    #[test]
    fn test_word_count() {
        let processor = TextProcessor::new();
        assert_eq!(processor.word_count("Rust programming language"), 3);
    }
}
