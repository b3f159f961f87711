//! Text extraction backends
//!
//! Every backend turns raw file bytes into text and knows nothing about the
//! others. Ordering, timeouts and fallback live in [`crate::input::manager`].

use crate::error::{Result, ResumeMatcherError};
use pulldown_cmark::{Event, Parser, Tag};
use regex::bytes::Regex;
use std::sync::{Arc, OnceLock};

/// PDF backends in their default priority order
pub const KNOWN_PDF_BACKENDS: &[&str] = &["pdf-extract", "lopdf", "raw-strings"];

pub trait ExtractionBackend: Send + Sync {
    fn name(&self) -> &'static str;
    fn extract(&self, bytes: &[u8]) -> Result<String>;
}

/// Look up a PDF backend by its configured name
pub fn pdf_backend(name: &str) -> Option<Arc<dyn ExtractionBackend>> {
    match name {
        "pdf-extract" => Some(Arc::new(PdfExtractBackend)),
        "lopdf" => Some(Arc::new(LopdfBackend)),
        "raw-strings" => Some(Arc::new(RawStringsBackend)),
        _ => None,
    }
}

pub struct PdfExtractBackend;

impl ExtractionBackend for PdfExtractBackend {
    fn name(&self) -> &'static str {
        "pdf-extract"
    }

    fn extract(&self, bytes: &[u8]) -> Result<String> {
        pdf_extract::extract_text_from_mem(bytes).map_err(|e| {
            ResumeMatcherError::Processing(format!("pdf-extract failed: {}", e))
        })
    }
}

pub struct LopdfBackend;

impl ExtractionBackend for LopdfBackend {
    fn name(&self) -> &'static str {
        "lopdf"
    }

    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let doc = lopdf::Document::load_mem(bytes)
            .map_err(|e| ResumeMatcherError::Processing(format!("invalid pdf: {}", e)))?;

        let mut page_numbers: Vec<u32> = doc.get_pages().keys().cloned().collect();
        page_numbers.sort_unstable();

        // A single broken page should not cost us the rest of the document
        let mut out = String::new();
        for number in &page_numbers {
            match doc.extract_text(&[*number]) {
                Ok(text) => {
                    if !out.is_empty() && !out.ends_with('\n') {
                        out.push('\n');
                    }
                    out.push_str(&text);
                }
                Err(e) => log::debug!("lopdf skipped page {}: {}", number, e),
            }
        }
        Ok(out)
    }
}

/// Last resort: read string operands of text-showing operators straight out
/// of uncompressed content streams.
pub struct RawStringsBackend;

fn text_object_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s-u)\bBT\b(.*?)\bET\b").expect("valid text object regex"))
}

fn string_operand_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s-u)\(((?:[^()\\]|\\.)*)\)").expect("valid string operand regex"))
}

impl ExtractionBackend for RawStringsBackend {
    fn name(&self) -> &'static str {
        "raw-strings"
    }

    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let mut lines = Vec::new();
        for object in text_object_regex().captures_iter(bytes) {
            let body = &object[1];
            let mut line = String::new();
            for operand in string_operand_regex().captures_iter(body) {
                line.push_str(&unescape_pdf_string(&operand[1]));
            }
            let line = line.trim();
            if !line.is_empty() {
                lines.push(line.to_string());
            }
        }
        Ok(lines.join("\n"))
    }
}

fn unescape_pdf_string(raw: &[u8]) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut iter = raw.iter().copied().peekable();
    while let Some(byte) = iter.next() {
        let ch = if byte == b'\\' {
            match iter.next() {
                Some(b'n') => '\n',
                Some(b'r') => '\r',
                Some(b't') => '\t',
                Some(b'(') => '(',
                Some(b')') => ')',
                Some(b'\\') => '\\',
                Some(d @ b'0'..=b'7') => {
                    let mut value = u32::from(d - b'0');
                    for _ in 0..2 {
                        match iter.peek() {
                            Some(&n @ b'0'..=b'7') => {
                                value = value * 8 + u32::from(n - b'0');
                                iter.next();
                            }
                            _ => break,
                        }
                    }
                    char::from_u32(value).unwrap_or(' ')
                }
                Some(other) => other as char,
                None => break,
            }
        } else {
            byte as char
        };
        if ch == '\n' || ch == '\t' || (' '..='~').contains(&ch) {
            out.push(ch);
        }
    }
    out
}

pub struct PlainTextBackend;

impl ExtractionBackend for PlainTextBackend {
    fn name(&self) -> &'static str {
        "plain-text"
    }

    fn extract(&self, bytes: &[u8]) -> Result<String> {
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }
}

pub struct MarkdownBackend;

impl ExtractionBackend for MarkdownBackend {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let markdown_content = String::from_utf8_lossy(bytes);
        let mut text = String::with_capacity(markdown_content.len());

        for event in Parser::new(&markdown_content) {
            match event {
                Event::Text(t) | Event::Code(t) => text.push_str(&t),
                Event::SoftBreak | Event::HardBreak => text.push('\n'),
                Event::End(Tag::Paragraph)
                | Event::End(Tag::Heading(..))
                | Event::End(Tag::Item)
                | Event::End(Tag::CodeBlock(_)) => text.push('\n'),
                _ => {}
            }
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_backends_resolve() {
        for name in KNOWN_PDF_BACKENDS {
            let backend = pdf_backend(name).unwrap();
            assert_eq!(backend.name(), *name);
        }
        assert!(pdf_backend("ocr").is_none());
    }

    #[test]
    fn test_raw_strings_reads_text_objects() {
        let content = b"%PDF-1.4\n1 0 obj << /Length 80 >> stream\n\
            BT /F1 12 Tf 72 712 Td (Jane Doe) Tj ET\n\
            BT /F1 10 Tf 72 690 Td [(Python) -250 (, Django)] TJ ET\n\
            endstream endobj";
        let text = RawStringsBackend.extract(content).unwrap();
        assert_eq!(text, "Jane Doe\nPython, Django");
    }

    #[test]
    fn test_raw_strings_unescapes() {
        assert_eq!(unescape_pdf_string(br"C\+\+ \(senior\)"), "C++ (senior)");
        assert_eq!(unescape_pdf_string(br"caf\351"), "caf");
    }

    #[test]
    fn test_lopdf_rejects_garbage() {
        assert!(LopdfBackend.extract(b"%PDF-1.4 garbage").is_err());
    }

    #[test]
    fn test_plain_text_is_lossy() {
        let text = PlainTextBackend.extract(b"Python \xff Rust").unwrap();
        assert_eq!(text, "Python \u{FFFD} Rust");
    }

    #[test]
    fn test_markdown_strips_formatting() {
        let md = b"# John Doe\n\n**Software Engineer**\n\n- React\n- Node.js\n";
        let text = MarkdownBackend.extract(md).unwrap();
        assert!(text.contains("John Doe"));
        assert!(text.contains("Software Engineer"));
        assert!(text.contains("Node.js"));
        assert!(!text.contains("**"));
        assert!(!text.contains('#'));
    }
}
