//! File type detection

use std::path::Path;

const PDF_MAGIC: &[u8] = b"%PDF-";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FileType {
    Pdf,
    Text,
    Markdown,
    Unknown,
}

impl FileType {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => FileType::Pdf,
            "txt" => FileType::Text,
            "md" | "markdown" => FileType::Markdown,
            _ => FileType::Unknown,
        }
    }

    /// Content sniffing wins over the extension: a PDF header always means PDF,
    /// and a `.pdf` without one is not treated as a PDF.
    pub fn detect(path: Option<&Path>, bytes: &[u8]) -> Self {
        if is_pdf(bytes) {
            return FileType::Pdf;
        }

        let by_extension = path
            .and_then(|p| p.extension())
            .and_then(|ext| ext.to_str())
            .map(FileType::from_extension)
            .unwrap_or(FileType::Unknown);

        match by_extension {
            FileType::Pdf => FileType::Unknown,
            other => other,
        }
    }
}

/// PDF files may carry a few junk bytes before the header
pub fn is_pdf(bytes: &[u8]) -> bool {
    let window = &bytes[..bytes.len().min(1024)];
    window.windows(PDF_MAGIC.len()).any(|w| w == PDF_MAGIC)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_by_magic() {
        assert_eq!(FileType::detect(None, b"%PDF-1.7\n..."), FileType::Pdf);
        assert_eq!(FileType::detect(Some(Path::new("cv.txt")), b"%PDF-1.4"), FileType::Pdf);
    }

    #[test]
    fn test_detect_by_extension() {
        assert_eq!(FileType::detect(Some(Path::new("cv.TXT")), b"John Doe"), FileType::Text);
        assert_eq!(FileType::detect(Some(Path::new("cv.md")), b"# John"), FileType::Markdown);
        assert_eq!(FileType::detect(Some(Path::new("cv.docx")), b"PK.."), FileType::Unknown);
    }

    #[test]
    fn test_pdf_extension_without_header_is_unknown() {
        assert_eq!(FileType::detect(Some(Path::new("cv.pdf")), b"not a pdf"), FileType::Unknown);
    }
}
