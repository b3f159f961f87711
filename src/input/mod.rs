//! Input processing module
//! Handles file detection, text extraction and the backend fallback chain

pub mod file_detector;
pub mod text_extractor;
pub mod manager;

pub use manager::{Extraction, ExtractionChain};
