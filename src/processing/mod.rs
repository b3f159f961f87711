//! Text processing, profile extraction and job matching

pub mod document;
pub mod extractor;
pub mod insights;
pub mod matcher;
pub mod profile;
pub mod query;
pub mod skill_matcher;
pub mod text_processor;
pub mod vocabulary;
