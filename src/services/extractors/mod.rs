//! Format-specific text extractors. Each takes the raw file bytes and returns
//! plain text; routing between them lives in the extraction service.

pub mod docx;
pub mod pdf;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractorError {
    #[error("PDF could not be read: {0}")]
    Pdf(String),

    #[error("DOCX could not be read: {0}")]
    Docx(String),
}
