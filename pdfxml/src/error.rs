//! Error types for the conversion pipeline

use crate::extraction::ExtractionError;
use thiserror::Error;

/// Errors that can abort a conversion
///
/// None of these are recovered inside the pipeline. The caller decides what a
/// failed conversion means (the conversion runner marks the record as failed).
#[derive(Error, Debug)]
pub enum ConversionError {
    /// The input violates a precondition (page count, metadata, payload shape)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The extraction collaborator could not produce text for the document
    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    /// The document contains content that cannot be written as XML
    #[error("Serialization failed: {0}")]
    Serialization(String),
}

/// Result alias used throughout the pipeline
pub type Result<T, E = ConversionError> = std::result::Result<T, E>;
