//! Extraction collaborator interface
//!
//! Decoding PDF byte streams is not done here. An extractor hands the pipeline
//! an [`ExtractedPdf`]: the plain text, the declared page count, and whatever
//! metadata the source carried. [`PayloadExtractor`] reads the JSON payload a
//! PDF decoder leaves behind, or plain text files with caller-supplied metadata.

use crate::document_model::MetadataInput;
use crate::error::{ConversionError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Upload limit of the conversion service, 10 MiB
pub const DEFAULT_MAX_INPUT_BYTES: u64 = 10 * 1024 * 1024;

/// Errors raised while obtaining text for a document
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("IO error reading {path}: {source}", path = .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed extraction payload in {path}: {source}", path = .path.display())]
    MalformedPayload {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Input {path} is {size} bytes, above the {limit} byte limit", path = .path.display())]
    TooLarge { path: PathBuf, size: u64, limit: u64 },

    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),
}

/// Output of the extraction collaborator
///
/// Mirrors the `{ text, numpages, info }` payload. Page count and metadata are
/// kept loose here and validated by [`ExtractedPdf::page_count`] and
/// [`ExtractedPdf::metadata`], so that a bad value is reported as invalid
/// input rather than as an unreadable payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractedPdf {
    /// Full extracted text, lines separated by `\n`
    pub text: String,
    /// Declared page count
    pub numpages: i64,
    /// Raw info dictionary, if any
    #[serde(default)]
    pub info: Option<serde_json::Value>,
}

impl ExtractedPdf {
    /// Build a payload from text and already-typed metadata
    pub fn new(text: impl Into<String>, numpages: i64, info: MetadataInput) -> Self {
        let info = serde_json::to_value(info).ok();
        Self {
            text: text.into(),
            numpages,
            info,
        }
    }

    /// Validated page count
    ///
    /// # Returns
    /// * `Ok(usize)` - A positive page count
    /// * `Err(ConversionError::InvalidInput)` - Zero or negative `numpages`
    pub fn page_count(&self) -> Result<usize> {
        match usize::try_from(self.numpages) {
            Ok(count) if count > 0 => Ok(count),
            _ => Err(ConversionError::InvalidInput(format!(
                "page count must be greater than zero, got {}",
                self.numpages
            ))),
        }
    }

    /// Validated metadata
    ///
    /// A missing or `null` info object yields empty metadata. `null` fields
    /// count as absent.
    ///
    /// # Returns
    /// * `Ok(MetadataInput)` - Title, author and creation date as supplied
    /// * `Err(ConversionError::InvalidInput)` - Info is not an object, or a field is not a string
    pub fn metadata(&self) -> Result<MetadataInput> {
        match &self.info {
            None | Some(serde_json::Value::Null) => Ok(MetadataInput::default()),
            Some(value @ serde_json::Value::Object(_)) => {
                MetadataInput::deserialize(value).map_err(|e| {
                    ConversionError::InvalidInput(format!("malformed metadata: {}", e))
                })
            }
            Some(other) => Err(ConversionError::InvalidInput(format!(
                "metadata must be an object, got {}",
                other
            ))),
        }
    }
}

/// Source of extracted text for a stored input file
pub trait TextExtractor: Send + Sync {
    /// Extract text, page count and metadata from the file at `path`
    fn extract(&self, path: &Path) -> Result<ExtractedPdf, ExtractionError>;
}

/// Extractor for pre-extracted inputs
///
/// * `.json` files are read as an [`ExtractedPdf`] payload.
/// * `.txt` files are read verbatim; page count and metadata come from
///   [`PayloadExtractor::text_defaults`].
#[derive(Debug, Clone)]
pub struct PayloadExtractor {
    max_bytes: u64,
    text_page_count: i64,
    text_metadata: MetadataInput,
}

impl Default for PayloadExtractor {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_INPUT_BYTES,
            text_page_count: 1,
            text_metadata: MetadataInput::default(),
        }
    }
}

impl PayloadExtractor {
    /// Create an extractor with the given size limit
    pub fn new(max_bytes: u64) -> Self {
        Self {
            max_bytes,
            ..Self::default()
        }
    }

    /// Page count and metadata to use for plain text inputs
    pub fn text_defaults(mut self, page_count: i64, metadata: MetadataInput) -> Self {
        self.text_page_count = page_count;
        self.text_metadata = metadata;
        self
    }

    /// Whether this extractor can handle the file, judging by its extension
    pub fn supports(path: &Path) -> bool {
        matches!(
            path.extension().and_then(|s| s.to_str()),
            Some("json") | Some("txt")
        )
    }

    fn read(&self, path: &Path) -> Result<String, ExtractionError> {
        let io_error = |source| ExtractionError::Io {
            path: path.to_path_buf(),
            source,
        };
        let size = std::fs::metadata(path).map_err(io_error)?.len();
        if size > self.max_bytes {
            return Err(ExtractionError::TooLarge {
                path: path.to_path_buf(),
                size,
                limit: self.max_bytes,
            });
        }
        std::fs::read_to_string(path).map_err(io_error)
    }
}

impl TextExtractor for PayloadExtractor {
    fn extract(&self, path: &Path) -> Result<ExtractedPdf, ExtractionError> {
        match path.extension().and_then(|s| s.to_str()) {
            Some("json") => {
                let content = self.read(path)?;
                serde_json::from_str(&content).map_err(|source| ExtractionError::MalformedPayload {
                    path: path.to_path_buf(),
                    source,
                })
            }
            Some("txt") => {
                let content = self.read(path)?;
                Ok(ExtractedPdf::new(
                    content,
                    self.text_page_count,
                    self.text_metadata.clone(),
                ))
            }
            _ => Err(ExtractionError::UnsupportedInput(path.display().to_string())),
        }
    }
}
