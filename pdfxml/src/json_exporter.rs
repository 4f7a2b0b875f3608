//! JSON exporter for structured documents

use crate::document_model::Document;
use crate::error::{ConversionError, Result};

/// Serialize a document to pretty-printed JSON
///
/// Sections carry a `"type"` tag of `header`, `paragraph` or `list`.
pub fn to_json(doc: &Document) -> Result<String> {
    serde_json::to_string_pretty(doc).map_err(|e| ConversionError::Serialization(e.to_string()))
}
