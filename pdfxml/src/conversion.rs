//! Conversion records and the conversion runner
//!
//! Each input file becomes one [`Conversion`] that moves through
//! `pending → processing → completed | failed`. Records live in a
//! [`ConversionStore`]; the pipeline only ever talks to the trait.

use crate::assembler::assemble_extracted;
use crate::document_model::Document;
use crate::error::ConversionError;
use crate::extraction::TextExtractor;
use crate::xml_exporter::{to_xml_with_layout, XmlLayout};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

/// Lifecycle state of a conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversionStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl std::fmt::Display for ConversionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ConversionStatus::Pending => "pending",
            ConversionStatus::Processing => "processing",
            ConversionStatus::Completed => "completed",
            ConversionStatus::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// A tracked conversion of one input file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversion {
    /// Opaque identifier (UUID v4)
    pub id: String,
    /// Name of the file as the user supplied it
    pub original_file_name: String,
    /// Where the input is stored
    pub file_path: PathBuf,
    /// Current lifecycle state
    pub status: ConversionStatus,
    /// Serialized document, set once the conversion completes
    pub xml_content: Option<String>,
    /// RFC 3339 creation timestamp
    pub created_at: String,
    /// RFC 3339 timestamp of the last change
    pub updated_at: String,
}

/// Errors from a conversion store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Conversion not found: {0}")]
    NotFound(String),

    #[error("Conversion store lock poisoned")]
    Poisoned,
}

/// Persistence of conversion records
pub trait ConversionStore: Send + Sync {
    /// Create a pending conversion for a stored input file
    fn create(&self, original_file_name: &str, file_path: &Path) -> Result<Conversion, StoreError>;

    /// Look up a conversion by id
    fn find_by_id(&self, id: &str) -> Result<Option<Conversion>, StoreError>;

    /// All conversions, newest first
    fn list(&self) -> Result<Vec<Conversion>, StoreError>;

    /// Change the status of a conversion
    fn update_status(&self, id: &str, status: ConversionStatus) -> Result<Conversion, StoreError>;

    /// Store the XML result and mark the conversion completed
    fn update_xml_content(&self, id: &str, xml_content: String) -> Result<Conversion, StoreError>;
}

/// Conversion store kept in process memory
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: Mutex<Records>,
}

#[derive(Debug, Default)]
struct Records {
    by_id: HashMap<String, Conversion>,
    /// Ids in creation order
    order: Vec<String>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn modify<F>(&self, id: &str, change: F) -> Result<Conversion, StoreError>
    where
        F: FnOnce(&mut Conversion),
    {
        let mut records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        let record = records
            .by_id
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        change(record);
        record.updated_at = now();
        Ok(record.clone())
    }
}

impl ConversionStore for InMemoryStore {
    fn create(&self, original_file_name: &str, file_path: &Path) -> Result<Conversion, StoreError> {
        let timestamp = now();
        let conversion = Conversion {
            id: uuid::Uuid::new_v4().to_string(),
            original_file_name: original_file_name.to_string(),
            file_path: file_path.to_path_buf(),
            status: ConversionStatus::Pending,
            xml_content: None,
            created_at: timestamp.clone(),
            updated_at: timestamp,
        };
        let mut records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        records.order.push(conversion.id.clone());
        records
            .by_id
            .insert(conversion.id.clone(), conversion.clone());
        Ok(conversion)
    }

    fn find_by_id(&self, id: &str) -> Result<Option<Conversion>, StoreError> {
        let records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(records.by_id.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<Conversion>, StoreError> {
        let records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(records
            .order
            .iter()
            .rev()
            .filter_map(|id| records.by_id.get(id))
            .cloned()
            .collect())
    }

    fn update_status(&self, id: &str, status: ConversionStatus) -> Result<Conversion, StoreError> {
        self.modify(id, |record| record.status = status)
    }

    fn update_xml_content(&self, id: &str, xml_content: String) -> Result<Conversion, StoreError> {
        self.modify(id, |record| {
            record.xml_content = Some(xml_content);
            record.status = ConversionStatus::Completed;
        })
    }
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Errors from running a stored conversion
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Extract, assemble and serialize one input file
///
/// # Returns
/// * `Ok((Document, String))` - The assembled document and its XML
/// * `Err(ConversionError)` - Extraction, validation or serialization failed
pub fn convert_file(
    extractor: &dyn TextExtractor,
    path: &Path,
    layout: XmlLayout,
) -> Result<(Document, String), ConversionError> {
    let extracted = extractor.extract(path)?;
    let doc = assemble_extracted(&extracted)?;
    let xml = to_xml_with_layout(&doc, layout)?;
    Ok((doc, xml))
}

/// Run a pending conversion to completion
///
/// The record is marked `processing`, then either `completed` with its XML or
/// `failed`. A failed conversion keeps no partial output.
///
/// # Returns
/// * `Ok(Document)` - The assembled document; the record is completed
/// * `Err(ProcessError)` - The conversion failed; the record is marked failed
pub fn process_conversion(
    store: &dyn ConversionStore,
    extractor: &dyn TextExtractor,
    id: &str,
    layout: XmlLayout,
) -> Result<Document, ProcessError> {
    let record = store.update_status(id, ConversionStatus::Processing)?;
    log::info!("Converting {} ({})", record.original_file_name, id);

    match convert_file(extractor, &record.file_path, layout) {
        Ok((doc, xml)) => {
            store.update_xml_content(id, xml)?;
            log::info!(
                "Converted {}: {} pages, {} sections",
                record.original_file_name,
                doc.pages.len(),
                doc.section_count()
            );
            Ok(doc)
        }
        Err(e) => {
            log::error!("Conversion of {} failed: {}", record.original_file_name, e);
            store.update_status(id, ConversionStatus::Failed)?;
            Err(e.into())
        }
    }
}

/// Name of the output file for an input, with `extension` replacing the
/// input's `.pdf`, `.json` or `.txt` suffix
pub fn output_file_name(original_file_name: &str, extension: &str) -> String {
    let stem = [".pdf", ".json", ".txt"]
        .iter()
        .find_map(|suffix| original_file_name.strip_suffix(suffix))
        .unwrap_or(original_file_name);
    format!("{}.{}", stem, extension)
}
