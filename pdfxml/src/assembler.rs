//! Document assembly
//!
//! Ties the paginator and the section builder together and attaches the
//! resolved metadata.

use crate::document_model::{Document, DocumentMetadata, MetadataInput, Page};
use crate::error::Result;
use crate::extraction::ExtractedPdf;
use crate::paginator::paginate;
use crate::section_builder::build_sections;

/// Assemble a document from extracted text
///
/// # Parameters
/// * `text` - Full extracted text
/// * `page_count` - Declared number of pages, must be positive
/// * `metadata` - Metadata supplied with the text
///
/// # Returns
/// * `Ok(Document)` - Document with exactly `page_count` pages
/// * `Err(ConversionError::InvalidInput)` - `page_count` is zero
pub fn assemble(text: &str, page_count: usize, metadata: &MetadataInput) -> Result<Document> {
    let metadata = DocumentMetadata::resolve(metadata, page_count);
    let groups = paginate(text, page_count)?;

    let pages: Vec<Page> = groups
        .iter()
        .enumerate()
        .map(|(index, lines)| {
            let sections = build_sections(lines.as_slice());
            log::debug!(
                "Page {}: {} lines, {} sections",
                index + 1,
                lines.len(),
                sections.len()
            );
            Page {
                number: index + 1,
                sections,
            }
        })
        .collect();

    Ok(Document { metadata, pages })
}

/// Assemble a document from an extraction payload, validating it first
pub fn assemble_extracted(extracted: &ExtractedPdf) -> Result<Document> {
    let page_count = extracted.page_count()?;
    let metadata = extracted.metadata()?;
    assemble(&extracted.text, page_count, &metadata)
}
