//! pdfxml - structured XML from extracted PDF text
//!
//! Takes the plain text a PDF decoder extracted, together with the page count
//! and document metadata, and segments it into pages of headers, paragraphs
//! and lists. The resulting [`Document`] is exported as XML (or JSON).
//!
//! ```
//! use pdfxml::{assemble, to_xml, MetadataInput};
//!
//! let doc = assemble("SUMMARY\nIt works.", 1, &MetadataInput::default()).unwrap();
//! let xml = to_xml(&doc).unwrap();
//! assert!(xml.contains("<header level=\"1\">SUMMARY</header>"));
//! ```

#![deny(unsafe_code)]

pub mod assembler;
pub mod classifier;
pub mod config;
pub mod conversion;
pub mod document_model;
pub mod error;
pub mod extraction;
pub mod json_exporter;
pub mod paginator;
pub mod pipeline;
pub mod section_builder;
pub mod xml_exporter;

pub use assembler::{assemble, assemble_extracted};
pub use classifier::{classify, LineKind};
pub use document_model::{
    Document, DocumentMetadata, MetadataInput, Page, Section, SectionKind,
};
pub use error::ConversionError;
pub use extraction::{ExtractedPdf, ExtractionError, PayloadExtractor, TextExtractor};
pub use json_exporter::to_json;
pub use paginator::paginate;
pub use section_builder::build_sections;
pub use xml_exporter::{to_xml, to_xml_with_layout, XmlLayout};
