//! Structured document model produced by the assembler
//!
//! A [`Document`] is built once per conversion, bottom-up, and never mutated
//! afterwards. Exporters only ever borrow it.

use serde::{Deserialize, Serialize};

/// Title used when the source supplies none
pub const DEFAULT_TITLE: &str = "Untitled Document";

/// Author used when the source supplies none
pub const DEFAULT_AUTHOR: &str = "Unknown Author";

/// Level given to every detected header
pub const HEADER_LEVEL: u32 = 1;

/// Document metadata as supplied by the extraction collaborator
///
/// Every field is optional. Field names follow the PDF info dictionary keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataInput {
    /// Document title (`Title`)
    #[serde(rename = "Title", default)]
    pub title: Option<String>,
    /// Document author (`Author`)
    #[serde(rename = "Author", default)]
    pub author: Option<String>,
    /// Raw creation date string (`CreationDate`)
    #[serde(rename = "CreationDate", default)]
    pub creation_date: Option<String>,
}

/// Resolved document metadata with fallbacks applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    /// Document title, [`DEFAULT_TITLE`] if unknown
    pub title: String,
    /// Document author, [`DEFAULT_AUTHOR`] if unknown
    pub author: String,
    /// Creation date as found in the source, empty if unknown
    pub creation_date: String,
    /// Declared number of pages
    pub page_count: usize,
}

impl DocumentMetadata {
    /// Resolve metadata from the collaborator's input
    ///
    /// Missing and empty values both fall back to the documented defaults.
    pub fn resolve(input: &MetadataInput, page_count: usize) -> Self {
        Self {
            title: non_empty_or(input.title.as_deref(), DEFAULT_TITLE),
            author: non_empty_or(input.author.as_deref(), DEFAULT_AUTHOR),
            creation_date: non_empty_or(input.creation_date.as_deref(), ""),
            page_count,
        }
    }
}

fn non_empty_or(value: Option<&str>, fallback: &str) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => fallback.to_string(),
    }
}

/// One structurally classified unit of page content
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Section {
    /// An all-caps heading line
    Header {
        /// Heading text exactly as it appeared
        text: String,
        /// Heading depth, always [`HEADER_LEVEL`] today
        level: u32,
    },
    /// A run of prose lines joined with single spaces
    Paragraph {
        /// Joined paragraph text
        text: String,
    },
    /// A run of list-marker lines
    List {
        /// Item texts with their markers stripped, never empty
        items: Vec<String>,
    },
}

/// Type of a section without its content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Header,
    Paragraph,
    List,
}

impl SectionKind {
    /// Lower-case name, as used in the XML element names
    pub fn as_str(self) -> &'static str {
        match self {
            SectionKind::Header => "header",
            SectionKind::Paragraph => "paragraph",
            SectionKind::List => "list",
        }
    }
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Section {
    /// Create a header section at the standard level
    pub fn header(text: impl Into<String>) -> Self {
        Section::Header {
            text: text.into(),
            level: HEADER_LEVEL,
        }
    }

    /// Create a paragraph section
    pub fn paragraph(text: impl Into<String>) -> Self {
        Section::Paragraph { text: text.into() }
    }

    /// Create a list section from item texts
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Section::List {
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    /// Type of this section
    pub fn kind(&self) -> SectionKind {
        match self {
            Section::Header { .. } => SectionKind::Header,
            Section::Paragraph { .. } => SectionKind::Paragraph,
            Section::List { .. } => SectionKind::List,
        }
    }

    /// Number of whitespace-separated words in this section
    pub fn word_count(&self) -> usize {
        match self {
            Section::Header { text, .. } | Section::Paragraph { text } => {
                text.split_whitespace().count()
            }
            Section::List { items } => items.iter().map(|i| i.split_whitespace().count()).sum(),
        }
    }
}

/// A single page of the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    /// Page number, starting at 1
    pub number: usize,
    /// Sections in reading order
    pub sections: Vec<Section>,
}

impl Page {
    /// Whether the page ended up with no content
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// The structured document ready for export
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    /// Document metadata
    pub metadata: DocumentMetadata,
    /// Pages in order, exactly `metadata.page_count` of them
    pub pages: Vec<Page>,
}

impl Document {
    /// Iterate over every section of every page in reading order
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.pages.iter().flat_map(|p| p.sections.iter())
    }

    /// Total number of sections across all pages
    pub fn section_count(&self) -> usize {
        self.pages.iter().map(|p| p.sections.len()).sum()
    }

    /// Number of sections of the given kind
    pub fn count_of(&self, kind: SectionKind) -> usize {
        self.sections().filter(|s| s.kind() == kind).count()
    }

    /// Total word count across all sections
    pub fn word_count(&self) -> usize {
        self.sections().map(Section::word_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_fallbacks() {
        let metadata = DocumentMetadata::resolve(&MetadataInput::default(), 2);
        assert_eq!(metadata.title, "Untitled Document");
        assert_eq!(metadata.author, "Unknown Author");
        assert_eq!(metadata.creation_date, "");
        assert_eq!(metadata.page_count, 2);
    }

    #[test]
    fn test_metadata_empty_strings_fall_back() {
        let input = MetadataInput {
            title: Some(String::new()),
            author: Some("Ada Lovelace".to_string()),
            creation_date: Some("D:20240101120000Z".to_string()),
        };
        let metadata = DocumentMetadata::resolve(&input, 1);
        assert_eq!(metadata.title, "Untitled Document");
        assert_eq!(metadata.author, "Ada Lovelace");
        assert_eq!(metadata.creation_date, "D:20240101120000Z");
    }

    #[test]
    fn test_metadata_input_uses_info_keys() {
        let input: MetadataInput =
            serde_json::from_str(r#"{"Title": "Report", "CreationDate": "D:2023"}"#).unwrap();
        assert_eq!(input.title.as_deref(), Some("Report"));
        assert_eq!(input.author, None);
        assert_eq!(input.creation_date.as_deref(), Some("D:2023"));
    }

    #[test]
    fn test_section_json_is_tagged() {
        let json = serde_json::to_string(&Section::header("SCOPE")).unwrap();
        assert_eq!(json, r#"{"type":"header","text":"SCOPE","level":1}"#);

        let json = serde_json::to_string(&Section::list(["a", "b"])).unwrap();
        assert_eq!(json, r#"{"type":"list","items":["a","b"]}"#);
    }

    #[test]
    fn test_document_statistics() {
        let doc = Document {
            metadata: DocumentMetadata::resolve(&MetadataInput::default(), 2),
            pages: vec![
                Page {
                    number: 1,
                    sections: vec![
                        Section::header("INTRODUCTION"),
                        Section::paragraph("Two words"),
                    ],
                },
                Page {
                    number: 2,
                    sections: vec![Section::list(["one item", "another one here"])],
                },
            ],
        };

        assert_eq!(doc.section_count(), 3);
        assert_eq!(doc.count_of(SectionKind::Header), 1);
        assert_eq!(doc.count_of(SectionKind::List), 1);
        assert_eq!(doc.count_of(SectionKind::Paragraph), 1);
        assert_eq!(doc.pages[1].sections[0].kind().to_string(), "list");
        assert_eq!(doc.word_count(), 1 + 2 + 5);
        assert!(!doc.pages[1].is_empty());
    }
}
