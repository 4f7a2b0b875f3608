//! XML exporter for structured documents
//!
//! Renders a [`Document`] to the XML layout consumed by the result viewer:
//!
//! ```text
//! <document>
//!   <metadata><title/><author/><creationDate/><pageCount/></metadata>
//!   <content>
//!     <page number="1"> header | paragraph | list ... </page>
//!   </content>
//! </document>
//! ```
//!
//! Element names, attribute names and element order are a compatibility
//! contract. Output is a pure function of the document.

use crate::document_model::{Document, Page, Section};
use crate::error::{ConversionError, Result};
use serde::{Deserialize, Serialize};

/// Whitespace layout of the generated XML
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum XmlLayout {
    /// No whitespace between elements (canonical form)
    #[default]
    Compact,
    /// One element per line, indented by two spaces per level
    Indented,
}

/// Serialize a document to its canonical (compact) XML form
///
/// # Returns
/// * `Ok(String)` - The XML document, without an XML declaration
/// * `Err(ConversionError::Serialization)` - Some text holds characters XML 1.0 cannot represent
pub fn to_xml(doc: &Document) -> Result<String> {
    to_xml_with_layout(doc, XmlLayout::Compact)
}

/// Serialize a document to XML using the given layout
pub fn to_xml_with_layout(doc: &Document, layout: XmlLayout) -> Result<String> {
    let mut writer = XmlWriter::new(layout);

    writer.open("document", None);

    writer.open("metadata", None);
    writer.text_element("title", None, &doc.metadata.title)?;
    writer.text_element("author", None, &doc.metadata.author)?;
    writer.text_element("creationDate", None, &doc.metadata.creation_date)?;
    writer.text_element("pageCount", None, &doc.metadata.page_count.to_string())?;
    writer.close("metadata");

    writer.open("content", None);
    for page in &doc.pages {
        write_page(&mut writer, page)?;
    }
    writer.close("content");

    writer.close("document");

    Ok(writer.finish())
}

/// Write a single page and its sections in order
fn write_page(writer: &mut XmlWriter, page: &Page) -> Result<()> {
    let number = page.number.to_string();
    let attr = Some(("number", number.as_str()));

    if page.sections.is_empty() {
        writer.childless_element("page", attr);
        return Ok(());
    }

    writer.open("page", attr);
    for section in &page.sections {
        write_section(writer, section)?;
    }
    writer.close("page");
    Ok(())
}

fn write_section(writer: &mut XmlWriter, section: &Section) -> Result<()> {
    match section {
        Section::Header { text, level } => {
            let level = level.to_string();
            writer.text_element("header", Some(("level", level.as_str())), text)
        }
        Section::Paragraph { text } => writer.text_element("paragraph", None, text),
        Section::List { items } => {
            writer.open("list", None);
            for item in items {
                writer.text_element("item", None, item)?;
            }
            writer.close("list");
            Ok(())
        }
    }
}

/// Minimal element writer handling layout and escaping
struct XmlWriter {
    output: String,
    layout: XmlLayout,
    depth: usize,
}

impl XmlWriter {
    fn new(layout: XmlLayout) -> Self {
        Self {
            output: String::new(),
            layout,
            depth: 0,
        }
    }

    fn open(&mut self, tag: &str, attr: Option<(&str, &str)>) {
        self.indent();
        self.start_tag(tag, attr);
        self.newline();
        self.depth += 1;
    }

    fn close(&mut self, tag: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.indent();
        self.output.push_str(&format!("</{}>", tag));
        self.newline();
    }

    /// Element with no children, still closed by an explicit end tag
    fn childless_element(&mut self, tag: &str, attr: Option<(&str, &str)>) {
        self.indent();
        self.start_tag(tag, attr);
        self.output.push_str(&format!("</{}>", tag));
        self.newline();
    }

    fn text_element(&mut self, tag: &str, attr: Option<(&str, &str)>, text: &str) -> Result<()> {
        check_xml_chars(tag, text)?;
        self.indent();
        self.start_tag(tag, attr);
        self.output.push_str(&escape_text(text));
        self.output.push_str(&format!("</{}>", tag));
        self.newline();
        Ok(())
    }

    fn start_tag(&mut self, tag: &str, attr: Option<(&str, &str)>) {
        match attr {
            Some((name, value)) => self.output.push_str(&format!(
                "<{} {}=\"{}\">",
                tag,
                name,
                escape_attribute(value)
            )),
            None => self.output.push_str(&format!("<{}>", tag)),
        }
    }

    fn indent(&mut self) {
        if self.layout == XmlLayout::Indented {
            self.output.push_str(&"  ".repeat(self.depth));
        }
    }

    fn newline(&mut self) {
        if self.layout == XmlLayout::Indented {
            self.output.push('\n');
        }
    }

    fn finish(self) -> String {
        self.output
    }
}

/// Reject characters outside the XML 1.0 `Char` production
fn check_xml_chars(tag: &str, text: &str) -> Result<()> {
    let invalid = text.chars().find(|&c| {
        matches!(c, '\u{0}'..='\u{8}' | '\u{B}' | '\u{C}' | '\u{E}'..='\u{1F}')
            || c == '\u{FFFE}'
            || c == '\u{FFFF}'
    });
    match invalid {
        Some(c) => Err(ConversionError::Serialization(format!(
            "<{}> contains character U+{:04X}, which XML cannot represent",
            tag, c as u32
        ))),
        None => Ok(()),
    }
}

/// Escape character data
///
/// Carriage returns are written as a character reference, since a parser
/// would otherwise normalize them to line feeds.
fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\r', "&#13;")
}

/// Escape a double-quoted attribute value
fn escape_attribute(text: &str) -> String {
    escape_text(text)
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
        .replace('\t', "&#9;")
        .replace('\n', "&#10;")
}
