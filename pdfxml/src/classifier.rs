//! Line classification heuristics
//!
//! Decides, for a single trimmed line of extracted text, whether it reads as a
//! header, a list item, or ordinary prose. The rules are deliberately simple
//! and must stay stable: previously stored XML was produced with them.

use regex::Regex;
use std::sync::OnceLock;

/// Classification of a single line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// All-caps line of heading length
    Header,
    /// List line; holds the item text with its marker stripped
    ListItem(String),
    /// Anything else
    Prose,
}

static HEADER_PATTERN: OnceLock<Regex> = OnceLock::new();
static LIST_MARKER_PATTERN: OnceLock<Regex> = OnceLock::new();
static MARKER_RUN_PATTERN: OnceLock<Regex> = OnceLock::new();

fn header_pattern() -> &'static Regex {
    HEADER_PATTERN.get_or_init(|| Regex::new(r"^[A-Z\s]{3,100}$").expect("valid header regex"))
}

fn list_marker_pattern() -> &'static Regex {
    LIST_MARKER_PATTERN
        .get_or_init(|| Regex::new(r"^\s*(?:[-•*⋅◦‣⁃○●]|[0-9]+\.)").expect("valid list regex"))
}

fn marker_run_pattern() -> &'static Regex {
    MARKER_RUN_PATTERN
        .get_or_init(|| Regex::new(r"^\s*[-•*⋅◦‣⁃○●0-9.+]+\s*").expect("valid marker regex"))
}

/// Classify one line of text
///
/// # Parameters
/// * `line` - A single non-blank line, already trimmed
///
/// # Returns
/// * `LineKind::Header` - 3 to 100 characters, each an uppercase ASCII letter or whitespace
/// * `LineKind::ListItem` - starts with a bullet glyph or `<digits>.`
/// * `LineKind::Prose` - otherwise
pub fn classify(line: &str) -> LineKind {
    if is_header(line) {
        LineKind::Header
    } else if let Some(item) = list_item_text(line) {
        LineKind::ListItem(item.to_string())
    } else {
        LineKind::Prose
    }
}

/// Whether the line reads as an all-caps heading
pub fn is_header(line: &str) -> bool {
    header_pattern().is_match(line)
}

/// Text of the list item if the line starts with a list marker
///
/// The whole leading run of marker characters (glyphs, digits, periods, `+`) and
/// the whitespace after it are removed.
pub fn list_item_text(line: &str) -> Option<&str> {
    if !list_marker_pattern().is_match(line) {
        return None;
    }
    let marker_end = marker_run_pattern().find(line).map_or(0, |m| m.end());
    Some(&line[marker_end..])
}
