//! Accumulation of classified lines into page sections

use crate::classifier::{classify, LineKind};
use crate::document_model::Section;

/// Build the ordered sections of one page
///
/// Consecutive prose lines are joined into a single paragraph and consecutive
/// list lines into a single list. A header closes whatever run is open.
///
/// # Parameters
/// * `lines` - The page's lines in source order; blank lines are skipped
///
/// # Returns
/// * `Vec<Section>` - Sections in reading order, empty if the page had no text
pub fn build_sections<S: AsRef<str>>(lines: &[S]) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current_paragraph = String::new();
    let mut current_list_items: Vec<String> = Vec::new();
    let mut in_list = false;

    for line in lines {
        let line = line.as_ref().trim();
        if line.is_empty() {
            continue;
        }

        match classify(line) {
            LineKind::Header => {
                flush_paragraph(&mut sections, &mut current_paragraph);
                flush_list(&mut sections, &mut current_list_items, &mut in_list);
                sections.push(Section::header(line));
            }
            LineKind::ListItem(item) => {
                flush_paragraph(&mut sections, &mut current_paragraph);
                in_list = true;
                current_list_items.push(item);
            }
            LineKind::Prose => {
                flush_list(&mut sections, &mut current_list_items, &mut in_list);
                if !current_paragraph.is_empty() {
                    current_paragraph.push(' ');
                }
                current_paragraph.push_str(line);
            }
        }
    }

    flush_paragraph(&mut sections, &mut current_paragraph);
    flush_list(&mut sections, &mut current_list_items, &mut in_list);

    sections
}

fn flush_paragraph(sections: &mut Vec<Section>, paragraph: &mut String) {
    let text = std::mem::take(paragraph);
    let text = text.trim();
    if !text.is_empty() {
        sections.push(Section::paragraph(text));
    }
}

fn flush_list(sections: &mut Vec<Section>, items: &mut Vec<String>, in_list: &mut bool) {
    if *in_list && !items.is_empty() {
        sections.push(Section::List {
            items: std::mem::take(items),
        });
    }
    items.clear();
    *in_list = false;
}
