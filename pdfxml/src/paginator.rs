//! Even-split pagination of an undifferentiated text stream
//!
//! Extracted text carries no reliable page markers, so pages are approximated
//! by dividing the non-blank lines into equally sized chunks.

use crate::error::{ConversionError, Result};

/// Largest page count accepted
///
/// Every page is materialized, even when empty, so the count bounds memory
/// use independently of the text length.
pub const MAX_PAGE_COUNT: usize = 100_000;

/// Split text into exactly `page_count` groups of lines
///
/// Blank lines are dropped once, before splitting. Every group holds
/// `ceil(total / page_count)` lines except the trailing ones, which take the
/// remainder and may be empty.
///
/// # Parameters
/// * `text` - Full extracted text, lines separated by `\n`
/// * `page_count` - Declared number of pages
///
/// # Returns
/// * `Ok(Vec<Vec<&str>>)` - One group per page, lines untouched apart from blank removal
/// * `Err(ConversionError::InvalidInput)` - `page_count` is zero or above [`MAX_PAGE_COUNT`]
pub fn paginate(text: &str, page_count: usize) -> Result<Vec<Vec<&str>>> {
    if page_count == 0 {
        return Err(ConversionError::InvalidInput(
            "page count must be greater than zero".to_string(),
        ));
    }
    if page_count > MAX_PAGE_COUNT {
        return Err(ConversionError::InvalidInput(format!(
            "page count {} exceeds the maximum of {}",
            page_count, MAX_PAGE_COUNT
        )));
    }

    let mut pages: Vec<Vec<&str>> = Vec::new();
    pages.try_reserve_exact(page_count).map_err(|e| {
        ConversionError::InvalidInput(format!("cannot allocate {} pages: {}", page_count, e))
    })?;

    let lines: Vec<&str> = non_blank_lines(text).collect();
    let lines_per_page = lines.len().div_ceil(page_count);

    for index in 0..page_count {
        let start = index.saturating_mul(lines_per_page).min(lines.len());
        let end = (start + lines_per_page).min(lines.len());
        pages.push(lines[start..end].to_vec());
    }

    Ok(pages)
}

/// Lines of `text` that are not blank after trimming, in order
pub fn non_blank_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').filter(|line| !line.trim().is_empty())
}
