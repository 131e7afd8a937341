use crate::error::Result;
use crate::pdf::PdfDocument;
use tracing::debug;

/// Find the first page (0-based) whose text contains `needle`.
///
/// Matching is a case-sensitive substring test on each page's extracted
/// text, in page order. Scanning stops at the first page that matches, so
/// the result is page-granular: where the text sits within that page does
/// not matter.
pub fn locate_text(doc: &PdfDocument, needle: &str) -> Result<Option<usize>> {
    if needle.is_empty() {
        return Ok(None);
    }

    for index in 0..doc.page_count() {
        let text = doc.page_text(index)?;
        if text.contains(needle) {
            debug!(page = index + 1, needle, "search text found");
            return Ok(Some(index));
        }
    }

    debug!(needle, pages = doc.page_count(), "search text not found");
    Ok(None)
}
