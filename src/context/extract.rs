//! Text extraction from plain-text files and PDFs

use crate::utils::errors::BrainError;
use crate::utils::text::normalize_newlines;
use crate::Result;

/// Decode a whole plain-text file as UTF-8
pub fn plain_text(path: &str, bytes: Vec<u8>) -> Result<String> {
    let text = String::from_utf8(bytes)
        .map_err(|e| BrainError::extraction(path, format!("invalid UTF-8: {}", e)))?;
    Ok(normalize_newlines(&text))
}

/// Extract the text of every page of a PDF, each page followed by a newline.
///
/// The PDF parser can panic on malformed fonts, so it runs under
/// `catch_unwind` and a panic is reported as an extraction error.
pub fn pdf_text(path: &str, bytes: &[u8]) -> Result<String> {
    let pages = match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(bytes)
    })) {
        Ok(Ok(pages)) => pages,
        Ok(Err(e)) => {
            return Err(BrainError::extraction(path, format!("PDF parse error: {}", e)));
        }
        Err(_panic) => {
            return Err(BrainError::extraction(
                path,
                "PDF parser panicked, likely on a malformed font",
            ));
        }
    };

    tracing::debug!(path, pages = pages.len(), "Extracted PDF text");

    let mut text = String::new();
    for page in pages {
        text.push_str(&page);
        text.push('\n');
    }
    Ok(text)
}
