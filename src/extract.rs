//! PDF text extraction.
//!
//! Turns PDF bytes into plain UTF-8 text with `pdf-extract`. Extraction
//! never panics: malformed input (including input that makes the PDF
//! library panic) comes back as [`ExtractError::Pdf`].

use std::panic::{self, AssertUnwindSafe};

/// Why a document's text is unavailable.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExtractError {
    #[error("Error reading PDF: {0}")]
    Pdf(String),
    #[error("File too large: {size} bytes (limit {limit})")]
    TooLarge { size: u64, limit: u64 },
    #[error("Error reading archive: {0}")]
    Archive(String),
    #[error("Error reading file: {0}")]
    Io(String),
}

/// Extract the text of every page, concatenated and trimmed.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem(bytes)
    }));
    match result {
        Ok(Ok(text)) => Ok(text.trim().to_string()),
        Ok(Err(e)) => Err(ExtractError::Pdf(e.to_string())),
        Err(payload) => Err(ExtractError::Pdf(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "PDF parser panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_pdf_returns_error() {
        let err = extract_pdf_text(b"not a pdf").unwrap_err();
        assert!(matches!(err, ExtractError::Pdf(_)));
        assert!(err.to_string().starts_with("Error reading PDF"));
    }

    #[test]
    fn empty_input_returns_error() {
        assert!(extract_pdf_text(b"").is_err());
    }

    #[test]
    fn too_large_message() {
        let err = ExtractError::TooLarge { size: 10, limit: 5 };
        assert_eq!(err.to_string(), "File too large: 10 bytes (limit 5)");
    }
}
