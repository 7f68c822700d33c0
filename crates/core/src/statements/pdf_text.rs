use log::{debug, warn};
use std::path::Path;

use super::statements_model::StatementText;
use super::statements_traits::TextExtractor;
use crate::errors::Error;
use crate::Result;

/// Extracts page text from PDF statements with lopdf.
///
/// Files with a `.txt` extension are read verbatim, one page, which is how
/// pre-extracted statements and fixtures are fed through the same pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }

    fn extract_pdf(&self, path: &Path) -> Result<StatementText> {
        let doc = lopdf::Document::load(path).map_err(|e| {
            Error::Extraction(format!("Error loading {}: {}", path.display(), e))
        })?;

        let mut pages = Vec::new();
        for page_number in doc.get_pages().keys() {
            match doc.extract_text(&[*page_number]) {
                Ok(text) => pages.push(text),
                Err(e) => {
                    // Undecodable pages stay empty.
                    warn!(
                        "Could not extract page {} of {}: {}",
                        page_number,
                        path.display(),
                        e
                    );
                    pages.push(String::new());
                }
            }
        }
        debug!("Extracted {} page(s) from {}", pages.len(), path.display());
        Ok(StatementText::new(pages))
    }
}

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, path: &Path) -> Result<StatementText> {
        let is_text = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("txt"));
        if is_text {
            let text = std::fs::read_to_string(path)?;
            return Ok(StatementText::from_text(text));
        }
        self.extract_pdf(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_text_files_are_read_verbatim() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        writeln!(file, "Account number: 12345").unwrap();

        let text = PdfTextExtractor::new().extract(file.path()).unwrap();
        assert_eq!(text.pages().len(), 1);
        assert!(text.text().contains("Account number: 12345"));
    }

    #[test]
    fn test_invalid_pdf_is_extraction_error() {
        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        file.write_all(b"not a pdf").unwrap();

        let err = PdfTextExtractor::new().extract(file.path()).unwrap_err();
        assert!(matches!(err, Error::Extraction(_)));
    }
}
