use crate::error::IngestError;
use lopdf::Document;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, PartialEq)]
pub struct PageText {
    pub number: u32,
    pub text: String,
}

pub trait PdfExtractor {
    fn extract_pages(&self, path: &Path) -> Result<Vec<PageText>, IngestError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfExtractor;

impl PdfExtractor for LopdfExtractor {
    fn extract_pages(&self, path: &Path) -> Result<Vec<PageText>, IngestError> {
        let document =
            Document::load(path).map_err(|error| IngestError::PdfParse(error.to_string()))?;

        let mut pages = Vec::new();
        for (page_no, _page_id) in document.get_pages() {
            let text = document
                .extract_text(&[page_no])
                .map_err(|error| IngestError::PdfParse(error.to_string()))?;
            pages.push(PageText {
                number: page_no,
                text,
            });
        }

        debug!(path = %path.display(), pages = pages.len(), "extracted pdf pages");
        Ok(pages)
    }
}

/// Joins page texts behind `--- Page n ---` markers.
///
/// Returns an empty string when no page carries readable text, so callers can
/// tell an unreadable document apart from one that failed to parse.
pub fn join_pages(pages: &[PageText]) -> String {
    if pages.iter().all(|page| page.text.trim().is_empty()) {
        return String::new();
    }

    let mut text = String::new();
    for page in pages {
        text.push_str(&format!("\n--- Page {} ---\n", page.number));
        text.push_str(&page.text);
    }
    text
}

pub fn extract_document_text<E>(extractor: &E, path: &Path) -> Result<String, IngestError>
where
    E: PdfExtractor + ?Sized,
{
    let pages = extractor.extract_pages(path)?;
    Ok(join_pages(&pages))
}
