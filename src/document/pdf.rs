use std::path::Path;

use pdfplumber::{Pdf, Strategy, TableSettings, TextOptions};
use tracing::{debug, info};

use super::{Document, Grid};
use crate::error::Result;

/// A rulebook PDF read with `pdfplumber`. Tables come from the page's
/// ruling lines when it has them, otherwise from text alignment.
pub struct PdfDocument {
    pdf: Pdf,
    pages: usize,
}

impl PdfDocument {
    pub fn open(path: &Path) -> Result<Self> {
        let pdf = Pdf::open_file(path, None)?;
        let pages = pdf.page_count();
        info!("PDF opened: {} ({} pages)", path.display(), pages);
        Ok(PdfDocument { pdf, pages })
    }

    fn page(&self, page: u32) -> Result<pdfplumber::Page> {
        Ok(self.pdf.page(page.saturating_sub(1) as usize)?)
    }
}

impl Document for PdfDocument {
    fn page_count(&self) -> usize {
        self.pages
    }

    fn extract_table(&self, page: u32) -> Result<Option<Grid>> {
        let page_data = self.page(page)?;
        if let Some(grid) = page_data.extract_table(&TableSettings::default()) {
            return Ok(Some(grid));
        }
        debug!("Page {}: no ruled table, trying text alignment", page);
        let stream = TableSettings {
            strategy: Strategy::Stream,
            ..TableSettings::default()
        };
        Ok(page_data.extract_table(&stream))
    }

    fn extract_text(&self, page: u32) -> Result<Option<String>> {
        let text = self.page(page)?.extract_text(&TextOptions::default());
        Ok(Some(text).filter(|t| !t.trim().is_empty()))
    }
}
