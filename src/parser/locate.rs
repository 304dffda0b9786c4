use std::ops::RangeInclusive;

use tracing::{debug, info, warn};

use crate::document::{Document, Grid};
use crate::error::Result;

const PREVIEW_CHARS: usize = 200;

/// A usable table: header row plus at least one data row.
#[derive(Debug, Clone)]
pub struct PageTable {
    pub page: u32,
    pub headers: Vec<String>,
    pub rows: Grid,
}

/// Lazily walks a page range and yields the pages that carry a table.
/// Pages without one are skipped, not reported as errors. The walk ends at
/// the last page of the document even when the range goes further.
pub struct TableLocator<'a, D: ?Sized> {
    doc: &'a D,
    pages: RangeInclusive<u32>,
    scanned: u64,
}

pub fn locate_tables<D: Document + ?Sized>(
    doc: &D,
    pages: RangeInclusive<u32>,
) -> TableLocator<'_, D> {
    TableLocator {
        doc,
        pages,
        scanned: 0,
    }
}

impl<D: Document + ?Sized> TableLocator<'_, D> {
    /// Pages read so far, including skipped ones. Pages past the end of the
    /// document are never read.
    pub fn scanned(&self) -> u64 {
        self.scanned
    }

    fn locate_page(&self, page: u32) -> Result<Option<PageTable>> {
        debug!("Processing page {}...", page);
        let table = match self.doc.extract_table(page)? {
            Some(t) if t.len() >= 2 => t,
            _ => {
                self.diagnose(page)?;
                return Ok(None);
            }
        };

        let mut rows = table.into_iter();
        let headers: Vec<String> = rows
            .next()
            .unwrap_or_default()
            .into_iter()
            .map(Option::unwrap_or_default)
            .collect();
        let rows: Grid = rows.collect();
        info!("Page {}: table with {} data rows", page, rows.len());
        debug!("  Headers: {:?}", headers);

        Ok(Some(PageTable {
            page,
            headers,
            rows,
        }))
    }

    /// Explain a miss: does the page text at least look like the weapon table?
    fn diagnose(&self, page: u32) -> Result<()> {
        debug!("No valid table found on page {}", page);
        if let Some(text) = self.doc.extract_text(page)? {
            if text.to_uppercase().contains("WEAPON") {
                let preview: String = text.chars().take(PREVIEW_CHARS).collect();
                info!("Page {} mentions WEAPON but has no extractable table", page);
                debug!("  First {} chars: {}...", PREVIEW_CHARS, preview);
            }
        }
        Ok(())
    }
}

impl<D: Document + ?Sized> Iterator for TableLocator<'_, D> {
    type Item = Result<PageTable>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(page) = self.pages.next() {
            let page_count = self.doc.page_count();
            if page as usize > page_count {
                warn!(
                    "Page {} exceeds document length ({}), stopping at page {}",
                    page, page_count, page_count
                );
                self.pages = RangeInclusive::new(1, 0);
                return None;
            }
            self.scanned += 1;
            match self.locate_page(page) {
                Ok(Some(table)) => return Some(Ok(table)),
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::document::TableDump;
    use crate::error::ImportError;

    fn fixture() -> TableDump {
        TableDump::open(std::path::Path::new("tests/fixtures/core_weapons.json")).unwrap()
    }

    #[test]
    fn yields_only_pages_with_tables() {
        let doc = fixture();
        let tables: Vec<PageTable> = locate_tables(&doc, 245..=255)
            .collect::<Result<_>>()
            .unwrap();
        let pages: Vec<u32> = tables.iter().map(|t| t.page).collect();
        assert_eq!(pages, vec![247, 248]);
        assert_eq!(tables[0].headers[0], "WEAPON");
        assert_eq!(tables[0].rows.len(), 4);
        assert_eq!(tables[1].headers[0], "Weapon");
        assert_eq!(tables[1].rows.len(), 6);
    }

    #[test]
    fn counts_skipped_pages() {
        let doc = fixture();
        let mut locator = locate_tables(&doc, 249..=260);
        assert!(locator.next().is_none());
        assert_eq!(locator.scanned(), 4);
    }

    #[test]
    fn stops_at_end_of_document() {
        let doc = fixture();
        let mut locator = locate_tables(&doc, 247..=u32::MAX);
        assert_eq!(locator.by_ref().count(), 2);
        assert_eq!(locator.scanned(), 6);
        assert!(locator.next().is_none());
    }

    #[test]
    fn header_only_table_skipped() {
        let doc = fixture();
        assert_eq!(locate_tables(&doc, 250..=250).count(), 0);
    }

    struct Broken;

    impl Document for Broken {
        fn page_count(&self) -> usize {
            10
        }
        fn extract_table(&self, page: u32) -> Result<Option<Grid>> {
            if page == 2 {
                Err(ImportError::Read {
                    path: format!("page-{}", page).into(),
                    source: std::io::ErrorKind::UnexpectedEof.into(),
                })
            } else {
                Ok(None)
            }
        }
        fn extract_text(&self, _page: u32) -> Result<Option<String>> {
            Ok(None)
        }
    }

    /// Serves a table on page 1 and a header-only table on page 3, and
    /// records every page whose text is requested.
    #[derive(Default)]
    struct TextLog {
        text_requests: RefCell<Vec<u32>>,
    }

    impl Document for TextLog {
        fn page_count(&self) -> usize {
            4
        }
        fn extract_table(&self, page: u32) -> Result<Option<Grid>> {
            let header = vec![Some("WEAPON".to_string()), Some("DV".to_string())];
            let row = vec![Some("Ares Predator VI".to_string()), Some("3P".to_string())];
            Ok(match page {
                1 => Some(vec![header, row]),
                3 => Some(vec![header]),
                _ => None,
            })
        }
        fn extract_text(&self, page: u32) -> Result<Option<String>> {
            self.text_requests.borrow_mut().push(page);
            Ok(Some(format!("WEAPON notes on page {}", page)))
        }
    }

    #[test]
    fn page_text_only_read_on_a_miss() {
        let doc = TextLog::default();
        let tables: Vec<PageTable> = locate_tables(&doc, 1..=4)
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].page, 1);
        assert_eq!(*doc.text_requests.borrow(), vec![2, 3, 4]);
    }

    #[test]
    fn document_errors_surface() {
        let mut locator = locate_tables(&Broken, 1..=3);
        assert!(matches!(locator.next(), Some(Err(ImportError::Read { .. }))));
        assert_eq!(locator.scanned(), 2);
    }
}
