pub mod fields;
pub mod locate;
pub mod normalize;
pub mod row;

use std::ops::RangeInclusive;

use indicatif::ProgressBar;
use tracing::debug;

use crate::document::Document;
use crate::error::Result;
use crate::record::WeaponRecord;
use locate::locate_tables;
use normalize::Normalizer;
use row::RawRow;

/// Counts reported at the end of a run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportStats {
    pub pages_scanned: u64,
    pub tables: usize,
    pub rows: usize,
    pub malformed: usize,
    pub unnamed: usize,
    pub records: usize,
}

impl ImportStats {
    pub fn skipped(&self) -> usize {
        self.malformed + self.unnamed
    }
}

/// Two-stage pipeline: locate tables on `pages`, normalize every data row,
/// and hand each record to `emit`. Stops at the first document or `emit`
/// error; records emitted before that stay emitted.
pub fn run<D, F>(
    doc: &D,
    pages: RangeInclusive<u32>,
    normalizer: &mut Normalizer,
    progress: &ProgressBar,
    mut emit: F,
) -> Result<ImportStats>
where
    D: Document + ?Sized,
    F: FnMut(WeaponRecord) -> Result<()>,
{
    let mut stats = ImportStats::default();
    let mut locator = locate_tables(doc, pages);

    while let Some(table) = locator.next() {
        progress.set_position(locator.scanned());
        let table = table?;
        stats.tables += 1;
        progress.set_message(format!("page {}", table.page));

        for (idx, cells) in table.rows.iter().enumerate() {
            stats.rows += 1;
            let Some(row) = RawRow::from_cells(&table.headers, cells) else {
                debug!(
                    "  Row {}: skipped malformed row (length {} vs {})",
                    idx,
                    cells.len(),
                    table.headers.len()
                );
                stats.malformed += 1;
                continue;
            };
            let Some(record) = normalizer.normalize(&row, table.page) else {
                debug!("  Row {}: skipped empty weapon name", idx);
                stats.unnamed += 1;
                continue;
            };
            emit(record)?;
            stats.records += 1;
        }
    }

    stats.pages_scanned = locator.scanned();
    progress.set_position(stats.pages_scanned);
    Ok(stats)
}
