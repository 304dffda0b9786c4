use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use super::{Document, Grid};
use crate::error::{ImportError, Result};

/// Tables pre-extracted from a rulebook and saved as JSON:
///
/// ```json
/// { "page_count": 252,
///   "pages": { "247": { "table": [["WEAPON", "DV"], ["Ares Predator VI", "3P"]],
///                       "text": "..." } } }
/// ```
///
/// Pages missing from `pages` have neither a table nor text.
#[derive(Debug, Deserialize)]
pub struct TableDump {
    page_count: usize,
    #[serde(default)]
    pages: BTreeMap<u32, DumpPage>,
}

#[derive(Debug, Default, Deserialize)]
struct DumpPage {
    #[serde(default)]
    table: Option<Grid>,
    #[serde(default)]
    text: Option<String>,
}

impl TableDump {
    pub fn open(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| ImportError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ImportError::Dump {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl Document for TableDump {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn extract_table(&self, page: u32) -> Result<Option<Grid>> {
        Ok(self.pages.get(&page).and_then(|p| p.table.clone()))
    }

    fn extract_text(&self, page: u32) -> Result<Option<String>> {
        Ok(self.pages.get(&page).and_then(|p| p.text.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_cells_survive() {
        let dump: TableDump = serde_json::from_str(
            r#"{"page_count": 3, "pages": {"2": {"table": [["WEAPON", null], ["Knife", "2P"]]}}}"#,
        )
        .unwrap();
        let grid = dump.extract_table(2).unwrap().unwrap();
        assert_eq!(grid[0][1], None);
        assert_eq!(grid[1][1].as_deref(), Some("2P"));
        assert!(dump.extract_table(1).unwrap().is_none());
        assert!(dump.extract_text(2).unwrap().is_none());
    }

    #[test]
    fn bad_json_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = TableDump::open(&path).unwrap_err();
        assert!(matches!(err, ImportError::Dump { .. }));
        assert!(err.to_string().contains("broken.json"));
    }
}
