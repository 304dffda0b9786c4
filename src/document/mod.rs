pub mod dump;
pub mod pdf;

use std::path::Path;

use crate::error::{ImportError, Result};

pub use dump::TableDump;
pub use pdf::PdfDocument;

/// Rows of cells as the extractor saw them; `None` marks an empty cell.
pub type Grid = Vec<Vec<Option<String>>>;

/// Page-level access to a source document. Pages are 1-based.
pub trait Document {
    fn page_count(&self) -> usize;

    /// Best-effort table grid for `page`, or `None` when the page has none.
    fn extract_table(&self, page: u32) -> Result<Option<Grid>>;

    /// Raw page text, used for diagnostics when no table is found.
    fn extract_text(&self, page: u32) -> Result<Option<String>>;
}

/// Open `path` with the reader matching its extension.
pub fn open(path: &Path) -> Result<Box<dyn Document>> {
    if !path.exists() {
        return Err(ImportError::SourceNotFound(path.to_path_buf()));
    }
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("pdf") => Ok(Box::new(PdfDocument::open(path)?)),
        Some("json") => Ok(Box::new(TableDump::open(path)?)),
        _ => Err(ImportError::UnsupportedSource(path.to_path_buf())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_source() {
        let err = open(Path::new("tests/fixtures/does-not-exist.pdf")).err().unwrap();
        assert!(matches!(err, ImportError::SourceNotFound(_)));
    }

    #[test]
    fn unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("core.epub");
        std::fs::write(&path, b"").unwrap();
        let err = open(&path).err().unwrap();
        assert!(matches!(err, ImportError::UnsupportedSource(_)));
    }

    #[test]
    fn opens_json_dump() {
        let doc = open(Path::new("tests/fixtures/core_weapons.json")).unwrap();
        assert_eq!(doc.page_count(), 252);
        assert!(doc.extract_table(247).unwrap().is_some());
    }
}
