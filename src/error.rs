use std::path::PathBuf;

use thiserror::Error;

/// Failures that stop an import run. Per-page, per-row and per-field misses
/// are not errors and never show up here.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("source document not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("no reader for {} (expected a .pdf or a .json table dump)", .0.display())]
    UnsupportedSource(PathBuf),

    #[error("failed to read PDF")]
    Pdf(#[from] pdfplumber::PdfError),

    #[error("failed to read table dump {}", path.display())]
    Dump {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid page range {first}..={last}")]
    InvalidPageRange { first: u32, last: u32 },

    #[error("cannot create output directory {}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize record")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] config::ConfigError),
}

pub type Result<T> = std::result::Result<T, ImportError>;
