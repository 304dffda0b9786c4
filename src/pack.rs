use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{ImportError, Result};
use crate::record::WeaponRecord;

static NON_SLUG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s-]").unwrap());
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Writes records into a pack source directory, one JSON file per weapon.
pub struct PackWriter {
    dir: PathBuf,
}

impl PackWriter {
    /// Create `dir` (and parents) if needed. An existing directory is fine.
    pub fn create(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir).map_err(|source| ImportError::OutputDir {
            path: dir.to_path_buf(),
            source,
        })?;
        Ok(PackWriter {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Serialize `record` to `<slug>.json`, replacing any file already there.
    pub fn write(&self, record: &WeaponRecord) -> Result<PathBuf> {
        let path = self.dir.join(file_name(record));
        let mut json = serde_json::to_string_pretty(record)?;
        json.push('\n');
        fs::write(&path, json).map_err(|source| ImportError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

/// Filename for a record: its slugged name, or its id when the name has
/// no slug-safe characters at all.
pub fn file_name(record: &WeaponRecord) -> String {
    slug_file_name(&record.name).unwrap_or_else(|| format!("{}.json", record.id))
}

/// `<slug>.json` for a weapon name, or `None` when nothing of the name
/// survives slugging.
pub fn slug_file_name(name: &str) -> Option<String> {
    let slug = slugify(name);
    (!slug.is_empty()).then(|| format!("{}.json", slug))
}

/// Lower-case, drop anything but word characters, whitespace and hyphens,
/// then join the words with single hyphens.
pub fn slugify(name: &str) -> String {
    let lower = name.to_lowercase();
    let kept = NON_SLUG_RE.replace_all(&lower, "");
    WHITESPACE_RE.replace_all(kept.trim(), "-").into_owned()
}
