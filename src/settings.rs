use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::{ImportError, Result};
use crate::record::RecordMeta;

const DEFAULT_CONFIG: &str = "weapons";
const ENV_PREFIX: &str = "WEAPONS";

/// Run settings. Layered as defaults < `weapons.toml` (or `--config`) <
/// `WEAPONS_*` environment variables; the CLI applies its flags last.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub source: PathBuf,
    pub output_dir: PathBuf,
    pub first_page: u32,
    pub last_page: u32,
    pub rulebook: String,
    pub img: String,
    pub core_version: String,
    pub system_id: String,
    pub system_version: String,
    pub last_modified_by: String,
}

impl Settings {
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let meta = RecordMeta::default();
        let mut builder = Config::builder()
            .set_default("source", "CAT28000S_SR6_Core_City_Edition_Seattle.pdf")?
            .set_default("output_dir", "packs/_source/weapons")?
            .set_default("first_page", 247_i64)?
            .set_default("last_page", 259_i64)?
            .set_default("rulebook", "SR6 Core")?
            .set_default("img", meta.img)?
            .set_default("core_version", meta.core_version)?
            .set_default("system_id", meta.system_id)?
            .set_default("system_version", meta.system_version)?
            .set_default("last_modified_by", meta.last_modified_by)?;

        builder = match file {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG).required(false)),
        };

        let settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    /// Inclusive, 1-based page range to scan.
    pub fn pages(&self) -> Result<RangeInclusive<u32>> {
        if self.first_page == 0 || self.first_page > self.last_page {
            return Err(ImportError::InvalidPageRange {
                first: self.first_page,
                last: self.last_page,
            });
        }
        Ok(self.first_page..=self.last_page)
    }

    pub fn record_meta(&self) -> RecordMeta {
        RecordMeta {
            img: self.img.clone(),
            core_version: self.core_version.clone(),
            system_id: self.system_id.clone(),
            system_version: self.system_version.clone(),
            last_modified_by: self.last_modified_by.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> Settings {
        // Empty file, so a weapons.toml in the working directory is ignored.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weapons.toml");
        std::fs::write(&path, "").unwrap();
        Settings::load(Some(&path)).unwrap()
    }

    #[test]
    fn defaults_cover_weapon_table() {
        let s = defaults();
        assert_eq!(s.pages().unwrap(), 247..=259);
        assert_eq!(s.rulebook, "SR6 Core");
        assert_eq!(s.output_dir, PathBuf::from("packs/_source/weapons"));
        assert_eq!(s.record_meta().system_id, "sr6elysium");
    }

    #[test]
    fn file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            "first_page = 247\nlast_page = 251\nrulebook = \"SR6 Firing Squad\"\n",
        )
        .unwrap();
        let s = Settings::load(Some(&path)).unwrap();
        assert_eq!(s.pages().unwrap(), 247..=251);
        assert_eq!(s.rulebook, "SR6 Firing Squad");
        assert_eq!(s.img, RecordMeta::default().img);
    }

    #[test]
    fn environment_overrides_file() {
        // No other test reads system_version.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weapons.toml");
        std::fs::write(&path, "system_version = \"0.0.9\"\nrulebook = \"SR6 Core\"\n").unwrap();

        std::env::set_var("WEAPONS_SYSTEM_VERSION", "0.1.4");
        let loaded = Settings::load(Some(&path));
        std::env::remove_var("WEAPONS_SYSTEM_VERSION");

        let s = loaded.unwrap();
        assert_eq!(s.system_version, "0.1.4");
        assert_eq!(s.record_meta().system_version, "0.1.4");
        assert_eq!(s.rulebook, "SR6 Core");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        assert!(matches!(
            Settings::load(Some(&path)),
            Err(ImportError::Config(_))
        ));
    }

    #[test]
    fn rejects_backwards_range() {
        let mut s = defaults();
        s.first_page = 260;
        assert!(matches!(
            s.pages(),
            Err(ImportError::InvalidPageRange { first: 260, last: 259 })
        ));
        s.first_page = 0;
        assert!(s.pages().is_err());
    }
}
