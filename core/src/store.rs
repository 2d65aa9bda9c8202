use std::fs;
use std::path::{Path, PathBuf};

use ifcib_common::cib::record::CharacteristicsRecord;
use ifcib_common::cib::store::CibStore;
use ifcib_common::error::{Error, Result};
use tracing::debug;

/// Stores each record as pretty-printed JSON at `<dir>/<filename>`.
///
/// Writes are plain overwrites, not atomic renames.
pub struct JsonCibStore {
    dir: PathBuf,
}

impl JsonCibStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl CibStore for JsonCibStore {
    fn save(&self, record: &CharacteristicsRecord) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).map_err(|source| Error::Storage {
            path: self.dir.clone(),
            source,
        })?;

        let path: PathBuf = self.dir.join(&record.filename);
        let json: String = record.to_json()?;
        fs::write(&path, json).map_err(|source| Error::Storage {
            path: path.clone(),
            source,
        })?;

        debug!(path = %path.display(), "record written");
        Ok(path)
    }

    fn load(&self, filename: &str) -> Result<CharacteristicsRecord> {
        let path: PathBuf = self.dir.join(filename);
        let json = fs::read_to_string(&path).map_err(|source| Error::Storage { path, source })?;
        CharacteristicsRecord::from_json(&json)
    }
}
