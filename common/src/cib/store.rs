use std::path::PathBuf;

use crate::cib::record::CharacteristicsRecord;
use crate::error::Result;

/// Durable home for characteristics records.
///
/// Writes are keyed by [`CharacteristicsRecord::filename`]; saving a record
/// whose filename already exists replaces it (last write wins).
pub trait CibStore {
    /// Persists `record` and returns where it landed.
    fn save(&self, record: &CharacteristicsRecord) -> Result<PathBuf>;

    fn load(&self, filename: &str) -> Result<CharacteristicsRecord>;
}
