use std::path::PathBuf;

use crate::{
    error::{MemeError, MemeResult},
    model::MemeConfig,
};

/// Reads per-meme configuration records from a directory of JSON files.
///
/// Each [`ConfigStore::load`] re-reads from disk; records are small and the
/// rendered artifacts are what get cached, not the configs.
#[derive(Clone, Debug)]
pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Load and validate the record for `meme_id`.
    ///
    /// Absent records fail with [`MemeError::MemeNotFound`]; present but
    /// malformed records fail with [`MemeError::ConfigInvalid`]. Both map to
    /// a not-found response at the boundary, so clients cannot probe which
    /// case they hit.
    pub fn load(&self, meme_id: &str) -> MemeResult<MemeConfig> {
        validate_meme_id(meme_id)?;

        let path = self.dir.join(format!("{meme_id}.json"));
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::debug!(meme_id, path = %path.display(), %err, "config read failed");
                return Err(MemeError::MemeNotFound(meme_id.to_string()));
            }
        };

        let config: MemeConfig = serde_json::from_str(&raw).map_err(|err| {
            tracing::debug!(meme_id, %err, "config parse failed");
            MemeError::config_invalid(format!("meme '{meme_id}': {err}"))
        })?;
        config.validate()?;
        Ok(config)
    }
}

/// Meme ids become file name stems; separators and traversal segments are
/// rejected up front.
fn validate_meme_id(meme_id: &str) -> MemeResult<()> {
    if meme_id.is_empty()
        || meme_id.contains('/')
        || meme_id.contains('\\')
        || meme_id.contains("..")
        || meme_id.contains('\0')
    {
        return Err(MemeError::MemeNotFound(meme_id.to_string()));
    }
    Ok(())
}
