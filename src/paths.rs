use std::path::{Path, PathBuf};

use crate::model::SubjectId;

/// Explicit filesystem layout threaded through the pipeline.
///
/// Nothing in the crate reaches for process-wide locations; every store
/// receives the directory it operates on from here.
#[derive(Clone, Debug)]
pub struct MemePaths {
    /// Per-meme JSON records, `<configs>/<memeId>.json`.
    pub configs: PathBuf,
    /// Background rasters referenced by config.
    pub backgrounds: PathBuf,
    /// Foreground rasters referenced by config.
    pub foregrounds: PathBuf,
    /// Sprite sheets, `<sprites>/<subjectId>_sheet.png`.
    pub sprites: PathBuf,
    /// Rendered artifacts, `<artifacts>/<cacheKey>.png`.
    pub artifacts: PathBuf,
}

impl MemePaths {
    /// Conventional layout under a single data root.
    pub fn from_root(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let cache = root.join("cache");
        Self {
            configs: cache.join("configs"),
            backgrounds: cache.join("backgrounds"),
            foregrounds: cache.join("foregrounds"),
            sprites: root.join("assets").join("birds"),
            artifacts: cache.join("memes"),
        }
    }

    pub fn config_file(&self, meme_id: &str) -> PathBuf {
        self.configs.join(format!("{meme_id}.json"))
    }

    pub fn sprite_sheet_file(&self, subject: SubjectId) -> PathBuf {
        self.sprites.join(format!("{subject}_sheet.png"))
    }
}
