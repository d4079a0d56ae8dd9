use std::path::PathBuf;

use anyhow::Context as _;
use sha2::{Digest as _, Sha256};

use crate::{
    error::{MemeError, MemeResult},
    model::SubjectId,
};

/// Content-addressed key for one rendered artifact.
///
/// Lowercase hex SHA-256 of `"{memeId}:{subjectId}"`. The key is a function
/// of the identifiers only, never of config content: editing a config after
/// an artifact has been cached keeps serving the stale artifact. Known
/// limitation, kept from the original keying scheme.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn derive(meme_id: &str, subject: SubjectId) -> Self {
        use std::fmt::Write as _;

        let digest = Sha256::digest(format!("{meme_id}:{subject}").as_bytes());
        let mut hex = String::with_capacity(64);
        for byte in digest {
            let _ = write!(hex, "{byte:02x}");
        }
        Self(hex)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// On-disk artifact cache, one `<key>.png` file per key, no partitioning.
///
/// `get` followed by `put` is not atomic. Concurrent first requests for the
/// same key all miss, all render, and all write; artifacts are deterministic,
/// so last-writer-wins is safe and only wastes work.
#[derive(Clone, Debug)]
pub struct CacheStore {
    dir: PathBuf,
}

impl CacheStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn key(&self, meme_id: &str, subject: SubjectId) -> CacheKey {
        CacheKey::derive(meme_id, subject)
    }

    fn artifact_path(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(format!("{key}.png"))
    }

    /// Read the artifact for `key`; absence is `None`, not an error.
    pub fn get(&self, key: &CacheKey) -> MemeResult<Option<Vec<u8>>> {
        let path = self.artifact_path(key);
        match std::fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(MemeError::Other(
                anyhow::Error::new(err)
                    .context(format!("read cached artifact '{}'", path.display())),
            )),
        }
    }

    /// Persist the artifact for `key`.
    ///
    /// Best-effort from the pipeline's point of view: the caller logs a
    /// failure and still serves the rendered bytes.
    pub fn put(&self, key: &CacheKey, bytes: &[u8]) -> MemeResult<()> {
        let write = || -> anyhow::Result<()> {
            std::fs::create_dir_all(&self.dir)
                .with_context(|| format!("create cache dir '{}'", self.dir.display()))?;
            let path = self.artifact_path(key);
            std::fs::write(&path, bytes)
                .with_context(|| format!("write cached artifact '{}'", path.display()))?;
            Ok(())
        };
        write().map_err(|err| MemeError::cache_persist(format!("{err:#}")))
    }
}
