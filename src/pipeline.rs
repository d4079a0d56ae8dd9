use crate::{
    assets::AssetStore,
    cache::{CacheKey, CacheStore},
    compose::compose,
    config::ConfigStore,
    error::MemeResult,
    model::SubjectId,
    paths::MemePaths,
};

/// Content type of every rendered artifact.
pub const PNG_CONTENT_TYPE: &str = "image/png";

/// Encoded render output handed to the boundary layer.
#[derive(Clone, Debug)]
pub struct RenderedArtifact {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
    /// Whether the bytes came from the artifact cache instead of a fresh
    /// render.
    pub from_cache: bool,
}

/// End-to-end get-or-render pipeline over config, asset, and cache stores.
#[derive(Clone, Debug)]
pub struct MemePipeline {
    configs: ConfigStore,
    assets: AssetStore,
    cache: CacheStore,
}

impl MemePipeline {
    pub fn new(paths: &MemePaths) -> Self {
        Self {
            configs: ConfigStore::new(&paths.configs),
            assets: AssetStore::new(paths),
            cache: CacheStore::new(&paths.artifacts),
        }
    }

    /// Key that [`MemePipeline::render_or_serve`] caches under for this pair.
    pub fn cache_key(&self, meme_id: &str, subject_raw: i64) -> MemeResult<CacheKey> {
        let subject = SubjectId::new(subject_raw)?;
        Ok(self.cache.key(meme_id, subject))
    }

    /// Serve the cached artifact for `(meme_id, subject_raw)` or render it.
    ///
    /// Step order is fixed: validate the subject, load + validate the config,
    /// derive the cache key, check the cache, and only on a miss load assets
    /// and composite. A failed cache write is logged and swallowed; the
    /// freshly rendered bytes are still returned. A second call with the same
    /// pair returns byte-identical output via the cache path.
    #[tracing::instrument(skip(self))]
    pub fn render_or_serve(&self, meme_id: &str, subject_raw: i64) -> MemeResult<RenderedArtifact> {
        let subject = SubjectId::new(subject_raw)?;
        let config = self.configs.load(meme_id)?;
        let key = self.cache.key(meme_id, subject);

        if let Some(bytes) = self.cache.get(&key)? {
            tracing::debug!(%key, "serving cached artifact");
            return Ok(RenderedArtifact {
                bytes,
                content_type: PNG_CONTENT_TYPE,
                from_cache: true,
            });
        }

        let sprite = config.sprite()?;
        let background = self.assets.background(&config.background)?;
        let sheet = self.assets.sprite_sheet(subject)?;
        let foreground = config
            .foreground
            .as_deref()
            .map(|file| self.assets.foreground(file))
            .transpose()?;

        let bytes = compose(&background, &sheet, sprite, foreground.as_ref())?;

        if let Err(err) = self.cache.put(&key, &bytes) {
            tracing::warn!(%key, %err, "artifact render succeeded but persist failed");
        }

        Ok(RenderedArtifact {
            bytes,
            content_type: PNG_CONTENT_TYPE,
            from_cache: false,
        })
    }
}
