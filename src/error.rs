pub type MemeResult<T> = Result<T, MemeError>;

#[derive(thiserror::Error, Debug)]
pub enum MemeError {
    /// Subject identifier outside the supported range.
    #[error("invalid subject id: {0}")]
    InvalidSubject(i64),

    /// No configuration record exists for the requested meme.
    #[error("meme not found: '{0}'")]
    MemeNotFound(String),

    /// A configuration record exists but fails validation.
    #[error("invalid meme config: {0}")]
    ConfigInvalid(String),

    /// A background, foreground, or sprite-sheet asset could not be
    /// loaded or decoded. Aborts the render.
    #[error("image load error: {0}")]
    ImageLoad(String),

    /// Persisting a rendered artifact failed. Non-fatal: the bytes were
    /// already produced and remain valid to serve.
    #[error("cache persist error: {0}")]
    CachePersist(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl MemeError {
    pub fn config_invalid(msg: impl Into<String>) -> Self {
        Self::ConfigInvalid(msg.into())
    }

    pub fn image_load(msg: impl Into<String>) -> Self {
        Self::ImageLoad(msg.into())
    }

    pub fn cache_persist(msg: impl Into<String>) -> Self {
        Self::CachePersist(msg.into())
    }

    /// Whether the boundary layer should answer "not found" for this error.
    ///
    /// Invalid subjects and malformed configs are deliberately
    /// indistinguishable from absent memes in client-visible responses.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::InvalidSubject(_) | Self::MemeNotFound(_) | Self::ConfigInvalid(_)
        )
    }
}
