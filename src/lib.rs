//! Deterministic sprite-meme compositing with a content-addressed PNG cache.
//!
//! A meme is described by a JSON [`MemeConfig`] (background, optional
//! foreground, one sprite placement) and rendered for a numeric [`SubjectId`]
//! that selects a 48×48-frame sprite sheet. [`MemePipeline::render_or_serve`]
//! is the end-to-end operation: it validates the pair, checks the on-disk
//! artifact cache keyed by SHA-256 of `"{memeId}:{subjectId}"`, and on a miss
//! composites background, sprite, and foreground into PNG bytes that are
//! byte-identical across repeat renders.
#![forbid(unsafe_code)]

pub mod assets;
pub mod cache;
pub mod compose;
pub mod config;
pub mod error;
pub mod model;
pub mod paths;
pub mod pipeline;
pub mod sprite;

pub use assets::AssetStore;
pub use cache::{CacheKey, CacheStore};
pub use compose::compose;
pub use config::ConfigStore;
pub use error::{MemeError, MemeResult};
pub use model::{MemeConfig, SpriteInstance, SubjectId, SUBJECT_ID_MAX};
pub use paths::MemePaths;
pub use pipeline::{MemePipeline, RenderedArtifact, PNG_CONTENT_TYPE};
pub use sprite::{SpriteAction, SpriteDirection, SpriteFrame, SpriteStyle, FRAME_EDGE, VARIANT_MAX};
