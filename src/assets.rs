use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::{
    error::{MemeError, MemeResult},
    model::SubjectId,
    paths::MemePaths,
};

/// Loads and decodes raster assets referenced by a meme config.
///
/// Decoding happens per render; the artifact cache in front of the pipeline
/// makes repeat decodes rare.
#[derive(Clone, Debug)]
pub struct AssetStore {
    backgrounds: PathBuf,
    foregrounds: PathBuf,
    sprites: PathBuf,
}

impl AssetStore {
    pub fn new(paths: &MemePaths) -> Self {
        Self {
            backgrounds: paths.backgrounds.clone(),
            foregrounds: paths.foregrounds.clone(),
            sprites: paths.sprites.clone(),
        }
    }

    pub fn background(&self, file: &str) -> MemeResult<RgbaImage> {
        self.decode_named(&self.backgrounds, file, "background")
    }

    pub fn foreground(&self, file: &str) -> MemeResult<RgbaImage> {
        self.decode_named(&self.foregrounds, file, "foreground")
    }

    pub fn sprite_sheet(&self, subject: SubjectId) -> MemeResult<RgbaImage> {
        let path = self.sprites.join(format!("{subject}_sheet.png"));
        decode_raster(&path, "sprite sheet")
    }

    fn decode_named(&self, dir: &Path, file: &str, what: &str) -> MemeResult<RgbaImage> {
        // Config-supplied names stay inside their asset directory.
        if file.contains('/') || file.contains('\\') || file.contains("..") {
            return Err(MemeError::image_load(format!(
                "{what} '{file}' must be a bare file name"
            )));
        }
        decode_raster(&dir.join(file), what)
    }
}

fn decode_raster(path: &Path, what: &str) -> MemeResult<RgbaImage> {
    let bytes = std::fs::read(path).map_err(|err| {
        MemeError::image_load(format!("read {what} '{}': {err}", path.display()))
    })?;
    let dyn_img = image::load_from_memory(&bytes).map_err(|err| {
        MemeError::image_load(format!("decode {what} '{}': {err}", path.display()))
    })?;
    Ok(dyn_img.to_rgba8())
}
