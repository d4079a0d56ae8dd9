use crate::{
    error::{MemeError, MemeResult},
    sprite::SpriteStyle,
};

/// Largest valid subject id (inclusive).
pub const SUBJECT_ID_MAX: i64 = 9999;

/// Upper bound on a sprite's destination edge, to keep intermediate
/// surfaces bounded.
pub const SPRITE_SIZE_MAX: u32 = 4096;

/// Identifier of the sprite-sheet asset to composite, in `[0, 9999]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubjectId(u16);

impl SubjectId {
    pub fn new(raw: i64) -> MemeResult<Self> {
        if !(0..=SUBJECT_ID_MAX).contains(&raw) {
            return Err(MemeError::InvalidSubject(raw));
        }
        Ok(Self(raw as u16))
    }

    pub fn as_u16(self) -> u16 {
        self.0
    }
}

impl std::fmt::Display for SubjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// One sprite placement inside a meme.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct SpriteInstance {
    pub style: SpriteStyle,
    /// Top-left corner of the destination box, background coordinates.
    /// May be negative; out-of-canvas regions are clipped.
    pub x: i64,
    pub y: i64,
    /// Edge length of the square destination box.
    pub size: u32,
    /// Clockwise degrees about the destination box center.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotate: Option<f64>,
}

/// Declarative description of one meme, loaded read-only per render.
///
/// `birds` is an ordered sequence for config compatibility, but only the
/// first entry is composited.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct MemeConfig {
    pub background: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foreground: Option<String>,
    pub birds: Vec<SpriteInstance>,
}

impl MemeConfig {
    pub fn validate(&self) -> MemeResult<()> {
        if self.background.trim().is_empty() {
            return Err(MemeError::config_invalid("background must be non-empty"));
        }
        if let Some(fg) = &self.foreground
            && fg.trim().is_empty()
        {
            return Err(MemeError::config_invalid(
                "foreground must be non-empty when present",
            ));
        }
        if self.birds.is_empty() {
            return Err(MemeError::config_invalid(
                "birds must have at least one entry",
            ));
        }

        for (i, bird) in self.birds.iter().enumerate() {
            if bird.size == 0 || bird.size > SPRITE_SIZE_MAX {
                return Err(MemeError::config_invalid(format!(
                    "birds[{i}].size must be in 1..={SPRITE_SIZE_MAX}, got {}",
                    bird.size
                )));
            }
            if let Some(deg) = bird.rotate
                && !deg.is_finite()
            {
                return Err(MemeError::config_invalid(format!(
                    "birds[{i}].rotate must be finite"
                )));
            }
        }

        Ok(())
    }

    /// The single sprite this meme renders.
    ///
    /// Guaranteed present after [`MemeConfig::validate`].
    pub fn sprite(&self) -> MemeResult<&SpriteInstance> {
        self.birds
            .first()
            .ok_or_else(|| MemeError::config_invalid("birds must have at least one entry"))
    }
}
