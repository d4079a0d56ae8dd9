use std::{fmt, str::FromStr};

use crate::error::{MemeError, MemeResult};

/// Edge length of one sprite-sheet frame, in source pixels.
pub const FRAME_EDGE: u32 = 48;

/// Largest accepted style variant (inclusive). Keeps frame offsets within
/// any plausible sheet width and clear of `u32` overflow in the offset math.
pub const VARIANT_MAX: u32 = 1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpriteAction {
    Idle,
    Walk,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpriteDirection {
    North,
    East,
    South,
    West,
}

/// Parsed form of the compact `action_direction_variant` style string.
///
/// The string form is parsed once at config-load time; rendering only ever
/// sees the validated structure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SpriteStyle {
    pub action: SpriteAction,
    pub direction: SpriteDirection,
    /// 1-based column selector into the sheet, at most [`VARIANT_MAX`];
    /// defaults to 1 when the token is omitted.
    pub variant: u32,
}

/// Source sub-rectangle inside a sprite sheet. Frames are always
/// [`FRAME_EDGE`]-square, so only the top-left offset is carried.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpriteFrame {
    pub x: u32,
    pub y: u32,
}

impl SpriteStyle {
    /// Resolve the sheet offset for this style.
    ///
    /// Rows: idle occupies rows 0..192, walk rows 192..384; within each block
    /// the direction picks the row (south 0, east 48, north 96, west 144).
    /// Columns advance by variant.
    pub fn frame(&self) -> SpriteFrame {
        let action_base = match self.action {
            SpriteAction::Idle => 0,
            SpriteAction::Walk => 4 * FRAME_EDGE,
        };
        let direction_row = match self.direction {
            SpriteDirection::South => 0,
            SpriteDirection::East => FRAME_EDGE,
            SpriteDirection::North => 2 * FRAME_EDGE,
            SpriteDirection::West => 3 * FRAME_EDGE,
        };
        SpriteFrame {
            x: (self.variant - 1) * FRAME_EDGE,
            y: action_base + direction_row,
        }
    }
}

impl FromStr for SpriteStyle {
    type Err = MemeError;

    fn from_str(s: &str) -> MemeResult<Self> {
        let mut parts = s.split('_');
        let action = match parts.next() {
            Some("idle") => SpriteAction::Idle,
            Some("walk") => SpriteAction::Walk,
            other => {
                return Err(MemeError::config_invalid(format!(
                    "style '{s}': unknown action '{}'",
                    other.unwrap_or("")
                )));
            }
        };
        let direction = match parts.next() {
            Some("north") => SpriteDirection::North,
            Some("east") => SpriteDirection::East,
            Some("south") => SpriteDirection::South,
            Some("west") => SpriteDirection::West,
            other => {
                return Err(MemeError::config_invalid(format!(
                    "style '{s}': unknown direction '{}'",
                    other.unwrap_or("")
                )));
            }
        };
        let variant = match parts.next() {
            None => 1,
            Some(tok) => match tok.parse::<u32>() {
                Ok(v) if (1..=VARIANT_MAX).contains(&v) => v,
                _ => {
                    return Err(MemeError::config_invalid(format!(
                        "style '{s}': variant must be an integer in 1..={VARIANT_MAX}, got '{tok}'"
                    )));
                }
            },
        };
        if parts.next().is_some() {
            return Err(MemeError::config_invalid(format!(
                "style '{s}': expected at most action_direction_variant"
            )));
        }
        Ok(Self {
            action,
            direction,
            variant,
        })
    }
}

impl fmt::Display for SpriteStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = match self.action {
            SpriteAction::Idle => "idle",
            SpriteAction::Walk => "walk",
        };
        let direction = match self.direction {
            SpriteDirection::North => "north",
            SpriteDirection::East => "east",
            SpriteDirection::South => "south",
            SpriteDirection::West => "west",
        };
        write!(f, "{action}_{direction}_{}", self.variant)
    }
}

impl TryFrom<String> for SpriteStyle {
    type Error = MemeError;

    fn try_from(s: String) -> MemeResult<Self> {
        s.parse()
    }
}

impl From<SpriteStyle> for String {
    fn from(style: SpriteStyle) -> Self {
        style.to_string()
    }
}
