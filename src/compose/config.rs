use std::path::Path;

use anyhow::Context;

use crate::foundation::core::Rgba8;
use crate::foundation::error::CollageResult;
use crate::imaging::shadow::DropShadow;
use crate::imaging::shape::ImageShape;
use crate::text::font::FontFamily;
use crate::text::styled::TitleStyle;

/// Canvas fill used when no background image is given.
pub const DEFAULT_BACKGROUND: Rgba8 = Rgba8::rgb(18, 18, 24);
/// Title fill color.
pub const TITLE_COLOR: Rgba8 = Rgba8::WHITE;
/// Title line-box top, as a fraction of canvas height.
pub const TITLE_TOP: f64 = 0.08;
/// Title pixel size, as a fraction of canvas height.
pub const TITLE_SIZE: f64 = 0.08;
/// Fill of tiles for slots without an image.
pub const PLACEHOLDER_FILL: Rgba8 = Rgba8::rgb(80, 80, 90);
/// Color of the placeholder glyph.
pub const PLACEHOLDER_GLYPH_COLOR: Rgba8 = Rgba8::rgb(200, 200, 200);
/// Glyph drawn on placeholder tiles.
pub const PLACEHOLDER_GLYPH: &str = "?";
/// Placeholder glyph size, as a fraction of the tile side.
pub const PLACEHOLDER_GLYPH_SIZE: f64 = 0.4;
/// Corner radius of rounded tiles, in pixels.
pub const CORNER_RADIUS: f32 = 30.0;
/// Shadow offset of overlay text, in pixels.
pub const OVERLAY_TEXT_SHADOW_OFFSET: i32 = 2;
/// `emoji_size` at which overlay text matches the title size.
pub const OVERLAY_TEXT_REFERENCE_SIZE: f64 = 0.45;

/// Where the logo goes and how large it may get.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LogoPlacement {
    /// Maximum logo width, as a fraction of canvas width. Logos are never upscaled.
    pub max_width: f64,
    /// Horizontal center, as a fraction of canvas width.
    pub center_x: f64,
    /// Vertical center, as a fraction of canvas height.
    pub center_y: f64,
}

impl Default for LogoPlacement {
    fn default() -> Self {
        Self {
            max_width: 0.2,
            center_x: 0.5,
            center_y: 0.5,
        }
    }
}

/// Style parameters of one composition.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CompositionConfig {
    /// Title font family.
    pub font_family: FontFamily,
    /// Title decoration preset.
    pub title_style: TitleStyle,
    /// Mask applied to every slot image.
    pub image_shape: ImageShape,
    /// Logo placement.
    pub logo: LogoPlacement,
    /// Overlay size as a fraction of the tile side.
    pub emoji_size: f64,
    /// Horizontal overlay offset from the tile's left edge, in pixels.
    pub emoji_x_offset: i32,
    /// Vertical overlay offset from the tile's bottom edge, in pixels.
    pub emoji_y_offset: i32,
    /// Number of slots to lay out; `0` renders background and title only.
    pub num_slots: usize,
    /// Shadow cast by every tile.
    pub tile_shadow: DropShadow,
}

impl Default for CompositionConfig {
    fn default() -> Self {
        Self {
            font_family: FontFamily::default(),
            title_style: TitleStyle::default(),
            image_shape: ImageShape::default(),
            logo: LogoPlacement::default(),
            emoji_size: 0.45,
            emoji_x_offset: 0,
            emoji_y_offset: 0,
            num_slots: 3,
            tile_shadow: DropShadow::default(),
        }
    }
}

impl CompositionConfig {
    /// Parse a JSON document; absent fields keep their defaults.
    pub fn from_json_str(s: &str) -> CollageResult<Self> {
        let config = serde_json::from_str(s).context("parse composition config JSON")?;
        Ok(config)
    }

    /// Read and parse a JSON config file.
    pub fn from_json_path(path: &Path) -> CollageResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    /// Same config with a different slot count.
    pub fn with_num_slots(mut self, num_slots: usize) -> Self {
        self.num_slots = num_slots;
        self
    }

    /// Pixel size of overlay text on a canvas of height `canvas_height`.
    pub fn overlay_text_px(&self, canvas_height: u32) -> u32 {
        let size = f64::from(canvas_height) * TITLE_SIZE * self.emoji_size
            / OVERLAY_TEXT_REFERENCE_SIZE;
        (size.max(1.0)) as u32
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/config.rs"]
mod tests;
