//! Title style presets and the shadow / outline / fill text renderer.

use crate::foundation::core::{Rgba8, Surface};
use crate::foundation::error::CollageResult;
use crate::imaging::blur::gaussian_blur;
use crate::imaging::composite::stamp_coverage;
use crate::text::font::Font;
use crate::text::layout::{TextLayoutEngine, TextMask};

/// Translucent black used for every text shadow.
pub const SHADOW_COLOR: Rgba8 = Rgba8::new(0, 0, 0, 180);

/// Thick outline drawn by stamping the text around its own position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OutlineStyle {
    /// Stamp distance in pixels.
    pub width: u32,
    /// Outline color.
    pub color: Rgba8,
}

/// Offset copy of the text drawn beneath it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadowStyle {
    /// Offset along both axes, in pixels.
    pub offset: i32,
    /// Gaussian standard deviation; `0` draws a hard shadow.
    pub blur: f32,
    /// Shadow color.
    pub color: Rgba8,
}

impl ShadowStyle {
    /// Shadow in [`SHADOW_COLOR`].
    pub const fn new(offset: i32, blur: f32) -> Self {
        Self {
            offset,
            blur,
            color: SHADOW_COLOR,
        }
    }
}

/// Composable text decoration; passes run shadow, then outline, then fill.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextStyle {
    /// Optional outline pass.
    pub outline: Option<OutlineStyle>,
    /// Optional shadow pass.
    pub shadow: Option<ShadowStyle>,
}

/// Closed set of named title presets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TitleStyle {
    /// Hard drop shadow.
    #[default]
    Simple,
    /// Black outline, no shadow.
    Outline,
    /// Large blurred shadow.
    SoftShadow,
    /// Heavy outline plus hard shadow.
    Impact,
}

impl TitleStyle {
    /// Every preset, in a stable order.
    pub const ALL: [Self; 4] = [Self::Simple, Self::Outline, Self::SoftShadow, Self::Impact];

    /// Stable configuration key.
    pub fn key(self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Outline => "contorno",
            Self::SoftShadow => "sombra_suave",
            Self::Impact => "impacto",
        }
    }

    /// Key lookup; English aliases are accepted too.
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "simple" => Some(Self::Simple),
            "contorno" | "outline" => Some(Self::Outline),
            "sombra_suave" | "soft_shadow" => Some(Self::SoftShadow),
            "impacto" | "impact" => Some(Self::Impact),
            _ => None,
        }
    }

    /// Key lookup that falls back to [`TitleStyle::Simple`].
    pub fn from_key_or_default(key: &str) -> Self {
        Self::from_key(key).unwrap_or_else(|| {
            tracing::debug!(key, "unknown title style, using simple");
            Self::default()
        })
    }

    /// Decoration this preset stands for.
    pub fn text_style(self) -> TextStyle {
        let black_outline = |width| OutlineStyle {
            width,
            color: Rgba8::BLACK,
        };
        match self {
            Self::Simple => TextStyle {
                outline: None,
                shadow: Some(ShadowStyle::new(4, 0.0)),
            },
            Self::Outline => TextStyle {
                outline: Some(black_outline(4)),
                shadow: None,
            },
            Self::SoftShadow => TextStyle {
                outline: None,
                shadow: Some(ShadowStyle::new(6, 10.0)),
            },
            Self::Impact => TextStyle {
                outline: Some(black_outline(6)),
                shadow: Some(ShadowStyle::new(4, 0.0)),
            },
        }
    }
}

impl From<String> for TitleStyle {
    fn from(key: String) -> Self {
        Self::from_key_or_default(&key)
    }
}

impl From<TitleStyle> for String {
    fn from(style: TitleStyle) -> Self {
        style.key().to_string()
    }
}

/// Draw a pre-rasterized text mask whose line box starts at `(x, y)`.
pub fn draw_styled_mask(
    surface: &mut Surface,
    mask: &TextMask,
    x: i32,
    y: i32,
    fill: Rgba8,
    style: &TextStyle,
) -> CollageResult<()> {
    if mask.width() == 0 || mask.height() == 0 {
        return Ok(());
    }
    let (ox, oy) = mask.origin();
    let (mx, my) = (x + ox, y + oy);

    if let Some(shadow) = style.shadow {
        let (sx, sy) = (mx + shadow.offset, my + shadow.offset);
        if shadow.blur > 0.0 {
            draw_blurred_shadow(surface, mask, sx, sy, &shadow)?;
        } else {
            stamp_mask(surface, mask, sx, sy, shadow.color);
        }
    }

    if let Some(outline) = style.outline
        && outline.width > 0
    {
        let ring = mask.outlined(outline.width);
        let (rx, ry) = ring.origin();
        stamp_mask(surface, &ring, x + rx, y + ry, outline.color);
    }

    stamp_mask(surface, mask, mx, my, fill);
    Ok(())
}

/// Lay out, rasterize and draw `text` with its line box starting at `position`.
///
/// Only the part of the line that can land on `surface` is rasterized.
pub fn draw_styled_text(
    surface: &mut Surface,
    engine: &mut TextLayoutEngine,
    text: &str,
    position: (i32, i32),
    font: &Font,
    fill: Rgba8,
    style: &TextStyle,
) -> CollageResult<()> {
    let columns = (-position.0, surface.width());
    let mask = engine.rasterize_clipped(text, font, Some(columns))?;
    draw_styled_mask(surface, &mask, position.0, position.1, fill, style)
}

fn stamp_mask(surface: &mut Surface, mask: &TextMask, x: i32, y: i32, color: Rgba8) {
    stamp_coverage(
        surface,
        mask.coverage(),
        mask.width(),
        mask.height(),
        x,
        y,
        color,
    );
}

// Blurring a full-surface layer keeps the falloff intact near the text box edges.
fn draw_blurred_shadow(
    surface: &mut Surface,
    mask: &TextMask,
    x: i32,
    y: i32,
    shadow: &ShadowStyle,
) -> CollageResult<()> {
    let (lw, lh) = (surface.width(), surface.height());
    let mut layer = vec![0u8; lw as usize * lh as usize];
    blit_coverage(&mut layer, lw, lh, mask, x, y);
    let blurred = gaussian_blur(&layer, lw, lh, 1, shadow.blur)?;
    stamp_coverage(surface, &blurred, lw, lh, 0, 0, shadow.color);
    Ok(())
}

fn blit_coverage(layer: &mut [u8], lw: u32, lh: u32, mask: &TextMask, x: i32, y: i32) {
    let mw = mask.width() as usize;
    for (row, src) in mask.coverage().chunks_exact(mw.max(1)).enumerate() {
        let ly = y + row as i32;
        if ly < 0 || ly >= lh as i32 {
            continue;
        }
        for (col, &c) in src.iter().enumerate() {
            let lx = x + col as i32;
            if c == 0 || lx < 0 || lx >= lw as i32 {
                continue;
            }
            let di = ly as usize * lw as usize + lx as usize;
            layer[di] = layer[di].max(c);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/styled.rs"]
mod tests;
