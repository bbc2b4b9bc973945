use image::{RgbImage, RgbaImage};

use crate::compose::config::{
    CORNER_RADIUS, CompositionConfig, DEFAULT_BACKGROUND, OVERLAY_TEXT_SHADOW_OFFSET,
    PLACEHOLDER_FILL, PLACEHOLDER_GLYPH, PLACEHOLDER_GLYPH_COLOR, PLACEHOLDER_GLYPH_SIZE,
    TITLE_COLOR, TITLE_SIZE, TITLE_TOP,
};
use crate::compose::inputs::{CompositionInputs, OverlayMark};
use crate::foundation::core::{CanvasSize, Rgba8, Surface};
use crate::foundation::error::CollageResult;
use crate::imaging::composite::paste;
use crate::imaging::cover::apply_cover_background;
use crate::imaging::resize::resize_exact;
use crate::imaging::shadow::paste_with_shadow;
use crate::imaging::shape::apply_shape;
use crate::layout::{SlotRect, positions_for};
use crate::text::font::{Font, FontFamily, FontResolver};
use crate::text::layout::{TextLayoutEngine, TextMask};
use crate::text::styled::{SHADOW_COLOR, ShadowStyle, TextStyle, draw_styled_mask};

/// Render one template.
///
/// Layers, back to front: background fill or cover-fitted image, title, every slot tile with
/// its drop shadow, every overlay, logo. All tiles are pasted before any overlay, so an
/// overlay is never covered by a later tile. `config.num_slots == 0` stops after the title.
///
/// Missing images, overlays and fonts degrade to placeholders or skipped layers. The only
/// errors are for canvases that are empty or larger than
/// [`MAX_CANVAS_SIDE`](crate::MAX_CANVAS_SIDE).
#[tracing::instrument(
    skip(inputs, config, fonts),
    fields(width = inputs.canvas.width, height = inputs.canvas.height, slots = config.num_slots)
)]
pub fn compose(
    inputs: &CompositionInputs<'_>,
    config: &CompositionConfig,
    fonts: &FontResolver,
) -> CollageResult<RgbImage> {
    let canvas = inputs.canvas;
    canvas.validate()?;

    let mut base = Surface::filled(canvas.width, canvas.height, DEFAULT_BACKGROUND);
    apply_cover_background(&mut base, inputs.background);

    let mut text = TextLayoutEngine::new();
    draw_title(&mut base, &mut text, inputs.title, config, fonts);

    let n = config.num_slots;
    if n == 0 {
        return Ok(base.into_rgb_image());
    }

    let positions = positions_for(n);
    if n > positions.len() {
        tracing::debug!(
            n,
            drawn = positions.len(),
            "more slots than layout positions, extra slots are dropped"
        );
    }

    let mut tiles = Vec::with_capacity(positions.len().min(n));
    for (i, placement) in positions.iter().take(n).enumerate() {
        let rect = placement.to_pixels(canvas);
        let tile = match inputs.slot_image(i) {
            Some(image) => apply_shape(image, config.image_shape, rect.side, CORNER_RADIUS)?,
            None => placeholder_tile(rect.side, &mut text, fonts),
        };
        tiles.push((rect, tile));
    }

    for (rect, tile) in &tiles {
        paste_with_shadow(&mut base, tile, rect.left, rect.top, &config.tile_shadow)?;
    }

    let overlay_font = fonts.resolve(
        FontFamily::ArialBold,
        config.overlay_text_px(canvas.height),
        FontFamily::ArialBold.scale_factor(),
    );
    for (i, (rect, _)) in tiles.iter().enumerate() {
        let Some(mark) = inputs.overlay_mark(i) else {
            continue;
        };
        match mark {
            OverlayMark::Image(image) => draw_overlay_image(&mut base, image, rect, config),
            OverlayMark::Text(t) => {
                draw_overlay_text(&mut base, &mut text, t, rect, config, &overlay_font)?;
            }
        }
    }

    if let Some(logo) = inputs.logo {
        draw_logo(&mut base, logo, config);
    }

    Ok(base.into_rgb_image())
}

fn draw_title(
    base: &mut Surface,
    engine: &mut TextLayoutEngine,
    title: &str,
    config: &CompositionConfig,
    fonts: &FontResolver,
) {
    if title.trim().is_empty() {
        return;
    }
    let h = f64::from(base.height());
    let family = config.font_family;
    let font = fonts.resolve(family, (h * TITLE_SIZE) as u32, family.scale_factor());
    let advance = match engine.measure(title, &font) {
        Ok(metrics) => metrics.advance.round() as i32,
        Err(err) => {
            tracing::warn!(%err, family = font.family().key(), "title not measured");
            return;
        }
    };

    // Render only the columns that can reach the canvas, with a margin for bearings.
    let canvas_w = base.width() as i32;
    let line_x = (canvas_w - advance).div_euclid(2);
    let margin = font.size_px().ceil() as i32;
    let columns = (-line_x - margin, base.width() + 2 * margin as u32);
    let mask = text_mask(engine, title, &font, Some(columns));
    let Some(ink) = mask.ink_bounds() else {
        return;
    };

    let x = (canvas_w - ink.width as i32).div_euclid(2) - ink.x;
    let y = (h * TITLE_TOP) as i32;
    let style = config.title_style.text_style();
    if let Err(err) = draw_styled_mask(base, &mask, x, y, TITLE_COLOR, &style) {
        tracing::warn!(%err, "title not drawn");
    }
}

fn placeholder_tile(side: u32, engine: &mut TextLayoutEngine, fonts: &FontResolver) -> Surface {
    tracing::debug!(side, "placeholder tile");
    let mut tile = Surface::filled(side, side, PLACEHOLDER_FILL);
    let font = fonts.resolve(
        FontFamily::ArialBold,
        (f64::from(side) * PLACEHOLDER_GLYPH_SIZE) as u32,
        FontFamily::ArialBold.scale_factor(),
    );
    let mask = text_mask(engine, PLACEHOLDER_GLYPH, &font, None);
    let Some(ink) = mask.ink_bounds() else {
        return tile;
    };
    let x = (side as i32 - ink.width as i32).div_euclid(2) - ink.x;
    let y = (side as i32 - ink.height as i32).div_euclid(2) - ink.y;
    if let Err(err) = draw_styled_mask(
        &mut tile,
        &mask,
        x,
        y,
        PLACEHOLDER_GLYPH_COLOR,
        &TextStyle::default(),
    ) {
        tracing::warn!(%err, "placeholder glyph not drawn");
    }
    tile
}

fn draw_overlay_image(
    base: &mut Surface,
    image: &RgbaImage,
    rect: &SlotRect,
    config: &CompositionConfig,
) {
    let side = (f64::from(rect.side) * config.emoji_size).max(0.0) as u32;
    if side == 0 || image.width() == 0 || image.height() == 0 {
        return;
    }
    let mark = resize_exact(&Surface::from_rgba_image(image), side, side);
    let x = rect.left + config.emoji_x_offset;
    let y = rect.top + rect.side as i32 - side as i32 + config.emoji_y_offset;
    paste(base, &mark, x, y);
}

fn draw_overlay_text(
    base: &mut Surface,
    engine: &mut TextLayoutEngine,
    text: &str,
    rect: &SlotRect,
    config: &CompositionConfig,
    font: &Font,
) -> CollageResult<()> {
    let x = rect.left + config.emoji_x_offset;
    let mask = text_mask(engine, text, font, Some((-x, base.width())));
    let Some(ink) = mask.ink_bounds() else {
        return Ok(());
    };
    // Ink bottom sits on the tile's bottom edge.
    let bottom = rect.top + rect.side as i32 + config.emoji_y_offset;
    let y = bottom - (ink.y + ink.height as i32);
    let style = TextStyle {
        outline: None,
        shadow: Some(ShadowStyle {
            offset: OVERLAY_TEXT_SHADOW_OFFSET,
            blur: 0.0,
            color: SHADOW_COLOR,
        }),
    };
    draw_styled_mask(base, &mask, x, y, Rgba8::WHITE, &style)
}

fn draw_logo(base: &mut Surface, logo: &RgbaImage, config: &CompositionConfig) {
    let (lw, lh) = logo.dimensions();
    if lw == 0 || lh == 0 {
        return;
    }
    let canvas = CanvasSize::new(base.width(), base.height());
    let (w, h) = (f64::from(canvas.width), f64::from(canvas.height));
    let max_w = (w * config.logo.max_width).max(0.0).floor();
    let scale = (max_w / f64::from(lw)).min(1.0);
    let new_w = (f64::from(lw) * scale) as u32;
    let new_h = (f64::from(lh) * scale) as u32;
    if new_w == 0 || new_h == 0 {
        return;
    }

    let source = Surface::from_rgba_image(logo);
    let scaled = if (new_w, new_h) == (lw, lh) {
        source
    } else {
        resize_exact(&source, new_w, new_h)
    };
    let x = (w * config.logo.center_x) as i32 - (new_w / 2) as i32;
    let y = (h * config.logo.center_y) as i32 - (new_h / 2) as i32;
    paste(base, &scaled, x, y);
}

fn text_mask(
    engine: &mut TextLayoutEngine,
    text: &str,
    font: &Font,
    columns: Option<(i32, u32)>,
) -> TextMask {
    engine
        .rasterize_clipped(text, font, columns)
        .unwrap_or_else(|err| {
            tracing::warn!(%err, family = font.family().key(), "text not rendered");
            TextMask::empty()
        })
}

#[cfg(test)]
#[path = "../../tests/unit/compose/engine.rs"]
mod tests;
