//! Text shaping with Parley and glyph coverage rasterization with `vello_cpu`.

use std::collections::HashMap;
use std::sync::Arc;

use crate::foundation::error::{CollageError, CollageResult};
use crate::imaging::raster::rasterize_coverage;
use crate::text::font::{Font, FontFace};

/// Horizontal advance and line-box height of a laid-out string, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextMetrics {
    /// Sum of glyph advances of the widest line.
    pub advance: f32,
    /// Total height of all line boxes.
    pub line_height: f32,
}

/// Tight box around non-zero coverage, relative to the line-box top-left.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InkBounds {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Single-channel coverage of rendered text.
///
/// The mask may extend past the line box (glyph overhang, outlines); `origin` is the offset of
/// the mask's top-left pixel from the line-box top-left.
#[derive(Clone, Debug, PartialEq)]
pub struct TextMask {
    width: u32,
    height: u32,
    coverage: Vec<u8>,
    origin: (i32, i32),
    metrics: TextMetrics,
}

impl TextMask {
    /// Mask with no pixels.
    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            coverage: Vec::new(),
            origin: (0, 0),
            metrics: TextMetrics::default(),
        }
    }

    /// Wrap raw coverage; `coverage.len()` must equal `width * height`.
    pub fn from_coverage(
        width: u32,
        height: u32,
        coverage: Vec<u8>,
        origin: (i32, i32),
        metrics: TextMetrics,
    ) -> CollageResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| CollageError::validation("text mask dimensions overflow"))?;
        if coverage.len() != expected {
            return Err(CollageError::validation(format!(
                "text mask coverage has {} bytes, expected {expected}",
                coverage.len()
            )));
        }
        Ok(Self {
            width,
            height,
            coverage,
            origin,
            metrics,
        })
    }

    /// Mask width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Mask height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major coverage bytes.
    pub fn coverage(&self) -> &[u8] {
        &self.coverage
    }

    /// Offset of the mask from the line-box top-left.
    pub fn origin(&self) -> (i32, i32) {
        self.origin
    }

    /// Layout metrics of the source text.
    pub fn metrics(&self) -> TextMetrics {
        self.metrics
    }

    /// `true` when no pixel has coverage.
    pub fn is_blank(&self) -> bool {
        self.coverage.iter().all(|&c| c == 0)
    }

    /// Bounds of the inked pixels, or `None` for a blank mask.
    pub fn ink_bounds(&self) -> Option<InkBounds> {
        let w = self.width as usize;
        if w == 0 {
            return None;
        }
        let (mut x0, mut y0, mut x1, mut y1) = (usize::MAX, usize::MAX, 0usize, 0usize);
        for (y, row) in self.coverage.chunks_exact(w).enumerate() {
            let Some(first) = row.iter().position(|&c| c > 0) else {
                continue;
            };
            let last = row.iter().rposition(|&c| c > 0).unwrap_or(first);
            x0 = x0.min(first);
            x1 = x1.max(last);
            y0 = y0.min(y);
            y1 = y;
        }
        if x0 == usize::MAX {
            return None;
        }
        Some(InkBounds {
            x: self.origin.0 + x0 as i32,
            y: self.origin.1 + y0 as i32,
            width: (x1 - x0 + 1) as u32,
            height: (y1 - y0 + 1) as u32,
        })
    }

    /// Union of the mask stamped at every offset in `[-radius, radius]²` except `(0, 0)`.
    ///
    /// Overlapping stamps accumulate as `1 - (1 - a)(1 - b)`, the same result as drawing the
    /// glyphs repeatedly with source-over.
    pub fn outlined(&self, radius: u32) -> Self {
        if radius == 0 || self.width == 0 || self.height == 0 {
            return self.clone();
        }
        let r = radius as usize;
        let (w, h) = (self.width as usize, self.height as usize);
        let (ow, oh) = (w + 2 * r, h + 2 * r);
        let mut out = vec![0u8; ow * oh];

        for dy in 0..=2 * r {
            for dx in 0..=2 * r {
                if dx == r && dy == r {
                    continue;
                }
                for (y, row) in self.coverage.chunks_exact(w).enumerate() {
                    let dst_row = &mut out[(y + dy) * ow + dx..(y + dy) * ow + dx + w];
                    for (d, &s) in dst_row.iter_mut().zip(row) {
                        if s == 0 {
                            continue;
                        }
                        let inv = (255 - u16::from(*d)) * (255 - u16::from(s));
                        *d = 255 - ((inv + 127) / 255) as u8;
                    }
                }
            }
        }

        Self {
            width: ow as u32,
            height: oh as u32,
            coverage: out,
            origin: (self.origin.0 - radius as i32, self.origin.1 - radius as i32),
            metrics: self.metrics,
        }
    }
}

/// Stateful helper for building Parley text layouts from font faces.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<()>,
    registered: HashMap<usize, String>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    /// Fresh Parley contexts with no fonts registered.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            registered: HashMap::new(),
        }
    }

    fn family_for(&mut self, face: &FontFace) -> CollageResult<String> {
        let key = Arc::as_ptr(face.data()) as usize;
        if let Some(name) = self.registered.get(&key) {
            return Ok(name.clone());
        }

        let families = self.font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(face.data().as_ref().clone()),
            None,
        );
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| CollageError::font("no font families registered from font bytes"))?;
        let name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| CollageError::font("registered font family has no name"))?
            .to_string();
        self.registered.insert(key, name.clone());
        Ok(name)
    }

    /// Shape and lay out a single unwrapped paragraph.
    pub fn layout_plain(
        &mut self,
        text: &str,
        face: &FontFace,
        size_px: f32,
    ) -> CollageResult<parley::Layout<()>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(CollageError::validation(
                "text size_px must be finite and > 0",
            ));
        }
        let family_name = self.family_for(face)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));

        let mut layout: parley::Layout<()> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }

    /// Advance and line height of `text`; zero when the font has no face.
    pub fn measure(&mut self, text: &str, font: &Font) -> CollageResult<TextMetrics> {
        let Some(face) = font.face() else {
            return Ok(TextMetrics::default());
        };
        let layout = self.layout_plain(text, face, font.size_px())?;
        Ok(metrics_of(&layout))
    }

    /// Render `text` to a coverage mask with the line box anchored at `(0, 0)`.
    ///
    /// A font without a face produces an empty mask.
    pub fn rasterize(&mut self, text: &str, font: &Font) -> CollageResult<TextMask> {
        self.rasterize_clipped(text, font, None)
    }

    /// Like [`rasterize`](Self::rasterize), but only line-box columns in
    /// `[left, left + width)` are rendered when `columns` is set.
    ///
    /// Metrics still describe the whole string; ink outside the window is dropped.
    pub fn rasterize_clipped(
        &mut self,
        text: &str,
        font: &Font,
        columns: Option<(i32, u32)>,
    ) -> CollageResult<TextMask> {
        let Some(face) = font.face() else {
            return Ok(TextMask::empty());
        };
        if text.is_empty() {
            return Ok(TextMask::empty());
        }
        let layout = self.layout_plain(text, face, font.size_px())?;
        let metrics = metrics_of(&layout);

        // Room for glyphs that overhang their advance or the line box.
        let pad = (font.size_px() * 0.25).ceil().max(2.0) as u32;
        let full_width = metrics.advance.ceil().max(0.0) as u32;
        let (left, span) = match columns {
            Some((left, width)) => {
                let start = left.max(0);
                let end = i64::from(left) + i64::from(width);
                let end = end.min(i64::from(full_width)).max(i64::from(start));
                (start, (end - i64::from(start)) as u32)
            }
            None => (0, full_width),
        };
        let width = span.saturating_add(2 * pad);
        let height = (metrics.line_height.ceil().max(0.0) as u32).saturating_add(2 * pad);

        let font_data = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(face.data().as_ref().clone()),
            face.index(),
        );
        let coverage = rasterize_coverage(width, height, |ctx| {
            ctx.set_transform(vello_cpu::kurbo::Affine::translate((
                f64::from(pad) - f64::from(left),
                f64::from(pad),
            )));
            for line in layout.lines() {
                for item in line.items() {
                    let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                        continue;
                    };
                    let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    });
                    ctx.glyph_run(&font_data)
                        .font_size(run.run().font_size())
                        .fill_glyphs(glyphs);
                }
            }
        })?;

        TextMask::from_coverage(
            width,
            height,
            coverage,
            (left - pad as i32, -(pad as i32)),
            metrics,
        )
    }
}

fn metrics_of(layout: &parley::Layout<()>) -> TextMetrics {
    let mut advance = 0.0f32;
    let mut line_height = 0.0f32;
    for line in layout.lines() {
        let m = line.metrics();
        advance = advance.max(m.advance);
        line_height += m.ascent + m.descent + m.leading;
    }
    TextMetrics {
        advance,
        line_height,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/layout.rs"]
mod tests;
