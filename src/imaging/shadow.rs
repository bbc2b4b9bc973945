use crate::foundation::core::{Rgba8, Surface};
use crate::foundation::error::CollageResult;
use crate::imaging::blur::gaussian_blur;
use crate::imaging::composite::{paste, stamp_coverage};

/// Soft rectangular drop shadow cast by slot tiles.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DropShadow {
    /// Shift of the shadow relative to the tile, in pixels.
    pub offset: i32,
    /// Gaussian standard deviation in pixels.
    pub blur: f32,
    /// Transparent margin around the shadow layer so the blur can fall off.
    pub pad: u32,
    /// Inset of the shadow rectangle inside the layer.
    pub inset: u32,
    /// Shadow opacity.
    pub alpha: u8,
}

impl Default for DropShadow {
    fn default() -> Self {
        Self {
            offset: 15,
            blur: 10.0,
            pad: 20,
            inset: 15,
            alpha: 140,
        }
    }
}

impl DropShadow {
    /// Blurred shadow coverage for a `w`x`h` tile; the layer is `(w + 2*pad)`x`(h + 2*pad)`.
    pub fn layer(&self, w: u32, h: u32) -> CollageResult<(u32, u32, Vec<u8>)> {
        let lw = w + 2 * self.pad;
        let lh = h + 2 * self.pad;
        let mut coverage = vec![0u8; lw as usize * lh as usize];
        for y in self.inset..(self.inset + h).min(lh) {
            let row = y as usize * lw as usize;
            let x0 = self.inset.min(lw) as usize;
            let x1 = (self.inset + w).min(lw) as usize;
            coverage[row + x0..row + x1].fill(255);
        }
        let blurred = gaussian_blur(&coverage, lw, lh, 1, self.blur)?;
        Ok((lw, lh, blurred))
    }

    /// Top-left of the shadow layer for a tile pasted at `(x, y)`.
    pub fn layer_origin(&self, x: i32, y: i32) -> (i32, i32) {
        (x - self.pad as i32 + self.offset, y + self.offset)
    }
}

/// Paste `tile` at `(x, y)` on top of a freshly synthesized drop shadow.
pub fn paste_with_shadow(
    base: &mut Surface,
    tile: &Surface,
    x: i32,
    y: i32,
    shadow: &DropShadow,
) -> CollageResult<()> {
    let (lw, lh, coverage) = shadow.layer(tile.width(), tile.height())?;
    let (sx, sy) = shadow.layer_origin(x, y);
    stamp_coverage(
        base,
        &coverage,
        lw,
        lh,
        sx,
        sy,
        Rgba8::BLACK.with_alpha(shadow.alpha),
    );
    paste(base, tile, x, y);
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/imaging/shadow.rs"]
mod tests;
