use image::{RgbaImage, imageops};

use crate::foundation::core::{CanvasSize, Surface};
use crate::imaging::composite::paste;
use crate::imaging::resize::resize_exact;

/// Scale `source` uniformly until it covers `canvas`, then center-crop to exactly that size.
///
/// No letterboxing and no aspect distortion: the scale is `max(W/w, H/h)`, so one axis may
/// overflow and gets cropped. Only the centered window of `W/scale`x`H/scale` source pixels is
/// resampled. An empty source yields a transparent surface.
pub fn fit_cover(canvas: CanvasSize, source: &RgbaImage) -> Surface {
    let (sw, sh) = source.dimensions();
    if sw == 0 || sh == 0 {
        return Surface::new(canvas.width, canvas.height);
    }
    let (w, h) = (f64::from(canvas.width), f64::from(canvas.height));
    let scale = (w / f64::from(sw)).max(h / f64::from(sh));
    // Crop the visible source window first so thin sources never scale up as a whole.
    let win_w = ((w / scale).round() as u32).clamp(1, sw);
    let win_h = ((h / scale).round() as u32).clamp(1, sh);
    let fx = (sw - win_w) / 2;
    let fy = (sh - win_h) / 2;

    let window = imageops::crop_imm(source, fx, fy, win_w, win_h).to_image();
    resize_exact(
        &Surface::from_rgba_image(&window),
        canvas.width,
        canvas.height,
    )
}

/// Composite a cover-fitted background over `base`; `None` leaves `base` untouched.
pub fn apply_cover_background(base: &mut Surface, source: Option<&RgbaImage>) {
    let Some(source) = source else {
        return;
    };
    let canvas = CanvasSize::new(base.width(), base.height());
    let fitted = fit_cover(canvas, source);
    paste(base, &fitted, 0, 0);
}

#[cfg(test)]
#[path = "../../tests/unit/imaging/cover.rs"]
mod tests;
