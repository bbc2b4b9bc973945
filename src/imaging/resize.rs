use image::imageops::{self, FilterType};

use crate::foundation::core::Surface;

/// Resize to exactly `width`x`height` with Lanczos3, filtering in premultiplied space.
///
/// Always returns a new surface; zero-sized targets yield an empty surface.
pub fn resize_exact(src: &Surface, width: u32, height: u32) -> Surface {
    if width == 0 || height == 0 || src.width() == 0 || src.height() == 0 {
        return Surface::new(width, height);
    }
    if src.width() == width && src.height() == height {
        return src.clone();
    }
    let premul = src.clone().into_premul_image();
    let resized = imageops::resize(&premul, width, height, FilterType::Lanczos3);
    let mut out = Surface::from_premul_image(resized);
    clamp_premul(out.data_mut());
    out
}

// Lanczos lobes can overshoot; color channels must stay <= alpha.
fn clamp_premul(data: &mut [u8]) {
    for px in data.chunks_exact_mut(4) {
        let a = px[3];
        for c in &mut px[..3] {
            *c = (*c).min(a);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/imaging/resize.rs"]
mod tests;
