//! Shape masking for slot tiles.

use image::RgbaImage;
use kurbo::Shape as _;

use crate::foundation::core::Surface;
use crate::foundation::error::CollageResult;
use crate::foundation::math::mul_div255_u8;
use crate::imaging::composite::paste;
use crate::imaging::raster::{bezpath_to_cpu, rasterize_coverage};
use crate::imaging::resize::resize_exact;

/// Geometric mask applied to every slot tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageShape {
    /// Plain square, no mask.
    Square,
    /// Rounded rectangle.
    #[default]
    Rounded,
    /// Circle inscribed in the tile.
    Circle,
}

impl ImageShape {
    /// Stable lowercase name.
    pub fn key(self) -> &'static str {
        match self {
            Self::Square => "square",
            Self::Rounded => "rounded",
            Self::Circle => "circle",
        }
    }
}

impl std::str::FromStr for ImageShape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "square" => Ok(Self::Square),
            "rounded" => Ok(Self::Rounded),
            "circle" => Ok(Self::Circle),
            other => Err(format!(
                "unknown image shape '{other}' (expected square, rounded or circle)"
            )),
        }
    }
}

/// Fit `src` inside a `side`x`side` square without cropping, centered on a transparent margin.
pub fn pad_to_square(src: &Surface, side: u32) -> Surface {
    let mut out = Surface::new(side, side);
    if side == 0 || src.width() == 0 || src.height() == 0 {
        return out;
    }
    let scale = (f64::from(side) / f64::from(src.width()))
        .min(f64::from(side) / f64::from(src.height()));
    let w = ((f64::from(src.width()) * scale).round() as u32).clamp(1, side);
    let h = ((f64::from(src.height()) * scale).round() as u32).clamp(1, side);
    let fitted = resize_exact(src, w, h);
    paste(
        &mut out,
        &fitted,
        ((side - w) / 2) as i32,
        ((side - h) / 2) as i32,
    );
    out
}

/// Pad `image` to a `side`x`side` tile and mask it with `shape`.
///
/// `corner_radius` only matters for [`ImageShape::Rounded`]; it is clamped to half the side, so
/// oversized radii degrade to a circle-like mask.
pub fn apply_shape(
    image: &RgbaImage,
    shape: ImageShape,
    side: u32,
    corner_radius: f32,
) -> CollageResult<Surface> {
    let mut tile = pad_to_square(&Surface::from_rgba_image(image), side);
    if let Some(mask) = shape_mask(shape, side, corner_radius)? {
        apply_mask(&mut tile, &mask);
    }
    Ok(tile)
}

/// Anti-aliased coverage of `shape` over a `side`x`side` tile; `None` for squares.
pub fn shape_mask(
    shape: ImageShape,
    side: u32,
    corner_radius: f32,
) -> CollageResult<Option<Vec<u8>>> {
    let s = f64::from(side);
    let path = match shape {
        ImageShape::Square => return Ok(None),
        ImageShape::Circle => kurbo::Ellipse::from_rect(kurbo::Rect::new(0.0, 0.0, s, s))
            .to_path(0.1),
        ImageShape::Rounded => {
            let r = f64::from(corner_radius.max(0.0)).min(s / 2.0);
            kurbo::RoundedRect::new(0.0, 0.0, s, s, r).to_path(0.1)
        }
    };
    let cpu_path = bezpath_to_cpu(&path);
    let mask = rasterize_coverage(side, side, |ctx| ctx.fill_path(&cpu_path))?;
    Ok(Some(mask))
}

/// Multiply every pixel (premultiplied, so all four channels) by the mask coverage.
fn apply_mask(tile: &mut Surface, mask: &[u8]) {
    for (px, &m) in tile.data_mut().chunks_exact_mut(4).zip(mask) {
        if m == 255 {
            continue;
        }
        for c in px.iter_mut() {
            *c = mul_div255_u8(u16::from(*c), u16::from(m));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/imaging/shape.rs"]
mod tests;
