use crate::foundation::core::{Rgba8, Surface};
use crate::foundation::math::mul_div255_u8;

/// One premultiplied RGBA8 pixel.
pub type PremulRgba8 = [u8; 4];

/// Source-over for premultiplied pixels with an extra opacity factor.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255_u8(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// Paste `src` over `dst` with its top-left corner at `(x, y)`, using `src` alpha as the mask.
///
/// Positions may be negative or run past the far edges; the overlap is clipped.
pub fn paste(dst: &mut Surface, src: &Surface, x: i32, y: i32) {
    let Some(clip) = Clip::new(dst, src.width(), src.height(), x, y) else {
        return;
    };
    let dst_w = dst.width() as usize;
    let src_w = src.width() as usize;
    let src_data = src.data();
    let dst_data = dst.data_mut();
    for row in 0..clip.rows {
        let sy = clip.src_y + row;
        let dy = clip.dst_y + row;
        for col in 0..clip.cols {
            let si = (sy * src_w + clip.src_x + col) * 4;
            let di = (dy * dst_w + clip.dst_x + col) * 4;
            let s = [
                src_data[si],
                src_data[si + 1],
                src_data[si + 2],
                src_data[si + 3],
            ];
            if s[3] == 0 {
                continue;
            }
            let d = [
                dst_data[di],
                dst_data[di + 1],
                dst_data[di + 2],
                dst_data[di + 3],
            ];
            dst_data[di..di + 4].copy_from_slice(&over(d, s, 1.0));
        }
    }
}

/// Stamp a single color through an 8-bit coverage mask with its top-left corner at `(x, y)`.
pub fn stamp_coverage(
    dst: &mut Surface,
    coverage: &[u8],
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    color: Rgba8,
) {
    if coverage.len() != width as usize * height as usize || color.a == 0 {
        return;
    }
    let Some(clip) = Clip::new(dst, width, height, x, y) else {
        return;
    };
    let base = color.premul();
    let dst_w = dst.width() as usize;
    let mask_w = width as usize;
    let dst_data = dst.data_mut();
    for row in 0..clip.rows {
        let my = clip.src_y + row;
        let dy = clip.dst_y + row;
        for col in 0..clip.cols {
            let c = coverage[my * mask_w + clip.src_x + col];
            if c == 0 {
                continue;
            }
            let c = u16::from(c);
            let s = [
                mul_div255_u8(u16::from(base[0]), c),
                mul_div255_u8(u16::from(base[1]), c),
                mul_div255_u8(u16::from(base[2]), c),
                mul_div255_u8(u16::from(base[3]), c),
            ];
            let di = (dy * dst_w + clip.dst_x + col) * 4;
            let d = [
                dst_data[di],
                dst_data[di + 1],
                dst_data[di + 2],
                dst_data[di + 3],
            ];
            dst_data[di..di + 4].copy_from_slice(&over(d, s, 1.0));
        }
    }
}

/// Overlap between a `w`x`h` source placed at `(x, y)` and the destination bounds.
struct Clip {
    src_x: usize,
    src_y: usize,
    dst_x: usize,
    dst_y: usize,
    cols: usize,
    rows: usize,
}

impl Clip {
    fn new(dst: &Surface, w: u32, h: u32, x: i32, y: i32) -> Option<Self> {
        let (x, y) = (i64::from(x), i64::from(y));
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + i64::from(w)).min(i64::from(dst.width()));
        let y1 = (y + i64::from(h)).min(i64::from(dst.height()));
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some(Self {
            src_x: (x0 - x) as usize,
            src_y: (y0 - y) as usize,
            dst_x: x0 as usize,
            dst_y: y0 as usize,
            cols: (x1 - x0) as usize,
            rows: (y1 - y0) as usize,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/imaging/composite.rs"]
mod tests;
