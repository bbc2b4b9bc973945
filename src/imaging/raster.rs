//! Coverage rasterization on top of `vello_cpu`.

use crate::foundation::error::{CollageError, CollageResult};

/// Render white fills into a fresh `width`x`height` pixmap and return the alpha plane.
pub(crate) fn rasterize_coverage(
    width: u32,
    height: u32,
    draw: impl FnOnce(&mut vello_cpu::RenderContext),
) -> CollageResult<Vec<u8>> {
    let width_u16: u16 = width
        .try_into()
        .map_err(|_| CollageError::validation("coverage width exceeds u16"))?;
    let height_u16: u16 = height
        .try_into()
        .map_err(|_| CollageError::validation("coverage height exceeds u16"))?;
    if width_u16 == 0 || height_u16 == 0 {
        return Ok(Vec::new());
    }

    let mut ctx = vello_cpu::RenderContext::new(width_u16, height_u16);
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));
    draw(&mut ctx);
    ctx.flush();

    let mut pixmap = vello_cpu::Pixmap::new(width_u16, height_u16);
    ctx.render_to_pixmap(&mut pixmap);
    Ok(pixmap
        .data_as_u8_slice()
        .chunks_exact(4)
        .map(|px| px[3])
        .collect())
}

pub(crate) fn bezpath_to_cpu(path: &kurbo::BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn point_to_cpu(p: kurbo::Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}
