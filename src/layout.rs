//! Slot placement tables keyed by slot count.

use crate::foundation::core::CanvasSize;

/// Normalized slot placement: center `(x, y)` and side `size`.
///
/// `x` and `size` are fractions of canvas width, `y` a fraction of canvas height.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SlotPlacement {
    /// Horizontal center.
    pub x: f64,
    /// Vertical center.
    pub y: f64,
    /// Tile side.
    pub size: f64,
}

/// A slot placement in pixels for a concrete canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotRect {
    /// Horizontal center.
    pub center_x: i32,
    /// Vertical center.
    pub center_y: i32,
    /// Tile side.
    pub side: u32,
    /// Left edge of the tile.
    pub left: i32,
    /// Top edge of the tile.
    pub top: i32,
}

const fn at(x: f64, y: f64, size: f64) -> SlotPlacement {
    SlotPlacement { x, y, size }
}

const TWO: [SlotPlacement; 2] = [at(0.30, 0.45, 0.35), at(0.70, 0.45, 0.35)];

const THREE: [SlotPlacement; 3] = [
    at(0.30, 0.35, 0.28),
    at(0.70, 0.35, 0.28),
    at(0.50, 0.65, 0.28),
];

const FOUR: [SlotPlacement; 4] = [
    at(0.28, 0.38, 0.25),
    at(0.72, 0.38, 0.25),
    at(0.28, 0.68, 0.25),
    at(0.72, 0.68, 0.25),
];

/// Slot counts with a dedicated table.
pub const SUPPORTED_SLOT_COUNTS: [usize; 3] = [2, 3, 4];

/// Placements for `n` slots; slot `i` binds to element `i`.
///
/// Counts without a dedicated table get the 4-slot table.
pub fn positions_for(n: usize) -> &'static [SlotPlacement] {
    match n {
        2 => &TWO,
        3 => &THREE,
        4 => &FOUR,
        _ => {
            tracing::debug!(n, "no layout for slot count, using the 4-slot table");
            &FOUR
        }
    }
}

impl SlotPlacement {
    /// Pixel geometry on `canvas`, truncating like integer casts.
    pub fn to_pixels(&self, canvas: CanvasSize) -> SlotRect {
        let w = f64::from(canvas.width);
        let h = f64::from(canvas.height);
        let side = (w * self.size).max(0.0) as u32;
        let center_x = (w * self.x) as i32;
        let center_y = (h * self.y) as i32;
        let half = (side / 2) as i32;
        SlotRect {
            center_x,
            center_y,
            side,
            left: center_x - half,
            top: center_y - half,
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/layout.rs"]
mod tests;
