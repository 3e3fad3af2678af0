//! Latest-value pointer mailbox shared between the input handler and the frame loop.

use glam::{Vec2, Vec3};
use std::{cell::Cell, rc::Rc};

/// Normalized pointer position in [-1, 1] x [-1, 1], y up.
///
/// Cloning shares the same cell. Only the most recent write is kept; the
/// frame loop reads it once per tick. Everything runs on the render thread,
/// so a `Cell` is all the synchronization needed.
#[derive(Clone, Debug, Default)]
pub struct PointerSignal {
    latest: Rc<Cell<Vec2>>,
}

impl PointerSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an already-normalized position.
    pub fn write(&self, pos: Vec2) {
        self.latest.set(pos);
    }

    /// Normalizes a position given in pixels relative to the top-left corner
    /// of a `width` x `height` surface, flipping y.
    pub fn write_pixels(&self, x: f64, y: f64, width: u32, height: u32) {
        self.write(normalize_pixels(x, y, width, height));
    }

    pub fn read(&self) -> Vec2 {
        self.latest.get()
    }

    /// The pointer embedded in 3D with z = 0.
    pub fn read3(&self) -> Vec3 {
        self.read().extend(0.0)
    }
}

/// `x / w * 2 - 1`, `y / h * -2 + 1`. Zero-sized surfaces are treated as 1px.
pub fn normalize_pixels(x: f64, y: f64, width: u32, height: u32) -> Vec2 {
    let w = width.max(1) as f64;
    let h = height.max(1) as f64;
    Vec2::new((x / w * 2.0 - 1.0) as f32, (y / h * -2.0 + 1.0) as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_map_to_unit_square_with_y_flipped() {
        assert_eq!(normalize_pixels(0.0, 0.0, 800, 600), Vec2::new(-1.0, 1.0));
        assert_eq!(normalize_pixels(800.0, 600.0, 800, 600), Vec2::new(1.0, -1.0));
        assert_eq!(normalize_pixels(400.0, 300.0, 800, 600), Vec2::ZERO);
    }

    #[test]
    fn clones_share_the_latest_value() {
        let writer = PointerSignal::new();
        let reader = writer.clone();
        writer.write(Vec2::new(0.25, -0.5));
        writer.write(Vec2::new(0.5, 0.5));
        assert_eq!(reader.read(), Vec2::new(0.5, 0.5));
        assert_eq!(reader.read3(), Vec3::new(0.5, 0.5, 0.0));
    }
}
