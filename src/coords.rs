//! Conversions between grid cells and pixels.
//!
//! Grid coordinates are signed whole cells, so that offsets like those of the block overlay can
//! point left of or above an anchor. Pixel coordinates are `f64` and are never rounded here;
//! rounding to device pixels happens once, at paint time.

use core::fmt::Debug;

use crate::PixelSize;

#[derive(Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Point {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl Debug for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Pixel distance covered by `coord` cells.
pub fn grid_to_pixel(coord: i32, cell_size: PixelSize) -> f64 {
    coord as f64 * cell_size as f64
}

/// The cell containing pixel `px`. Pixels left of (or above) zero map to negative cells.
pub fn pixel_to_grid(px: f64, cell_size: PixelSize) -> i32 {
    assert!(cell_size > 0, "cell size must be positive");

    (px / cell_size as f64).floor() as i32
}

/// Top-left corner of cell `(0, 0)` such that the cell's center lands exactly on `anchor`.
pub fn compute_grid_origin(anchor: Point, cell_size: PixelSize) -> Point {
    let half = cell_size as f64 / 2f64;

    anchor.offset(-half, -half)
}

/// Center of the cell whose top-left corner is `origin`.
pub fn cell_center(origin: Point, cell_size: PixelSize) -> Point {
    let half = cell_size as f64 / 2f64;

    origin.offset(half, half)
}
