use std::ops::Range;

use crate::PixelSize;
use crate::color::Color;
use crate::coords::Point;
use crate::grid::Grid;
use crate::surface::Surface;
use crate::theme::ColorCache;

/// Pixel size of a cell in the default configuration.
pub const DEFAULT_CELL_SIZE: PixelSize = 20;

/// Blank pixels left between neighboring cells.
pub const DEFAULT_GAP: PixelSize = 1;

/// How cells map onto pixels. Shared by the background and the block overlay so that both line
/// up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellGeometry {
    /// Distance between the top-left corners of neighboring cells
    pub cell_size: PixelSize,

    /// Cells are drawn as squares of side `cell_size - gap`
    pub gap: PixelSize,

    /// Fine alignment correction added to every drawn cell
    pub global_offset: Point,
}

impl Default for CellGeometry {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            gap: DEFAULT_GAP,
            global_offset: Point::new(0f64, 0f64),
        }
    }
}

impl CellGeometry {
    pub fn with_cell_size(self, cell_size: PixelSize) -> Self {
        Self { cell_size, ..self }
    }

    /// Side of the square painted for one cell.
    pub fn square(&self) -> PixelSize {
        self.cell_size.saturating_sub(self.gap)
    }

    /// Device pixel of the top-left corner of a cell whose unrounded corner is `(x, y)`.
    ///
    /// Rounding here, and only here, keeps neighboring cells from bleeding into each other through
    /// anti-aliased fractional edges.
    fn snap(&self, x: f64, y: f64) -> (i32, i32) {
        let x = (x + self.global_offset.x).round() as i32;
        let y = (y + self.global_offset.y).round() as i32;

        (x, y)
    }
}

/// Colors for one paint of the background grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPaint {
    pub background: Color,
    pub cell: Color,

    /// Opacity of the live cells only. The background is always opaque.
    pub cell_alpha: f64,
}

impl From<&ColorCache> for GridPaint {
    fn from(colors: &ColorCache) -> Self {
        Self {
            background: colors.background,
            cell: colors.cell,
            cell_alpha: colors.cell_alpha,
        }
    }
}

/// The rows and columns of `grid` that can overlap a `width x height` surface when the surface's
/// top-left corner sits `offset` pixels into the grid. Always within the grid's bounds, whatever
/// the sign of `offset`.
pub fn visible_window(
    grid: &Grid,
    geometry: &CellGeometry,
    offset: (i64, i64),
    width: PixelSize,
    height: PixelSize,
) -> (Range<usize>, Range<usize>) {
    let cs = geometry.cell_size as f64;

    let span = |offset: i64, shift: f64, len: PixelSize, cells: usize| {
        let start = offset as f64 - shift;
        let first = (start / cs).floor().clamp(0f64, cells as f64) as usize;
        let last = ((start + len as f64) / cs).ceil().clamp(0f64, cells as f64) as usize;

        first..last.max(first)
    };

    let rows = span(offset.1, geometry.global_offset.y, height, grid.rows());
    let cols = span(offset.0, geometry.global_offset.x, width, grid.cols());

    (rows, cols)
}

/// Paints the background and every live cell of `grid` that can be seen.
///
/// Cell `(row, col)` lands at `(col * cell_size - offset_x, row * cell_size - offset_y)` plus the
/// geometry's global offset. The surface's alpha is back at `1` when this returns.
pub fn render_grid<S: Surface + ?Sized>(
    surface: &mut S,
    grid: &Grid,
    paint: &GridPaint,
    geometry: &CellGeometry,
    offset_x: i64,
    offset_y: i64,
) {
    assert!(geometry.cell_size > 0, "cell size must be positive");

    surface.clear();
    surface.set_alpha(1f64);
    surface.set_fill(paint.background);
    surface.fill_all();

    let (width, height) = (surface.width(), surface.height());
    let (rows, cols) = visible_window(grid, geometry, (offset_x, offset_y), width, height);

    let cs = geometry.cell_size as i64;
    let side = geometry.square();

    surface.set_fill(paint.cell);
    surface.set_alpha(paint.cell_alpha);

    for row in rows {
        let line = grid.row(row);
        let y = (row as i64 * cs - offset_y) as f64;

        for col in cols.clone() {
            if !line[col] {
                continue;
            }

            let x = (col as i64 * cs - offset_x) as f64;
            let (x, y) = geometry.snap(x, y);

            surface.fill_rect(x, y, side, side);
        }
    }

    surface.set_alpha(1f64);
}

/// Paints a single opaque cell-sized square with its unrounded top-left corner at `at`.
pub fn render_block<S: Surface + ?Sized>(
    surface: &mut S,
    at: Point,
    color: Color,
    geometry: &CellGeometry,
) {
    let (x, y) = geometry.snap(at.x, at.y);
    let side = geometry.square();

    surface.set_alpha(1f64);
    surface.set_fill(color);
    surface.fill_rect(x, y, side, side);
}
