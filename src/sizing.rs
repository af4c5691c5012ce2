use crate::PixelSize;

/// The logical grid never has fewer rows or columns than this.
pub const MIN_GRID: usize = 40;

/// The logical grid covers this fraction of the viewport, as `NUM / DEN`, so the pattern keeps
/// evolving a little past every visible edge.
///
/// Kept as an exact ratio: `1600.0 * 1.1 / 32.0` is slightly above 55 in floating point and would
/// ceil to 56.
pub const OVERSCAN_NUM: u64 = 11;
pub const OVERSCAN_DEN: u64 = 10;

/// Shape of the logical grid for a viewport, and where the viewport sits inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDimensions {
    pub rows: usize,
    pub cols: usize,

    /// Pixel distance from the grid's left edge to the viewport's left edge
    pub offset_x: PixelSize,

    /// Pixel distance from the grid's top edge to the viewport's top edge
    pub offset_y: PixelSize,
}

/// Derives the logical grid for a `width x height` pixel viewport.
///
/// `cols = max(MIN_GRID, ceil(width * 1.1 / cell_size))`, likewise for rows, and the viewport is
/// centered inside the grid on whole-cell boundaries.
///
/// # Panics
///
/// If `cell_size` is zero.
pub fn compute_grid_dimensions(
    width: PixelSize,
    height: PixelSize,
    cell_size: PixelSize,
) -> GridDimensions {
    assert!(cell_size > 0, "cell size must be positive");

    let (cols, offset_x) = axis(width, cell_size);
    let (rows, offset_y) = axis(height, cell_size);

    GridDimensions {
        rows,
        cols,
        offset_x,
        offset_y,
    }
}

/// Cell count and centering offset along one axis.
fn axis(len: PixelSize, cell_size: PixelSize) -> (usize, PixelSize) {
    let overscanned = (len as u64 * OVERSCAN_NUM).div_ceil(cell_size as u64 * OVERSCAN_DEN);
    let cells = (overscanned as usize).max(MIN_GRID);

    let visible = len.div_ceil(cell_size) as usize;
    let margin = cells.saturating_sub(visible) / 2;

    (cells, margin as PixelSize * cell_size)
}

#[cfg(test)]
mod test {
    use super::compute_grid_dimensions;
    use super::GridDimensions;
    use super::MIN_GRID;

    #[test]
    fn small_viewport_uses_floor() {
        let dims = compute_grid_dimensions(320, 240, 32);

        assert_eq!(
            dims,
            GridDimensions {
                rows: 40,
                cols: 40,
                // (40 - 10) / 2 * 32 and (40 - 8) / 2 * 32
                offset_x: 480,
                offset_y: 512,
            }
        );
    }

    #[test]
    fn large_viewport_uses_overscan() {
        let dims = compute_grid_dimensions(1600, 1200, 32);

        assert_eq!(dims.cols, 55);
        assert_eq!(dims.rows, 42);
        // (55 - 50) / 2 = 2 cells and (42 - 38) / 2 = 2 cells
        assert_eq!(dims.offset_x, 64);
        assert_eq!(dims.offset_y, 64);
    }

    #[test]
    fn zero_viewport() {
        let dims = compute_grid_dimensions(0, 0, 20);

        assert_eq!((dims.rows, dims.cols), (MIN_GRID, MIN_GRID));
        assert_eq!((dims.offset_x, dims.offset_y), (400, 400));
    }

    #[test]
    #[should_panic(expected = "cell size")]
    fn zero_cell_size() {
        compute_grid_dimensions(100, 100, 0);
    }
}
