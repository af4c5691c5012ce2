//! Static blocks drawn on top of the animated background.
//!
//! Blocks are placed in whole cells relative to an anchor point, usually the center of some
//! element in the foreground, and snap to the same lattice the background uses.

use tracing::debug;
use tracing::trace;

use crate::PixelSize;
use crate::coords::Point;
use crate::coords::compute_grid_origin;
use crate::coords::grid_to_pixel;
use crate::render::CellGeometry;
use crate::render::render_block;
use crate::surface::Surface;
use crate::theme::ColorCache;

/// Position of one block, in cells, relative to the anchor's cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockOffset {
    pub x: i32,
    pub y: i32,
}

impl BlockOffset {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Four small brackets around the anchor, above and below it, and a short bar on either side.
pub const DEFAULT_BLOCKS: [BlockOffset; 26] = [
    // top left
    BlockOffset::new(-9, -6),
    BlockOffset::new(-8, -6),
    BlockOffset::new(-7, -6),
    BlockOffset::new(-9, -5),
    BlockOffset::new(-7, -5),
    // top right
    BlockOffset::new(7, -6),
    BlockOffset::new(8, -6),
    BlockOffset::new(9, -6),
    BlockOffset::new(7, -5),
    BlockOffset::new(9, -5),
    // bottom left
    BlockOffset::new(-9, 5),
    BlockOffset::new(-8, 5),
    BlockOffset::new(-7, 5),
    BlockOffset::new(-9, 6),
    BlockOffset::new(-7, 6),
    // bottom right
    BlockOffset::new(7, 5),
    BlockOffset::new(8, 5),
    BlockOffset::new(9, 5),
    BlockOffset::new(7, 6),
    BlockOffset::new(9, 6),
    // sides
    BlockOffset::new(-10, -1),
    BlockOffset::new(-10, 0),
    BlockOffset::new(-10, 1),
    BlockOffset::new(10, -1),
    BlockOffset::new(10, 0),
    BlockOffset::new(10, 1),
];

pub struct BlockOverlay {
    blocks: Vec<BlockOffset>,

    /// Pixel position the blocks are laid out around. Nothing is drawn until it is known.
    anchor: Option<Point>,

    geometry: CellGeometry,
    viewport: (PixelSize, PixelSize),
    colors: ColorCache,

    /// Set when something changed since the last draw
    dirty: bool,
}

impl BlockOverlay {
    pub fn new(colors: ColorCache, geometry: CellGeometry) -> Self {
        Self {
            blocks: DEFAULT_BLOCKS.to_vec(),
            anchor: None,
            geometry,
            viewport: (0, 0),
            colors,
            dirty: true,
        }
    }

    pub fn with_blocks(mut self, blocks: impl Into<Vec<BlockOffset>>) -> Self {
        self.blocks = blocks.into();
        self
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn set_blocks(&mut self, blocks: impl Into<Vec<BlockOffset>>) {
        self.blocks = blocks.into();
        self.dirty = true;
    }

    pub fn set_anchor(&mut self, anchor: Point) {
        if self.anchor != Some(anchor) {
            self.anchor = Some(anchor);
            self.dirty = true;
        }
    }

    pub fn set_cell_size(&mut self, cell_size: PixelSize) {
        if self.geometry.cell_size != cell_size {
            self.geometry = self.geometry.with_cell_size(cell_size);
            self.dirty = true;
        }
    }

    pub fn set_viewport(&mut self, width: PixelSize, height: PixelSize) {
        if self.viewport != (width, height) {
            self.viewport = (width, height);
            self.dirty = true;
        }
    }

    /// Unrounded top-left corner of every block, in pixels.
    ///
    /// Empty until an anchor is set.
    pub fn block_positions(&self) -> Vec<Point> {
        let Some(anchor) = self.anchor else {
            return Vec::new();
        };

        let cs = self.geometry.cell_size;
        let origin = compute_grid_origin(anchor, cs);

        self.blocks
            .iter()
            .map(|b| origin.offset(grid_to_pixel(b.x, cs), grid_to_pixel(b.y, cs)))
            .collect()
    }

    /// Clears `surface` and paints every block. Returns whether anything was drawn.
    ///
    /// A zero-width viewport means the surface has not been laid out yet; nothing is touched.
    pub fn draw<S: Surface + ?Sized>(&mut self, surface: &mut S) -> bool {
        if self.viewport.0 == 0 {
            trace!("Overlay viewport has no width. Skipping draw");
            return false;
        }

        surface.clear();

        let positions = self.block_positions();
        for &at in &positions {
            render_block(surface, at, self.colors.block, &self.geometry);
        }

        self.dirty = false;
        !positions.is_empty()
    }

    /// Like [`BlockOverlay::draw`], but only if something changed since the last draw.
    pub fn draw_if_dirty<S: Surface + ?Sized>(&mut self, surface: &mut S) -> bool {
        self.dirty && self.draw(surface)
    }

    /// Picks up the new block color and redraws right away.
    pub fn on_theme_changed<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        self.colors.refresh();
        debug!(block = %self.colors.block, "Overlay theme changed");

        self.dirty = true;
        self.draw(surface);
    }
}
