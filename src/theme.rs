//! Themes and the resolved-color cache.
//!
//! Colors are looked up by name from a [`ColorSource`] once, then read from a [`ColorCache`] at
//! paint time. The cache is only refreshed when the owner of the theme pushes a change
//! notification, never per frame.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use tracing::warn;

use crate::color::Color;

/// Opacity of live cells drawn over the background.
pub const DEFAULT_CELL_ALPHA: f64 = 0.15;

/// Logical color names the renderer paints with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorName {
    Background,
    Cell,
    Block,
}

impl ColorName {
    pub const ALL: [ColorName; 3] = [ColorName::Background, ColorName::Cell, ColorName::Block];
}

impl fmt::Display for ColorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColorName::Background => "background",
            ColorName::Cell => "cell",
            ColorName::Block => "block",
        };

        f.write_str(name)
    }
}

/// Anything that can resolve the active theme's colors on demand.
pub trait ColorSource {
    /// The color currently bound to `name`, if the source defines one.
    fn resolve(&self, name: ColorName) -> Option<Color>;

    /// Opacity of live cells.
    fn cell_alpha(&self) -> f64 {
        DEFAULT_CELL_ALPHA
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggle(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl ColorSource for Theme {
    fn resolve(&self, name: ColorName) -> Option<Color> {
        let color = match (self, name) {
            (Theme::Light, ColorName::Background) => Color::rgb(0xfa, 0xf8, 0xf5),
            (Theme::Light, ColorName::Cell) => Color::rgb(0x4a, 0x55, 0x68),
            (Theme::Light, ColorName::Block) => Color::rgb(0x2d, 0x37, 0x48),
            (Theme::Dark, ColorName::Background) => Color::rgb(0x12, 0x14, 0x18),
            (Theme::Dark, ColorName::Cell) => Color::rgb(0xa0, 0xae, 0xc0),
            (Theme::Dark, ColorName::Block) => Color::rgb(0xe2, 0xe8, 0xf0),
        };

        Some(color)
    }
}

/// A theme shared between the component that toggles it and the components that paint with it.
///
/// Everything runs on one thread, so a `Cell` is enough. Flipping the theme does not repaint
/// anything by itself; the owner must also notify the painters.
#[derive(Debug, Clone, Default)]
pub struct SharedTheme(Rc<Cell<Theme>>);

impl SharedTheme {
    pub fn new(theme: Theme) -> Self {
        Self(Rc::new(Cell::new(theme)))
    }

    pub fn get(&self) -> Theme {
        self.0.get()
    }

    pub fn set(&self, theme: Theme) {
        self.0.set(theme);
    }

    /// Flips between light and dark, returning the new theme.
    pub fn toggle(&self) -> Theme {
        let theme = self.get().toggle();
        self.set(theme);
        theme
    }
}

impl ColorSource for SharedTheme {
    fn resolve(&self, name: ColorName) -> Option<Color> {
        self.get().resolve(name)
    }
}

/// Colors resolved from a [`ColorSource`], cached until the next [`ColorCache::refresh`].
pub struct ColorCache {
    source: Box<dyn ColorSource>,

    pub background: Color,
    pub cell: Color,
    pub block: Color,
    pub cell_alpha: f64,
}

impl ColorCache {
    /// Colors used when the source leaves a name unresolved.
    const FALLBACK_BACKGROUND: Color = Color::WHITE;
    const FALLBACK_INK: Color = Color::BLACK;

    pub fn new(source: impl ColorSource + 'static) -> Self {
        let mut cache = Self {
            source: Box::new(source),
            background: Self::FALLBACK_BACKGROUND,
            cell: Self::FALLBACK_INK,
            block: Self::FALLBACK_INK,
            cell_alpha: DEFAULT_CELL_ALPHA,
        };

        cache.refresh();
        cache
    }

    /// Re-resolves every color from the source.
    pub fn refresh(&mut self) {
        self.background = self.lookup(ColorName::Background, Self::FALLBACK_BACKGROUND);
        self.cell = self.lookup(ColorName::Cell, Self::FALLBACK_INK);
        self.block = self.lookup(ColorName::Block, Self::FALLBACK_INK);

        let alpha = self.source.cell_alpha();
        self.cell_alpha = if alpha.is_nan() {
            warn!("Cell opacity is NaN. Using the default");
            DEFAULT_CELL_ALPHA
        } else if (0f64..=1f64).contains(&alpha) {
            alpha
        } else {
            warn!(alpha, "Cell opacity out of range. Clamping into [0, 1]");
            alpha.clamp(0f64, 1f64)
        };
    }

    pub fn get(&self, name: ColorName) -> Color {
        match name {
            ColorName::Background => self.background,
            ColorName::Cell => self.cell,
            ColorName::Block => self.block,
        }
    }

    fn lookup(&self, name: ColorName, fallback: Color) -> Color {
        self.source.resolve(name).unwrap_or_else(|| {
            warn!(%name, %fallback, "Color is not defined by the theme. Using fallback");
            fallback
        })
    }
}

impl fmt::Debug for ColorCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColorCache")
            .field("background", &self.background)
            .field("cell", &self.cell)
            .field("block", &self.block)
            .field("cell_alpha", &self.cell_alpha)
            .finish_non_exhaustive()
    }
}
