pub mod buffer;
pub mod color;
pub mod config;
pub mod coords;
pub mod driver;
pub mod grid;
pub mod overlay;
pub mod render;
pub mod rule_set;
pub mod sizing;
pub mod surface;
pub mod terminal;
pub mod theme;

pub type PixelSize = u32;
