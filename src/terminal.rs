//! Presents pixel canvases in a terminal as braille characters.
//!
//! Every character cell holds a 2x4 block of dots, and every dot stands for one canvas pixel.

use crossterm::style;

use crate::PixelSize;
use crate::color::Color;
use crate::surface::PixelCanvas;
use crate::surface::Surface;

/// Hex values of braille dots
///
/// ```text
///  1   8
///  2  10
///  4  20
/// 40  80
/// ```
///
/// Where the base blank pattern is codepoint `0x2800` (or U+2800)
///
/// To get other configurations, just add the numbers above.
const BRAILLE_EMPTY: u32 = 0x2800;

pub struct BrailleFrame {
    /// The frame buffer
    fb: String,

    /// Codepoints. This allows us to construct the framebuffer more easily
    cp: Vec<u32>,

    /// Width in dots
    w: usize,

    /// Height in dots
    h: usize,
}

impl BrailleFrame {
    /// A frame filling `cols x rows` terminal characters.
    pub fn new(cols: u16, rows: u16) -> Self {
        let mut frame = Self {
            fb: String::new(),
            cp: Vec::new(),
            w: 0,
            h: 0,
        };

        frame.resize(cols, rows);
        frame
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        let (bw, bh) = (cols as usize, rows as usize);

        self.w = bw * 2;
        self.h = bh * 4;
        self.cp = vec![BRAILLE_EMPTY; bw * bh];

        // Each braille character is 3 bytes, and newlines one byte
        self.fb = String::with_capacity(3 * (bw * bh) + bh);
    }

    /// Size of the canvases this frame expects, in pixels.
    pub fn dots(&self) -> (PixelSize, PixelSize) {
        (self.w as PixelSize, self.h as PixelSize)
    }

    /// Composes `layers` into braille. A dot is raised where any layer has a visible pixel that
    /// differs from `background`.
    ///
    /// Layers smaller than the frame only cover its top-left corner.
    pub fn render<'a>(
        &mut self,
        layers: impl IntoIterator<Item = &'a PixelCanvas>,
        background: Color,
    ) -> &str {
        let bw = self.w / 2;

        self.cp.fill(BRAILLE_EMPTY);

        for layer in layers {
            let lw = layer.width() as usize;
            let (w, h) = (self.w.min(lw), self.h.min(layer.height() as usize));

            for (n, &px) in layer.pixels().iter().enumerate() {
                let (x, y) = (n % lw, n / lw);
                if y >= h {
                    break;
                }

                if x >= w || px.a == 0 || px == background {
                    continue;
                }

                // `|` so that a dot raised by two layers is only counted once
                self.cp[(y / 4) * bw + (x / 2)] |= Self::get_hex_value(x, y);
            }
        }

        self.fb.clear();

        for (i, &c) in self.cp.iter().enumerate() {
            if i > 0 && i % bw == 0 {
                self.fb.push('\n');
            }

            self.fb.push(char::from_u32(c).unwrap_or(' '));
        }
        self.fb.push('\n');

        &self.fb
    }

    fn get_hex_value(x: usize, y: usize) -> u32 {
        match (x % 2, y % 4) {
            (0, 0) => 0x1,
            (1, 0) => 0x8,
            (0, 1) => 0x2,
            (1, 1) => 0x10,
            (0, 2) => 0x4,
            (1, 2) => 0x20,
            (0, 3) => 0x40,
            (1, 3) => 0x80,
            _ => unreachable!(),
        }
    }
}

impl From<Color> for style::Color {
    fn from(color: Color) -> Self {
        style::Color::Rgb {
            r: color.r,
            g: color.g,
            b: color.b,
        }
    }
}
