//! Drawing surfaces.
//!
//! [`Surface`] is the small slice of a 2D canvas context the renderer needs: a fill color, a
//! global alpha, and axis-aligned rectangle fills. [`PixelCanvas`] implements it in software over
//! an RGBA buffer.

use crate::PixelSize;
use crate::color::Color;

pub trait Surface {
    /// Width of the surface in pixels
    fn width(&self) -> PixelSize;

    /// Height of the surface in pixels
    fn height(&self) -> PixelSize;

    /// Resets every pixel to fully transparent.
    fn clear(&mut self);

    /// Color used by subsequent [`Surface::fill_rect`] calls.
    fn set_fill(&mut self, color: Color);

    /// Opacity in `[0, 1]` applied to subsequent [`Surface::fill_rect`] calls.
    fn set_alpha(&mut self, alpha: f64);

    fn alpha(&self) -> f64;

    /// Fills a `w x h` rectangle whose top-left corner is `(x, y)`. Parts outside the surface are
    /// clipped.
    fn fill_rect(&mut self, x: i32, y: i32, w: PixelSize, h: PixelSize);

    /// Fills the whole surface.
    fn fill_all(&mut self) {
        let (w, h) = (self.width(), self.height());
        self.fill_rect(0, 0, w, h);
    }
}

/// A software RGBA framebuffer.
#[derive(Clone, PartialEq)]
pub struct PixelCanvas {
    /// Row-major pixels
    px: Vec<Color>,

    /// Width of the framebuffer
    w: PixelSize,

    /// Height of the framebuffer
    h: PixelSize,

    fill: Color,
    alpha: f64,
}

impl PixelCanvas {
    pub fn new(w: PixelSize, h: PixelSize) -> Self {
        Self {
            px: vec![Color::TRANSPARENT; w as usize * h as usize],
            w,
            h,
            fill: Color::BLACK,
            alpha: 1f64,
        }
    }

    /// Resizes and clears the canvas, like assigning a canvas element's width and height.
    pub fn resize(&mut self, w: PixelSize, h: PixelSize) {
        self.w = w;
        self.h = h;
        self.px.clear();
        self.px.resize(w as usize * h as usize, Color::TRANSPARENT);
    }

    pub fn pixel(&self, x: PixelSize, y: PixelSize) -> Color {
        assert!(x < self.w, "x is out of bounds");
        assert!(y < self.h, "y is out of bounds");

        self.px[self.xy_from(x, y)]
    }

    pub fn pixels(&self) -> &[Color] {
        &self.px
    }

    fn xy_from(&self, x: PixelSize, y: PixelSize) -> usize {
        y as usize * self.w as usize + x as usize
    }
}

impl Surface for PixelCanvas {
    fn width(&self) -> PixelSize {
        self.w
    }

    fn height(&self) -> PixelSize {
        self.h
    }

    fn clear(&mut self) {
        self.px.fill(Color::TRANSPARENT);
    }

    fn set_fill(&mut self, color: Color) {
        self.fill = color;
    }

    fn set_alpha(&mut self, alpha: f64) {
        self.alpha = alpha.clamp(0f64, 1f64);
    }

    fn alpha(&self) -> f64 {
        self.alpha
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: PixelSize, h: PixelSize) {
        // clip to the framebuffer
        let x0 = (x as i64).clamp(0, self.w as i64);
        let y0 = (y as i64).clamp(0, self.h as i64);
        let x1 = (x as i64 + w as i64).clamp(0, self.w as i64);
        let y1 = (y as i64 + h as i64).clamp(0, self.h as i64);

        let (fill, alpha) = (self.fill, self.alpha);
        let opaque = fill.a == 255 && alpha >= 1f64;

        for y in y0..y1 {
            let row = y as usize * self.w as usize;

            for px in &mut self.px[row + x0 as usize..row + x1 as usize] {
                *px = if opaque { fill } else { fill.over(px, alpha) };
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::PixelCanvas;
    use super::Surface;
    use crate::color::Color;

    #[test]
    fn fill_rect_clips() {
        let mut canvas = PixelCanvas::new(4, 3);
        canvas.set_fill(Color::WHITE);
        canvas.fill_rect(-2, 2, 4, 10);

        let lit: Vec<_> = (0..3)
            .flat_map(|y| (0..4).map(move |x| (x, y)))
            .filter(|&(x, y)| canvas.pixel(x, y) == Color::WHITE)
            .collect();

        assert_eq!(lit, vec![(0, 2), (1, 2)]);
    }

    #[test]
    fn fill_rect_fully_outside() {
        let mut canvas = PixelCanvas::new(4, 4);
        canvas.set_fill(Color::WHITE);
        canvas.fill_rect(10, -20, 3, 3);

        assert!(canvas.pixels().iter().all(|&px| px == Color::TRANSPARENT));
    }

    #[test]
    fn alpha_blends_over_existing_pixels() {
        let mut canvas = PixelCanvas::new(2, 1);
        canvas.set_fill(Color::BLACK);
        canvas.fill_all();

        canvas.set_fill(Color::rgb(200, 0, 100));
        canvas.set_alpha(0.5);
        canvas.fill_rect(0, 0, 1, 1);

        assert_eq!(canvas.pixel(0, 0), Color::rgb(100, 0, 50));
        assert_eq!(canvas.pixel(1, 0), Color::BLACK);
    }

    #[test]
    fn resize_clears() {
        let mut canvas = PixelCanvas::new(2, 2);
        canvas.set_fill(Color::WHITE);
        canvas.fill_all();
        canvas.resize(3, 1);

        assert_eq!((canvas.width(), canvas.height()), (3, 1));
        assert_eq!(canvas.pixels(), &[Color::TRANSPARENT; 3]);
    }
}
