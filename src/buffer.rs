use rand::Rng;

use crate::grid::Grid;
use crate::grid::advance_with;
use crate::rule_set::RuleSet;

/// Two grids of identical shape and a flag saying which one is current.
///
/// Stepping writes the next generation into the other grid and only then flips the flag, so
/// [`DoubleBuffer::current`] never exposes a half-written generation. Nothing is allocated after
/// construction.
pub struct DoubleBuffer {
    a: Grid,
    b: Grid,

    /// `true` while `a` holds the current generation
    a_is_current: bool,
}

impl DoubleBuffer {
    /// Seeds `a` at random and leaves `b` empty, with `a` current.
    pub fn seeded<R: Rng + ?Sized>(rows: usize, cols: usize, density: f64, rng: &mut R) -> Self {
        Self::from_grid(Grid::random(rows, cols, density, rng))
    }

    /// Makes `grid` the current generation and pairs it with an empty grid of the same shape.
    pub fn from_grid(grid: Grid) -> Self {
        let (rows, cols) = grid.shape();

        Self {
            a: grid,
            b: Grid::empty(rows, cols),
            a_is_current: true,
        }
    }

    pub fn current(&self) -> &Grid {
        if self.a_is_current { &self.a } else { &self.b }
    }

    pub fn shape(&self) -> (usize, usize) {
        self.a.shape()
    }

    /// Computes the next generation into the non-current grid, then makes it current.
    pub fn step(&mut self, rules: &RuleSet) {
        let (current, next) = if self.a_is_current {
            (&self.a, &mut self.b)
        } else {
            (&self.b, &mut self.a)
        };

        advance_with(current, next, rules);

        self.a_is_current = !self.a_is_current;
    }

    /// Refills the current grid in place. The flag does not move.
    pub fn reseed_current<R: Rng + ?Sized>(&mut self, density: f64, rng: &mut R) {
        let current = if self.a_is_current {
            &mut self.a
        } else {
            &mut self.b
        };

        current.reseed(density, rng);
    }
}
