//! Conway's Game of Life on a toroidal lattice.
//!
//! A [`Grid`] has a fixed `rows x cols` shape for its whole lifetime; only the cell values change.
//! There is no boundary: the neighbors of a cell on an edge are taken from the opposite edge.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use thiserror::Error;

use crate::rule_set::RuleSet;
use crate::rule_set::B3S23;

const ALIVE: char = '#';
const DEAD: char = '.';

/// A row-major rectangle of alive/dead cells.
#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<bool>,
}

impl Grid {
    /// A grid where every cell is dead.
    pub fn empty(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![false; rows * cols],
        }
    }

    /// A grid where each cell is independently alive with probability `density`.
    ///
    /// `density` must lie in `[0, 1]`; clamp it before calling.
    pub fn random<R: Rng + ?Sized>(rows: usize, cols: usize, density: f64, rng: &mut R) -> Self {
        let mut grid = Self::empty(rows, cols);
        grid.reseed(density, rng);
        grid
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> bool {
        self.cells[self.index(row, col)]
    }

    pub fn set(&mut self, row: usize, col: usize, alive: bool) {
        let i = self.index(row, col);
        self.cells[i] = alive;
    }

    /// The cells of a single row, left to right.
    pub fn row(&self, row: usize) -> &[bool] {
        assert!(row < self.rows, "row {row} is out of bounds ({} rows)", self.rows);

        &self.cells[row * self.cols..(row + 1) * self.cols]
    }

    /// Overwrites every cell in place with a fresh random state. Allocates nothing.
    pub fn reseed<R: Rng + ?Sized>(&mut self, density: f64, rng: &mut R) {
        debug_assert!(
            (0f64..=1f64).contains(&density),
            "density lives in [0, 1], got {density}"
        );

        for cell in &mut self.cells {
            *cell = rng.random_bool(density);
        }
    }

    /// Counts the alive cells among the 8 neighbors of `(row, col)`, wrapping around every edge.
    ///
    /// On grids narrower than 3 cells the wrapped neighbors overlap, and a cell may count itself.
    pub fn count_neighbors(&self, row: usize, col: usize) -> u8 {
        assert!(
            row < self.rows && col < self.cols,
            "({row}, {col}) is out of bounds for a {}x{} grid",
            self.rows,
            self.cols
        );

        // Offsets of -1, 0 and +1, expressed modulo the grid size so nothing underflows
        let row_offsets = [self.rows - 1, 0, 1];
        let col_offsets = [self.cols - 1, 0, 1];

        let mut count = 0;

        for (i, dr) in row_offsets.into_iter().enumerate() {
            let r = (row + dr) % self.rows;
            let line = &self.cells[r * self.cols..(r + 1) * self.cols];

            for (j, dc) in col_offsets.into_iter().enumerate() {
                if i == 1 && j == 1 {
                    continue;
                }

                if line[(col + dc) % self.cols] {
                    count += 1;
                }
            }
        }

        count
    }

    /// True iff every cell is dead.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|&cell| !cell)
    }

    /// Number of alive cells.
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&cell| cell).count()
    }

    /// Iterates over the `(row, col)` of every alive cell.
    pub fn alive(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let cols = self.cols;

        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &cell)| cell)
            .map(move |(i, _)| (i / cols, i % cols))
    }

    fn index(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.rows && col < self.cols,
            "({row}, {col}) is out of bounds for a {}x{} grid",
            self.rows,
            self.cols
        );

        row * self.cols + col
    }
}

/// Writes the generation after `source` into `target` under the standard B3/S23 rules.
///
/// See [`advance_with`].
pub fn advance(source: &Grid, target: &mut Grid) {
    advance_with(source, target, &B3S23);
}

/// Writes the generation after `source` into `target` under `rules`.
///
/// Every cell of `target` is overwritten, so it may hold stale data from an earlier generation.
/// `source` is only read.
///
/// # Panics
///
/// If the two grids differ in shape.
pub fn advance_with(source: &Grid, target: &mut Grid, rules: &RuleSet) {
    assert_eq!(
        source.shape(),
        target.shape(),
        "source and target grids must have the same shape"
    );

    for row in 0..source.rows {
        for col in 0..source.cols {
            let i = row * source.cols + col;
            let neighbors = source.count_neighbors(row, col);

            target.cells[i] = rules.next_state(source.cells[i], neighbors);
        }
    }
}

/// Rows of `#` (alive) and `.` (dead), separated by newlines.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            if row > 0 {
                writeln!(f)?;
            }

            for &cell in self.row(row) {
                write!(f, "{}", if cell { ALIVE } else { DEAD })?;
            }
        }

        Ok(())
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Grid {}x{}", self.rows, self.cols)?;
        write!(f, "{self}")
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridParseError {
    #[error("Row {row} has {got} cells, expected {exp}")]
    Ragged { row: usize, exp: usize, got: usize },

    #[error("Unexpected cell '{got}' in row {row}, expected '#' or '.'")]
    InvalidCell { row: usize, got: char },
}

/// Parses the [`Display`](fmt::Display) form. Surrounding whitespace on each line is ignored, as
/// are blank lines.
impl FromStr for Grid {
    type Err = GridParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let rows = lines.len();
        let cols = lines.first().map_or(0, |line| line.chars().count());

        let mut grid = Grid::empty(rows, cols);

        for (row, line) in lines.into_iter().enumerate() {
            let got = line.chars().count();
            if got != cols {
                return Err(GridParseError::Ragged {
                    row,
                    exp: cols,
                    got,
                });
            }

            for (col, c) in line.chars().enumerate() {
                let alive = match c {
                    ALIVE => true,
                    DEAD => false,
                    got => return Err(GridParseError::InvalidCell { row, got }),
                };

                grid.set(row, col, alive);
            }
        }

        Ok(grid)
    }
}

#[cfg(test)]
mod test {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::advance;
    use super::advance_with;
    use super::Grid;
    use super::GridParseError;
    use crate::rule_set::RuleSet;

    fn grid(s: &str) -> Grid {
        s.parse().unwrap()
    }

    #[test]
    fn empty_grid_is_empty() {
        let g = Grid::empty(4, 7);

        assert_eq!(g.shape(), (4, 7));
        assert!(g.is_empty());
        assert_eq!(g.population(), 0);
    }

    #[test]
    fn single_cell_is_not_empty() {
        let mut g = Grid::empty(5, 5);
        g.set(4, 4, true);

        assert!(!g.is_empty());
        assert_eq!(g.alive().collect::<Vec<_>>(), vec![(4, 4)]);
    }

    #[test]
    fn zero_sized_grid() {
        let g = Grid::empty(0, 0);
        let mut h = Grid::empty(0, 0);

        advance(&g, &mut h);

        assert!(h.is_empty());
        assert_eq!(g.to_string(), "");
    }

    #[test]
    fn neighbors_wrap_around_corners() {
        let g = grid(
            "#.#
             ...
             #.#",
        );

        // (0, 0) sees the other three corners through the wrapped edges
        assert_eq!(g.count_neighbors(0, 0), 3);
        assert_eq!(g.count_neighbors(1, 1), 4);
    }

    #[test]
    fn neighbors_do_not_count_self() {
        let g = grid(
            ".....
             .###.
             .###.
             .###.
             .....",
        );

        assert_eq!(g.count_neighbors(2, 2), 8);
        assert_eq!(g.count_neighbors(0, 0), 1);
        assert_eq!(g.count_neighbors(0, 2), 3);
    }

    #[test]
    fn blinker_oscillates() {
        let first = grid(
            ".....
             ..#..
             ..#..
             ..#..
             .....",
        );
        let mut second = Grid::empty(5, 5);
        let mut third = Grid::empty(5, 5);

        advance(&first, &mut second);
        insta::assert_snapshot!(second, @r"
        .....
        .....
        .###.
        .....
        .....
        ");

        advance(&second, &mut third);
        assert_eq!(third, first);
    }

    #[test]
    fn glider_crosses_the_edge() {
        let mut g = grid(
            ".#...
             ..#..
             ###..
             .....
             .....",
        );
        let mut next = Grid::empty(5, 5);

        // A glider returns to its shape shifted by (1, 1) every 4 generations; after 20 it has
        // travelled the whole torus once.
        for _ in 0..20 {
            advance(&g, &mut next);
            std::mem::swap(&mut g, &mut next);
        }

        insta::assert_snapshot!(g, @r"
        .#...
        ..#..
        ###..
        .....
        .....
        ");
    }

    #[test]
    fn advance_overwrites_stale_target() {
        let source = Grid::empty(6, 6);
        let mut target = grid(
            "######
             ######
             ######
             ######
             ######
             ######",
        );

        advance(&source, &mut target);

        assert!(target.is_empty());
    }

    #[test]
    fn block_is_still_life() {
        let source = grid(
            "....
             .##.
             .##.
             ....",
        );
        let mut target = Grid::empty(4, 4);

        advance(&source, &mut target);

        assert_eq!(target, source);
    }

    #[test]
    fn custom_rules() {
        // B1/S: every dead cell touching a live one is born, and nothing survives
        let rules: RuleSet = "B1/S".parse().unwrap();
        let source = grid(
            ".....
             .....
             ..#..
             .....
             .....",
        );
        let mut target = Grid::empty(5, 5);

        advance_with(&source, &mut target, &rules);

        insta::assert_snapshot!(target, @r"
        .....
        .###.
        .#.#.
        .###.
        .....
        ");
    }

    #[test]
    #[should_panic(expected = "same shape")]
    fn advance_rejects_shape_mismatch() {
        let source = Grid::empty(3, 4);
        let mut target = Grid::empty(4, 3);

        advance(&source, &mut target);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn count_neighbors_rejects_out_of_bounds() {
        Grid::empty(3, 3).count_neighbors(3, 0);
    }

    #[test]
    fn random_density_extremes() {
        let mut rng = StdRng::seed_from_u64(7);

        assert!(Grid::random(10, 10, 0.0, &mut rng).is_empty());
        assert_eq!(Grid::random(10, 10, 1.0, &mut rng).population(), 100);
    }

    #[test]
    fn reseed_keeps_shape() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut g = Grid::empty(12, 9);

        g.reseed(0.5, &mut rng);

        assert_eq!(g.shape(), (12, 9));
        assert!(!g.is_empty());
    }

    #[test]
    fn parse_errors() {
        assert_eq!(
            "##\n#".parse::<Grid>(),
            Err(GridParseError::Ragged {
                row: 1,
                exp: 2,
                got: 1
            })
        );
        assert_eq!(
            "#x".parse::<Grid>(),
            Err(GridParseError::InvalidCell { row: 0, got: 'x' })
        );
    }
}
