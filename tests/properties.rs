use life_backdrop::coords::Point;
use life_backdrop::coords::cell_center;
use life_backdrop::coords::compute_grid_origin;
use life_backdrop::coords::grid_to_pixel;
use life_backdrop::coords::pixel_to_grid;
use life_backdrop::grid::Grid;
use life_backdrop::grid::advance;
use life_backdrop::grid::advance_with;
use life_backdrop::render::CellGeometry;
use life_backdrop::render::visible_window;
use life_backdrop::rule_set::RuleSet;
use life_backdrop::sizing::MIN_GRID;
use life_backdrop::sizing::compute_grid_dimensions;
use proptest::prelude::*;

fn arb_grid() -> impl Strategy<Value = Grid> {
    (1usize..12, 1usize..12).prop_flat_map(|(rows, cols)| {
        prop::collection::vec(any::<bool>(), rows * cols).prop_map(move |cells| {
            let mut grid = Grid::empty(rows, cols);
            for (i, alive) in cells.into_iter().enumerate() {
                grid.set(i / cols, i % cols, alive);
            }
            grid
        })
    })
}

fn arb_rules() -> impl Strategy<Value = RuleSet> {
    (0u16..0x200, 0u16..0x200).prop_map(|(b, s)| RuleSet::new(b, s))
}

/// `grid` rolled `dr` rows down and `dc` columns right, wrapping around.
fn roll(grid: &Grid, dr: usize, dc: usize) -> Grid {
    let (rows, cols) = grid.shape();
    let mut out = Grid::empty(rows, cols);

    for (row, col) in grid.alive() {
        out.set((row + dr) % rows, (col + dc) % cols, true);
    }

    out
}

proptest! {
    #[test]
    fn dead_grid_stays_dead(rows in 1usize..30, cols in 1usize..30) {
        let grid = Grid::empty(rows, cols);
        let mut next = Grid::empty(rows, cols);

        advance(&grid, &mut next);

        prop_assert!(next.is_empty());
    }

    #[test]
    fn every_cell_follows_the_rules(grid in arb_grid(), rules in arb_rules()) {
        let (rows, cols) = grid.shape();
        let mut next = Grid::empty(rows, cols);

        advance_with(&grid, &mut next, &rules);

        for row in 0..rows {
            for col in 0..cols {
                let want = rules.next_state(grid.get(row, col), grid.count_neighbors(row, col));
                prop_assert_eq!(next.get(row, col), want, "cell ({}, {})", row, col);
            }
        }
    }

    #[test]
    fn stale_targets_do_not_leak(grid in arb_grid(), junk in any::<bool>()) {
        let (rows, cols) = grid.shape();
        let mut clean = Grid::empty(rows, cols);
        let mut stale = Grid::empty(rows, cols);
        for row in 0..rows {
            for col in 0..cols {
                stale.set(row, col, junk ^ ((row + col) % 2 == 0));
            }
        }

        advance(&grid, &mut clean);
        advance(&grid, &mut stale);

        prop_assert_eq!(clean, stale);
    }

    #[test]
    fn the_torus_has_no_edges(grid in arb_grid(), dr in 0usize..12, dc in 0usize..12) {
        let (rows, cols) = grid.shape();
        let mut a = Grid::empty(rows, cols);
        let mut b = Grid::empty(rows, cols);

        advance(&roll(&grid, dr, dc), &mut a);
        advance(&grid, &mut b);

        prop_assert_eq!(a, roll(&b, dr, dc));
    }

    #[test]
    fn text_form_round_trips(grid in arb_grid()) {
        let parsed: Grid = grid.to_string().parse().unwrap();
        prop_assert_eq!(parsed, grid);
    }

    #[test]
    fn sizing_covers_the_viewport(
        width in 1u32..4000,
        height in 1u32..4000,
        cell_size in 1u32..64,
    ) {
        let dims = compute_grid_dimensions(width, height, cell_size);

        prop_assert!(dims.rows >= MIN_GRID);
        prop_assert!(dims.cols >= MIN_GRID);

        // the viewport fits inside the grid on both sides
        prop_assert!(dims.offset_x as u64 + width as u64 <= dims.cols as u64 * cell_size as u64);
        prop_assert!(dims.offset_y as u64 + height as u64 <= dims.rows as u64 * cell_size as u64);
        prop_assert_eq!(dims.offset_x % cell_size, 0);
        prop_assert_eq!(dims.offset_y % cell_size, 0);
    }

    #[test]
    fn pixels_map_back_to_their_cell(
        coord in -10_000i32..10_000,
        frac in 0f64..0.99,
        cell_size in 1u32..64,
    ) {
        let px = grid_to_pixel(coord, cell_size) + frac * cell_size as f64;

        prop_assert_eq!(pixel_to_grid(px, cell_size), coord);
    }

    #[test]
    fn origin_puts_the_anchor_at_a_cell_center(
        x in -5_000i32..5_000,
        y in -5_000i32..5_000,
        half in any::<bool>(),
        cell_size in 1u32..64,
    ) {
        let shift = if half { 0.5 } else { 0.0 };
        let anchor = Point::new(x as f64 + shift, y as f64 + shift);

        let origin = compute_grid_origin(anchor, cell_size);

        prop_assert_eq!(cell_center(origin, cell_size), anchor);
    }

    #[test]
    fn visible_window_stays_in_bounds(
        grid in arb_grid(),
        ox in -500i64..500,
        oy in -500i64..500,
        width in 0u32..300,
        height in 0u32..300,
        cell_size in 1u32..40,
    ) {
        let geometry = CellGeometry::default().with_cell_size(cell_size);

        let (rows, cols) = visible_window(&grid, &geometry, (ox, oy), width, height);

        prop_assert!(rows.start <= rows.end && rows.end <= grid.rows());
        prop_assert!(cols.start <= cols.end && cols.end <= grid.cols());
    }
}
