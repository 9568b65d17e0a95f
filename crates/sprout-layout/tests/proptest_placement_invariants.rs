//! Property-based invariant tests for grid placement.
//!
//! 1. Accepted occupants never overlap and never leave the grid.
//! 2. Any request touching a cell outside the grid is rejected.
//! 3. Four clockwise turns restore the original grid.
//! 4. Occupied + free cells always equals the grid's cell count.

use proptest::prelude::*;
use sprout_layout::{CellRect, Footprint, GridDims, GridPlacementEngine};

// ── Strategies ──────────────────────────────────────────────────────────

fn dims_strategy() -> impl Strategy<Value = GridDims> {
    (1u32..12, 1u32..12).prop_map(|(c, r)| GridDims::new(c, r))
}

fn request_strategy() -> impl Strategy<Value = CellRect> {
    (-3i32..14, -3i32..14, 1u32..4, 1u32..4)
        .prop_map(|(col, row, sc, sr)| CellRect::new(col, row, Footprint::new(sc, sr)))
}

fn fill(dims: GridDims, requests: &[CellRect]) -> GridPlacementEngine<usize> {
    let mut grid = GridPlacementEngine::new(dims);
    for (key, rect) in requests.iter().enumerate() {
        let _ = grid.place(key, *rect);
    }
    grid
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn accepted_occupants_are_disjoint_and_inside(
        dims in dims_strategy(),
        requests in prop::collection::vec(request_strategy(), 0..40),
    ) {
        let grid = fill(dims, &requests);
        let occupants = grid.occupants();
        for (i, a) in occupants.iter().enumerate() {
            prop_assert!(a.rect.within(dims));
            for b in &occupants[i + 1..] {
                prop_assert!(!a.rect.overlaps(&b.rect), "{:?} overlaps {:?}", a, b);
            }
        }
    }

    #[test]
    fn outside_cells_always_rejected(
        dims in dims_strategy(),
        request in request_strategy(),
    ) {
        let mut grid = GridPlacementEngine::<u8>::new(dims);
        let accepted = grid.place(0, request).is_ok();
        prop_assert_eq!(accepted, request.within(dims));
    }

    #[test]
    fn four_turns_round_trip(
        dims in dims_strategy(),
        requests in prop::collection::vec(request_strategy(), 0..20),
    ) {
        let grid = fill(dims, &requests);
        let turned = grid
            .rotated_clockwise()
            .rotated_clockwise()
            .rotated_clockwise()
            .rotated_clockwise();
        prop_assert_eq!(turned, grid);
    }

    #[test]
    fn rotated_occupants_stay_valid(
        dims in dims_strategy(),
        requests in prop::collection::vec(request_strategy(), 0..20),
    ) {
        let turned = fill(dims, &requests).rotated_clockwise();
        let occupants = turned.occupants();
        for (i, a) in occupants.iter().enumerate() {
            prop_assert!(a.rect.within(turned.dims()));
            for b in &occupants[i + 1..] {
                prop_assert!(!a.rect.overlaps(&b.rect));
            }
        }
    }

    #[test]
    fn coverage_accounting(
        dims in dims_strategy(),
        requests in prop::collection::vec(request_strategy(), 0..40),
    ) {
        let grid = fill(dims, &requests);
        prop_assert_eq!(grid.occupied_cells() + grid.free_cells(), dims.cell_count());
    }
}
