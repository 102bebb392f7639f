//! Placement feasibility against an occupancy snapshot

use serde::Serialize;

use super::grid::OccupancyGrid;
use super::shape::Shape;
use super::types::{EntityId, GridPosition};

/// Outcome of evaluating a candidate placement
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Placement {
    pub feasible: bool,
    /// Every offending footprint cell, in shape row-major order
    pub conflicts: Vec<GridPosition>,
}

impl Placement {
    pub fn is_conflict(&self, cell: GridPosition) -> bool {
        self.conflicts.contains(&cell)
    }
}

/// Check `shape` anchored at `anchor` against `grid`.
///
/// A footprint cell conflicts when it lies outside the grid or is owned by an
/// entity other than `self_id`. Feasibility is all-or-nothing: the placement
/// is feasible only when no cell conflicts. An empty shape has no footprint
/// and is therefore feasible anywhere.
pub fn evaluate(
    shape: &Shape,
    anchor: GridPosition,
    grid: &OccupancyGrid,
    self_id: Option<EntityId>,
) -> Placement {
    let conflicts: Vec<GridPosition> = shape
        .cells_at(anchor)
        .filter(|cell| {
            if !grid.contains(*cell) {
                return true;
            }
            match grid.get(*cell) {
                Some(owner) => Some(owner) != self_id,
                None => false,
            }
        })
        .collect();

    Placement {
        feasible: conflicts.is_empty(),
        conflicts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{PlacedEntity, Point, Rotation, TextureBinding};
    use proptest::prelude::*;

    fn placed(id: u64, shape: Shape, x: i32, y: i32) -> PlacedEntity {
        PlacedEntity {
            id: EntityId(id),
            catalog_id: "part".to_string(),
            binding: TextureBinding::capture(&shape, 60.0, Point::origin()),
            shape,
            position: GridPosition::new(x, y),
            rotation: Rotation::Deg0,
            mirrored: false,
        }
    }

    fn l_block() -> Shape {
        Shape::from_bits(&[[1, 0], [1, 0], [1, 1]]).unwrap()
    }

    #[test]
    fn test_empty_grid_is_feasible() {
        let grid = OccupancyGrid::new(6, 6);
        let result = evaluate(&l_block(), GridPosition::new(0, 0), &grid, None);
        assert!(result.feasible);
        assert!(result.conflicts.is_empty());
    }

    #[test]
    fn test_overlap_reports_only_shared_cells() {
        let entities = vec![placed(1, l_block(), 0, 0)];
        let grid = OccupancyGrid::compute(&entities, None, 6, 6);
        let bar = Shape::from_bits(&[[1, 1]]).unwrap();
        let result = evaluate(&bar, GridPosition::new(0, 0), &grid, None);
        assert!(!result.feasible);
        assert_eq!(result.conflicts, vec![GridPosition::new(0, 0)]);
    }

    #[test]
    fn test_out_of_bounds_cells_reported() {
        let grid = OccupancyGrid::new(6, 6);
        let result = evaluate(&l_block(), GridPosition::new(5, 4), &grid, None);
        assert!(!result.feasible);
        assert_eq!(
            result.conflicts,
            vec![GridPosition::new(5, 6), GridPosition::new(6, 6)]
        );
    }

    #[test]
    fn test_own_cells_pass_through() {
        let entities = vec![placed(7, l_block(), 0, 0)];
        let grid = OccupancyGrid::compute(&entities, None, 6, 6);
        let result = evaluate(&l_block(), GridPosition::new(0, 1), &grid, Some(EntityId(7)));
        assert!(result.feasible);

        let other = evaluate(&l_block(), GridPosition::new(0, 1), &grid, Some(EntityId(8)));
        assert_eq!(
            other.conflicts,
            vec![GridPosition::new(0, 1), GridPosition::new(0, 2)]
        );
    }

    #[test]
    fn test_empty_shape_is_trivially_feasible() {
        let grid = OccupancyGrid::new(2, 2);
        let result = evaluate(&Shape::empty(), GridPosition::new(-5, -5), &grid, None);
        assert!(result.feasible);
    }

    proptest! {
        #[test]
        fn prop_out_of_bounds_cells_always_conflict(
            x in -4i32..10,
            y in -4i32..10,
            w in 1usize..8,
            h in 1usize..8,
        ) {
            let grid = OccupancyGrid::new(w, h);
            let square = Shape::from_bits(&[[1, 1], [1, 1]]).unwrap();
            let result = evaluate(&square, GridPosition::new(x, y), &grid, None);
            for cell in square.cells_at(GridPosition::new(x, y)) {
                prop_assert_eq!(result.is_conflict(cell), !cell.within(w, h));
            }
            prop_assert_eq!(result.feasible, result.conflicts.is_empty());
        }
    }
}
