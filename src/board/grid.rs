//! Dense occupancy map derived from the placed entities.
//!
//! The map is never stored alongside the entity collection: it is a pure
//! function of `(entities, excluded id)` and is recomputed whenever either
//! changes. Grids are tens of cells, so a full rebuild is cheap.

use serde::Serialize;

use super::types::{EntityId, GridPosition, PlacedEntity};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OccupancyGrid {
    width: usize,
    height: usize,
    /// Row-major cell owners
    cells: Vec<Option<EntityId>>,
}

impl OccupancyGrid {
    /// An empty grid
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width * height],
        }
    }

    /// Derive the occupancy of `entities`, skipping `exclude` (the entity
    /// currently being moved, if any).
    ///
    /// Cells falling outside the grid are ignored. Entities are applied in
    /// collection order; two entities claiming one cell means a placement
    /// slipped past validation.
    pub fn compute(
        entities: &[PlacedEntity],
        exclude: Option<EntityId>,
        width: usize,
        height: usize,
    ) -> Self {
        let mut grid = Self::new(width, height);
        for entity in entities {
            if Some(entity.id) == exclude {
                continue;
            }
            for cell in entity.footprint() {
                let Some(index) = grid.index(cell) else {
                    continue;
                };
                if let Some(previous) = grid.cells[index] {
                    tracing::warn!(
                        %cell,
                        %previous,
                        current = %entity.id,
                        "cell claimed by two entities"
                    );
                }
                grid.cells[index] = Some(entity.id);
            }
        }
        grid
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn contains(&self, cell: GridPosition) -> bool {
        cell.within(self.width, self.height)
    }

    fn index(&self, cell: GridPosition) -> Option<usize> {
        self.contains(cell)
            .then(|| cell.y as usize * self.width + cell.x as usize)
    }

    /// Owner of `cell`; `None` for empty or out-of-bounds cells
    pub fn get(&self, cell: GridPosition) -> Option<EntityId> {
        self.index(cell).and_then(|i| self.cells[i])
    }

    pub fn is_occupied(&self, cell: GridPosition) -> bool {
        self.get(cell).is_some()
    }

    /// Every cell with its owner, row-major
    pub fn iter(&self) -> impl Iterator<Item = (GridPosition, Option<EntityId>)> + '_ {
        self.cells.iter().enumerate().map(|(i, owner)| {
            let cell = GridPosition::new((i % self.width) as i32, (i / self.width) as i32);
            (cell, *owner)
        })
    }

    /// Number of occupied cells
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}
