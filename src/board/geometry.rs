//! Screen layout of the grid and the palette column, and hit testing

use serde::Serialize;

use super::config::BoardConfig;
use super::drag::PaletteItem;
use super::types::{BoundingBox, GridPosition, Point};

/// One pickable part in the palette column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaletteSlot {
    pub item: PaletteItem,
    /// Screen rectangle covering the part's cells at palette scale
    pub bounds: BoundingBox,
}

/// What lies under a screen point
#[derive(Debug, Clone, PartialEq)]
pub enum Hit<'a> {
    Grid,
    Palette {
        slot: &'a PaletteSlot,
        /// Point relative to the slot's top-left
        grab_offset: Point,
    },
}

/// Pixel placement of everything the host draws
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardGeometry {
    pub grid_bounds: BoundingBox,
    pub cell_size: f64,
    pub palette_cell_size: f64,
    pub palette: Vec<PaletteSlot>,
}

impl BoardGeometry {
    /// Lay out the grid and stack `items` top to bottom in the palette column.
    ///
    /// Items with empty shapes are not offered.
    pub fn new(config: &BoardConfig, items: impl IntoIterator<Item = PaletteItem>) -> Self {
        let grid = &config.grid;
        let grid_bounds = BoundingBox::new(
            grid.origin.x,
            grid.origin.y,
            grid.pixel_width(),
            grid.pixel_height(),
        );

        let palette_cell = config.palette.cell_size;
        let column = config
            .palette
            .origin
            .unwrap_or_else(|| Point::new(grid_bounds.right() + config.palette.gap, grid.origin.y));

        let mut palette = Vec::new();
        let mut y = column.y;
        for item in items {
            if item.shape.is_empty() {
                continue;
            }
            let bounds = BoundingBox::new(
                column.x,
                y,
                item.shape.width() as f64 * palette_cell,
                item.shape.height() as f64 * palette_cell,
            );
            y = bounds.bottom() + config.palette.gap;
            palette.push(PaletteSlot { item, bounds });
        }

        Self {
            grid_bounds,
            cell_size: grid.cell_size,
            palette_cell_size: palette_cell,
            palette,
        }
    }

    /// Screen position of a cell's top-left corner
    pub fn cell_origin(&self, cell: GridPosition) -> Point {
        Point::new(
            self.grid_bounds.x + cell.x as f64 * self.cell_size,
            self.grid_bounds.y + cell.y as f64 * self.cell_size,
        )
    }

    pub fn slot(&self, catalog_id: &str) -> Option<&PaletteSlot> {
        self.palette.iter().find(|s| s.item.catalog_id == catalog_id)
    }

    /// Locate `point`: the grid wins over the palette if they overlap
    pub fn hit_test(&self, point: Point) -> Option<Hit<'_>> {
        if self.grid_bounds.contains(point) {
            return Some(Hit::Grid);
        }
        self.palette
            .iter()
            .find(|slot| slot.bounds.contains(point))
            .map(|slot| Hit::Palette {
                slot,
                grab_offset: point.minus(slot.bounds.top_left()),
            })
    }

    /// Extent of the whole board, grid and palette together
    pub fn bounds(&self) -> BoundingBox {
        self.palette
            .iter()
            .fold(self.grid_bounds, |acc, slot| acc.union(&slot.bounds))
    }
}
