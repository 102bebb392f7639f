//! Snapshot of everything a host needs to draw one frame.
//!
//! A [`Frame`] is derived from the controller state on demand; it owns no
//! state of its own and is discarded after drawing.

use serde::Serialize;

use super::drag::{DragController, PointerHost};
use super::geometry::BoardGeometry;
use super::shape::Shape;
use super::stats::{self, PartStats};
use super::transform::TextureTransform;
use super::types::{BoundingBox, EntityId, GridPosition, Point, Rotation};
use crate::catalog::Catalog;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Highlight {
    Valid,
    Conflict,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameCell {
    pub position: GridPosition,
    /// Screen top-left
    pub origin: Point,
    pub occupant: Option<EntityId>,
    pub highlight: Option<Highlight>,
}

/// A textured placed entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overlay {
    pub entity: EntityId,
    pub catalog_id: String,
    pub texture: String,
    pub origin: Point,
    pub transform: TextureTransform,
}

/// The shape following the pointer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preview {
    pub catalog_id: String,
    pub shape: Shape,
    pub rotation: Rotation,
    pub mirrored: bool,
    pub origin: Point,
    /// Whether `origin` is snapped to the previewed grid cell
    pub snapped: bool,
    pub feasible: bool,
    pub texture: Option<String>,
    pub transform: TextureTransform,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaletteEntry {
    pub catalog_id: String,
    pub name: String,
    pub shape: Shape,
    pub bounds: BoundingBox,
    pub texture: Option<String>,
    pub transform: TextureTransform,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    pub grid: BoundingBox,
    pub cell_size: f64,
    pub palette_cell_size: f64,
    pub background: Option<String>,
    /// Row-major
    pub cells: Vec<FrameCell>,
    pub overlays: Vec<Overlay>,
    pub preview: Option<Preview>,
    pub palette: Vec<PaletteEntry>,
    pub totals: PartStats,
}

impl Frame {
    pub fn capture<H: PointerHost>(
        controller: &DragController<H>,
        catalog: &Catalog,
        geometry: &BoardGeometry,
    ) -> Self {
        let occupancy = controller.occupancy();
        let session = controller.session();
        let dragged = controller.dragged_id();

        let mut cells: Vec<FrameCell> = occupancy
            .iter()
            .map(|(position, occupant)| FrameCell {
                position,
                origin: geometry.cell_origin(position),
                occupant,
                highlight: None,
            })
            .collect();

        if let Some((session, anchor)) = session.and_then(|s| s.preview.map(|a| (s, a))) {
            let highlight = if session.placement.feasible {
                Highlight::Valid
            } else {
                Highlight::Conflict
            };
            for cell in session.shape.cells_at(anchor) {
                if !occupancy.contains(cell) {
                    continue;
                }
                if session.placement.feasible || session.placement.is_conflict(cell) {
                    let index = cell.y as usize * occupancy.width() + cell.x as usize;
                    cells[index].highlight = Some(highlight);
                }
            }
        }

        let overlays = controller
            .entities()
            .iter()
            .filter(|e| Some(e.id) != dragged)
            .filter_map(|entity| {
                let texture = catalog.get(&entity.catalog_id)?.texture.clone()?;
                Some(Overlay {
                    entity: entity.id,
                    catalog_id: entity.catalog_id.clone(),
                    texture,
                    origin: geometry.cell_origin(entity.position),
                    transform: TextureTransform::new(
                        &entity.binding,
                        geometry.cell_size,
                        entity.rotation,
                        entity.mirrored,
                    ),
                })
            })
            .collect();

        let preview = session.map(|session| {
            let (origin, snapped) = match session.preview {
                Some(anchor) if session.in_grid => (geometry.cell_origin(anchor), true),
                _ => (session.pointer.minus(session.grab_offset), false),
            };
            Preview {
                catalog_id: session.catalog_id.clone(),
                shape: session.shape.clone(),
                rotation: session.rotation,
                mirrored: session.mirrored,
                origin,
                snapped,
                feasible: session.placement.feasible,
                texture: catalog
                    .get(&session.catalog_id)
                    .and_then(|e| e.texture.clone()),
                transform: TextureTransform::new(
                    &session.binding,
                    geometry.cell_size,
                    session.rotation,
                    session.mirrored,
                ),
            }
        });

        let palette = geometry
            .palette
            .iter()
            .map(|slot| {
                let entry = catalog.get(&slot.item.catalog_id);
                PaletteEntry {
                    catalog_id: slot.item.catalog_id.clone(),
                    name: entry
                        .map(|e| e.name.clone())
                        .unwrap_or_else(|| slot.item.catalog_id.clone()),
                    shape: slot.item.shape.clone(),
                    bounds: slot.bounds,
                    texture: entry.and_then(|e| e.texture.clone()),
                    transform: TextureTransform::new(
                        &slot.item.binding,
                        geometry.palette_cell_size,
                        Rotation::Deg0,
                        false,
                    ),
                }
            })
            .collect();

        Self {
            grid: geometry.grid_bounds,
            cell_size: geometry.cell_size,
            palette_cell_size: geometry.palette_cell_size,
            background: controller.grid().background.clone(),
            cells,
            overlays,
            preview,
            palette,
            totals: stats::aggregate(controller.entities(), catalog),
        }
    }

    pub fn cell(&self, position: GridPosition) -> Option<&FrameCell> {
        self.cells.iter().find(|c| c.position == position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardConfig, DragController};

    const CATALOG: &str = r#"[
        { "id": "bar", "price": 10, "texture": "bar.png", "shape": [[1, 1]] },
        { "id": "dot", "price": 1, "shape": [[1]] }
    ]"#;

    fn setup() -> (DragController, Catalog, BoardGeometry) {
        let config = BoardConfig::new().with_grid_size(3, 3).with_cell_size(10.0);
        let catalog = Catalog::from_json(CATALOG).unwrap();
        let geometry = BoardGeometry::new(&config, catalog.palette().map(|e| e.palette_item()));
        (DragController::new(config.grid), catalog, geometry)
    }

    fn place(c: &mut DragController, catalog: &Catalog, id: &str, pointer: Point) {
        let item = catalog.get(id).unwrap().palette_item();
        c.pick_from_palette(item, pointer, Point::origin());
        c.pointer_move(pointer);
        c.release();
    }

    #[test]
    fn test_idle_frame() {
        let (mut c, catalog, geometry) = setup();
        place(&mut c, &catalog, "bar", Point::new(0.0, 0.0));
        place(&mut c, &catalog, "dot", Point::new(0.0, 10.0));

        let frame = Frame::capture(&c, &catalog, &geometry);
        assert_eq!(frame.cells.len(), 9);
        assert_eq!(frame.cell(GridPosition::new(1, 0)).unwrap().occupant, Some(EntityId(1)));
        assert_eq!(frame.cell(GridPosition::new(0, 1)).unwrap().occupant, Some(EntityId(2)));
        assert!(frame.cells.iter().all(|c| c.highlight.is_none()));
        // Only the textured part gets an overlay
        assert_eq!(frame.overlays.len(), 1);
        assert_eq!(frame.overlays[0].texture, "bar.png");
        assert!(frame.preview.is_none());
        assert_eq!(frame.palette.len(), 2);
        assert_eq!(frame.totals.price, 11.0);
    }

    #[test]
    fn test_conflict_highlights_only_offending_cells() {
        let (mut c, catalog, geometry) = setup();
        place(&mut c, &catalog, "dot", Point::new(10.0, 0.0));

        let bar = catalog.get("bar").unwrap().palette_item();
        c.pick_from_palette(bar, Point::origin(), Point::origin());
        c.pointer_move(Point::new(1.0, 1.0));

        let frame = Frame::capture(&c, &catalog, &geometry);
        let highlighted: Vec<_> = frame
            .cells
            .iter()
            .filter_map(|c| c.highlight.map(|h| (c.position, h)))
            .collect();
        assert_eq!(highlighted, vec![(GridPosition::new(1, 0), Highlight::Conflict)]);

        let preview = frame.preview.unwrap();
        assert!(preview.snapped);
        assert!(!preview.feasible);
        assert_eq!(preview.origin, Point::new(0.0, 0.0));
    }

    #[test]
    fn test_dragged_entity_is_lifted() {
        let (mut c, catalog, geometry) = setup();
        place(&mut c, &catalog, "bar", Point::new(0.0, 0.0));
        c.pointer_down_on_grid(Point::new(5.0, 5.0));
        c.pointer_move(Point::new(5.0, 15.0));

        let frame = Frame::capture(&c, &catalog, &geometry);
        assert!(frame.overlays.is_empty());
        assert!(frame.cells.iter().all(|c| c.occupant.is_none()));
        let valid: Vec<_> = frame
            .cells
            .iter()
            .filter(|c| c.highlight == Some(Highlight::Valid))
            .map(|c| c.position)
            .collect();
        assert_eq!(valid, vec![GridPosition::new(0, 1), GridPosition::new(1, 1)]);
    }

    #[test]
    fn test_free_preview_outside_grid() {
        let (mut c, catalog, geometry) = setup();
        let dot = catalog.get("dot").unwrap().palette_item();
        c.pick_from_palette(dot, Point::new(100.0, 100.0), Point::new(4.0, 6.0));
        c.pointer_move(Point::new(200.0, 50.0));

        let preview = Frame::capture(&c, &catalog, &geometry).preview.unwrap();
        assert!(!preview.snapped);
        assert_eq!(preview.origin, Point::new(196.0, 44.0));
    }
}
