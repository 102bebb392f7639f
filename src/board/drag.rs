//! Drag interaction lifecycle.
//!
//! ```text
//! Idle --pick (palette | occupied grid cell)--> Dragging
//! Dragging --move / rotate / mirror--> Dragging
//! Dragging --release--> Idle   (commit if feasible, otherwise discard)
//! ```
//!
//! The controller exclusively owns the placed-entity collection and the
//! single in-flight [`DragSession`]. Nothing mutates the collection while a
//! drag is in progress, so a discarded drag leaves it exactly as it was.
//!
//! Every event returns a [`DragTransition`]; events that do not apply to the
//! current state are reported as [`DragEffect::Noop`] rather than errors.

use serde::Serialize;

use super::config::GridConfig;
use super::grid::OccupancyGrid;
use super::shape::Shape;
use super::types::{EntityId, GridPosition, PlacedEntity, Point, Rotation, TextureBinding};
use super::validator::{self, Placement};

/// Palette payload for a fresh pick: the part at rotation 0, unmirrored
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaletteItem {
    pub catalog_id: String,
    pub shape: Shape,
    pub binding: TextureBinding,
}

/// Pointer capture owned by the host environment.
///
/// Captured when a drag starts and released when it ends, on every exit
/// path: commit, discard, or the controller being dropped mid-drag.
pub trait PointerHost {
    fn capture(&mut self);
    fn release(&mut self);
}

/// A host with nothing to capture
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedHost;

impl PointerHost for DetachedHost {
    fn capture(&mut self) {}
    fn release(&mut self) {}
}

/// Transient state of one pick-up-to-release gesture
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DragSession {
    /// Entity being moved, or `None` for a fresh palette pick
    pub source_id: Option<EntityId>,
    pub catalog_id: String,
    pub shape: Shape,
    pub rotation: Rotation,
    pub mirrored: bool,
    pub binding: TextureBinding,
    /// Pixel offset of the grab point from the shape's top-left
    pub grab_offset: Point,
    /// Last known pointer position (screen pixels)
    pub pointer: Point,
    /// Cell under the shape's local (0, 0); `None` until the first move
    pub preview: Option<GridPosition>,
    pub placement: Placement,
    /// Whether the pointer is strictly inside the grid rectangle
    pub in_grid: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

impl DragState {
    pub fn phase(&self) -> DragPhase {
        match self {
            DragState::Idle => DragPhase::Idle,
            DragState::Dragging(_) => DragPhase::Dragging,
        }
    }

    pub fn session(&self) -> Option<&DragSession> {
        match self {
            DragState::Idle => None,
            DragState::Dragging(session) => Some(session),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DragPhase {
    Idle,
    Dragging,
}

/// Input delivered by the host
#[derive(Debug, Clone, PartialEq)]
pub enum DragEvent {
    /// Pointer-down on a palette item, `grab_offset` relative to its top-left
    PickFromPalette {
        item: PaletteItem,
        pointer: Point,
        grab_offset: Point,
    },
    /// Pointer-down anywhere over the grid
    PointerDownOnGrid { pointer: Point },
    PointerMove { pointer: Point },
    PointerUp,
    Rotate,
    Mirror,
    /// Remove every placed entity
    Clear,
}

/// Why an event was ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoopReason {
    IdleWithoutActiveDrag,
    DragAlreadyInProgress,
    NothingUnderPointer,
    EmptyShape,
    ClearDuringDrag,
    /// The host named a part it cannot supply
    UnknownPart,
}

/// Why a release did not commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscardReason {
    NoPreview,
    Infeasible,
    AnchorOutOfBounds,
    SourceMissing,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum DragEffect {
    PickedUp {
        source_id: Option<EntityId>,
        catalog_id: String,
    },
    PreviewUpdated {
        anchor: GridPosition,
        feasible: bool,
        conflicts: usize,
        in_grid: bool,
    },
    Rotated {
        rotation: Rotation,
    },
    Mirrored {
        mirrored: bool,
    },
    Committed {
        id: EntityId,
        position: GridPosition,
        rotation: Rotation,
        mirrored: bool,
        created: bool,
    },
    Discarded {
        reason: DiscardReason,
    },
    Cleared {
        removed: usize,
    },
    Noop {
        reason: NoopReason,
    },
}

/// One state-machine step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DragTransition {
    pub transition_id: u64,
    pub from: DragPhase,
    pub to: DragPhase,
    pub effect: DragEffect,
}

/// Owner of the placed entities and the drag lifecycle
#[derive(Debug)]
pub struct DragController<H: PointerHost = DetachedHost> {
    grid: GridConfig,
    entities: Vec<PlacedEntity>,
    next_id: u64,
    state: DragState,
    host: H,
    transition_counter: u64,
}

impl DragController<DetachedHost> {
    pub fn new(grid: GridConfig) -> Self {
        Self::with_host(grid, DetachedHost)
    }
}

impl<H: PointerHost> DragController<H> {
    pub fn with_host(grid: GridConfig, host: H) -> Self {
        Self {
            grid,
            entities: Vec::new(),
            next_id: 1,
            state: DragState::Idle,
            host,
            transition_counter: 0,
        }
    }

    pub fn grid(&self) -> &GridConfig {
        &self.grid
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.state.session()
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    pub fn entities(&self) -> &[PlacedEntity] {
        &self.entities
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Entity currently lifted off the grid, if any
    pub fn dragged_id(&self) -> Option<EntityId> {
        self.session().and_then(|s| s.source_id)
    }

    /// Occupancy of every entity except the one being dragged
    pub fn occupancy(&self) -> OccupancyGrid {
        OccupancyGrid::compute(
            &self.entities,
            self.dragged_id(),
            self.grid.width,
            self.grid.height,
        )
    }

    /// Dispatch one host event
    pub fn apply(&mut self, event: DragEvent) -> DragTransition {
        match event {
            DragEvent::PickFromPalette {
                item,
                pointer,
                grab_offset,
            } => self.pick_from_palette(item, pointer, grab_offset),
            DragEvent::PointerDownOnGrid { pointer } => self.pointer_down_on_grid(pointer),
            DragEvent::PointerMove { pointer } => self.pointer_move(pointer),
            DragEvent::PointerUp => self.release(),
            DragEvent::Rotate => self.rotate(),
            DragEvent::Mirror => self.mirror(),
            DragEvent::Clear => self.clear(),
        }
    }

    /// Start dragging a fresh part from the palette
    pub fn pick_from_palette(
        &mut self,
        item: PaletteItem,
        pointer: Point,
        grab_offset: Point,
    ) -> DragTransition {
        if self.is_dragging() {
            return self.noop(NoopReason::DragAlreadyInProgress);
        }
        if item.shape.is_empty() {
            tracing::warn!(catalog_id = %item.catalog_id, "ignoring pick of empty shape");
            return self.noop(NoopReason::EmptyShape);
        }

        tracing::debug!(catalog_id = %item.catalog_id, "picked from palette");
        let effect = DragEffect::PickedUp {
            source_id: None,
            catalog_id: item.catalog_id.clone(),
        };
        self.begin(DragSession {
            source_id: None,
            catalog_id: item.catalog_id,
            shape: item.shape,
            rotation: Rotation::Deg0,
            mirrored: false,
            binding: item.binding,
            grab_offset,
            pointer,
            preview: None,
            placement: Placement::default(),
            in_grid: false,
        });
        self.transition(DragPhase::Idle, effect)
    }

    /// Start dragging the placed entity under `pointer`, if any
    pub fn pointer_down_on_grid(&mut self, pointer: Point) -> DragTransition {
        if self.is_dragging() {
            return self.noop(NoopReason::DragAlreadyInProgress);
        }
        let Some(cell) = self.cell_under(pointer) else {
            return self.noop(NoopReason::NothingUnderPointer);
        };
        let Some(owner) = self.occupancy().get(cell) else {
            return self.noop(NoopReason::NothingUnderPointer);
        };
        let Some(entity) = self.entities.iter().find(|e| e.id == owner) else {
            return self.noop(NoopReason::NothingUnderPointer);
        };

        // Keep the grabbed point at the same pixel offset from the entity's anchor
        let local = pointer.minus(self.grid.origin);
        let grab_offset = Point::new(
            local.x - entity.position.x as f64 * self.grid.cell_size,
            local.y - entity.position.y as f64 * self.grid.cell_size,
        );

        tracing::debug!(entity = %entity.id, %cell, "picked from grid");
        let effect = DragEffect::PickedUp {
            source_id: Some(entity.id),
            catalog_id: entity.catalog_id.clone(),
        };
        let session = DragSession {
            source_id: Some(entity.id),
            catalog_id: entity.catalog_id.clone(),
            shape: entity.shape.clone(),
            rotation: entity.rotation,
            mirrored: entity.mirrored,
            binding: entity.binding,
            grab_offset,
            pointer,
            preview: None,
            placement: Placement::default(),
            in_grid: self.pointer_in_grid(pointer),
        };
        self.begin(session);
        self.transition(DragPhase::Idle, effect)
    }

    /// Track the pointer and recompute the preview
    pub fn pointer_move(&mut self, pointer: Point) -> DragTransition {
        let anchor = {
            let Some(session) = self.session() else {
                return self.noop(NoopReason::IdleWithoutActiveDrag);
            };
            self.project(pointer, session.grab_offset)
        };
        let in_grid = self.pointer_in_grid(pointer);
        let grid = self.occupancy();

        let DragState::Dragging(session) = &mut self.state else {
            return self.noop(NoopReason::IdleWithoutActiveDrag);
        };
        session.pointer = pointer;
        session.in_grid = in_grid;
        session.preview = Some(anchor);
        session.placement = validator::evaluate(&session.shape, anchor, &grid, session.source_id);
        tracing::trace!(
            %anchor,
            feasible = session.placement.feasible,
            conflicts = session.placement.conflicts.len(),
            "preview updated"
        );

        let effect = DragEffect::PreviewUpdated {
            anchor,
            feasible: session.placement.feasible,
            conflicts: session.placement.conflicts.len(),
            in_grid,
        };
        self.transition(DragPhase::Dragging, effect)
    }

    /// Rotate the airborne shape a quarter turn.
    ///
    /// The occupancy matrix always turns clockwise. The recorded rotation
    /// turns the other way while mirrored, because the mirror is applied on
    /// screen after the rotation.
    pub fn rotate(&mut self) -> DragTransition {
        let DragState::Dragging(session) = &mut self.state else {
            return self.noop(NoopReason::IdleWithoutActiveDrag);
        };
        session.shape = session.shape.rotate_clockwise();
        session.rotation = if session.mirrored {
            session.rotation.counter_clockwise()
        } else {
            session.rotation.clockwise()
        };
        let rotation = session.rotation;
        tracing::debug!(%rotation, mirrored = session.mirrored, "rotated");

        self.revalidate();
        self.transition(DragPhase::Dragging, DragEffect::Rotated { rotation })
    }

    /// Mirror the airborne shape horizontally
    pub fn mirror(&mut self) -> DragTransition {
        let DragState::Dragging(session) = &mut self.state else {
            return self.noop(NoopReason::IdleWithoutActiveDrag);
        };
        session.shape = session.shape.mirror_horizontal();
        session.mirrored = !session.mirrored;
        let mirrored = session.mirrored;
        tracing::debug!(mirrored, "mirrored");

        self.revalidate();
        self.transition(DragPhase::Dragging, DragEffect::Mirrored { mirrored })
    }

    /// End the gesture: commit a feasible preview, otherwise discard.
    ///
    /// The session is dropped and the pointer released either way.
    pub fn release(&mut self) -> DragTransition {
        let Some(session) = self.end_session() else {
            return self.noop(NoopReason::IdleWithoutActiveDrag);
        };

        let effect = match self.commit(session) {
            Ok(effect) => effect,
            Err(reason) => {
                tracing::debug!(?reason, "drag discarded");
                DragEffect::Discarded { reason }
            }
        };
        self.transition(DragPhase::Dragging, effect)
    }

    /// Remove every placed entity. Ignored while a drag is in progress.
    pub fn clear(&mut self) -> DragTransition {
        if self.is_dragging() {
            return self.noop(NoopReason::ClearDuringDrag);
        }
        let removed = self.entities.len();
        self.entities.clear();
        tracing::debug!(removed, "board cleared");
        self.transition(DragPhase::Idle, DragEffect::Cleared { removed })
    }

    fn commit(&mut self, session: DragSession) -> Result<DragEffect, DiscardReason> {
        let anchor = session.preview.ok_or(DiscardReason::NoPreview)?;
        if !session.placement.feasible {
            return Err(DiscardReason::Infeasible);
        }
        if !anchor.within(self.grid.width, self.grid.height) {
            return Err(DiscardReason::AnchorOutOfBounds);
        }

        match session.source_id {
            Some(id) => {
                let entity = self
                    .entities
                    .iter_mut()
                    .find(|e| e.id == id)
                    .ok_or(DiscardReason::SourceMissing)?;
                entity.shape = session.shape;
                entity.position = anchor;
                entity.rotation = session.rotation;
                entity.mirrored = session.mirrored;
                tracing::debug!(entity = %id, %anchor, "entity moved");
                Ok(DragEffect::Committed {
                    id,
                    position: anchor,
                    rotation: session.rotation,
                    mirrored: session.mirrored,
                    created: false,
                })
            }
            None => {
                let id = EntityId(self.next_id);
                self.next_id += 1;
                let effect = DragEffect::Committed {
                    id,
                    position: anchor,
                    rotation: session.rotation,
                    mirrored: session.mirrored,
                    created: true,
                };
                tracing::debug!(entity = %id, catalog_id = %session.catalog_id, %anchor, "entity placed");
                self.entities.push(PlacedEntity {
                    id,
                    catalog_id: session.catalog_id,
                    shape: session.shape,
                    position: anchor,
                    rotation: session.rotation,
                    mirrored: session.mirrored,
                    binding: session.binding,
                });
                Ok(effect)
            }
        }
    }

    fn begin(&mut self, session: DragSession) {
        self.host.capture();
        self.state = DragState::Dragging(session);
    }

    fn end_session(&mut self) -> Option<DragSession> {
        match std::mem::take(&mut self.state) {
            DragState::Idle => None,
            DragState::Dragging(session) => {
                self.host.release();
                Some(session)
            }
        }
    }

    /// Re-run validation after the live shape changed under a fixed pointer
    fn revalidate(&mut self) {
        let grid = self.occupancy();
        if let DragState::Dragging(session) = &mut self.state {
            if let Some(anchor) = session.preview {
                session.placement =
                    validator::evaluate(&session.shape, anchor, &grid, session.source_id);
            }
        }
    }

    /// Grid cell containing `pointer`, if inside the grid
    fn cell_under(&self, pointer: Point) -> Option<GridPosition> {
        let local = pointer.minus(self.grid.origin);
        let cell = GridPosition::new(
            (local.x / self.grid.cell_size).floor() as i32,
            (local.y / self.grid.cell_size).floor() as i32,
        );
        cell.within(self.grid.width, self.grid.height).then_some(cell)
    }

    /// Anchor cell for a shape grabbed at `grab_offset`, nearest cell with
    /// halves rounding up
    fn project(&self, pointer: Point, grab_offset: Point) -> GridPosition {
        let local = pointer.minus(self.grid.origin).minus(grab_offset);
        GridPosition::new(
            (local.x / self.grid.cell_size + 0.5).floor() as i32,
            (local.y / self.grid.cell_size + 0.5).floor() as i32,
        )
    }

    fn pointer_in_grid(&self, pointer: Point) -> bool {
        let bounds = super::types::BoundingBox::new(
            self.grid.origin.x,
            self.grid.origin.y,
            self.grid.pixel_width(),
            self.grid.pixel_height(),
        );
        bounds.contains_strict(pointer)
    }

    /// Record an event that leaves the board and the drag untouched
    pub fn noop(&mut self, reason: NoopReason) -> DragTransition {
        let phase = self.state.phase();
        self.transition(phase, DragEffect::Noop { reason })
    }

    fn transition(&mut self, from: DragPhase, effect: DragEffect) -> DragTransition {
        self.transition_counter += 1;
        DragTransition {
            transition_id: self.transition_counter,
            from,
            to: self.state.phase(),
            effect,
        }
    }
}

impl<H: PointerHost> Drop for DragController<H> {
    fn drop(&mut self) {
        if self.is_dragging() {
            self.host.release();
        }
    }
}
