//! The placement engine: shapes, texture alignment, occupancy, validation,
//! the drag lifecycle and board statistics.

pub mod config;
pub mod drag;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod grid;
pub mod shape;
pub mod stats;
pub mod transform;
pub mod types;
pub mod validator;

pub use config::{BoardConfig, ConfigError, GridConfig, PaletteConfig};
pub use drag::{
    DetachedHost, DiscardReason, DragController, DragEffect, DragEvent, DragPhase, DragSession,
    DragState, DragTransition, NoopReason, PaletteItem, PointerHost,
};
pub use error::ShapeError;
pub use frame::{Frame, FrameCell, Highlight, Overlay, PaletteEntry, Preview};
pub use geometry::{BoardGeometry, Hit, PaletteSlot};
pub use grid::OccupancyGrid;
pub use shape::Shape;
pub use stats::{aggregate, PartStats, StatsLookup};
pub use transform::{footprint_offset, Affine, TextureTransform};
pub use types::{
    BoundingBox, EntityId, GridPosition, PlacedEntity, Point, Rotation, TextureBinding,
};
pub use validator::{evaluate, Placement};
