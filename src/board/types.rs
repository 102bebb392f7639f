//! Core types for the placement engine

use serde::{Deserialize, Serialize};

use super::shape::Shape;

/// A 2D point in screen (or texture) pixel space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn origin() -> Self {
        Self::new(0.0, 0.0)
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    pub fn minus(self, other: Point) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

/// An axis-aligned rectangle in pixel space
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x-coordinate
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y-coordinate
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn top_left(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Check if this bounding box contains a point (edges inclusive)
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.right()
            && point.y >= self.y
            && point.y <= self.bottom()
    }

    /// Check if a point lies strictly inside this box (edges excluded)
    pub fn contains_strict(&self, point: Point) -> bool {
        point.x > self.x && point.x < self.right() && point.y > self.y && point.y < self.bottom()
    }

    /// Compute the union of this bounding box with another
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        BoundingBox::new(x, y, right - x, bottom - y)
    }
}

/// Integer (column, row) cell coordinate, relative to the grid's top-left cell.
///
/// May be negative or beyond the grid while a drag is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct GridPosition {
    pub x: i32,
    pub y: i32,
}

impl GridPosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Shift by `(dx, dy)`, saturating at the `i32` range.
    ///
    /// Projected anchors saturate for far-off pointers, so the sum can
    /// exceed `i32`; a saturated cell is simply out of bounds.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }

    /// True when the cell lies inside `[0, width) x [0, height)`
    pub fn within(self, width: usize, height: usize) -> bool {
        self.x >= 0 && self.y >= 0 && (self.x as usize) < width && (self.y as usize) < height
    }
}

impl std::fmt::Display for GridPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Identifier of a placed entity. Allocated from a monotonic counter and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Clockwise quarter-turn rotation of a part, in screen space (y pointing down)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(into = "u16")]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// Advance by +90 degrees
    pub fn clockwise(self) -> Self {
        match self {
            Rotation::Deg0 => Rotation::Deg90,
            Rotation::Deg90 => Rotation::Deg180,
            Rotation::Deg180 => Rotation::Deg270,
            Rotation::Deg270 => Rotation::Deg0,
        }
    }

    /// Advance by -90 degrees (mod 360)
    pub fn counter_clockwise(self) -> Self {
        match self {
            Rotation::Deg0 => Rotation::Deg270,
            Rotation::Deg90 => Rotation::Deg0,
            Rotation::Deg180 => Rotation::Deg90,
            Rotation::Deg270 => Rotation::Deg180,
        }
    }

    /// Exact (cos, sin) of the rotation angle.
    ///
    /// Quarter turns are looked up rather than computed so that composed
    /// transforms carry no trigonometric rounding.
    pub fn cos_sin(self) -> (f64, f64) {
        match self {
            Rotation::Deg0 => (1.0, 0.0),
            Rotation::Deg90 => (0.0, 1.0),
            Rotation::Deg180 => (-1.0, 0.0),
            Rotation::Deg270 => (0.0, -1.0),
        }
    }
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

impl std::fmt::Display for Rotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// How a part's texture is pinned to its shape.
///
/// `base_width`/`base_height` are the shape's column/row count when the part
/// was first instantiated. They never follow later rotations: the bitmap keeps
/// its native orientation and the width/height swap is derived from the
/// rotation instead.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TextureBinding {
    /// Texture pixels covering one grid cell
    pub pixels_per_cell: f64,
    /// Texture pixel that must coincide with the shape's top-left grid corner
    pub anchor: Point,
    pub base_width: usize,
    pub base_height: usize,
}

impl TextureBinding {
    /// Default texture pixels per cell when the catalog does not specify one
    pub const DEFAULT_PIXELS_PER_CELL: f64 = 60.0;

    /// Capture a binding for a shape at rotation 0 / unmirrored
    pub fn capture(shape: &Shape, pixels_per_cell: f64, anchor: Point) -> Self {
        Self {
            pixels_per_cell,
            anchor,
            base_width: shape.width(),
            base_height: shape.height(),
        }
    }

    /// Uniform scale from texture pixels to screen pixels
    pub fn scale_for(&self, cell_size: f64) -> f64 {
        cell_size / self.pixels_per_cell
    }
}

/// A part that has been dropped onto the grid
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedEntity {
    pub id: EntityId,
    /// Lookup-only reference into the catalog
    pub catalog_id: String,
    /// Current occupancy, after all rotations and mirrors
    pub shape: Shape,
    /// Grid cell aligned with the shape's local (0, 0)
    pub position: GridPosition,
    pub rotation: Rotation,
    pub mirrored: bool,
    pub binding: TextureBinding,
}

impl PlacedEntity {
    /// Absolute grid cells covered by this entity
    pub fn footprint(&self) -> impl Iterator<Item = GridPosition> + '_ {
        self.shape.cells_at(self.position)
    }
}
