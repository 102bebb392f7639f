//! Occupancy matrices and their quarter-turn / mirror transforms.
//!
//! A [`Shape`] is a rectangular matrix of booleans indexed `[row][column]`,
//! with `true` marking a cell the part covers relative to its own top-left
//! corner. Shapes are immutable: every transform returns a new value.

use serde::Serialize;

use super::error::ShapeError;
use super::types::GridPosition;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Shape {
    rows: Vec<Vec<bool>>,
}

impl Shape {
    /// Build a shape from boolean rows.
    ///
    /// Rows must all have the same length. A matrix with no columns collapses
    /// to the empty shape.
    pub fn new(rows: Vec<Vec<bool>>) -> Result<Self, ShapeError> {
        let expected = rows.first().map(Vec::len).unwrap_or(0);
        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != expected {
                return Err(ShapeError::ragged(row, expected, cells.len()));
            }
        }
        if expected == 0 {
            return Ok(Self::empty());
        }
        Ok(Self { rows })
    }

    /// Build a shape from 0/1 rows; any nonzero value marks an occupied cell
    pub fn from_bits<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, ShapeError> {
        Self::new(
            rows.iter()
                .map(|row| row.as_ref().iter().map(|&bit| bit != 0).collect())
                .collect(),
        )
    }

    pub fn empty() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column count
    pub fn width(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }

    /// Row count
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<bool>] {
        &self.rows
    }

    /// Whether local cell `(x, y)` is occupied; out of range reads as empty
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.rows
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .unwrap_or(false)
    }

    /// Occupied local cells as `(x, y)`, row-major
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, occupied)| **occupied)
                .map(move |(x, _)| (x, y))
        })
    }

    /// Occupied cells translated so that local (0, 0) sits on `anchor`
    pub fn cells_at(&self, anchor: GridPosition) -> impl Iterator<Item = GridPosition> + '_ {
        self.cells()
            .map(move |(x, y)| anchor.offset(x as i32, y as i32))
    }

    /// Number of occupied cells
    pub fn area(&self) -> usize {
        self.cells().count()
    }

    /// Rotate 90° clockwise.
    ///
    /// The result has `height()` columns and `width()` rows; input cell
    /// `(x, y)` lands on `(height - 1 - y, x)`.
    pub fn rotate_clockwise(&self) -> Shape {
        let rows = self.height();
        let cols = self.width();
        if rows == 0 || cols == 0 {
            return Shape::empty();
        }
        let mut rotated = vec![vec![false; rows]; cols];
        for (y, row) in self.rows.iter().enumerate() {
            for (x, &occupied) in row.iter().enumerate() {
                rotated[x][rows - 1 - y] = occupied;
            }
        }
        Shape { rows: rotated }
    }

    /// Reverse the column order of every row
    pub fn mirror_horizontal(&self) -> Shape {
        Shape {
            rows: self
                .rows
                .iter()
                .map(|row| row.iter().rev().copied().collect())
                .collect(),
        }
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, row) in self.rows.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            for &occupied in row {
                f.write_str(if occupied { "#" } else { "." })?;
            }
        }
        Ok(())
    }
}
