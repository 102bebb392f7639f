//! Error types for the placement engine
//!
//! Placement itself never fails: an infeasible drop is an ordinary outcome
//! reported through [`super::Placement`]. Errors only arise when building
//! shapes from untrusted data.

use thiserror::Error;

/// Errors that can occur when building a [`super::Shape`] from raw rows
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShapeError {
    /// Rows of the occupancy matrix differ in length
    #[error("shape row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
}

impl ShapeError {
    pub fn ragged(row: usize, expected: usize, found: usize) -> Self {
        Self::Ragged {
            row,
            expected,
            found,
        }
    }
}
