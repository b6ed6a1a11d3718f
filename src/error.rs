//! Error types for grid construction and map validation.

use thiserror::Error;

use crate::location::Coordinate;

/// Reasons a map is unplayable. All of these are terminal for the given grid: fix the grid and resubmit.
#[derive(Error, Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ValidationError {
    /// The grid has no spawn cell.
    #[error("not enough spawns")]
    NotEnoughSpawns,
    /// The grid has no exit cell.
    #[error("not enough exits")]
    NotEnoughExits,
    /// Some spawn cannot walk to any exit.
    #[error("a spawn is blocked")]
    SpawnBlocked,
    /// Some exit cannot be reached from any spawn.
    #[error("an exit is blocked")]
    ExitBlocked,
}

/// Reasons a grid snapshot fails to parse.
#[derive(Error, Clone, Debug, Eq, PartialEq)]
pub enum GridParseError {
    /// The snapshot has no rows, or only empty ones.
    #[error("grid snapshot is empty")]
    Empty,
    /// A character does not name any cell type.
    #[error("unknown cell symbol {symbol:?} at {location}")]
    UnknownSymbol {
        /// The offending character.
        symbol: char,
        /// Where it was found.
        location: Coordinate,
    },
    /// Rows differ in length.
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        /// Zero-based row index.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of this row.
        found: usize,
    },
}

/// Reasons a builder may become invalid while building.
#[derive(Error, Copy, Clone, Debug, Eq, PartialEq)]
pub enum BuilderInvalidReason {
    /// A cell was written outside the bounds specified by `dims` on a builder.
    #[error("feature out of bounds")]
    FeatureOutOfBounds,
}
