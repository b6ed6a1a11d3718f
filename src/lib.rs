#![warn(missing_docs)]

//! # `tdmaze`
//!
//! An optimizer for blocker placement in grid-based tower defense maps.
//! Enemies walk from every spawn to the nearest exit along a shortest path; placing blockers (towers, walls) on open
//! cells lengthens that walk. This crate finds the placements which make the closest spawn walk as far as possible.
//!
//! Begin by building a [`Grid`], either with a [`GridBuilder`] or by parsing a snapshot:
//!
//! ```
//! use tdmaze::{Grid, OptimizerConfig};
//!
//! let grid: Grid = "...\nS.E\n...\n".parse().unwrap();
//! let placements = grid.optimize(&OptimizerConfig::default().with_limit(1)).unwrap();
//! assert_eq!(format!("{}", grid.with_blockers(&placements[0])), "...\nS#E\n...\n");
//! ```
//!
//! # Internals
//! [`Grid::optimize`] turns the traversable cells into a [`NodeGraph`], checks that every spawn reaches an exit and
//! every exit is reached, then hands the graph to one of three strategies in [`search`]:
//!
//! 1. [`ExhaustiveSearch`](search::ExhaustiveSearch) tries every combination of blockers. It is exact and slow.
//! 2. [`CutoffSearch`](search::CutoffSearch) only ever blocks cells on a current shortest path, recursing until the
//! blocker budget runs out. It reaches the same objective value as the exhaustive search.
//! 3. [`QLearnSearch`](search::QLearnSearch) trains an agent to walk the longest path and walls in everything else.
//! It is a heuristic for single-spawn maps.
//!
//! Before searching, forced corridors next to spawns and exits are dropped from the buildable cells, spawns walled in
//! by other spawns are left unmeasured (their distance follows from their cluster), and a ceiling on the useful number
//! of blockers is derived from the map.
//!
//! The objective is [`Distances`]: the shortest distance of every spawn, sorted ascending and compared
//! lexicographically.

pub use builder::GridBuilder;
pub use cell::CellType;
pub use config::{Adjacency, OptimizerConfig, QLearnParams, Strategy};
pub use distances::Distances;
pub use error::{BuilderInvalidReason, GridParseError, ValidationError};
pub use graph::{Node, NodeGraph};
pub use grid::Grid;
pub use location::{Coordinate, Dimension};
pub use reduce::SpawnSet;
pub use search::{MazeSearch, Placement};

/// Fluent construction of grids.
pub mod builder;
/// Cell types and their capabilities.
pub mod cell;
/// Optimizer settings.
pub mod config;
/// The objective value.
pub mod distances;
pub mod error;
/// The walkable graph behind a grid.
pub mod graph;
/// Rectangular maps and their snapshot format.
pub mod grid;
/// Cell addresses.
pub mod location;
pub mod search;
/// Neighborhoods.
pub mod shape;
mod reachability;
mod reduce;
mod validation;
mod tests;
