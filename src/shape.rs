use std::hash::Hash;

use itertools::Itertools;
use strum::VariantArray;

use crate::location::Coordinate;

/// A single move between neighboring cells.
///
/// [`SquareStep`] (4-connected) and [`KingStep`] (8-connected) are the built-in neighborhoods.
pub trait Step: Sized + Copy + VariantArray + PartialEq + Eq + Hash + Ord + PartialOrd {
    /// The `(dx, dy)` offset of this step.
    fn delta(&self) -> (isize, isize);

    /// Attempt the step from `location` in the direction specified by `self` and return the resultant [`Coordinate`].
    ///
    /// Steps off the top or left edge wrap and are rejected by any later bounds check.
    fn attempt_from(&self, location: Coordinate) -> Coordinate {
        location.offset_by(self.delta())
    }
}

/// The four cardinal moves.
#[derive(Copy, Clone, VariantArray, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
pub enum SquareStep {
    /// `(0, -1)`
    Up,
    /// `(0, 1)`
    Down,
    /// `(-1, 0)`
    Left,
    /// `(1, 0)`
    Right,
}

impl Step for SquareStep {
    fn delta(&self) -> (isize, isize) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
        }
    }
}

/// The eight moves of a chess king: cardinals plus diagonals.
#[derive(Copy, Clone, VariantArray, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
#[allow(missing_docs)]
pub enum KingStep {
    Up,
    UpRight,
    Right,
    DownRight,
    Down,
    DownLeft,
    Left,
    UpLeft,
}

impl Step for KingStep {
    fn delta(&self) -> (isize, isize) {
        match self {
            Self::Up => (0, -1),
            Self::UpRight => (1, -1),
            Self::Right => (1, 0),
            Self::DownRight => (1, 1),
            Self::Down => (0, 1),
            Self::DownLeft => (-1, 1),
            Self::Left => (-1, 0),
            Self::UpLeft => (-1, -1),
        }
    }
}

/// Functionality on top of [`Step`] with identical implementation across all neighborhoods.
pub trait GridShape: Step {
    /// Get all neighbors of a [`Coordinate`] in "theory", by attempting every step direction in `Self::VARIANTS`.
    ///
    /// Nothing here knows the grid bounds; callers drop the locations that miss the grid.
    fn neighbors_of(location: Coordinate) -> Vec<Coordinate>;
}

impl<Sh> GridShape for Sh
where
    Sh: Step,
{
    fn neighbors_of(location: Coordinate) -> Vec<Coordinate> {
        Self::VARIANTS.iter()
            .map(|dir| dir.attempt_from(location))
            .collect_vec()
    }
}
