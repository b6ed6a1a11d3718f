use std::fmt::{Display, Formatter};
use std::num::NonZero;

use ndarray::Ix;
use serde::{Deserialize, Serialize};

pub(crate) type Coord = usize;
/// A grid side length; grids are never empty along either axis.
pub type Dimension = NonZero<Coord>;

#[derive(Clone, Eq, Hash, Copy, PartialEq, Ord, PartialOrd, Debug, Serialize, Deserialize)]
/// A cell address `(x, y)` on a grid. The top left corner is `Coordinate(0, 0)`.
///
/// Coordinates are plain values handed back to callers; they never alias a node of a live graph.
pub struct Coordinate(pub Coord, pub Coord);

impl Coordinate {
    /// Column of this coordinate.
    #[inline]
    pub fn x(&self) -> Coord {
        self.0
    }

    /// Row of this coordinate.
    #[inline]
    pub fn y(&self) -> Coord {
        self.1
    }

    pub(crate) fn as_index(&self) -> (Coord, Coord) {
        (self.1, self.0)
    }

    // wraps below zero; the result then simply misses every array lookup
    pub(crate) fn offset_by(self, rhs: (isize, isize)) -> Self {
        Self(self.0.wrapping_add_signed(rhs.0), self.1.wrapping_add_signed(rhs.1))
    }
}

impl From<(Ix, Ix)> for Coordinate {
    fn from(value: (Ix, Ix)) -> Self {
        Self(value.1, value.0)
    }
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}
