use std::fmt::{Display, Formatter};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Shortest walking distances to an exit, one per spawn.
///
/// Values are kept sorted ascending, so the derived ordering compares two instances by their sorted sequences,
/// element by element. This is the objective every search maximizes: the closest spawn matters most.
#[derive(Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Distances(Vec<usize>);

impl Distances {
    /// Wrap `values` in any order.
    pub fn new(mut values: Vec<usize>) -> Self {
        values.sort_unstable();
        Self(values)
    }

    /// The sorted distances.
    pub fn values(&self) -> &[usize] {
        &self.0
    }

    /// The shortest of the distances.
    pub fn shortest(&self) -> Option<usize> {
        self.0.first().copied()
    }

    /// The longest of the distances.
    pub fn longest(&self) -> Option<usize> {
        self.0.last().copied()
    }

    /// Number of spawns measured.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no spawn was measured.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<usize> for Distances {
    fn from_iter<T: IntoIterator<Item=usize>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl Display for Distances {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.0.iter().join(", "))
    }
}
