use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::location::Coordinate;
use crate::shape::{GridShape, KingStep, SquareStep};

/// Which cells count as neighbors when the grid is turned into a graph.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Display, EnumString, Serialize, Deserialize)]
pub enum Adjacency {
    /// Up, down, left and right.
    #[default]
    #[strum(to_string = "4", serialize = "cardinal")]
    #[serde(rename = "4", alias = "cardinal")]
    Cardinal,
    /// Cardinals plus diagonals.
    #[strum(to_string = "8", serialize = "king")]
    #[serde(rename = "8", alias = "king")]
    King,
}

impl Adjacency {
    pub(crate) fn neighbors_of(self, location: Coordinate) -> Vec<Coordinate> {
        match self {
            Self::Cardinal => SquareStep::neighbors_of(location),
            Self::King => KingStep::neighbors_of(location),
        }
    }
}

/// The search strategy used by [`Grid::optimize`](crate::Grid::optimize).
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Try every combination of blockers; see [`ExhaustiveSearch`](crate::search::ExhaustiveSearch).
    Exhaustive,
    /// Branch and bound over shortest-path cells; see [`CutoffSearch`](crate::search::CutoffSearch).
    #[default]
    Cutoff,
    /// Tabular Q-learning; see [`QLearnSearch`](crate::search::QLearnSearch).
    #[strum(to_string = "qlearn", serialize = "q_learn")]
    #[serde(rename = "qlearn", alias = "q_learn")]
    QLearn,
}

/// Tuning for [`QLearnSearch`](crate::search::QLearnSearch).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QLearnParams {
    /// Learning rate.
    pub alpha: f64,
    /// Probability of taking a random action while training.
    pub epsilon: f64,
    /// Episodes trained per traversable cell.
    pub training_multiplier: usize,
    /// Reward for a move that keeps the agent alive.
    pub reward_normal: f64,
    /// Reward for a move into a dead end.
    pub reward_fail: f64,
    /// Reward for a move next to an exit.
    pub reward_goal: f64,
    /// Seed for the exploration RNG; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for QLearnParams {
    fn default() -> Self {
        Self {
            alpha: 0.5,
            epsilon: 0.4,
            training_multiplier: 3000,
            reward_normal: 2.0,
            reward_fail: -1.0,
            reward_goal: 0.0,
            seed: None,
        }
    }
}

/// Everything an optimization run needs besides the grid itself.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Neighbor mode used to build the graph.
    pub adjacency: Adjacency,
    /// Upper bound on the number of blockers; `None` lets the search derive its own.
    pub blocker_limit: Option<usize>,
    /// Which search runs.
    pub strategy: Strategy,
    /// Parameters for [`Strategy::QLearn`].
    pub qlearn: QLearnParams,
}

impl OptimizerConfig {
    /// Shorthand for a default configuration running `strategy`.
    pub fn with_strategy(strategy: Strategy) -> Self {
        Self {
            strategy,
            ..Default::default()
        }
    }

    /// Cap the number of blockers at `limit`.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.blocker_limit = Some(limit);
        self
    }
}
