//! Strategies searching for the blocker placement which maximizes the walking distance from every spawn to an exit.
//!
//! All strategies implement [`MazeSearch`] and start from the same [`SearchSpace`]: the buildable nodes left after
//! corridor elimination, the spawns split into measured and derived ones, and a ceiling on the number of blockers
//! worth trying.

use std::time::Duration;

use itertools::Itertools;
use log::info;
use petgraph::graph::NodeIndex;

use crate::cell::CellType;
use crate::distances::Distances;
use crate::graph::NodeGraph;
use crate::location::Coordinate;
use crate::reduce::SpawnSet;

pub use cutoff::CutoffSearch;
pub use exhaustive::ExhaustiveSearch;
pub use qlearn::QLearnSearch;

mod cutoff;
mod exhaustive;
mod qlearn;

/// Cells to turn into blockers, sorted.
pub type Placement = Vec<Coordinate>;

/// Functionality every search strategy provides.
pub trait MazeSearch {
    /// Search `graph` for the best blocker placements using at most `blocker_limit` blockers (if given).
    ///
    /// `graph` must have passed [`NodeGraph::validate`]. Its node types are changed while searching but are
    /// restored before this returns. Every returned placement reaches the best objective value found.
    fn generate_optimal_mazes(&mut self, graph: &mut NodeGraph, blocker_limit: Option<usize>) -> Vec<Placement>;
}

/// Progress counters of a search run.
#[derive(Clone, Copy, Debug, Default)]
pub struct SearchStats {
    /// Blocker combinations (or training episodes) evaluated.
    pub combinations_checked: u64,
    /// Wall time of the last run.
    pub elapsed: Duration,
}

/// What a search works with, derived once per run from a validated graph.
#[derive(Clone, Debug)]
pub struct SearchSpace {
    /// Nodes a blocker may go on, after corridor elimination, in index order.
    pub build_nodes: Vec<NodeIndex>,
    /// Nodes dropped from `build_nodes` by corridor elimination.
    pub removed: Vec<NodeIndex>,
    /// Every spawn, split into those walked from and those derived from them.
    pub spawns: SpawnSet,
    /// The greatest shortest distance of any spawn on the unmodified map.
    pub maxmin_distance: usize,
    /// Most blockers a search will place.
    pub max_blockers: usize,
}

impl SearchSpace {
    /// Derive the search space of `graph`, honoring `blocker_limit` if it is tighter than the derived ceiling.
    pub fn new(graph: &NodeGraph, blocker_limit: Option<usize>) -> Self {
        let mut build_nodes = graph.build_nodes().to_vec();
        let removed = graph.clear_single_paths(&mut build_nodes);
        let spawns = graph.spawn_set();

        // validated maps always reach an exit
        let maxmin_distance = graph.multi_source_distances(graph.spawn_nodes(), CellType::Exit)
            .and_then(|distances| distances.longest())
            .unwrap_or_default();

        let ceiling = max_blocker_count(build_nodes.len(), maxmin_distance, removed.len(), graph.unbuildable_count());
        let max_blockers = match blocker_limit {
            Some(limit) if limit <= ceiling => limit,
            _ => ceiling,
        };

        info!(
            "search space: {} buildable ({} removed as corridors), {} of {} spawns measured, maxmin distance {}, up to {} blockers",
            build_nodes.len(), removed.len(), spawns.measured().len(), spawns.len(), maxmin_distance, max_blockers
        );

        Self {
            build_nodes,
            removed,
            spawns,
            maxmin_distance,
            max_blockers,
        }
    }
}

/// Upper bound on the number of useful blockers.
///
/// This is an approximation, not a proven bound: it ignores several exits, and unbuildable cells which are not on
/// the longest shortest path still shrink it. Searches use it only as a ceiling.
pub fn max_blocker_count(build_count: usize, maxmin_distance: usize, removed: usize, unbuildable: usize) -> usize {
    build_count.saturating_sub((maxmin_distance + 1).saturating_sub(removed + unbuildable))
}

/// The placements reaching the best [`Distances`] seen so far.
#[derive(Clone, Debug, Default)]
pub(crate) struct BestPlacements {
    pub(crate) distances: Option<Distances>,
    pub(crate) placements: Vec<Placement>,
}

impl BestPlacements {
    /// Record `combination` if it is at least as good as the best so far; a strict improvement forgets the ties.
    pub(crate) fn offer(&mut self, graph: &NodeGraph, distances: Distances, combination: &[NodeIndex]) {
        match &self.distances {
            Some(best) if distances < *best => return,
            Some(best) if distances == *best => {}
            _ => {
                self.distances = Some(distances);
                self.placements.clear();
            }
        }

        self.placements.push(combination.iter().map(|ix| graph.coords(*ix)).sorted().collect_vec());
    }
}
