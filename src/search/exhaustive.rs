use std::time::Instant;

use itertools::Itertools;
use log::{debug, info};

use crate::distances::Distances;
use crate::graph::NodeGraph;
use crate::search::{BestPlacements, MazeSearch, Placement, SearchSpace, SearchStats};

/// Finds the optimal mazes by testing every combination of blockers, from zero blockers up to the ceiling.
///
/// The number of combinations grows exponentially with the number of buildable cells, so this is only usable on
/// small maps. It is the reference the other strategies are checked against.
#[derive(Debug, Default)]
pub struct ExhaustiveSearch {
    best: BestPlacements,
    stats: SearchStats,
}

impl ExhaustiveSearch {
    /// A search with nothing recorded yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Objective value of the placements returned by the last run.
    pub fn best_distances(&self) -> Option<&Distances> {
        self.best.distances.as_ref()
    }

    /// Counters of the last run.
    pub fn stats(&self) -> SearchStats {
        self.stats
    }
}

impl MazeSearch for ExhaustiveSearch {
    fn generate_optimal_mazes(&mut self, graph: &mut NodeGraph, blocker_limit: Option<usize>) -> Vec<Placement> {
        let start = Instant::now();
        let space = SearchSpace::new(graph, blocker_limit);
        self.best = BestPlacements::default();
        self.stats = SearchStats::default();

        for count in 0..=space.max_blockers {
            for combination in space.build_nodes.iter().copied().combinations(count) {
                self.stats.combinations_checked += 1;

                let previous = combination.iter()
                    .map(|ix| graph.place_blocker(*ix))
                    .collect_vec();
                let distances = space.spawns.distances(graph);
                for (ix, cell_type) in combination.iter().zip(previous) {
                    graph.restore(*ix, cell_type);
                }

                // a combination sealing off a spawn is simply not a maze
                if let Some(distances) = distances {
                    self.best.offer(graph, distances, &combination);
                }
            }

            debug!("blocker count {} done, {} combinations checked so far", count, self.stats.combinations_checked);
        }

        self.stats.elapsed = start.elapsed();
        info!(
            "exhaustive search checked {} combinations in {:.2?}, best {}",
            self.stats.combinations_checked,
            self.stats.elapsed,
            self.best.distances.as_ref().map(ToString::to_string).unwrap_or_default(),
        );

        self.best.placements.clone()
    }
}
