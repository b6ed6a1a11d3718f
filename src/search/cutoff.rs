use std::collections::HashSet;
use std::time::Instant;

use itertools::Itertools;
use log::{debug, info, trace};
use petgraph::graph::NodeIndex;

use crate::distances::Distances;
use crate::graph::NodeGraph;
use crate::location::Coordinate;
use crate::search::{BestPlacements, MazeSearch, Placement, SearchSpace, SearchStats};

/// Finds the optimal mazes by recursively blocking cells on the current shortest paths.
///
/// A blocker placed off every shortest path cannot make the closest spawn walk further, so only cells on some
/// shortest path are ever tried. The result reaches the same objective value as [`ExhaustiveSearch`](super::ExhaustiveSearch),
/// while visiting a small fraction of the combinations.
///
/// # Deduplication
/// The same set of blockers can be reached in different insertion orders. Once a cell has been fully explored at
/// some remaining budget, it is excluded from every deeper level below its later siblings; those exclusions are
/// reset whenever a new sibling starts.
#[derive(Debug, Default)]
pub struct CutoffSearch {
    best: BestPlacements,
    stats: SearchStats,
    // indexed by blockers left
    processed: Vec<HashSet<Coordinate>>,
    max_blockers: usize,
    first_level_total: usize,
    first_level_done: usize,
}

impl CutoffSearch {
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

    fn cut_off_path(&mut self, graph: &mut NodeGraph, space: &SearchSpace, combination: &mut Vec<NodeIndex>, blockers_left: usize) {
        let (distances, on_paths) = space.spawns.shortest_path_nodes(graph);
        self.stats.combinations_checked += 1;

        let Some(distances) = distances else {
            trace!("unsolvable with {} blockers", combination.len());
            if let Some(last) = combination.last() {
                self.processed[blockers_left].insert(graph.coords(*last));
            }
            return;
        };

        self.best.offer(graph, distances, combination);

        if blockers_left == 0 {
            return;
        }

        // keep candidates in index order so runs are reproducible
        let candidates = space.build_nodes.iter()
            .copied()
            .filter(|ix| on_paths.contains(ix))
            .filter(|ix| {
                let coords = graph.coords(*ix);
                ((blockers_left + 1)..=self.max_blockers).all(|level| !self.processed[level].contains(&coords))
            })
            .collect_vec();

        if blockers_left == self.max_blockers {
            self.first_level_total = candidates.len();
        }

        for ix in candidates {
            let previous = graph.place_blocker(ix);
            combination.push(ix);
            self.cut_off_path(graph, space, combination, blockers_left - 1);
            combination.pop();
            graph.restore(ix, previous);

            self.processed[blockers_left].insert(graph.coords(ix));
            if blockers_left > 1 {
                self.processed[blockers_left - 1].clear();
            }

            if blockers_left == self.max_blockers {
                self.first_level_done += 1;
                debug!(
                    "first-level cells processed {}/{}, {} combinations checked",
                    self.first_level_done, self.first_level_total, self.stats.combinations_checked
                );
            }
        }
    }
}

impl MazeSearch for CutoffSearch {
    fn generate_optimal_mazes(&mut self, graph: &mut NodeGraph, blocker_limit: Option<usize>) -> Vec<Placement> {
        let start = Instant::now();
        let space = SearchSpace::new(graph, blocker_limit);
        self.best = BestPlacements::default();
        self.stats = SearchStats::default();
        self.max_blockers = space.max_blockers;
        self.processed = vec![HashSet::new(); space.max_blockers + 1];
        self.first_level_total = 0;
        self.first_level_done = 0;

        let mut combination = Vec::with_capacity(space.max_blockers);
        self.cut_off_path(graph, &space, &mut combination, space.max_blockers);

        self.stats.elapsed = start.elapsed();
        info!(
            "cutoff search checked {} combinations in {:.2?}, best {} with {} placements",
            self.stats.combinations_checked,
            self.stats.elapsed,
            self.best.distances.as_ref().map(ToString::to_string).unwrap_or_default(),
            self.best.placements.len(),
        );

        self.best.placements.clone()
    }
}
