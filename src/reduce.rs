use std::collections::{HashMap, HashSet, VecDeque};

use itertools::Itertools;
use petgraph::graph::NodeIndex;
use petgraph::visit::{VisitMap, Visitable};

use crate::cell::CellType;
use crate::distances::Distances;
use crate::graph::NodeGraph;

impl NodeGraph {
    /// Remove forced corridors from `build_nodes`, returning the removed nodes in removal order.
    ///
    /// For every spawn or exit with exactly one neighbor, walk along the chain of degree-2 nodes starting at that
    /// neighbor. Every buildable node on the chain is dropped from `build_nodes` (the graph is untouched): a blocker there
    /// either seals the spawn or exit off or sits on a path that has to be taken anyway. A walk ends at a branch, at a dead end,
    /// at another spawn or exit, or at a node some earlier walk already passed.
    pub fn clear_single_paths(&self, build_nodes: &mut Vec<NodeIndex>) -> Vec<NodeIndex> {
        let mut visited = self.graph.visit_map();
        let mut removed = Vec::new();
        let is_endpoint = |ix: NodeIndex| self.cell_type(ix).is_spawn() || self.cell_type(ix).is_exit();

        for &start in self.spawn_nodes.iter().chain(self.exit_nodes.iter()) {
            let mut neighbors = self.graph.neighbors(start);
            let (Some(first), None) = (neighbors.next(), neighbors.next()) else {
                continue;
            };
            visited.visit(start);

            if is_endpoint(first) || !visited.visit(first) {
                continue;
            }
            if self.cell_type(first).allow_building() {
                removed.push(first);
            }

            let mut previous = start;
            let mut current = first;
            while self.degree(current) == 2 {
                let Some(next) = self.graph.neighbors(current).find(|ix| *ix != previous) else {
                    break;
                };
                if is_endpoint(next) {
                    visited.visit(next);
                    break;
                }
                if !visited.visit(next) {
                    break;
                }
                if self.cell_type(next).allow_building() {
                    removed.push(next);
                }

                previous = current;
                current = next;
            }
        }

        let dropped: HashSet<NodeIndex> = removed.iter().copied().collect();
        build_nodes.retain(|ix| !dropped.contains(ix));
        removed
    }

    /// Split the spawns into those measured directly and those whose distance follows from the measured ones.
    ///
    /// A spawn whose every neighbor is another spawn can only leave its cluster through a member with some other
    /// neighbor, and nothing inside a cluster can ever be blocked. Its distance is therefore the least of
    /// `hops + distance` over those border members, and it is never measured. A cluster with no border member is
    /// measured whole.
    pub fn spawn_set(&self) -> SpawnSet {
        let mut covered = HashSet::new();
        let mut measured = Vec::with_capacity(self.spawn_nodes.len());
        let mut enclosed: Vec<NodeIndex> = Vec::new();

        for &spawn in &self.spawn_nodes {
            if covered.contains(&spawn) {
                continue;
            }

            let cluster = self.cluster_of(spawn);
            let (inner, border): (Vec<NodeIndex>, Vec<NodeIndex>) = cluster.iter()
                .copied()
                .partition(|ix| self.graph.neighbors(*ix).all(|neighbor| self.cell_type(neighbor).is_spawn()));

            if border.is_empty() {
                measured.extend(inner);
            } else {
                measured.extend(border);
                enclosed.extend(inner);
            }
            covered.extend(cluster);
        }

        measured.sort_unstable();
        enclosed.sort_unstable();

        let slots: HashMap<NodeIndex, usize> = measured.iter()
            .enumerate()
            .map(|(slot, ix)| (*ix, slot))
            .collect();
        let derived = enclosed.iter()
            .map(|ix| self.hops_to_border(*ix, &slots))
            .collect();

        SpawnSet { measured, enclosed, derived }
    }

    /// Hops from `from` to every measured member of its cluster, walking over spawns only.
    fn hops_to_border(&self, from: NodeIndex, slots: &HashMap<NodeIndex, usize>) -> Vec<(usize, usize)> {
        let mut visited = self.graph.visit_map();
        let mut queue = VecDeque::from([(from, 0)]);
        let mut routes = Vec::new();
        visited.visit(from);

        while let Some((ix, hops)) = queue.pop_front() {
            if let Some(&slot) = slots.get(&ix) {
                routes.push((slot, hops));
            }
            for neighbor in self.graph.neighbors(ix) {
                if self.cell_type(neighbor).is_spawn() && visited.visit(neighbor) {
                    queue.push_back((neighbor, hops + 1));
                }
            }
        }

        routes
    }
}

/// The spawns of a graph as a search sees them.
///
/// Only [`measured`](Self::measured) spawns are walked from; the distances of the other spawns are rebuilt from
/// theirs, so every [`Distances`] produced here still holds one value per spawn.
#[derive(Clone, Debug, Default)]
pub struct SpawnSet {
    measured: Vec<NodeIndex>,
    enclosed: Vec<NodeIndex>,
    // per enclosed spawn: (slot in `measured`, hops)
    derived: Vec<Vec<(usize, usize)>>,
}

impl SpawnSet {
    /// Spawns measured directly, in index order.
    pub fn measured(&self) -> &[NodeIndex] {
        &self.measured
    }

    /// Spawns whose distance is derived from a measured member of their cluster.
    pub fn enclosed(&self) -> &[NodeIndex] {
        &self.enclosed
    }

    /// Number of spawns covered, measured or not.
    pub fn len(&self) -> usize {
        self.measured.len() + self.enclosed.len()
    }

    /// Whether the graph has no spawns.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Distance of every spawn to the nearest exit, or [`None`] if some spawn cannot reach one.
    pub fn distances(&self, graph: &NodeGraph) -> Option<Distances> {
        let measured = self.measured.iter()
            .map(|spawn| graph.shortest_distance(*spawn, CellType::Exit))
            .collect::<Option<Vec<_>>>()?;

        Some(self.complete(measured))
    }

    /// [`Self::distances`] together with every node on a shortest path of a measured spawn.
    ///
    /// Shortest paths of enclosed spawns run through their cluster to a measured member and continue along one of its
    /// shortest paths, so no buildable node is missed. On failure the set holds whatever was collected so far.
    pub fn shortest_path_nodes(&self, graph: &NodeGraph) -> (Option<Distances>, HashSet<NodeIndex>) {
        let mut measured = Vec::with_capacity(self.measured.len());
        let mut nodes = HashSet::new();

        for spawn in &self.measured {
            match graph.nodes_on_shortest_paths(*spawn, CellType::Exit) {
                Some((distance, on_path)) => {
                    measured.push(distance);
                    nodes.extend(on_path);
                }
                None => return (None, nodes),
            }
        }

        (Some(self.complete(measured)), nodes)
    }

    fn complete(&self, mut measured: Vec<usize>) -> Distances {
        let derived = self.derived.iter()
            .filter_map(|routes| routes.iter().map(|(slot, hops)| measured[*slot] + hops).min())
            .collect_vec();
        measured.extend(derived);

        Distances::new(measured)
    }
}
