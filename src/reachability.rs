//! Breadth- and depth-first traversals over the walkable part of a [`NodeGraph`].
//!
//! Every traversal only ever steps into nodes whose current type [is traversable](CellType::is_traversable), so a
//! node turned into a blocker behaves exactly like a wall. Scratch state (visited marks, distances) is allocated per
//! call, which makes every call independent of the ones before it.

use std::collections::{HashSet, VecDeque};

use petgraph::graph::NodeIndex;
use petgraph::visit::{VisitMap, Visitable};
use petgraph::Direction;

use crate::cell::CellType;
use crate::distances::Distances;
use crate::graph::NodeGraph;

impl NodeGraph {
    /// Number of steps from `from` to the nearest node of type `target`, or [`None`] if no such node can be reached.
    pub fn shortest_distance(&self, from: NodeIndex, target: CellType) -> Option<usize> {
        if self.cell_type(from) == target {
            return Some(0);
        }

        let mut visited = self.graph.visit_map();
        let mut queue = VecDeque::new();
        visited.visit(from);
        queue.push_back((from, 0));

        while let Some((ix, distance)) = queue.pop_front() {
            for neighbor in self.graph.neighbors(ix) {
                if !self.is_traversable(neighbor) || !visited.visit(neighbor) {
                    continue;
                }
                if self.cell_type(neighbor) == target {
                    return Some(distance + 1);
                }
                queue.push_back((neighbor, distance + 1));
            }
        }

        None
    }

    /// Distance from `from` to the nearest node of type `target`, together with every node lying on any shortest
    /// path to any of the nearest such nodes (ties included). Both endpoints belong to the set.
    ///
    /// Returns [`None`] if no node of type `target` can be reached.
    pub fn nodes_on_shortest_paths(&self, from: NodeIndex, target: CellType) -> Option<(usize, HashSet<NodeIndex>)> {
        let mut distances: Vec<Option<usize>> = vec![None; self.graph.node_count()];
        let mut targets = Vec::new();
        let mut best = None;
        let mut queue = VecDeque::new();

        distances[from.index()] = Some(0);
        if self.cell_type(from) == target {
            best = Some(0);
            targets.push(from);
        } else {
            queue.push_back(from);
        }

        while let Some(ix) = queue.pop_front() {
            let distance = distances[ix.index()].unwrap_or_default();
            // everything closer than the nearest target has been expanded; anything further is irrelevant
            if best.is_some_and(|best| distance >= best) {
                break;
            }

            for neighbor in self.graph.neighbors(ix) {
                if !self.is_traversable(neighbor) || distances[neighbor.index()].is_some() {
                    continue;
                }
                distances[neighbor.index()] = Some(distance + 1);

                if self.cell_type(neighbor) == target {
                    // BFS order guarantees every target found from here on is at this same distance
                    best.get_or_insert(distance + 1);
                    targets.push(neighbor);
                } else {
                    queue.push_back(neighbor);
                }
            }
        }

        let best = best?;

        // walk back from every tied target, only ever stepping to a node exactly one closer to the source
        let mut on_path: HashSet<NodeIndex> = targets.iter().copied().collect();
        let mut stack = targets;
        while let Some(ix) = stack.pop() {
            let Some(distance) = distances[ix.index()] else { continue };
            if distance == 0 {
                continue;
            }

            for predecessor in self.graph.neighbors_directed(ix, Direction::Incoming) {
                if distances[predecessor.index()] == Some(distance - 1) && on_path.insert(predecessor) {
                    stack.push(predecessor);
                }
            }
        }

        Some((best, on_path))
    }

    /// [`Self::shortest_distance`] for every node in `sources`.
    ///
    /// Returns [`None`] as soon as any source cannot reach a node of type `target`.
    pub fn multi_source_distances(&self, sources: &[NodeIndex], target: CellType) -> Option<Distances> {
        sources.iter()
            .map(|source| self.shortest_distance(*source, target))
            .collect::<Option<Vec<_>>>()
            .map(Distances::new)
    }

    /// [`Self::nodes_on_shortest_paths`] for every node in `sources`, with the node sets merged.
    ///
    /// If some source cannot reach a node of type `target`, the distances are [`None`] and the set holds whatever
    /// was collected from the sources before it.
    pub fn multi_source_shortest_path_nodes(&self, sources: &[NodeIndex], target: CellType) -> (Option<Distances>, HashSet<NodeIndex>) {
        let mut distances = Vec::with_capacity(sources.len());
        let mut nodes = HashSet::new();

        for source in sources {
            match self.nodes_on_shortest_paths(*source, target) {
                Some((distance, on_path)) => {
                    distances.push(distance);
                    nodes.extend(on_path);
                }
                None => return (None, nodes),
            }
        }

        (Some(Distances::new(distances)), nodes)
    }

    /// Any node of type `target` reachable from `from` (excluding `from` itself), found depth first.
    pub fn find_any(&self, from: NodeIndex, target: CellType) -> Option<NodeIndex> {
        let mut visited = self.graph.visit_map();
        let mut stack = vec![from];
        visited.visit(from);

        while let Some(ix) = stack.pop() {
            for neighbor in self.graph.neighbors(ix) {
                if !self.is_traversable(neighbor) || !visited.visit(neighbor) {
                    continue;
                }
                if self.cell_type(neighbor) == target {
                    return Some(neighbor);
                }
                stack.push(neighbor);
            }
        }

        None
    }

    /// All nodes connected to `from` through nodes of the same type as `from`, `from` first.
    pub fn cluster_of(&self, from: NodeIndex) -> Vec<NodeIndex> {
        let cell_type = self.cell_type(from);
        let mut visited = self.graph.visit_map();
        let mut cluster = vec![from];
        let mut stack = vec![from];
        visited.visit(from);

        while let Some(ix) = stack.pop() {
            for neighbor in self.graph.neighbors(ix) {
                if self.cell_type(neighbor) == cell_type && visited.visit(neighbor) {
                    cluster.push(neighbor);
                    stack.push(neighbor);
                }
            }
        }

        cluster
    }
}
