use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};

use crate::cell::CellType;
use crate::config::Adjacency;
use crate::grid::Grid;
use crate::location::Coordinate;

/// One traversable grid cell.
///
/// `coords` never changes once built. `cell_type` is overwritten with [`CellType::Occupied`] while a search tries a
/// blocker here and put back before the search leaves that branch.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Node {
    pub(crate) coords: Coordinate,
    pub(crate) cell_type: CellType,
}

impl Node {
    /// Where this node sits on the grid.
    pub fn coords(&self) -> Coordinate {
        self.coords
    }

    /// The current type of this node.
    pub fn cell_type(&self) -> CellType {
        self.cell_type
    }
}

/// The walkable part of a [`Grid`] as a directed graph.
///
/// Nodes live in an arena and are addressed by [`NodeIndex`]; the node set and the edges are fixed for the
/// lifetime of the graph. Every edge `a -> b` is added on its own so that algorithms may treat the two directions
/// separately, but a freshly built graph always has both.
pub struct NodeGraph {
    pub(crate) graph: DiGraph<Node, ()>,
    pub(crate) index: HashMap<Coordinate, NodeIndex>,
    pub(crate) build_nodes: Vec<NodeIndex>,
    pub(crate) spawn_nodes: Vec<NodeIndex>,
    pub(crate) exit_nodes: Vec<NodeIndex>,
}

impl NodeGraph {
    /// Build the graph of all traversable cells of `grid`, connecting each to its traversable neighbors under `adjacency`.
    ///
    /// Cells which cannot be walked on, such as [`CellType::Void`] or pre-placed blockers, never become nodes.
    pub fn build(grid: &Grid, adjacency: Adjacency) -> Self {
        let mut graph = DiGraph::with_capacity(
            grid.cells.len(),
            // every interior node has a full neighborhood; close enough for small maps
            grid.cells.len() * adjacency.neighbors_of(Coordinate(1, 1)).len(),
        );
        let mut index = HashMap::with_capacity(grid.cells.len());

        for (coords, cell_type) in grid.cells().filter(|(_, cell_type)| cell_type.is_traversable()) {
            index.insert(coords, graph.add_node(Node { coords, cell_type }));
        }

        // node indices follow row-major order, so this walk is deterministic
        for ix in graph.node_indices().collect::<Vec<_>>() {
            let coords = graph[ix].coords;
            for neighbor in adjacency.neighbors_of(coords) {
                if let Some(&other) = index.get(&neighbor) {
                    graph.add_edge(ix, other, ());
                }
            }
        }

        let select = |predicate: fn(CellType) -> bool| graph.node_indices()
            .filter(|ix| predicate(graph[*ix].cell_type))
            .collect::<Vec<_>>();
        let build_nodes = select(CellType::allow_building);
        let spawn_nodes = select(CellType::is_spawn);
        let exit_nodes = select(CellType::is_exit);

        Self {
            graph,
            index,
            build_nodes,
            spawn_nodes,
            exit_nodes,
        }
    }

    /// Number of traversable cells.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// The node at `location`, if that cell is traversable.
    pub fn node_at(&self, location: Coordinate) -> Option<NodeIndex> {
        self.index.get(&location).copied()
    }

    /// The node behind `ix`.
    pub fn node(&self, ix: NodeIndex) -> &Node {
        &self.graph[ix]
    }

    /// Shorthand for the coordinates of the node behind `ix`.
    pub fn coords(&self, ix: NodeIndex) -> Coordinate {
        self.graph[ix].coords
    }

    /// Shorthand for the current type of the node behind `ix`.
    pub fn cell_type(&self, ix: NodeIndex) -> CellType {
        self.graph[ix].cell_type
    }

    /// Nodes a blocker may be placed on, before any search-specific reduction.
    pub fn build_nodes(&self) -> &[NodeIndex] {
        &self.build_nodes
    }

    /// Every spawn node.
    pub fn spawn_nodes(&self) -> &[NodeIndex] {
        &self.spawn_nodes
    }

    /// Every exit node.
    pub fn exit_nodes(&self) -> &[NodeIndex] {
        &self.exit_nodes
    }

    /// Outgoing neighbors of `ix`, regardless of their current type.
    pub fn neighbors(&self, ix: NodeIndex) -> impl Iterator<Item=NodeIndex> + '_ {
        self.graph.neighbors(ix)
    }

    /// Number of outgoing edges of `ix`.
    pub fn degree(&self, ix: NodeIndex) -> usize {
        self.graph.neighbors(ix).count()
    }

    #[inline]
    pub(crate) fn is_traversable(&self, ix: NodeIndex) -> bool {
        self.graph[ix].cell_type.is_traversable()
    }

    /// Turn `ix` into a blocker, returning the type it had so the caller can [`restore`](Self::restore) it.
    pub(crate) fn place_blocker(&mut self, ix: NodeIndex) -> CellType {
        std::mem::replace(&mut self.graph[ix].cell_type, CellType::Occupied)
    }

    pub(crate) fn restore(&mut self, ix: NodeIndex, cell_type: CellType) {
        self.graph[ix].cell_type = cell_type;
    }

    /// Count of traversable nodes which cannot hold a blocker (spawns and exits included).
    pub(crate) fn unbuildable_count(&self) -> usize {
        self.graph.node_weights()
            .filter(|node| node.cell_type.is_traversable() && !node.cell_type.allow_building())
            .count()
    }
}
