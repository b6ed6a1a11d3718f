use std::fmt::{Display, Formatter};
use std::num::NonZero;
use std::str::FromStr;

use itertools::Itertools;
use log::info;
use ndarray::Array2;

use crate::cell::CellType;
use crate::config::{OptimizerConfig, Strategy};
use crate::error::{GridParseError, ValidationError};
use crate::graph::NodeGraph;
use crate::location::{Dimension, Coordinate};
use crate::search::{CutoffSearch, ExhaustiveSearch, MazeSearch, Placement, QLearnSearch};

/// A rectangular map of typed cells, as painted in an editor.
///
/// [`Grid`]s can be built with a [`GridBuilder`](crate::builder::GridBuilder) or parsed from a snapshot via [`FromStr`].
/// The snapshot uses one character per cell (see [`CellType::symbol`]) and one line per row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    // indexed (y, x)
    pub(crate) cells: Array2<CellType>,
    pub(crate) dims: (Dimension, Dimension),
}

impl Grid {
    /// Width and height of this grid.
    pub fn dims(&self) -> (Dimension, Dimension) {
        self.dims
    }

    /// The cell at `location`, or [`None`] if it is off the grid.
    pub fn get(&self, location: Coordinate) -> Option<CellType> {
        self.cells.get(location.as_index()).copied()
    }

    /// Every cell with its [`Coordinate`], in row-major order.
    pub fn cells(&self) -> impl Iterator<Item=(Coordinate, CellType)> + '_ {
        self.cells.indexed_iter().map(|(index, cell_type)| (Coordinate::from(index), *cell_type))
    }

    /// A copy of this grid with every location in `placement` turned into a blocker.
    ///
    /// Locations off the grid are ignored.
    pub fn with_blockers(&self, placement: &[Coordinate]) -> Self {
        let mut blocked = self.clone();
        for location in placement {
            if let Some(cell) = blocked.cells.get_mut(location.as_index()) {
                *cell = CellType::Occupied;
            }
        }

        blocked
    }

    /// Find the blocker placements which make the closest spawn walk as far as possible before reaching an exit.
    ///
    /// The grid is converted to a graph, validated, and handed to the search selected by `config`.
    /// Every returned [`Placement`] reaches the same, best objective value; most strategies return several when they tie.
    /// An empty result means the Q-learning heuristic could not produce a maze for a valid map.
    pub fn optimize(&self, config: &OptimizerConfig) -> Result<Vec<Placement>, ValidationError> {
        let mut graph = NodeGraph::build(self, config.adjacency);
        graph.validate()?;
        info!("map validated: {} traversable cells, {} buildable", graph.node_count(), graph.build_nodes().len());

        let placements = match config.strategy {
            Strategy::Exhaustive => ExhaustiveSearch::new().generate_optimal_mazes(&mut graph, config.blocker_limit),
            Strategy::Cutoff => CutoffSearch::new().generate_optimal_mazes(&mut graph, config.blocker_limit),
            Strategy::QLearn => QLearnSearch::new(config.qlearn.clone()).generate_optimal_mazes(&mut graph, config.blocker_limit),
        };

        Ok(placements)
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut out = String::with_capacity(self.cells.nrows() * (self.cells.ncols() + 1));

        for row in self.cells.rows() {
            for cell in row {
                out.push(cell.symbol());
            }
            out.push('\n');
        }

        write!(f, "{}", out)
    }
}

impl FromStr for Grid {
    type Err = GridParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows = s.lines()
            .map(str::trim_end)
            .collect_vec();
        // trailing blank lines are tolerated, interior ones are not
        let row_count = rows.iter().rposition(|row| !row.is_empty()).map_or(0, |last| last + 1);
        let rows = &rows[..row_count];

        let width = rows.first().map_or(0, |row| row.chars().count());
        let (Some(w), Some(h)) = (NonZero::new(width), NonZero::new(rows.len())) else {
            return Err(GridParseError::Empty);
        };

        let mut cells = Vec::with_capacity(width * rows.len());
        for (y, row) in rows.iter().enumerate() {
            let found = row.chars().count();
            if found != width {
                return Err(GridParseError::RaggedRow { row: y, expected: width, found });
            }

            for (x, symbol) in row.chars().enumerate() {
                let cell_type = CellType::from_symbol(symbol)
                    .ok_or(GridParseError::UnknownSymbol { symbol, location: Coordinate(x, y) })?;
                cells.push(cell_type);
            }
        }

        let cells = Array2::from_shape_vec((h.get(), w.get()), cells)
            .map_err(|_| GridParseError::Empty)?;

        Ok(Self { cells, dims: (w, h) })
    }
}
