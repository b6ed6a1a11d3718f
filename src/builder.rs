use std::num::NonZero;

use ndarray::Array2;

use crate::cell::CellType;
use crate::error::BuilderInvalidReason;
use crate::grid::Grid;
use crate::location::{Coord, Dimension, Coordinate};

/// A builder for rectangular [`Grid`]s.
///
/// Every cell starts as [`CellType::Basic`], like a freshly created editor map.
/// Builders mutate themselves while building but can be [`Clone`]d to save their state at some point.
#[derive(Clone)]
pub struct GridBuilder {
    // width, height
    dims: (Dimension, Dimension),
    cells: Array2<CellType>,
    invalid_reasons: Vec<BuilderInvalidReason>,
}

impl Default for GridBuilder {
    fn default() -> Self {
        Self::with_dims((NonZero::new(6).unwrap(), NonZero::new(6).unwrap()))
    }
}

impl GridBuilder {
    /// Construct a new [`Self`] with the specified dimensions, specified in `(x, y)` order.
    pub fn with_dims(dims: (Dimension, Dimension)) -> Self {
        Self {
            dims,
            cells: Array2::from_shape_simple_fn((dims.1.get(), dims.0.get()), CellType::default),
            invalid_reasons: Default::default(),
        }
    }

    /// Set the cell at `location` to `cell_type`.
    ///
    /// May cause the builder to enter a [`FeatureOutOfBounds`](BuilderInvalidReason::FeatureOutOfBounds) invalid state if `location` is out of bounds.
    /// If the builder is already in an invalid state, this function does nothing.
    pub fn set(&mut self, location: Coordinate, cell_type: CellType) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        match self.cells.get_mut(location.as_index()) {
            Some(cell) => *cell = cell_type,
            None => self.invalid_reasons.push(BuilderInvalidReason::FeatureOutOfBounds),
        }

        self
    }

    /// Shorthand for [`Self::set`] with [`CellType::Spawn`].
    pub fn add_spawn(&mut self, location: Coordinate) -> &mut Self {
        self.set(location, CellType::Spawn)
    }

    /// Shorthand for [`Self::set`] with [`CellType::Exit`].
    pub fn add_exit(&mut self, location: Coordinate) -> &mut Self {
        self.set(location, CellType::Exit)
    }

    /// Drop a location from the map by turning it into [`CellType::Void`].
    /// Keep in mind this may cause the map to fail validation.
    pub fn drop_location(&mut self, location: Coordinate) -> &mut Self {
        self.set(location, CellType::Void)
    }

    /// Set every cell of row `y` to `cell_type`, with the same conditions as [`Self::set`].
    pub fn fill_row(&mut self, y: Coord, cell_type: CellType) -> &mut Self {
        for x in 0..self.dims.0.get() {
            self.set(Coordinate(x, y), cell_type);
        }

        self
    }

    /// Check the validity of this builder, ensuring no [`BuilderInvalidReason`] condition has arisen.
    ///
    /// Returns `None` if the builder is valid, `Some(&Vec<BuilderInvalidReason>)` otherwise.
    pub fn is_valid(&self) -> Option<&Vec<BuilderInvalidReason>> {
        if self.invalid_reasons.is_empty() {
            None
        } else {
            Some(&self.invalid_reasons)
        }
    }

    /// Convert the state of this builder into a [`Grid`].
    /// If the builder is invalid for any reason, a reference to a [`Vec`] of [`BuilderInvalidReason`] will indicate why.
    pub fn build(&self) -> Result<Grid, &Vec<BuilderInvalidReason>> {
        if !self.invalid_reasons.is_empty() {
            return Err(&self.invalid_reasons);
        }

        Ok(Grid {
            cells: self.cells.clone(),
            dims: self.dims,
        })
    }
}
