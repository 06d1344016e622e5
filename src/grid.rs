//! Grids for representing spatial coordinates of field maps.

pub mod regular;

use crate::{
    geometry::{BoundingBox2, Dim2, In2D, Point2, Vec2},
    num::BFloat,
};

/// 2D index of a grid cell.
pub type Idx2<I> = In2D<I>;

/// Coordinates along each dimension of a 2D grid.
pub type Coords2<F> = In2D<Vec<F>>;

/// Location of the coordinates within a grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CoordLocation {
    Center = 0,
    LowerEdge = 1,
}

/// Result of looking up a point in a 2D grid.
#[derive(Clone, Debug, PartialEq)]
pub enum GridPointQuery2<T> {
    /// The point was inside the grid, with the associated result.
    Inside(T),
    /// The point was outside the grid bounds.
    Outside,
}

impl<T> GridPointQuery2<T> {
    /// Returns the contained value if the point was inside.
    pub fn inside(self) -> Option<T> {
        match self {
            Self::Inside(value) => Some(value),
            Self::Outside => None,
        }
    }
}

/// Defines the properties of a 2D grid.
pub trait Grid2<F: BFloat>: Clone + Sync + Send {
    /// Returns the 2D shape of the grid.
    fn shape(&self) -> &In2D<usize>;

    /// Returns a reference to the coordinates at the given location within the grid cells.
    fn coords_by_location(&self, location: CoordLocation) -> &Coords2<F>;

    /// Returns a reference to the lower bounds of the grid.
    fn lower_bounds(&self) -> &Vec2<F>;

    /// Returns a reference to the upper bounds of the grid.
    fn upper_bounds(&self) -> &Vec2<F>;

    /// Returns a reference to the coordinates of the cell centers.
    fn centers(&self) -> &Coords2<F> {
        self.coords_by_location(CoordLocation::Center)
    }

    /// Returns a reference to the coordinates of the lower cell edges.
    fn lower_edges(&self) -> &Coords2<F> {
        self.coords_by_location(CoordLocation::LowerEdge)
    }

    /// Returns the total number of grid cells.
    fn size(&self) -> usize {
        let shape = self.shape();
        shape[Dim2::X] * shape[Dim2::Y]
    }

    /// Returns the rectangle spanned by the outer cell edges.
    fn bounding_box(&self) -> BoundingBox2<F> {
        let lower = self.lower_bounds();
        let upper = self.upper_bounds();
        BoundingBox2::from_bounds(
            (lower[Dim2::X], upper[Dim2::X]),
            (lower[Dim2::Y], upper[Dim2::Y]),
        )
    }

    /// Finds the 2D index of the grid cell containing the given point.
    ///
    /// Points on the upper bound belong to the last cell. Points outside
    /// the bounds (or with NaN coordinates) give `Outside`.
    fn find_grid_cell(&self, point: &Point2<F>) -> GridPointQuery2<Idx2<usize>>;
}

/// Computes the center and lower edge coordinates of a regular grid
/// dimension with the given size and bounds.
fn regular_coords_from_bounds<F: BFloat>(
    size: usize,
    lower_bound: F,
    upper_bound: F,
) -> (Vec<F>, Vec<F>) {
    let cell_extent = cell_extent_from_bounds(size, lower_bound, upper_bound);
    let half = F::from_f64(0.5).unwrap_or_else(F::zero);

    let lower_edges: Vec<F> = (0..size)
        .map(|i| lower_bound + F::from_usize(i).unwrap_or_else(F::zero) * cell_extent)
        .collect();
    let centers = lower_edges
        .iter()
        .map(|&lower_edge| lower_edge + half * cell_extent)
        .collect();

    (centers, lower_edges)
}

fn cell_extent_from_bounds<F: BFloat>(size: usize, lower_bound: F, upper_bound: F) -> F {
    (upper_bound - lower_bound) / F::from_usize(size).unwrap_or_else(F::one)
}
