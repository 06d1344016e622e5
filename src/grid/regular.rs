//! Regular grid.

use super::{CoordLocation, Coords2, Grid2, GridPointQuery2, Idx2};
use crate::{
    error::SimulationResult,
    geometry::{Dim2, In2D, Point2, Vec2},
    num::BFloat,
};

/// A regular 2D grid with uniformly sized cells.
#[derive(Clone, Debug)]
pub struct RegularGrid2<F: BFloat> {
    coords: [Coords2<F>; 2],
    shape: In2D<usize>,
    lower_bounds: Vec2<F>,
    upper_bounds: Vec2<F>,
    cell_extents: Vec2<F>,
}

impl<F: BFloat> RegularGrid2<F> {
    /// Creates a new regular grid given the shape and the outer cell edges.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if the shape has a zero dimension or
    /// the bounds are not finite and strictly increasing.
    pub fn from_bounds(
        shape: In2D<usize>,
        lower_bounds: Vec2<F>,
        upper_bounds: Vec2<F>,
    ) -> SimulationResult<Self> {
        for dim in Dim2::slice() {
            crate::ensure_valid!(
                shape[dim] > 0,
                "Cannot create grid with size zero along the {}-dimension",
                dim
            );
            crate::ensure_valid!(
                lower_bounds[dim].is_finite()
                    && upper_bounds[dim].is_finite()
                    && lower_bounds[dim] < upper_bounds[dim],
                "Bounds along the {}-dimension must be finite and increasing, got [{:?}, {:?}]",
                dim,
                lower_bounds[dim],
                upper_bounds[dim]
            );
        }

        let (centers_x, lower_edges_x) = super::regular_coords_from_bounds(
            shape[Dim2::X],
            lower_bounds[Dim2::X],
            upper_bounds[Dim2::X],
        );
        let (centers_y, lower_edges_y) = super::regular_coords_from_bounds(
            shape[Dim2::Y],
            lower_bounds[Dim2::Y],
            upper_bounds[Dim2::Y],
        );

        let cell_extents = Vec2::new(
            super::cell_extent_from_bounds(
                shape[Dim2::X],
                lower_bounds[Dim2::X],
                upper_bounds[Dim2::X],
            ),
            super::cell_extent_from_bounds(
                shape[Dim2::Y],
                lower_bounds[Dim2::Y],
                upper_bounds[Dim2::Y],
            ),
        );

        Ok(Self {
            coords: [
                Coords2::new(centers_x, centers_y),
                Coords2::new(lower_edges_x, lower_edges_y),
            ],
            shape,
            lower_bounds,
            upper_bounds,
            cell_extents,
        })
    }

    /// Returns a reference to the extent of a grid cell in each dimension.
    pub fn cell_extents(&self) -> &Vec2<F> {
        &self.cell_extents
    }
}

impl<F: BFloat> Grid2<F> for RegularGrid2<F> {
    fn shape(&self) -> &In2D<usize> {
        &self.shape
    }

    fn coords_by_location(&self, location: CoordLocation) -> &Coords2<F> {
        &self.coords[location as usize]
    }

    fn lower_bounds(&self) -> &Vec2<F> {
        &self.lower_bounds
    }

    fn upper_bounds(&self) -> &Vec2<F> {
        &self.upper_bounds
    }

    fn find_grid_cell(&self, point: &Point2<F>) -> GridPointQuery2<Idx2<usize>> {
        let mut indices = Idx2::same(0);
        for dim in Dim2::slice() {
            let coord = point[dim];
            // Negated comparisons so that NaN ends up outside
            if !(coord >= self.lower_bounds[dim] && coord <= self.upper_bounds[dim]) {
                return GridPointQuery2::Outside;
            }
            let offset = ((coord - self.lower_bounds[dim]) / self.cell_extents[dim]).floor();
            let last = self.shape[dim] - 1;
            indices[dim] = offset.to_usize().map_or(last, |idx| idx.min(last));
        }
        GridPointQuery2::Inside(indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimulationError;
    use approx::assert_relative_eq;

    fn test_grid() -> RegularGrid2<f64> {
        RegularGrid2::from_bounds(In2D::new(4, 2), Vec2::new(-2.0, 0.0), Vec2::new(2.0, 1.0))
            .unwrap()
    }

    #[test]
    fn centers_are_offset_half_a_cell_from_bounds() {
        let grid = test_grid();
        assert_eq!(grid.centers()[Dim2::X], vec![-1.5, -0.5, 0.5, 1.5]);
        assert_eq!(grid.centers()[Dim2::Y], vec![0.25, 0.75]);
        assert_eq!(grid.lower_edges()[Dim2::X], vec![-2.0, -1.0, 0.0, 1.0]);
        assert_relative_eq!(grid.cell_extents()[Dim2::Y], 0.5);
        assert_eq!(grid.size(), 8);
    }

    #[test]
    fn grid_cells_are_found_including_upper_bound() {
        let grid = test_grid();
        assert_eq!(
            grid.find_grid_cell(&Point2::new(-2.0, 0.0)),
            GridPointQuery2::Inside(In2D::new(0, 0))
        );
        assert_eq!(
            grid.find_grid_cell(&Point2::new(0.2, 0.6)),
            GridPointQuery2::Inside(In2D::new(2, 1))
        );
        assert_eq!(
            grid.find_grid_cell(&Point2::new(2.0, 1.0)),
            GridPointQuery2::Inside(In2D::new(3, 1))
        );
    }

    #[test]
    fn points_outside_bounds_are_not_found() {
        let grid = test_grid();
        assert_eq!(grid.find_grid_cell(&Point2::new(2.01, 0.5)), GridPointQuery2::Outside);
        assert_eq!(grid.find_grid_cell(&Point2::new(0.0, -1e-9)), GridPointQuery2::Outside);
        assert_eq!(grid.find_grid_cell(&Point2::new(f64::NAN, 0.5)), GridPointQuery2::Outside);
    }

    #[test]
    fn invalid_grid_shapes_and_bounds_are_rejected() {
        assert!(matches!(
            RegularGrid2::from_bounds(In2D::new(0, 2), Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0)),
            Err(SimulationError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            RegularGrid2::from_bounds(In2D::new(2, 2), Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0)),
            Err(SimulationError::InvalidConfiguration(_))
        ));
    }
}
