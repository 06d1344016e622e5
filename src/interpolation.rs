//! Interpolation of scalar fields defined on grids.

pub mod bilinear;

use crate::{
    field::ScalarField2,
    geometry::Point2,
    grid::{Grid2, GridPointQuery2, Idx2},
    num::BFloat,
};

/// Defines the properties of a 2D interpolator.
pub trait Interpolator2: Clone + Sync + Send {
    /// Computes the interpolated value of a scalar field at the given coordinate.
    ///
    /// # Parameters
    ///
    /// - `field`: Scalar field to interpolate.
    /// - `interp_point`: Coordinate where the interpolated value should be computed.
    ///
    /// # Returns
    ///
    /// A `GridPointQuery2<F>` which is either:
    ///
    /// - `Inside`: Contains the interpolated field value.
    /// - `Outside`: The interpolation point was outside the grid bounds.
    ///
    /// # Type parameters
    ///
    /// - `F`: Floating point type of the field data.
    /// - `G`: Type of grid.
    fn interp_scalar_field<F, G>(
        &self,
        field: &ScalarField2<F, G>,
        interp_point: &Point2<F>,
    ) -> GridPointQuery2<F>
    where
        F: BFloat,
        G: Grid2<F>,
    {
        match field.grid().find_grid_cell(interp_point) {
            GridPointQuery2::Inside(interp_indices) => GridPointQuery2::Inside(
                self.interp_scalar_field_known_cell(field, interp_point, &interp_indices),
            ),
            GridPointQuery2::Outside => GridPointQuery2::Outside,
        }
    }

    /// Computes the interpolated value of a scalar field at the given coordinate
    /// known to lie inside the grid cell with the given indices.
    fn interp_scalar_field_known_cell<F, G>(
        &self,
        field: &ScalarField2<F, G>,
        interp_point: &Point2<F>,
        interp_indices: &Idx2<usize>,
    ) -> F
    where
        F: BFloat,
        G: Grid2<F>;
}
