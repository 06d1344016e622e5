//! Bilinear interpolation between cell centers.

use super::Interpolator2;
use crate::{
    field::ScalarField2,
    geometry::{Dim2, Point2},
    grid::{Grid2, Idx2},
    num::BFloat,
};

/// Interpolator that blends the four cell centers surrounding the
/// interpolation point.
///
/// Between an outer grid edge and the outermost cell center the value is
/// held constant along that dimension.
#[derive(Clone, Copy, Debug, Default)]
pub struct BilinearInterpolator2;

impl BilinearInterpolator2 {
    /// Creates a new bilinear interpolator.
    pub fn new() -> Self {
        Self
    }
}

/// Lower and upper center indices bracketing the coordinate, with the
/// weight of the upper one.
struct Stencil1<F> {
    lower: usize,
    upper: usize,
    upper_weight: F,
}

impl<F: BFloat> Stencil1<F> {
    fn constant(idx: usize) -> Self {
        Self {
            lower: idx,
            upper: idx,
            upper_weight: F::zero(),
        }
    }

    fn find(centers: &[F], cell_idx: usize, coord: F) -> Self {
        let (lower, upper) = if coord < centers[cell_idx] {
            if cell_idx == 0 {
                return Self::constant(0);
            }
            (cell_idx - 1, cell_idx)
        } else {
            if cell_idx + 1 >= centers.len() {
                return Self::constant(cell_idx);
            }
            (cell_idx, cell_idx + 1)
        };
        Self {
            lower,
            upper,
            upper_weight: (coord - centers[lower]) / (centers[upper] - centers[lower]),
        }
    }
}

impl Interpolator2 for BilinearInterpolator2 {
    fn interp_scalar_field_known_cell<F, G>(
        &self,
        field: &ScalarField2<F, G>,
        interp_point: &Point2<F>,
        interp_indices: &Idx2<usize>,
    ) -> F
    where
        F: BFloat,
        G: Grid2<F>,
    {
        let centers = field.grid().centers();
        let sx = Stencil1::find(&centers[Dim2::X], interp_indices[Dim2::X], interp_point[Dim2::X]);
        let sy = Stencil1::find(&centers[Dim2::Y], interp_indices[Dim2::Y], interp_point[Dim2::Y]);

        let values = field.values();
        let one = F::one();
        (one - sx.upper_weight) * (one - sy.upper_weight) * values[[sx.lower, sy.lower]]
            + sx.upper_weight * (one - sy.upper_weight) * values[[sx.upper, sy.lower]]
            + (one - sx.upper_weight) * sy.upper_weight * values[[sx.lower, sy.upper]]
            + sx.upper_weight * sy.upper_weight * values[[sx.upper, sy.upper]]
    }
}
