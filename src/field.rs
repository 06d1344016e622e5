//! Magnetic field maps and sampling of the field strength.

use crate::{
    error::{SimulationError, SimulationResult},
    geometry::{BoundingBox2, Dim2, Point2},
    grid::{Grid2, GridPointQuery2},
    interpolation::Interpolator2,
    num::BFloat,
    tracing::ftr,
};
use ndarray::{Array2, ShapeBuilder};
use std::sync::Arc;

/// Field defined by a 2D array of values located at the cell centers of a grid.
///
/// The array of values is laid out in column-major order in memory, so the
/// x-index varies fastest.
#[derive(Clone, Debug)]
pub struct ScalarField2<F, G> {
    grid: Arc<G>,
    values: Array2<F>,
}

impl<F, G> ScalarField2<F, G>
where
    F: BFloat,
    G: Grid2<F>,
{
    /// Creates a new scalar field given a grid and the values at its cell centers.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if the shape of the values differs from
    /// the grid shape or any value is not finite.
    pub fn new(grid: G, values: Array2<F>) -> SimulationResult<Self> {
        let shape = grid.shape();
        crate::ensure_valid!(
            values.shape() == [shape[Dim2::X], shape[Dim2::Y]],
            "Field values have shape {:?}, but the grid has shape {}",
            values.shape(),
            shape
        );
        crate::ensure_valid!(
            values.iter().all(|value| value.is_finite()),
            "Field values must all be finite"
        );
        Ok(Self {
            grid: Arc::new(grid),
            values,
        })
    }

    /// Creates a new scalar field by evaluating the given function at each
    /// cell center of the grid.
    pub fn from_function<E>(grid: G, evaluate: E) -> SimulationResult<Self>
    where
        E: Fn(&Point2<F>) -> F,
    {
        let shape = grid.shape().clone();
        let centers = grid.centers();
        let values = Array2::from_shape_fn((shape[Dim2::X], shape[Dim2::Y]).f(), |(i, j)| {
            evaluate(&Point2::new(centers[Dim2::X][i], centers[Dim2::Y][j]))
        });
        Self::new(grid, values)
    }

    /// Returns a reference to the grid.
    pub fn grid(&self) -> &G {
        self.grid.as_ref()
    }

    /// Returns a reference to the 2D array of field values.
    pub fn values(&self) -> &Array2<F> {
        &self.values
    }

    /// Returns the value at the given 2D cell index.
    pub fn value(&self, i: usize, j: usize) -> F {
        self.values[[i, j]]
    }

    /// Computes the minimum and maximum value of the field.
    pub fn value_range(&self) -> (F, F) {
        self.values.iter().fold(
            (F::infinity(), F::neg_infinity()),
            |(min, max), &value| (min.min(value), max.max(value)),
        )
    }
}

/// Scale factors converting a field map to world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldUnits {
    /// World length corresponding to one unit of the grid coordinates.
    pub length_unit: ftr,
    /// World field strength corresponding to one unit of the stored values.
    pub field_unit: ftr,
}

impl FieldUnits {
    pub const DEFAULT_LENGTH_UNIT: ftr = 1.0;
    pub const DEFAULT_FIELD_UNIT: ftr = 1.0;

    /// Creates a validated set of units.
    pub fn new(length_unit: ftr, field_unit: ftr) -> SimulationResult<Self> {
        let units = Self {
            length_unit,
            field_unit,
        };
        units.validate()?;
        Ok(units)
    }

    /// Checks that both units are finite and positive.
    pub fn validate(&self) -> SimulationResult<()> {
        crate::ensure_valid!(
            crate::num::is_finite_positive(self.length_unit),
            "Length unit must be finite and positive, got {}",
            self.length_unit
        );
        crate::ensure_valid!(
            crate::num::is_finite_positive(self.field_unit),
            "Field unit must be finite and positive, got {}",
            self.field_unit
        );
        Ok(())
    }
}

impl Default for FieldUnits {
    fn default() -> Self {
        Self {
            length_unit: Self::DEFAULT_LENGTH_UNIT,
            field_unit: Self::DEFAULT_FIELD_UNIT,
        }
    }
}

/// Defines the properties of a source of magnetic field strength.
///
/// The field is assumed to point along the z-axis, perpendicular to the
/// plane of motion.
pub trait FieldSampler: Sync + Send {
    /// Returns the field strength at the given world position.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFieldDomain` if the position lies outside the domain
    /// of the field.
    fn sample(&self, position: &Point2<ftr>) -> SimulationResult<ftr>;

    /// Returns the domain of the field in world units.
    fn bounding_box(&self) -> BoundingBox2<ftr>;
}

/// Field sampler interpolating a gridded field map.
#[derive(Clone, Debug)]
pub struct SampledField<G, I> {
    field: ScalarField2<ftr, G>,
    interpolator: I,
    units: FieldUnits,
}

impl<G, I> SampledField<G, I>
where
    G: Grid2<ftr>,
    I: Interpolator2,
{
    /// Creates a new sampler for the given field map.
    pub fn new(
        field: ScalarField2<ftr, G>,
        interpolator: I,
        units: FieldUnits,
    ) -> SimulationResult<Self> {
        units.validate()?;
        Ok(Self {
            field,
            interpolator,
            units,
        })
    }

    /// Returns a reference to the underlying field map.
    pub fn field(&self) -> &ScalarField2<ftr, G> {
        &self.field
    }

    /// Returns the units applied to the field map.
    pub fn units(&self) -> &FieldUnits {
        &self.units
    }
}

impl<G, I> FieldSampler for SampledField<G, I>
where
    G: Grid2<ftr>,
    I: Interpolator2,
{
    fn sample(&self, position: &Point2<ftr>) -> SimulationResult<ftr> {
        let grid_point = position.scaled_down(self.units.length_unit);
        match self.interpolator.interp_scalar_field(&self.field, &grid_point) {
            GridPointQuery2::Inside(value) => Ok(value * self.units.field_unit),
            GridPointQuery2::Outside => Err(SimulationError::InvalidFieldDomain {
                x: position.x(),
                y: position.y(),
            }),
        }
    }

    fn bounding_box(&self) -> BoundingBox2<ftr> {
        self.field.grid().bounding_box().scaled(self.units.length_unit)
    }
}

/// Field with the same strength everywhere inside a bounding box.
#[derive(Clone, Debug)]
pub struct UniformField {
    strength: ftr,
    bounding_box: BoundingBox2<ftr>,
}

impl UniformField {
    /// Creates a uniform field covering the whole plane.
    pub fn unbounded(strength: ftr) -> SimulationResult<Self> {
        Self::new(strength, BoundingBox2::unbounded())
    }

    /// Creates a uniform field covering the given bounding box.
    pub fn new(strength: ftr, bounding_box: BoundingBox2<ftr>) -> SimulationResult<Self> {
        crate::ensure_valid!(
            strength.is_finite(),
            "Field strength must be finite, got {}",
            strength
        );
        crate::ensure_valid!(
            bounding_box.is_well_formed(),
            "Field domain {} is malformed",
            bounding_box
        );
        Ok(Self {
            strength,
            bounding_box,
        })
    }

    /// Returns the field strength.
    pub fn strength(&self) -> ftr {
        self.strength
    }
}

impl FieldSampler for UniformField {
    fn sample(&self, position: &Point2<ftr>) -> SimulationResult<ftr> {
        if self.bounding_box.contains(position) {
            Ok(self.strength)
        } else {
            Err(SimulationError::InvalidFieldDomain {
                x: position.x(),
                y: position.y(),
            })
        }
    }

    fn bounding_box(&self) -> BoundingBox2<ftr> {
        self.bounding_box
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        geometry::{In2D, Vec2},
        grid::regular::RegularGrid2,
        interpolation::bilinear::BilinearInterpolator2,
    };
    use approx::assert_relative_eq;

    fn ramp_sampler(units: FieldUnits) -> SampledField<RegularGrid2<ftr>, BilinearInterpolator2> {
        let grid =
            RegularGrid2::from_bounds(In2D::new(4, 4), Vec2::new(0.0, 0.0), Vec2::new(4.0, 4.0))
                .unwrap();
        let values = Array2::from_shape_fn((4, 4), |(i, _)| i as ftr + 0.5);
        let field = ScalarField2::new(grid, values).unwrap();
        SampledField::new(field, BilinearInterpolator2::new(), units).unwrap()
    }

    #[test]
    fn sampling_applies_length_and_field_units() {
        let sampler = ramp_sampler(FieldUnits::new(0.01, 2.0).unwrap());
        assert_relative_eq!(
            sampler.sample(&Point2::new(0.02, 0.02)).unwrap(),
            4.0,
            max_relative = 1e-12
        );
        let bounding_box = sampler.bounding_box();
        assert_relative_eq!(bounding_box.upper_bound(Dim2::X), 0.04);
    }

    #[test]
    fn fields_can_be_evaluated_at_cell_centers() {
        let grid =
            RegularGrid2::from_bounds(In2D::new(3, 2), Vec2::new(0.0, 0.0), Vec2::new(3.0, 2.0))
                .unwrap();
        let field =
            ScalarField2::from_function(grid, |point| point.x() + 10.0 * point.y()).unwrap();
        assert_eq!(field.value(0, 0), 5.5);
        assert_eq!(field.value(2, 1), 17.5);
        assert_eq!(field.value_range(), (5.5, 17.5));
    }

    #[test]
    fn sampling_is_bit_identical_for_repeated_calls() {
        let sampler = ramp_sampler(FieldUnits::default());
        let point = Point2::new(1.2345678, 2.3456789);
        let first = sampler.sample(&point).unwrap();
        for _ in 0..10 {
            assert_eq!(sampler.sample(&point).unwrap().to_bits(), first.to_bits());
        }
    }

    #[test]
    fn sampling_outside_grid_fails() {
        let sampler = ramp_sampler(FieldUnits::default());
        assert_eq!(
            sampler.sample(&Point2::new(4.5, 1.0)),
            Err(SimulationError::InvalidFieldDomain { x: 4.5, y: 1.0 })
        );
    }

    #[test]
    fn mismatched_values_are_rejected() {
        let grid =
            RegularGrid2::from_bounds(In2D::new(2, 3), Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0))
                .unwrap();
        assert!(matches!(
            ScalarField2::new(grid, Array2::<ftr>::zeros((3, 2))),
            Err(SimulationError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn non_positive_units_are_rejected() {
        assert!(FieldUnits::new(0.0, 1.0).is_err());
        assert!(FieldUnits::new(1.0, -1.0).is_err());
        assert!(FieldUnits::new(1.0, ftr::NAN).is_err());
    }

    #[test]
    fn uniform_field_is_bounded_by_its_domain() {
        let field =
            UniformField::new(3.0, BoundingBox2::from_bounds((-1.0, 1.0), (-1.0, 1.0))).unwrap();
        assert_eq!(field.sample(&Point2::new(0.5, -1.0)), Ok(3.0));
        assert!(field.sample(&Point2::new(1.5, 0.0)).is_err());
        assert_eq!(UniformField::unbounded(2.0).unwrap().sample(&Point2::new(1e9, 1e9)), Ok(2.0));
    }
}
