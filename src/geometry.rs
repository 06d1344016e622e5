//! Geometric utility objects.

use crate::num::BFloat;
use std::{
    fmt,
    ops::{Add, AddAssign, Div, Index, IndexMut, Mul, Neg, Sub},
};

#[cfg(feature = "serialization")]
use serde::Serialize;

#[cfg(feature = "for-testing")]
use approx::{AbsDiffEq, RelativeEq};

/// Denotes the x- or y-dimension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dim2 {
    X = 0,
    Y = 1,
}

impl Dim2 {
    /// Creates an array for iterating over the x- and y-dimensions.
    pub fn slice() -> [Self; 2] {
        [Self::X, Self::Y]
    }

    /// Returns the number of the dimension.
    pub fn num(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Dim2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::X => "x",
                Self::Y => "y",
            }
        )
    }
}

/// Denotes one of the four components of a four-vector.
///
/// For a position four-vector the components are (x, y, z, t), for a
/// momentum four-vector they are (px, py, pz, E).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dim4 {
    X = 0,
    Y = 1,
    Z = 2,
    T = 3,
}

impl Dim4 {
    /// Creates an array for iterating over all four components.
    pub fn slice() -> [Self; 4] {
        [Self::X, Self::Y, Self::Z, Self::T]
    }

    /// Returns the number of the dimension.
    pub fn num(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Dim4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::X => "x",
                Self::Y => "y",
                Self::Z => "z",
                Self::T => "t",
            }
        )
    }
}

/// Represents any quantity with two dimensional components.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct In2D<T>([T; 2]);

impl<T> In2D<T> {
    /// Creates a new 2D quantity given the two components.
    pub fn new(x: T, y: T) -> Self {
        Self([x, y])
    }

    /// Creates a new 2D quantity by evaluating the given component
    /// constructor for each dimension.
    pub fn with_each_component<C>(create_component: C) -> Self
    where
        C: Fn(Dim2) -> T,
    {
        Self::new(create_component(Dim2::X), create_component(Dim2::Y))
    }

    /// Creates a new 2D quantity with the same value for both components.
    pub fn same(a: T) -> Self
    where
        T: Copy,
    {
        Self::new(a, a)
    }
}

impl<T> Index<Dim2> for In2D<T> {
    type Output = T;
    fn index(&self, dim: Dim2) -> &Self::Output {
        &self.0[dim as usize]
    }
}

impl<T> IndexMut<Dim2> for In2D<T> {
    fn index_mut(&mut self, dim: Dim2) -> &mut Self::Output {
        &mut self.0[dim as usize]
    }
}

impl<T: fmt::Display> fmt::Display for In2D<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.0[0], self.0[1])
    }
}

#[cfg(feature = "for-testing")]
impl<T> AbsDiffEq for In2D<T>
where
    T: AbsDiffEq,
    T::Epsilon: Copy,
{
    type Epsilon = T::Epsilon;

    fn default_epsilon() -> Self::Epsilon {
        T::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        Dim2::slice()
            .into_iter()
            .all(|dim| T::abs_diff_eq(&self[dim], &other[dim], epsilon))
    }
}

#[cfg(feature = "for-testing")]
impl<T> RelativeEq for In2D<T>
where
    T: RelativeEq,
    T::Epsilon: Copy,
{
    fn default_max_relative() -> Self::Epsilon {
        T::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        Dim2::slice()
            .into_iter()
            .all(|dim| T::relative_eq(&self[dim], &other[dim], epsilon, max_relative))
    }
}

/// A 2D spatial coordinate.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct Point2<F>(In2D<F>);

impl<F: BFloat> Point2<F> {
    /// Creates a new 2D point given the two components.
    pub fn new(x: F, y: F) -> Self {
        Self(In2D::new(x, y))
    }

    /// Creates a new 2D point by evaluating the given component
    /// constructor for each dimension.
    pub fn with_each_component<C>(create_component: C) -> Self
    where
        C: Fn(Dim2) -> F,
    {
        Self(In2D::with_each_component(create_component))
    }

    /// Creates a new point at the origin.
    pub fn origin() -> Self {
        Self::new(F::zero(), F::zero())
    }

    /// Returns the x-component.
    pub fn x(&self) -> F {
        self[Dim2::X]
    }

    /// Returns the y-component.
    pub fn y(&self) -> F {
        self[Dim2::Y]
    }

    /// Returns a new point with both components divided by the given value.
    pub fn scaled_down(&self, divisor: F) -> Self {
        Self::new(self[Dim2::X] / divisor, self[Dim2::Y] / divisor)
    }

    /// Computes the distance to the given point.
    pub fn distance_to(&self, other: &Self) -> F {
        (self - other).length()
    }
}

impl<F: BFloat> Index<Dim2> for Point2<F> {
    type Output = F;
    fn index(&self, dim: Dim2) -> &Self::Output {
        &self.0[dim]
    }
}

impl<F: BFloat> IndexMut<Dim2> for Point2<F> {
    fn index_mut(&mut self, dim: Dim2) -> &mut Self::Output {
        &mut self.0[dim]
    }
}

impl<'a, F: BFloat> Sub<&'a Point2<F>> for &'a Point2<F> {
    type Output = Vec2<F>;
    fn sub(self, other: Self) -> Self::Output {
        Vec2::new(self[Dim2::X] - other[Dim2::X], self[Dim2::Y] - other[Dim2::Y])
    }
}

impl<F: BFloat> Sub<Point2<F>> for Point2<F> {
    type Output = Vec2<F>;
    fn sub(self, other: Self) -> Self::Output {
        &self - &other
    }
}

impl<F: BFloat + fmt::Display> fmt::Display for Point2<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        fmt::Display::fmt(&self[Dim2::X], f)?;
        f.write_str(", ")?;
        fmt::Display::fmt(&self[Dim2::Y], f)?;
        f.write_str(")")
    }
}

/// A 2D vector.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct Vec2<F>(In2D<F>);

impl<F: BFloat> Vec2<F> {
    /// Creates a new 2D vector given the two components.
    pub fn new(x: F, y: F) -> Self {
        Self(In2D::new(x, y))
    }

    /// Creates a new zero vector.
    pub fn zero() -> Self {
        Self::new(F::zero(), F::zero())
    }

    /// Computes the squared length of the vector.
    pub fn squared_length(&self) -> F {
        self[Dim2::X] * self[Dim2::X] + self[Dim2::Y] * self[Dim2::Y]
    }

    /// Computes the length of the vector.
    pub fn length(&self) -> F {
        self.squared_length().sqrt()
    }

    /// Computes the dot product of the vector with another vector.
    pub fn dot(&self, other: &Self) -> F {
        self[Dim2::X] * other[Dim2::X] + self[Dim2::Y] * other[Dim2::Y]
    }
}

impl<F: BFloat> Index<Dim2> for Vec2<F> {
    type Output = F;
    fn index(&self, dim: Dim2) -> &Self::Output {
        &self.0[dim]
    }
}

impl<F: BFloat> IndexMut<Dim2> for Vec2<F> {
    fn index_mut(&mut self, dim: Dim2) -> &mut Self::Output {
        &mut self.0[dim]
    }
}

/// An axis-aligned rectangle.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct BoundingBox2<F> {
    lower: Point2<F>,
    upper: Point2<F>,
}

impl<F: BFloat> BoundingBox2<F> {
    /// Creates a new bounding box with the given lower and upper corners.
    ///
    /// The corners are not checked for consistency.
    pub fn new(lower: Point2<F>, upper: Point2<F>) -> Self {
        Self { lower, upper }
    }

    /// Creates a new bounding box from the bounds along each dimension.
    pub fn from_bounds(x_bounds: (F, F), y_bounds: (F, F)) -> Self {
        Self::new(
            Point2::new(x_bounds.0, y_bounds.0),
            Point2::new(x_bounds.1, y_bounds.1),
        )
    }

    /// Creates a bounding box covering the full range of representable values.
    pub fn unbounded() -> Self {
        Self::new(
            Point2::new(F::neg_infinity(), F::neg_infinity()),
            Point2::new(F::infinity(), F::infinity()),
        )
    }

    /// Returns the lower corner.
    pub fn lower(&self) -> &Point2<F> {
        &self.lower
    }

    /// Returns the upper corner.
    pub fn upper(&self) -> &Point2<F> {
        &self.upper
    }

    /// Returns the lower bound along the given dimension.
    pub fn lower_bound(&self, dim: Dim2) -> F {
        self.lower[dim]
    }

    /// Returns the upper bound along the given dimension.
    pub fn upper_bound(&self, dim: Dim2) -> F {
        self.upper[dim]
    }

    /// Whether the corners are finite and ordered along both dimensions.
    pub fn is_well_formed(&self) -> bool {
        Dim2::slice().into_iter().all(|dim| {
            !self.lower[dim].is_nan()
                && !self.upper[dim].is_nan()
                && self.lower[dim] <= self.upper[dim]
        })
    }

    /// Whether the given point lies inside the box, boundaries included.
    pub fn contains(&self, point: &Point2<F>) -> bool {
        Dim2::slice()
            .into_iter()
            .all(|dim| self.lower[dim] <= point[dim] && point[dim] <= self.upper[dim])
    }

    /// Whether the given point lies within the given margin of any of the
    /// four edges of the box, or outside it.
    ///
    /// Points exactly at the margin count as being within it.
    pub fn is_within_margin_of_edge(&self, point: &Point2<F>, margin: F) -> bool {
        Dim2::slice().into_iter().any(|dim| {
            point[dim] <= self.lower[dim] + margin || point[dim] >= self.upper[dim] - margin
        })
    }

    /// Returns a new box with both corners multiplied by the given factor.
    pub fn scaled(&self, factor: F) -> Self {
        Self::new(
            Point2::new(self.lower[Dim2::X] * factor, self.lower[Dim2::Y] * factor),
            Point2::new(self.upper[Dim2::X] * factor, self.upper[Dim2::Y] * factor),
        )
    }
}

impl<F: BFloat + fmt::Display> fmt::Display for BoundingBox2<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}] x [{}, {}]",
            self.lower[Dim2::X],
            self.upper[Dim2::X],
            self.lower[Dim2::Y],
            self.upper[Dim2::Y]
        )
    }
}

/// A relativistic four-vector.
///
/// Used both for positions (x, y, z, t) and momenta (px, py, pz, E).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct Vec4<F>([F; 4]);

impl<F: BFloat> Vec4<F> {
    /// Creates a new four-vector given the four components.
    pub fn new(x: F, y: F, z: F, t: F) -> Self {
        Self([x, y, z, t])
    }

    /// Creates a new four-vector by evaluating the given component
    /// constructor for each dimension.
    pub fn with_each_component<C>(create_component: C) -> Self
    where
        C: Fn(Dim4) -> F,
    {
        Self([
            create_component(Dim4::X),
            create_component(Dim4::Y),
            create_component(Dim4::Z),
            create_component(Dim4::T),
        ])
    }

    /// Creates a new zero four-vector.
    pub fn zero() -> Self {
        Self::new(F::zero(), F::zero(), F::zero(), F::zero())
    }

    /// Creates a position four-vector in the xy-plane at time zero.
    pub fn planar_position(x: F, y: F) -> Self {
        Self::new(x, y, F::zero(), F::zero())
    }

    /// Creates a momentum four-vector from the spatial momentum components
    /// and the rest mass, with the energy computed as `sqrt(m^2 + |p|^2)`.
    pub fn from_momentum_and_mass(px: F, py: F, pz: F, mass: F) -> Self {
        let energy = (mass * mass + px * px + py * py + pz * pz).sqrt();
        Self::new(px, py, pz, energy)
    }

    /// Creates a momentum four-vector in the xy-plane with the given
    /// magnitude and direction angle [rad] measured from the x-axis.
    pub fn planar_momentum_from_polar(magnitude: F, angle: F, mass: F) -> Self {
        Self::from_momentum_and_mass(
            magnitude * angle.cos(),
            magnitude * angle.sin(),
            F::zero(),
            mass,
        )
    }

    /// Returns the x-component.
    pub fn x(&self) -> F {
        self[Dim4::X]
    }

    /// Returns the y-component.
    pub fn y(&self) -> F {
        self[Dim4::Y]
    }

    /// Returns the z-component.
    pub fn z(&self) -> F {
        self[Dim4::Z]
    }

    /// Returns the time (or energy) component.
    pub fn t(&self) -> F {
        self[Dim4::T]
    }

    /// Returns the time (or energy) component.
    pub fn energy(&self) -> F {
        self[Dim4::T]
    }

    /// Returns the x- and y-components as a 2D point.
    pub fn to_point2(&self) -> Point2<F> {
        Point2::new(self[Dim4::X], self[Dim4::Y])
    }

    /// Computes the squared length of the spatial part.
    pub fn spatial_squared_length(&self) -> F {
        self[Dim4::X] * self[Dim4::X]
            + self[Dim4::Y] * self[Dim4::Y]
            + self[Dim4::Z] * self[Dim4::Z]
    }

    /// Computes the length of the spatial part (the momentum magnitude for a
    /// momentum four-vector).
    pub fn spatial_length(&self) -> F {
        self.spatial_squared_length().sqrt()
    }

    /// Computes the Minkowski norm `sqrt(t^2 - |r|^2)` (the invariant mass
    /// for a momentum four-vector).
    ///
    /// Space-like vectors give the negated norm of the space-like interval.
    pub fn invariant_mass(&self) -> F {
        let squared = self[Dim4::T] * self[Dim4::T] - self.spatial_squared_length();
        if squared < F::zero() {
            -(-squared).sqrt()
        } else {
            squared.sqrt()
        }
    }

    /// Computes the speed in units of the speed of light for a momentum four-vector.
    pub fn beta(&self) -> F {
        self.spatial_length() / self[Dim4::T]
    }

    /// Computes the Lorentz factor for a momentum four-vector.
    pub fn gamma(&self) -> F {
        self[Dim4::T] / self.invariant_mass()
    }

    /// Whether all components are finite.
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|component| component.is_finite())
    }
}

impl<F: BFloat> Index<Dim4> for Vec4<F> {
    type Output = F;
    fn index(&self, dim: Dim4) -> &Self::Output {
        &self.0[dim as usize]
    }
}

impl<F: BFloat> IndexMut<Dim4> for Vec4<F> {
    fn index_mut(&mut self, dim: Dim4) -> &mut Self::Output {
        &mut self.0[dim as usize]
    }
}

impl<'a, F: BFloat> Add<&'a Vec4<F>> for &'a Vec4<F> {
    type Output = Vec4<F>;
    fn add(self, other: Self) -> Self::Output {
        Vec4::with_each_component(|dim| self[dim] + other[dim])
    }
}

impl<F: BFloat> Add<Vec4<F>> for &Vec4<F> {
    type Output = Vec4<F>;
    fn add(self, other: Vec4<F>) -> Self::Output {
        self + &other
    }
}

impl<F: BFloat> Add<Vec4<F>> for Vec4<F> {
    type Output = Self;
    fn add(self, other: Self) -> Self::Output {
        &self + &other
    }
}

impl<F: BFloat> Add<&Vec4<F>> for Vec4<F> {
    type Output = Self;
    fn add(self, other: &Self) -> Self::Output {
        &self + other
    }
}

impl<F: BFloat> AddAssign<&Vec4<F>> for Vec4<F> {
    fn add_assign(&mut self, other: &Self) {
        for dim in Dim4::slice() {
            self[dim] = self[dim] + other[dim];
        }
    }
}

impl<'a, F: BFloat> Sub<&'a Vec4<F>> for &'a Vec4<F> {
    type Output = Vec4<F>;
    fn sub(self, other: Self) -> Self::Output {
        Vec4::with_each_component(|dim| self[dim] - other[dim])
    }
}

impl<F: BFloat> Sub<Vec4<F>> for Vec4<F> {
    type Output = Self;
    fn sub(self, other: Self) -> Self::Output {
        &self - &other
    }
}

impl<F: BFloat> Neg for Vec4<F> {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Vec4::with_each_component(|dim| -self[dim])
    }
}

impl<F: BFloat> Mul<F> for &Vec4<F> {
    type Output = Vec4<F>;
    fn mul(self, factor: F) -> Self::Output {
        Vec4::with_each_component(|dim| factor * self[dim])
    }
}

impl<F: BFloat> Mul<F> for Vec4<F> {
    type Output = Self;
    fn mul(self, factor: F) -> Self::Output {
        &self * factor
    }
}

impl<F: BFloat> Div<F> for &Vec4<F> {
    type Output = Vec4<F>;
    fn div(self, divisor: F) -> Self::Output {
        Vec4::with_each_component(|dim| self[dim] / divisor)
    }
}

impl<F: BFloat> Div<F> for Vec4<F> {
    type Output = Self;
    fn div(self, divisor: F) -> Self::Output {
        &self / divisor
    }
}

impl<F: BFloat + fmt::Display> fmt::Display for Vec4<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.0[0], self.0[1], self.0[2], self.0[3])
    }
}

#[cfg(feature = "for-testing")]
impl<F> AbsDiffEq for Vec4<F>
where
    F: BFloat + AbsDiffEq,
    F::Epsilon: Copy,
{
    type Epsilon = F::Epsilon;

    fn default_epsilon() -> Self::Epsilon {
        F::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        Dim4::slice()
            .into_iter()
            .all(|dim| F::abs_diff_eq(&self[dim], &other[dim], epsilon))
    }
}

#[cfg(feature = "for-testing")]
impl<F> RelativeEq for Vec4<F>
where
    F: BFloat + RelativeEq,
    F::Epsilon: Copy,
{
    fn default_max_relative() -> Self::Epsilon {
        F::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        Dim4::slice()
            .into_iter()
            .all(|dim| F::relative_eq(&self[dim], &other[dim], epsilon, max_relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn momentum_from_mass_has_consistent_invariant_mass() {
        let mass = 511e3;
        let momentum = Vec4::from_momentum_and_mass(3e5, -4e5, 0.0, mass);
        assert_relative_eq!(momentum.spatial_length(), 5e5, max_relative = 1e-14);
        assert_relative_eq!(momentum.invariant_mass(), mass, max_relative = 1e-9);
        assert_relative_eq!(
            momentum.energy(),
            (mass * mass + 25e10_f64).sqrt(),
            max_relative = 1e-14
        );
    }

    #[test]
    fn beta_and_gamma_are_related() {
        let momentum = Vec4::from_momentum_and_mass(1e6, 0.0, 0.0, 511e3);
        let beta = momentum.beta();
        let gamma = momentum.gamma();
        assert!(beta < 1.0);
        assert_relative_eq!(gamma, 1.0 / (1.0_f64 - beta * beta).sqrt(), max_relative = 1e-9);
    }

    #[test]
    fn polar_momentum_points_in_given_direction() {
        let momentum = Vec4::planar_momentum_from_polar(2.0, std::f64::consts::FRAC_PI_2, 1.0);
        assert!(momentum.x().abs() < 1e-15);
        assert_relative_eq!(momentum.y(), 2.0);
        assert_relative_eq!(momentum.energy(), 5.0_f64.sqrt());
    }

    #[test]
    fn four_vector_arithmetic_is_component_wise() {
        let a = Vec4::new(1.0, 2.0, 3.0, 4.0);
        let b = Vec4::new(0.5, -1.0, 0.0, 2.0);
        assert_eq!(&a + &b, Vec4::new(1.5, 1.0, 3.0, 6.0));
        assert_eq!(a - b, Vec4::new(0.5, 3.0, 3.0, 2.0));
        assert_eq!(a * 2.0, Vec4::new(2.0, 4.0, 6.0, 8.0));
        assert_eq!(b / 2.0, Vec4::new(0.25, -0.5, 0.0, 1.0));
        let mut c = a;
        c += &b;
        assert_eq!(c, &a + &b);
    }

    #[test]
    fn bounding_box_margin_check_is_inclusive() {
        let bounding_box = BoundingBox2::from_bounds((-4.0, 4.0), (-2.0, 2.0));
        let margin = 0.125;
        assert!(bounding_box.is_within_margin_of_edge(&Point2::new(-4.0 + margin, 0.0), margin));
        assert!(bounding_box.is_within_margin_of_edge(&Point2::new(0.0, 2.0 - margin), margin));
        assert!(!bounding_box.is_within_margin_of_edge(&Point2::new(-3.5, 1.5), margin));
        assert!(bounding_box.is_within_margin_of_edge(&Point2::new(5.0, 0.0), margin));
    }

    #[test]
    fn malformed_bounding_box_is_detected() {
        assert!(BoundingBox2::from_bounds((0.0, 1.0), (0.0, 0.0)).is_well_formed());
        assert!(!BoundingBox2::from_bounds((1.0, 0.0), (0.0, 1.0)).is_well_formed());
        assert!(!BoundingBox2::from_bounds((0.0, f64::NAN), (0.0, 1.0)).is_well_formed());
        assert!(BoundingBox2::<f64>::unbounded().contains(&Point2::new(1e300, -1e300)));
    }
}
