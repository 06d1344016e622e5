//! Utilities related to numbers.

use std::fmt;

/// Floating point marker trait for easier control over trait bounds.
pub trait BFloat:
    Sync + Send + num::Float + num::cast::FromPrimitive + ieee754::Ieee754 + fmt::Debug
{
}

impl BFloat for f32 {}
impl BFloat for f64 {}

/// Whether the given value is finite and strictly positive.
pub fn is_finite_positive<F: BFloat>(value: F) -> bool {
    value.is_finite() && value > F::zero()
}

/// Whether the given value is finite and not negative.
pub fn is_finite_non_negative<F: BFloat>(value: F) -> bool {
    value.is_finite() && value >= F::zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positivity_checks_reject_non_finite_values() {
        assert!(is_finite_positive(1e-12_f64));
        assert!(!is_finite_positive(0.0_f64));
        assert!(!is_finite_positive(f64::INFINITY));
        assert!(!is_finite_positive(f32::NAN));
        assert!(is_finite_non_negative(0.0_f64));
        assert!(!is_finite_non_negative(-1e-300_f64));
    }
}
