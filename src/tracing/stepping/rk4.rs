//! Classical fourth-order Runge-Kutta stepping in proper time.

use super::Stepper;
use crate::{
    error::SimulationResult,
    field::FieldSampler,
    geometry::Vec4,
    num,
    tracing::{ftr, particle::ParticleState},
    units::NANOSECOND,
};

/// Configuration parameters for RK4 steppers.
#[derive(Clone, Copy, Debug)]
pub struct RK4StepperConfig {
    /// Proper time step [light-m].
    pub step_size: ftr,
}

/// Fixed-step RK4 integrator for the Lorentz force
///
/// ```text
/// dx/dτ = p/m
/// dp/dτ = q B(x) (p_y, -p_x, 0, 0)/m
/// ```
///
/// with the field pointing along z. All four position components are
/// advanced, so the time coordinate accumulates `E/m dτ`.
#[derive(Clone, Debug)]
pub struct RK4Stepper {
    config: RK4StepperConfig,
}

impl RK4Stepper {
    /// Creates a new RK4 stepper with the given configuration.
    pub fn new(config: RK4StepperConfig) -> SimulationResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    fn force<S>(
        sampler: &S,
        position: &Vec4<ftr>,
        momentum: &Vec4<ftr>,
        charge: ftr,
        inverse_mass: ftr,
    ) -> SimulationResult<Vec4<ftr>>
    where
        S: FieldSampler + ?Sized,
    {
        let field_strength = sampler.sample(&position.to_point2())?;
        let factor = charge * field_strength * inverse_mass;
        Ok(Vec4::new(
            factor * momentum.y(),
            -factor * momentum.x(),
            0.0,
            0.0,
        ))
    }
}

impl Stepper for RK4Stepper {
    fn step_size(&self) -> ftr {
        self.config.step_size
    }

    fn step<S>(&self, state: &mut ParticleState, sampler: &S) -> SimulationResult<()>
    where
        S: FieldSampler + ?Sized,
    {
        let dtau = self.config.step_size;
        let charge = state.charge();
        let inverse_mass = 1.0 / state.rest_mass();
        let x = *state.position();
        let p = *state.momentum();

        let dx1 = p * (inverse_mass * dtau);
        let dp1 = Self::force(sampler, &x, &p, charge, inverse_mass)? * dtau;

        let p2 = &p + dp1 * 0.5;
        let dx2 = p2 * (inverse_mass * dtau);
        let dp2 = Self::force(sampler, &(&x + dx1 * 0.5), &p2, charge, inverse_mass)? * dtau;

        let p3 = &p + dp2 * 0.5;
        let dx3 = p3 * (inverse_mass * dtau);
        let dp3 = Self::force(sampler, &(&x + dx2 * 0.5), &p3, charge, inverse_mass)? * dtau;

        let p4 = &p + &dp3;
        let dx4 = p4 * (inverse_mass * dtau);
        let dp4 = Self::force(sampler, &(&x + &dx3), &p4, charge, inverse_mass)? * dtau;

        let sixth = 1.0 / 6.0;
        let next_position = &x + (dx1 + dx2 * 2.0 + dx3 * 2.0 + dx4) * sixth;
        let next_momentum = &p + (dp1 + dp2 * 2.0 + dp3 * 2.0 + dp4) * sixth;

        state.advance(next_position, next_momentum, dtau);
        Ok(())
    }
}

impl RK4StepperConfig {
    pub const DEFAULT_STEP_SIZE: ftr = 0.01 * NANOSECOND;

    /// Checks that the configuration parameter values are valid.
    pub fn validate(&self) -> SimulationResult<()> {
        crate::ensure_valid!(
            num::is_finite_positive(self.step_size),
            "Step size must be finite and larger than zero, got {}",
            self.step_size
        );
        Ok(())
    }
}

impl Default for RK4StepperConfig {
    fn default() -> Self {
        RK4StepperConfig {
            step_size: Self::DEFAULT_STEP_SIZE,
        }
    }
}
