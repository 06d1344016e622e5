//! Stepping particles forward in proper time.

pub mod rk4;

use super::{ftr, particle::ParticleState};
use crate::{error::SimulationResult, field::FieldSampler};

/// Defines the properties of a fixed-step integration scheme for the
/// equations of motion of a charged particle.
pub trait Stepper: Clone + Sync + Send {
    /// Returns the proper time step [light-m].
    fn step_size(&self) -> ftr;

    /// Advances the state of the particle by one step.
    ///
    /// # Parameters
    ///
    /// - `state`: State to advance in place.
    /// - `sampler`: Source of the magnetic field strength.
    ///
    /// # Errors
    ///
    /// Any error from sampling the field aborts the step and leaves the
    /// state unchanged.
    ///
    /// # Type parameters
    ///
    /// - `S`: Type of field sampler.
    fn step<S>(&self, state: &mut ParticleState, sampler: &S) -> SimulationResult<()>
    where
        S: FieldSampler + ?Sized;
}
