//! State of a single charged particle.

use super::ftr;
use crate::{
    error::SimulationResult,
    geometry::{Point2, Vec4},
    num,
};

/// Position, momentum and bookkeeping of a charged particle.
///
/// Energies, masses and momenta are in electron volts and lengths in
/// meters. Proper time is measured in light-meters.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleState {
    position: Vec4<ftr>,
    momentum: Vec4<ftr>,
    charge: ftr,
    rest_mass: ftr,
    proper_time_elapsed: ftr,
    step_index: u64,
}

impl ParticleState {
    /// Creates a new particle state from a position four-vector, the spatial
    /// momentum components and the rest mass. The energy is computed from the
    /// mass and momentum.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if the rest mass is not finite and
    /// positive or any other input is not finite.
    pub fn from_momentum_and_mass(
        position: Vec4<ftr>,
        px: ftr,
        py: ftr,
        pz: ftr,
        charge: ftr,
        rest_mass: ftr,
    ) -> SimulationResult<Self> {
        crate::ensure_valid!(
            num::is_finite_positive(rest_mass),
            "Rest mass must be finite and positive, got {}",
            rest_mass
        );
        Self::validated(
            position,
            Vec4::from_momentum_and_mass(px, py, pz, rest_mass),
            charge,
            rest_mass,
        )
    }

    /// Creates a new particle state from a position and a complete momentum
    /// four-vector. The rest mass is the invariant mass of the four-momentum.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if the four-momentum is not time-like
    /// or any input is not finite.
    pub fn from_four_momentum(
        position: Vec4<ftr>,
        momentum: Vec4<ftr>,
        charge: ftr,
    ) -> SimulationResult<Self> {
        let rest_mass = momentum.invariant_mass();
        crate::ensure_valid!(
            num::is_finite_positive(rest_mass),
            "Four-momentum {} has non-positive invariant mass",
            momentum
        );
        Self::validated(position, momentum, charge, rest_mass)
    }

    /// Creates a new particle state moving in the xy-plane, starting at time zero.
    pub fn planar(
        x: ftr,
        y: ftr,
        px: ftr,
        py: ftr,
        charge: ftr,
        rest_mass: ftr,
    ) -> SimulationResult<Self> {
        Self::from_momentum_and_mass(
            Vec4::planar_position(x, y),
            px,
            py,
            0.0,
            charge,
            rest_mass,
        )
    }

    fn validated(
        position: Vec4<ftr>,
        momentum: Vec4<ftr>,
        charge: ftr,
        rest_mass: ftr,
    ) -> SimulationResult<Self> {
        crate::ensure_valid!(
            position.is_finite(),
            "Initial position {} is not finite",
            position
        );
        crate::ensure_valid!(
            momentum.is_finite(),
            "Initial momentum {} is not finite",
            momentum
        );
        crate::ensure_valid!(charge.is_finite(), "Charge must be finite, got {}", charge);
        Ok(Self {
            position,
            momentum,
            charge,
            rest_mass,
            proper_time_elapsed: 0.0,
            step_index: 0,
        })
    }

    /// Returns the position four-vector (x, y, z, t).
    pub fn position(&self) -> &Vec4<ftr> {
        &self.position
    }

    /// Returns the position in the plane of motion.
    pub fn planar_position(&self) -> Point2<ftr> {
        self.position.to_point2()
    }

    /// Returns the momentum four-vector (px, py, pz, E).
    pub fn momentum(&self) -> &Vec4<ftr> {
        &self.momentum
    }

    pub fn charge(&self) -> ftr {
        self.charge
    }

    /// Returns the rest mass fixed when the state was created.
    pub fn rest_mass(&self) -> ftr {
        self.rest_mass
    }

    /// Returns the total energy.
    pub fn energy(&self) -> ftr {
        self.momentum.energy()
    }

    /// Returns the kinetic energy, the total energy minus the rest mass.
    pub fn kinetic_energy(&self) -> ftr {
        self.momentum.energy() - self.rest_mass
    }

    /// Returns the magnitude of the spatial momentum.
    pub fn momentum_magnitude(&self) -> ftr {
        self.momentum.spatial_length()
    }

    pub fn proper_time_elapsed(&self) -> ftr {
        self.proper_time_elapsed
    }

    /// Returns the number of steps taken so far.
    pub fn step_index(&self) -> u64 {
        self.step_index
    }

    /// Replaces position and momentum with the result of a step of the given size.
    pub(crate) fn advance(&mut self, position: Vec4<ftr>, momentum: Vec4<ftr>, step_size: ftr) {
        self.position = position;
        self.momentum = momentum;
        self.proper_time_elapsed += step_size;
        self.step_index += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{constants::MC2_ELECTRON, error::SimulationError};
    use approx::assert_relative_eq;

    #[test]
    fn energy_is_derived_from_mass_and_momentum() {
        let state = ParticleState::planar(0.0, 0.0, 1e6, 0.0, -1.0, MC2_ELECTRON).unwrap();
        let energy = (MC2_ELECTRON * MC2_ELECTRON + 1e12).sqrt();
        assert_relative_eq!(state.energy(), energy, max_relative = 1e-14);
        assert_relative_eq!(state.kinetic_energy(), energy - MC2_ELECTRON, max_relative = 1e-12);
        assert_eq!(state.step_index(), 0);
        assert_eq!(state.proper_time_elapsed(), 0.0);
    }

    #[test]
    fn rest_mass_is_taken_from_four_momentum() {
        let momentum = Vec4::new(3.0, 0.0, 0.0, 5.0);
        let state = ParticleState::from_four_momentum(Vec4::zero(), momentum, 1.0).unwrap();
        assert_relative_eq!(state.rest_mass(), 4.0);
    }

    #[test]
    fn non_positive_rest_mass_is_rejected() {
        assert!(matches!(
            ParticleState::planar(0.0, 0.0, 1.0, 0.0, 1.0, 0.0),
            Err(SimulationError::InvalidConfiguration(_))
        ));
        assert!(ParticleState::planar(0.0, 0.0, 1.0, 0.0, 1.0, -5.0).is_err());
        assert!(
            ParticleState::from_four_momentum(Vec4::zero(), Vec4::new(5.0, 0.0, 0.0, 3.0), 1.0)
                .is_err()
        );
        assert!(ParticleState::planar(ftr::INFINITY, 0.0, 1.0, 0.0, 1.0, 1.0).is_err());
    }
}
