//! Randomly generated particle beams.

use super::ParticleSeeder;
use crate::{
    constants::{MC2_ELECTRON, PI, Q_ELECTRON},
    error::SimulationResult,
    num,
    tracing::{ftr, particle::ParticleState},
    units::MEV,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use rayon::{self, prelude::*};
use std::vec;

/// Configuration parameters for beam seeders.
#[derive(Clone, Copy, Debug)]
pub struct BeamSeederConfig {
    /// Number of particles to generate.
    pub number_of_particles: usize,
    /// Position where all particles start [m].
    pub start_position: (ftr, ftr),
    /// Mean of the momentum magnitude distribution [eV].
    pub mean_momentum: ftr,
    /// Standard deviation of the momentum magnitude distribution [eV].
    pub momentum_spread: ftr,
    /// Range of directions of the momentum, as angles from the x-axis [rad].
    pub angle_range: (ftr, ftr),
    /// Charge of every particle [e].
    pub charge: ftr,
    /// Rest mass of every particle [eV].
    pub rest_mass: ftr,
    /// Seed for the random number generator, or `None` to seed from entropy.
    pub seed: Option<u64>,
}

impl BeamSeederConfig {
    pub const DEFAULT_NUMBER_OF_PARTICLES: usize = 1000;
    pub const DEFAULT_START_POSITION: (ftr, ftr) = (0.0, 0.0);
    pub const DEFAULT_MEAN_MOMENTUM: ftr = 1.0 * MEV;
    pub const DEFAULT_MOMENTUM_SPREAD: ftr = Self::DEFAULT_MEAN_MOMENTUM;
    pub const DEFAULT_ANGLE_RANGE: (ftr, ftr) = (0.0, 2.0 * PI);
    pub const DEFAULT_CHARGE: ftr = Q_ELECTRON;
    pub const DEFAULT_REST_MASS: ftr = MC2_ELECTRON;

    /// Checks that the configuration parameter values are valid.
    pub fn validate(&self) -> SimulationResult<()> {
        crate::ensure_valid!(
            self.start_position.0.is_finite() && self.start_position.1.is_finite(),
            "Start position must be finite, got ({}, {})",
            self.start_position.0,
            self.start_position.1
        );
        crate::ensure_valid!(
            num::is_finite_positive(self.mean_momentum),
            "Mean momentum must be finite and larger than zero, got {}",
            self.mean_momentum
        );
        crate::ensure_valid!(
            num::is_finite_non_negative(self.momentum_spread),
            "Momentum spread must be finite and non-negative, got {}",
            self.momentum_spread
        );
        crate::ensure_valid!(
            self.angle_range.0.is_finite()
                && self.angle_range.1.is_finite()
                && self.angle_range.0 <= self.angle_range.1,
            "Angle range must be finite and ordered, got [{}, {}]",
            self.angle_range.0,
            self.angle_range.1
        );
        crate::ensure_valid!(
            num::is_finite_positive(self.rest_mass),
            "Rest mass must be finite and larger than zero, got {}",
            self.rest_mass
        );
        Ok(())
    }
}

impl Default for BeamSeederConfig {
    fn default() -> Self {
        BeamSeederConfig {
            number_of_particles: Self::DEFAULT_NUMBER_OF_PARTICLES,
            start_position: Self::DEFAULT_START_POSITION,
            mean_momentum: Self::DEFAULT_MEAN_MOMENTUM,
            momentum_spread: Self::DEFAULT_MOMENTUM_SPREAD,
            angle_range: Self::DEFAULT_ANGLE_RANGE,
            charge: Self::DEFAULT_CHARGE,
            rest_mass: Self::DEFAULT_REST_MASS,
            seed: None,
        }
    }
}

/// Generator for particles leaving a point source with Gaussian distributed
/// momentum magnitudes and uniformly distributed directions.
#[derive(Clone, Debug)]
pub struct BeamSeeder {
    particles: Vec<ParticleState>,
}

impl BeamSeeder {
    /// Creates a new beam seeder drawing particles according to the given configuration.
    ///
    /// Momentum magnitudes are redrawn until they are positive.
    pub fn new(config: BeamSeederConfig) -> SimulationResult<Self> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let momentum_distribution = Normal::new(config.mean_momentum, config.momentum_spread)
            .map_err(|err| crate::error::SimulationError::invalid_configuration(err.to_string()))?;
        let (min_angle, max_angle) = config.angle_range;
        let (x, y) = config.start_position;

        let particles = (0..config.number_of_particles)
            .map(|_| {
                let momentum = loop {
                    let momentum: ftr = momentum_distribution.sample(&mut rng);
                    if momentum > 0.0 {
                        break momentum;
                    }
                };
                let angle = if min_angle < max_angle {
                    rng.gen_range(min_angle..max_angle)
                } else {
                    min_angle
                };
                ParticleState::planar(
                    x,
                    y,
                    momentum * angle.cos(),
                    momentum * angle.sin(),
                    config.charge,
                    config.rest_mass,
                )
            })
            .collect::<SimulationResult<Vec<_>>>()?;

        Ok(Self { particles })
    }
}

impl IntoIterator for BeamSeeder {
    type Item = ParticleState;
    type IntoIter = vec::IntoIter<Self::Item>;
    fn into_iter(self) -> Self::IntoIter {
        self.particles.into_iter()
    }
}

impl IntoParallelIterator for BeamSeeder {
    type Item = ParticleState;
    type Iter = rayon::vec::IntoIter<Self::Item>;
    fn into_par_iter(self) -> Self::Iter {
        self.particles.into_par_iter()
    }
}

impl ParticleSeeder for BeamSeeder {
    fn number_of_particles(&self) -> usize {
        self.particles.len()
    }

    fn retain_particles<P>(&mut self, predicate: P)
    where
        P: FnMut(&ParticleState) -> bool,
    {
        self.particles.retain(predicate);
    }
}
