//! Generation of initial particle states.

#[cfg(feature = "seeding")]
pub mod beam;
pub mod manual;

use crate::tracing::particle::ParticleState;
use rayon::prelude::*;

/// Defines the properties of a generator of initial particle states.
pub trait ParticleSeeder:
    IntoIterator<Item = ParticleState> + IntoParallelIterator<Item = ParticleState>
{
    /// Returns the number of particles that will be produced by the seeder.
    fn number_of_particles(&self) -> usize;

    /// Filters the particles using the given predicate.
    fn retain_particles<P>(&mut self, predicate: P)
    where
        P: FnMut(&ParticleState) -> bool;
}

// Let a vector of states work as a seeder.
impl ParticleSeeder for Vec<ParticleState> {
    fn number_of_particles(&self) -> usize {
        self.len()
    }

    fn retain_particles<P>(&mut self, predicate: P)
    where
        P: FnMut(&ParticleState) -> bool,
    {
        self.retain(predicate);
    }
}
