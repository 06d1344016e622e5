//! Simulating ensembles of independent particles.

#[cfg(feature = "statistics")]
pub mod statistics;

use crate::{
    error::SimulationResult,
    field::FieldSampler,
    io::Verbosity,
    seeding::ParticleSeeder,
    tracing::{
        ftr,
        stepping::Stepper,
        trajectory::{Outcome, TrajectorySimulator},
        TerminationCause,
    },
};
use indicatif::ParallelProgressIterator;
use log::debug;
use rayon::prelude::*;

#[cfg(feature = "serialization")]
use serde::Serialize;

/// Summary of the outcome of a single particle, for export.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct OutcomeRecord {
    /// Total energy at termination [eV].
    pub final_energy: ftr,
    /// Kinetic energy at termination [eV].
    pub kinetic_energy: ftr,
    /// 1 for particles captured by a detector, 0 otherwise.
    pub outcome_code: u8,
    pub cause: TerminationCause,
}

impl OutcomeRecord {
    /// Header line for CSV output of records.
    pub const CSV_HEADER: &'static str = "final_energy,kinetic_energy,outcome_code,cause";

    /// Returns the fields of the record as strings, in CSV column order.
    pub fn to_csv_fields(&self) -> Vec<String> {
        vec![
            self.final_energy.to_string(),
            self.kinetic_energy.to_string(),
            self.outcome_code.to_string(),
            self.cause.to_string(),
        ]
    }
}

impl From<&Outcome> for OutcomeRecord {
    fn from(outcome: &Outcome) -> Self {
        Self {
            final_energy: outcome.final_energy(),
            kinetic_energy: outcome.kinetic_energy(),
            outcome_code: outcome.cause().outcome_code(),
            cause: *outcome.cause(),
        }
    }
}

/// Simulates each particle produced by the seeder in turn.
///
/// The returned iterator is lazy, so particles are only simulated as the
/// outcomes are consumed.
pub fn simulate_ensemble_sequentially<'a, S, St, Sd>(
    simulator: &'a TrajectorySimulator<'a, S, St>,
    seeder: Sd,
) -> impl Iterator<Item = SimulationResult<Outcome>> + 'a
where
    S: FieldSampler + ?Sized,
    St: Stepper,
    Sd: ParticleSeeder,
    <Sd as IntoIterator>::IntoIter: 'a,
{
    seeder
        .into_iter()
        .map(move |initial_state| simulator.simulate(initial_state))
}

/// Simulates all particles produced by the seeder in parallel.
///
/// Outcomes are returned in the order the seeder produced the particles.
pub fn simulate_ensemble<S, St, Sd>(
    simulator: &TrajectorySimulator<'_, S, St>,
    seeder: Sd,
    verbosity: &Verbosity,
) -> Vec<SimulationResult<Outcome>>
where
    S: FieldSampler + ?Sized,
    St: Stepper,
    Sd: ParticleSeeder,
{
    let n_particles = seeder.number_of_particles();
    if verbosity.print_messages() {
        println!("Simulating {} particles", n_particles);
    }
    let outcomes: Vec<_> = seeder
        .into_par_iter()
        .progress_with(verbosity.create_progress_bar(n_particles))
        .map(|initial_state| simulator.simulate(initial_state))
        .collect();
    debug!(
        "Ensemble finished with {} failed simulations",
        outcomes.iter().filter(|outcome| outcome.is_err()).count()
    );
    outcomes
}
