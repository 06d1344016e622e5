//! Simulating the trajectory of a single particle until it terminates.

use super::{
    ftr,
    particle::ParticleState,
    stepping::{
        rk4::{RK4Stepper, RK4StepperConfig},
        Stepper,
    },
    TerminationCause,
};
use crate::{
    absorption::AbsorberSet,
    error::{SimulationError, SimulationResult},
    field::FieldSampler,
    geometry::{BoundingBox2, Point2},
    num,
    units::NANOSECOND,
};
use log::{debug, warn};

#[cfg(feature = "serialization")]
use serde::Serialize;

/// Which points of a trajectory to keep.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrajectoryRecording {
    /// Keep the initial point and the point after every step.
    Full,
    /// Keep only the initial and final point.
    Endpoints,
}

/// Ordered sequence of positions in the plane of motion.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
pub struct Trajectory {
    points: Vec<Point2<ftr>>,
}

impl Trajectory {
    fn starting_at(point: Point2<ftr>) -> Self {
        Self {
            points: vec![point],
        }
    }

    fn push(&mut self, point: Point2<ftr>) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[Point2<ftr>] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&Point2<ftr>> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&Point2<ftr>> {
        self.points.last()
    }
}

/// Result of simulating a particle until termination.
#[derive(Clone, Debug)]
pub struct Outcome {
    final_state: ParticleState,
    cause: TerminationCause,
    trajectory: Trajectory,
}

impl Outcome {
    pub fn final_state(&self) -> &ParticleState {
        &self.final_state
    }

    pub fn cause(&self) -> &TerminationCause {
        &self.cause
    }

    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    /// Returns the total energy of the particle at termination [eV].
    pub fn final_energy(&self) -> ftr {
        self.final_state.energy()
    }

    /// Returns the kinetic energy of the particle at termination [eV].
    pub fn kinetic_energy(&self) -> ftr {
        self.final_state.kinetic_energy()
    }
}

/// Configuration parameters for trajectory simulation.
#[derive(Clone, Copy, Debug)]
pub struct TrajectorySimulatorConfig {
    /// Proper time step [light-m].
    pub step_size: ftr,
    /// Proper time after which the simulation is terminated [light-m].
    pub max_proper_time: ftr,
    /// Distance from the edges of the field domain at which particles count
    /// as escaped [m].
    pub edge_margin: ftr,
    /// Maximum number of steps before the simulation is considered
    /// non-terminating. Derived from the time limit if not specified.
    pub max_steps: Option<u64>,
    /// Which trajectory points to keep.
    pub recording: TrajectoryRecording,
}

impl TrajectorySimulatorConfig {
    pub const DEFAULT_STEP_SIZE: ftr = RK4StepperConfig::DEFAULT_STEP_SIZE;
    pub const DEFAULT_MAX_PROPER_TIME: ftr = 8.0 * NANOSECOND;
    pub const DEFAULT_EDGE_MARGIN: ftr = 0.005;
    pub const DEFAULT_RECORDING: TrajectoryRecording = TrajectoryRecording::Full;
    /// Number of steps allowed beyond the time limit before the simulation
    /// is aborted, when no explicit step limit is given.
    pub const STEP_LIMIT_SLACK: u64 = 16;

    /// Checks that the configuration parameter values are valid.
    pub fn validate(&self) -> SimulationResult<()> {
        crate::ensure_valid!(
            num::is_finite_positive(self.step_size),
            "Step size must be finite and larger than zero, got {}",
            self.step_size
        );
        crate::ensure_valid!(
            self.max_proper_time.is_finite() && self.step_size < self.max_proper_time,
            "Maximum proper time must be finite and larger than the step size {}, got {}",
            self.step_size,
            self.max_proper_time
        );
        crate::ensure_valid!(
            num::is_finite_non_negative(self.edge_margin),
            "Edge margin must be finite and non-negative, got {}",
            self.edge_margin
        );
        if let Some(max_steps) = self.max_steps {
            crate::ensure_valid!(max_steps > 0, "Maximum number of steps must be larger than zero");
        }
        Ok(())
    }

    /// Returns the maximum number of steps to take before failing.
    pub fn step_limit(&self) -> u64 {
        self.max_steps.unwrap_or_else(|| {
            (self.max_proper_time / self.step_size).ceil() as u64 + Self::STEP_LIMIT_SLACK
        })
    }
}

impl Default for TrajectorySimulatorConfig {
    fn default() -> Self {
        TrajectorySimulatorConfig {
            step_size: Self::DEFAULT_STEP_SIZE,
            max_proper_time: Self::DEFAULT_MAX_PROPER_TIME,
            edge_margin: Self::DEFAULT_EDGE_MARGIN,
            max_steps: None,
            recording: Self::DEFAULT_RECORDING,
        }
    }
}

/// Simulates particles through a shared field and set of absorbers.
///
/// Termination is checked before every step, in order of priority:
///
/// 1. The time limit, `step_index * dτ > τ_final`.
/// 2. Escape through the edge of the field domain, when the position is
///    within the edge margin of (or outside) the domain on any side.
/// 3. Collision with an absorber region, where the first matching region wins.
pub struct TrajectorySimulator<'a, S: ?Sized, St = RK4Stepper> {
    sampler: &'a S,
    absorbers: &'a AbsorberSet,
    bounding_box: BoundingBox2<ftr>,
    stepper: St,
    config: TrajectorySimulatorConfig,
}

impl<'a, S> TrajectorySimulator<'a, S, RK4Stepper>
where
    S: FieldSampler + ?Sized,
{
    /// Creates a new simulator stepping with RK4.
    pub fn new(
        config: TrajectorySimulatorConfig,
        sampler: &'a S,
        absorbers: &'a AbsorberSet,
    ) -> SimulationResult<Self> {
        let stepper = RK4Stepper::new(RK4StepperConfig {
            step_size: config.step_size,
        })?;
        Self::with_stepper(config, sampler, absorbers, stepper)
    }
}

impl<'a, S, St> TrajectorySimulator<'a, S, St>
where
    S: FieldSampler + ?Sized,
    St: Stepper,
{
    /// Creates a new simulator using the given stepper, whose step size
    /// overrides the one in the configuration.
    pub fn with_stepper(
        mut config: TrajectorySimulatorConfig,
        sampler: &'a S,
        absorbers: &'a AbsorberSet,
        stepper: St,
    ) -> SimulationResult<Self> {
        config.step_size = stepper.step_size();
        config.validate()?;

        let bounding_box = sampler.bounding_box();
        if absorbers.is_empty() {
            warn!("No absorber regions configured, particles can only escape or time out");
        }
        if config.edge_margin < config.step_size {
            warn!(
                "Edge margin {} m is below the step size {} m, stages may sample outside the field",
                config.edge_margin, config.step_size
            );
        }
        if let Some(max_steps) = config.max_steps {
            let required = (config.max_proper_time / config.step_size).ceil() as u64;
            if max_steps < required {
                warn!(
                    "Step limit {} is below the {} steps needed to reach the time limit",
                    max_steps, required
                );
            }
        }

        Ok(Self {
            sampler,
            absorbers,
            bounding_box,
            stepper,
            config,
        })
    }

    pub fn config(&self) -> &TrajectorySimulatorConfig {
        &self.config
    }

    pub fn sampler(&self) -> &S {
        self.sampler
    }

    pub fn absorbers(&self) -> &AbsorberSet {
        self.absorbers
    }

    /// Returns the first termination condition satisfied by the given state,
    /// if any.
    pub fn check_termination(&self, state: &ParticleState) -> Option<TerminationCause> {
        if state.step_index() as ftr * self.config.step_size > self.config.max_proper_time {
            return Some(TerminationCause::TimeLimit);
        }
        let position = state.planar_position();
        if self
            .bounding_box
            .is_within_margin_of_edge(&position, self.config.edge_margin)
        {
            return Some(TerminationCause::BoundaryEscape);
        }
        self.absorbers
            .test_collision(&position)
            .map(TerminationCause::Absorbed)
    }

    /// Simulates the particle with the given initial state until it terminates.
    pub fn simulate(&self, initial_state: ParticleState) -> SimulationResult<Outcome> {
        self.simulate_with_callback(initial_state, |_| {})
    }

    /// Simulates the particle with the given initial state until it
    /// terminates, calling the given closure with the state after each
    /// accepted step.
    ///
    /// # Errors
    ///
    /// - `InvalidFieldDomain` if the field is sampled outside its domain.
    /// - `NonTerminatingSimulation` if the step limit is reached.
    pub fn simulate_with_callback<C>(
        &self,
        initial_state: ParticleState,
        mut callback: C,
    ) -> SimulationResult<Outcome>
    where
        C: FnMut(&ParticleState),
    {
        let mut state = initial_state;
        let mut trajectory = Trajectory::starting_at(state.planar_position());
        let step_limit = self.config.step_limit();

        let cause = loop {
            if let Some(cause) = self.check_termination(&state) {
                break cause;
            }
            if state.step_index() >= step_limit {
                return Err(SimulationError::NonTerminatingSimulation {
                    steps: state.step_index(),
                });
            }
            self.stepper.step(&mut state, self.sampler)?;
            if self.config.recording == TrajectoryRecording::Full {
                trajectory.push(state.planar_position());
            }
            callback(&state);
        };

        if self.config.recording == TrajectoryRecording::Endpoints && state.step_index() > 0 {
            trajectory.push(state.planar_position());
        }
        if let TerminationCause::Absorbed(collision) = &cause {
            self.absorbers.notify(collision, &state);
        }
        debug!(
            "Particle terminated after {} steps at {}: {}",
            state.step_index(),
            state.planar_position(),
            cause
        );

        Ok(Outcome {
            final_state: state,
            cause,
            trajectory,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        absorption::{AbsorberRegion, Collision, HitCounter, OutcomeTag},
        field::UniformField,
    };
    use std::sync::Arc;

    fn square_field() -> UniformField {
        UniformField::new(0.0, BoundingBox2::from_bounds((-4.0, 4.0), (-4.0, 4.0))).unwrap()
    }

    fn config(step_size: ftr, max_proper_time: ftr, edge_margin: ftr) -> TrajectorySimulatorConfig {
        TrajectorySimulatorConfig {
            step_size,
            max_proper_time,
            edge_margin,
            ..TrajectorySimulatorConfig::default()
        }
    }

    // Unit mass with momentum 1 along x moves 1/sqrt(2) per unit proper time
    fn particle_at(x: ftr, y: ftr) -> ParticleState {
        ParticleState::planar(x, y, 1.0, 0.0, 1.0, 2.0_f64.sqrt()).unwrap()
    }

    #[test]
    fn time_limit_takes_priority_over_boundary_and_absorbers() {
        let field = square_field();
        let absorbers = AbsorberSet::new()
            .with_region(AbsorberRegion::absorber(-10.0, 10.0, -10.0, 10.0).unwrap());
        let simulator =
            TrajectorySimulator::new(config(1.0, 2.5, 0.0), &field, &absorbers).unwrap();

        let mut state = particle_at(-8.0, 0.0);
        for _ in 0..3 {
            state.advance(*state.position(), *state.momentum(), 1.0);
        }
        assert_eq!(simulator.check_termination(&state), Some(TerminationCause::TimeLimit));
        assert_eq!(
            simulator.check_termination(&particle_at(-8.0, 0.0)),
            Some(TerminationCause::BoundaryEscape)
        );
        assert_eq!(
            simulator.check_termination(&particle_at(0.0, 0.0)),
            Some(TerminationCause::Absorbed(Collision {
                region_index: 0,
                tag: OutcomeTag::Absorbed
            }))
        );
    }

    #[test]
    fn boundary_margin_is_inclusive() {
        let field = square_field();
        let absorbers = AbsorberSet::new();
        let margin = 0.5;
        let simulator =
            TrajectorySimulator::new(config(0.1, 10.0, margin), &field, &absorbers).unwrap();
        assert_eq!(
            simulator.check_termination(&particle_at(4.0 - margin, 0.0)),
            Some(TerminationCause::BoundaryEscape)
        );
        assert_eq!(
            simulator.check_termination(&particle_at(0.0, -4.0 + margin)),
            Some(TerminationCause::BoundaryEscape)
        );
        assert_eq!(simulator.check_termination(&particle_at(4.0 - margin - 1e-9, 0.0)), None);
    }

    #[test]
    fn free_particle_times_out_with_full_trajectory() {
        let field = square_field();
        let absorbers = AbsorberSet::new();
        let simulator =
            TrajectorySimulator::new(config(0.25, 2.0, 0.0), &field, &absorbers).unwrap();
        let outcome = simulator.simulate(particle_at(0.0, 0.0)).unwrap();

        assert_eq!(outcome.cause(), &TerminationCause::TimeLimit);
        // Terminates once step_index * 0.25 > 2, at step 9
        assert_eq!(outcome.final_state().step_index(), 9);
        assert_eq!(outcome.trajectory().len(), 10);
        assert_eq!(outcome.trajectory().first(), Some(&Point2::new(0.0, 0.0)));
        let final_x = outcome.trajectory().last().unwrap().x();
        assert!((final_x - 9.0 * 0.25 / 2.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn endpoint_recording_keeps_first_and_last_points() {
        let field = square_field();
        let absorbers = AbsorberSet::new();
        let simulator = TrajectorySimulator::new(
            TrajectorySimulatorConfig {
                recording: TrajectoryRecording::Endpoints,
                ..config(0.25, 2.0, 0.0)
            },
            &field,
            &absorbers,
        )
        .unwrap();
        let mut n_callbacks = 0;
        let outcome = simulator
            .simulate_with_callback(particle_at(0.0, 0.0), |_| n_callbacks += 1)
            .unwrap();
        assert_eq!(outcome.trajectory().len(), 2);
        assert_eq!(n_callbacks, 9);
    }

    #[test]
    fn absorbed_particle_notifies_observer_once() {
        let field = square_field();
        let counter = Arc::new(HitCounter::new());
        let absorbers = AbsorberSet::new().with_region(
            AbsorberRegion::detector(1.0, 2.0, -1.0, 1.0)
                .unwrap()
                .with_observer(counter.clone()),
        );
        let simulator =
            TrajectorySimulator::new(config(0.1, 100.0, 0.0), &field, &absorbers).unwrap();
        let outcome = simulator.simulate(particle_at(0.0, 0.0)).unwrap();

        assert!(outcome.cause().is_detected());
        assert_eq!(outcome.cause().outcome_code(), 1);
        assert!(outcome.final_state().position().x() >= 1.0);
        assert_eq!(counter.count(), 1);
    }

    #[test]
    fn step_limit_gives_non_terminating_simulation() {
        let field = square_field();
        let absorbers = AbsorberSet::new();
        let simulator = TrajectorySimulator::new(
            TrajectorySimulatorConfig {
                max_steps: Some(5),
                ..config(0.01, 100.0, 0.0)
            },
            &field,
            &absorbers,
        )
        .unwrap();
        assert_eq!(
            simulator.simulate(particle_at(0.0, 0.0)).unwrap_err(),
            SimulationError::NonTerminatingSimulation { steps: 5 }
        );
    }

    #[test]
    fn particle_starting_outside_domain_escapes_immediately() {
        let field =
            UniformField::new(0.0, BoundingBox2::from_bounds((-1.0, 1.0), (-1.0, 1.0))).unwrap();
        let absorbers = AbsorberSet::new();
        let simulator =
            TrajectorySimulator::new(config(0.1, 10.0, 0.0), &field, &absorbers).unwrap();
        let outcome = simulator.simulate(particle_at(2.0, 0.0)).unwrap();
        assert_eq!(outcome.cause(), &TerminationCause::BoundaryEscape);
        assert_eq!(outcome.final_state().step_index(), 0);
        assert_eq!(outcome.trajectory().len(), 1);
    }

    #[test]
    fn step_leaving_field_domain_is_reported() {
        let field =
            UniformField::new(0.0, BoundingBox2::from_bounds((-1.0, 1.0), (-1.0, 1.0))).unwrap();
        let absorbers = AbsorberSet::new();
        let simulator =
            TrajectorySimulator::new(config(1.0, 10.0, 0.0), &field, &absorbers).unwrap();
        assert!(matches!(
            simulator.simulate(particle_at(0.5, 0.0)),
            Err(SimulationError::InvalidFieldDomain { .. })
        ));
    }

    #[test]
    fn invalid_configurations_are_rejected() {
        let field = square_field();
        let absorbers = AbsorberSet::new();
        for invalid in [
            config(0.0, 1.0, 0.0),
            config(1.0, 1.0, 0.0),
            config(0.1, ftr::INFINITY, 0.0),
            config(0.1, 1.0, -0.1),
        ] {
            assert!(matches!(
                TrajectorySimulator::new(invalid, &field, &absorbers),
                Err(SimulationError::InvalidConfiguration(_))
            ));
        }
    }
}
