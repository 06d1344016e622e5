mod common;

use betatrack::{
    absorption::{AbsorberRegion, AbsorberSet, HitCounter},
    constants::MC2_ELECTRON,
    ensemble::{simulate_ensemble, simulate_ensemble_sequentially, OutcomeRecord},
    io::{field_map, Verbosity},
    tracing::{
        ftr,
        particle::ParticleState,
        trajectory::{TrajectorySimulator, TrajectorySimulatorConfig},
        TerminationCause,
    },
    units::{gyration_radius, MEV, MILLITESLA, NANOSECOND},
};
use common::{distance, reference_config, reference_electron, reference_sampler};
use std::sync::Arc;

#[cfg(feature = "seeding")]
use betatrack::seeding::beam::{BeamSeeder, BeamSeederConfig};

#[test]
fn reference_magnet_orbit_follows_gyration_circle() {
    let sampler = reference_sampler(1.0);
    let absorbers = AbsorberSet::new();
    let simulator = TrajectorySimulator::new(reference_config(), &sampler, &absorbers).unwrap();
    let initial_state = reference_electron();
    let initial_energy = initial_state.energy();

    let outcome = simulator.simulate(initial_state).unwrap();
    assert_eq!(*outcome.cause(), TerminationCause::TimeLimit);
    assert!((800..=801).contains(&outcome.final_state().step_index()));
    approx::assert_relative_eq!(outcome.final_energy(), initial_energy, max_relative = 1e-12);

    let radius = gyration_radius(1.0 * MEV, -1.0, 1.0 * MILLITESLA);
    // The orbit enters the magnet half a cell before the outermost magnet cell center
    let analytic_center = (-1.005, radius);
    let reference_center = (-0.993, 2.995);
    let reference_radius = 2.994;

    let points = outcome.trajectory().points();
    for point in &points[200..=500] {
        let point = (point.x(), point.y());
        let deviation = (distance(point, analytic_center) - radius).abs();
        assert!(
            deviation < 0.01 * radius,
            "Point {:?} deviates {} m from the gyration circle",
            point,
            deviation
        );
    }
    for step in [200, 500] {
        let point = (points[step].x(), points[step].y());
        assert!(
            (distance(point, reference_center) - reference_radius).abs() < 0.1,
            "Point {:?} at step {} is far from the reference circle",
            point,
            step
        );
    }
}

#[test]
fn particle_leaving_field_map_escapes_with_default_margin() {
    let sampler = reference_sampler(1.0);
    let absorbers = AbsorberSet::new();
    let config = reference_config();
    assert_eq!(config.edge_margin, TrajectorySimulatorConfig::DEFAULT_EDGE_MARGIN);
    let simulator = TrajectorySimulator::new(config, &sampler, &absorbers).unwrap();
    let state = ParticleState::planar(-2.0, -2.0, 0.0, -1.0 * MEV, -1.0, MC2_ELECTRON).unwrap();

    let outcome = simulator.simulate(state).unwrap();
    assert_eq!(*outcome.cause(), TerminationCause::BoundaryEscape);
    let final_position = outcome.final_state().planar_position();
    assert!(final_position.y() <= -3.0 && final_position.y() > -3.005);
}

#[test]
fn field_maps_in_centimeters_give_same_orbit() {
    let absorbers = AbsorberSet::new();
    let meter_sampler = reference_sampler(1.0);
    let centimeter_sampler = reference_sampler(0.01);
    let meter_outcome = TrajectorySimulator::new(reference_config(), &meter_sampler, &absorbers)
        .unwrap()
        .simulate(reference_electron())
        .unwrap();
    let centimeter_outcome =
        TrajectorySimulator::new(reference_config(), &centimeter_sampler, &absorbers)
            .unwrap()
            .simulate(reference_electron())
            .unwrap();

    assert_eq!(
        meter_outcome.trajectory().len(),
        centimeter_outcome.trajectory().len()
    );
    let meter_end = meter_outcome.trajectory().last().unwrap();
    let centimeter_end = centimeter_outcome.trajectory().last().unwrap();
    assert!(meter_end.distance_to(centimeter_end) < 1e-6);
}

#[test]
fn field_map_survives_file_round_trip() {
    let test = common::Test::new();
    let path = test.output_path("magnet.txt");
    let field = common::reference_field_map(1.0);
    field_map::write_field_map(&field, &path).unwrap();
    common::assert_file_exists(&path);

    let read_field = field_map::read_field_map(&path).unwrap();
    assert_eq!(read_field.values(), field.values());
    assert_eq!(read_field.value_range(), (0.0, common::MAGNET_STRENGTH));
}

#[test]
fn detector_behind_magnet_reports_hits() {
    let sampler = reference_sampler(1.0);
    let counter = Arc::new(HitCounter::new());
    let absorbers = AbsorberSet::new()
        .with_region(AbsorberRegion::absorber(-2.9, 2.9, -2.9, -2.0).unwrap())
        .with_region(
            AbsorberRegion::detector(1.5, 2.9, 0.5, 2.9)
                .unwrap()
                .with_observer(counter.clone()),
        );
    let config = TrajectorySimulatorConfig {
        max_proper_time: 20.0 * NANOSECOND,
        ..reference_config()
    };
    let simulator = TrajectorySimulator::new(config, &sampler, &absorbers).unwrap();

    let outcome = simulator.simulate(reference_electron()).unwrap();
    assert!(outcome.cause().is_detected());
    assert_eq!(outcome.cause().outcome_code(), 1);
    assert_eq!(counter.count(), 1);
    let final_position = outcome.final_state().planar_position();
    assert!(final_position.x() >= 1.5 && final_position.y() >= 0.5);
}

#[cfg(feature = "seeding")]
#[test]
fn seeded_beam_ensemble_is_reproducible() {
    let sampler = reference_sampler(1.0);
    let absorbers =
        AbsorberSet::new().with_region(AbsorberRegion::detector(1.5, 2.9, 0.5, 2.9).unwrap());
    let config = TrajectorySimulatorConfig {
        max_proper_time: 20.0 * NANOSECOND,
        ..reference_config()
    };
    let simulator = TrajectorySimulator::new(config, &sampler, &absorbers).unwrap();

    let seeder = || {
        BeamSeeder::new(BeamSeederConfig {
            number_of_particles: 100,
            start_position: (-2.0, 0.0),
            mean_momentum: 1.0 * MEV,
            momentum_spread: 0.05 * MEV,
            angle_range: (-0.05, 0.05),
            seed: Some(42),
            ..BeamSeederConfig::default()
        })
        .unwrap()
    };

    let parallel: Vec<OutcomeRecord> = simulate_ensemble(&simulator, seeder(), &Verbosity::Quiet)
        .iter()
        .map(|outcome| OutcomeRecord::from(outcome.as_ref().unwrap()))
        .collect();
    let sequential: Vec<OutcomeRecord> = simulate_ensemble_sequentially(&simulator, seeder())
        .map(|outcome| OutcomeRecord::from(&outcome.unwrap()))
        .collect();
    assert_eq!(parallel, sequential);
    assert_eq!(parallel.len(), 100);

    let n_detected = parallel.iter().filter(|record| record.outcome_code == 1).count();
    assert!(n_detected > 50, "Only {} of 100 particles detected", n_detected);
    for record in &parallel {
        assert_eq!(record.outcome_code, record.cause.outcome_code());
        let kinetic_energy: ftr = record.final_energy - MC2_ELECTRON;
        approx::assert_relative_eq!(record.kinetic_energy, kinetic_energy, max_relative = 1e-9);
    }
}

#[cfg(feature = "cli")]
mod cli {
    use super::common;
    use betatrack::io::utils::read_text_file;

    #[test]
    fn created_field_map_drives_orbit_subcommand() {
        let test = common::Test::new();
        let field_path = test.output_path("magnet.txt");
        let orbit_path = test.output_path("orbit.csv");
        let field_path_str = field_path.to_string_lossy().to_string();
        let orbit_path_str = orbit_path.to_string_lossy().to_string();

        common::run([
            "create_field",
            field_path_str.as_str(),
            "--overwrite",
            "--shape=601,601",
            "--x-bounds=-3.005,3.005",
            "--y-bounds=-3.005,3.005",
            "--magnet=-1,1,-1,1,0.001",
        ]);
        common::assert_file_exists(&field_path);

        let field_map_arg = format!("--field-map={}", field_path_str);
        common::run([
            "orbit",
            orbit_path_str.as_str(),
            "--overwrite",
            field_map_arg.as_str(),
            "--position=-2,0",
            "--momentum=1,0",
        ]);
        let text = read_text_file(&orbit_path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("x,y"));
        assert_eq!(lines.next(), Some("-2,0"));
        let n_points = lines.count() + 1;
        assert!((801..=802).contains(&n_points), "Got {} points", n_points);
    }

    #[cfg(feature = "seeding")]
    #[test]
    fn simulate_subcommand_writes_one_record_per_particle() {
        let test = common::Test::new();
        let output_path = test.output_path("outcomes.csv");
        let output_path_str = output_path.to_string_lossy().to_string();

        common::run([
            "simulate",
            output_path_str.as_str(),
            "--overwrite",
            "--uniform-field=0.001",
            "--domain=-3,3,-3,3",
            "--edge-margin=0.05",
            "--particles=20",
            "--seed=7",
            "--start-position=-2,0",
            "--detector=-3,3,2,3",
        ]);
        let text = read_text_file(&output_path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some(betatrack::ensemble::OutcomeRecord::CSV_HEADER)
        );
        assert_eq!(lines.count(), 20);
    }
}
