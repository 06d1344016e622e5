//! Command line interface for simulating ensembles of particles.

use crate::{
    cli::{
        field::{
            add_absorber_arguments_to_subcommand, add_field_arguments_to_subcommand,
            add_simulation_arguments_to_subcommand, add_species_arguments_to_subcommand,
            construct_absorbers_from_options, construct_field_from_options,
            construct_simulator_config_from_options, construct_species_from_options,
        },
        utils::{self as cli_utils, OutputType},
    },
    ensemble::{simulate_ensemble, OutcomeRecord},
    exit_on_error,
    field::FieldSampler,
    io::{utils as io_utils, Verbosity},
    seeding::{manual::ManualSeeder, ParticleSeeder},
    tracing::{
        ftr,
        trajectory::{TrajectoryRecording, TrajectorySimulator},
    },
    units::MEV,
};
use clap::{Arg, ArgMatches, Command};
use log::warn;
use std::{
    io::{self, BufWriter, Write},
    path::Path,
};

#[cfg(feature = "seeding")]
use crate::{
    constants::PI,
    seeding::beam::{BeamSeeder, BeamSeederConfig},
};

#[cfg(feature = "statistics")]
use crate::{ensemble::statistics::EnsembleStatistics, exit_on_false};

/// Builds a representation of the `simulate` command line subcommand.
pub fn create_simulate_subcommand(_parent_command_name: &'static str) -> Command<'static> {
    let command = Command::new("simulate")
        .about("Simulate an ensemble of charged particles and record their outcomes")
        .arg(
            Arg::new("output-file")
                .value_name("OUTPUT_FILE")
                .help(
                    "Path of the file where the outcome of each particle should be saved\n\
                       Writes in the following format based on the file extension:\
                       \n    *.csv: Creates a CSV file with one row per particle\
                       \n    *.pickle: Creates a Python pickle file (requires the pickle feature)\
                       \n    *.json: Creates a JSON file (requires the json feature)",
                )
                .required(true)
                .takes_value(true),
        )
        .arg(
            Arg::new("overwrite")
                .long("overwrite")
                .help("Automatically overwrite any existing files")
                .conflicts_with("no-overwrite"),
        )
        .arg(
            Arg::new("no-overwrite")
                .long("no-overwrite")
                .help("Do not overwrite any existing files")
                .conflicts_with("overwrite"),
        )
        .arg(
            Arg::new("seed-file")
                .long("seed-file")
                .require_equals(true)
                .value_name("PATH")
                .help(
                    "Read initial particle states from a CSV file with lines x,y,px,py\n\
                     [m, m, eV, eV] instead of generating a beam",
                )
                .takes_value(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Print status messages while simulating"),
        )
        .arg(
            Arg::new("progress")
                .short('p')
                .long("progress")
                .help("Show progress bar for the simulation (also implies `verbose`)"),
        )
        .arg(
            Arg::new("print-parameter-values")
                .long("print-parameter-values")
                .help("Prints the values of all the parameters that will be used")
                .hide(true),
        );

    #[cfg(feature = "seeding")]
    let command = add_beam_arguments_to_subcommand(command);
    #[cfg(feature = "statistics")]
    let command = add_statistics_arguments_to_subcommand(command);

    let command = add_species_arguments_to_subcommand(command);
    let command = add_field_arguments_to_subcommand(command);
    let command = add_absorber_arguments_to_subcommand(command);
    add_simulation_arguments_to_subcommand(command)
}

#[cfg(feature = "seeding")]
fn add_beam_arguments_to_subcommand(command: Command<'static>) -> Command<'static> {
    command
        .arg(
            Arg::new("particles")
                .short('n')
                .long("particles")
                .require_equals(true)
                .value_name("NUMBER")
                .help("Number of particles in the generated beam")
                .takes_value(true)
                .default_value("1000"),
        )
        .arg(
            Arg::new("start-position")
                .long("start-position")
                .require_equals(true)
                .use_value_delimiter(true)
                .require_value_delimiter(true)
                .allow_hyphen_values(true)
                .value_name("X,Y")
                .help("Position of the beam source [m]")
                .takes_value(true)
                .number_of_values(2)
                .default_value("0,0"),
        )
        .arg(
            Arg::new("mean-momentum")
                .long("mean-momentum")
                .require_equals(true)
                .value_name("VALUE")
                .help("Mean momentum of the beam particles [MeV]")
                .takes_value(true)
                .default_value("1"),
        )
        .arg(
            Arg::new("momentum-spread")
                .long("momentum-spread")
                .require_equals(true)
                .value_name("VALUE")
                .help("Standard deviation of the momentum of the beam particles [MeV]")
                .takes_value(true)
                .default_value("1"),
        )
        .arg(
            Arg::new("angle-range")
                .long("angle-range")
                .require_equals(true)
                .use_value_delimiter(true)
                .require_value_delimiter(true)
                .allow_hyphen_values(true)
                .value_name("MIN,MAX")
                .help("Range of beam directions, measured from the x-axis [deg]")
                .takes_value(true)
                .number_of_values(2)
                .default_value("0,360"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .require_equals(true)
                .value_name("NUMBER")
                .help("Seed for the random number generator [default: from entropy]")
                .takes_value(true),
        )
}

#[cfg(feature = "statistics")]
fn add_statistics_arguments_to_subcommand(command: Command<'static>) -> Command<'static> {
    command
        .arg(
            Arg::new("energy-range")
                .long("energy-range")
                .require_equals(true)
                .use_value_delimiter(true)
                .require_value_delimiter(true)
                .value_name("MIN,MAX")
                .help("Range of the kinetic energy histograms [MeV]")
                .takes_value(true)
                .number_of_values(2)
                .default_value("0,2"),
        )
        .arg(
            Arg::new("energy-bins")
                .long("energy-bins")
                .require_equals(true)
                .value_name("NUMBER")
                .help("Number of bins in the kinetic energy histograms")
                .takes_value(true)
                .default_value("20"),
        )
        .arg(
            Arg::new("spectrum-file")
                .long("spectrum-file")
                .require_equals(true)
                .value_name("PATH")
                .help(
                    "Path of a CSV file where the kinetic energy histograms of all\n\
                     and of detected particles should be saved",
                )
                .takes_value(true),
        )
}

/// Runs the actions for the `simulate` subcommand using the given arguments.
pub fn run_simulate_subcommand(arguments: &ArgMatches) {
    let output_file_path = cli_utils::get_required_path_argument(arguments, "output-file");
    let output_type = OutputType::from_path(&output_file_path);
    let verbosity = cli_utils::parse_verbosity(arguments, true);

    let field = construct_field_from_options(arguments);
    let absorbers = construct_absorbers_from_options(arguments);
    let mut config = construct_simulator_config_from_options(arguments);
    config.recording = TrajectoryRecording::Endpoints;
    let (charge, rest_mass) = construct_species_from_options(arguments);

    if arguments.is_present("print-parameter-values") {
        println!("{:#?}\n{:#?}", config, absorbers);
    }

    let simulator = exit_on_error!(
        TrajectorySimulator::new(config, field.as_ref(), &absorbers),
        "Error: Invalid simulation setup: {}"
    );

    if arguments.is_present("seed-file") {
        let seed_file_path = cli_utils::get_required_path_argument(arguments, "seed-file");
        let seeder = exit_on_error!(
            ManualSeeder::new(&seed_file_path, charge, rest_mass),
            "Error: Could not read seed file: {}"
        );
        run_with_seeder(
            arguments,
            &simulator,
            seeder,
            &output_file_path,
            output_type,
            &verbosity,
        );
    } else {
        #[cfg(feature = "seeding")]
        {
            let seeder = create_beam_seeder_from_arguments(arguments, charge, rest_mass);
            run_with_seeder(
                arguments,
                &simulator,
                seeder,
                &output_file_path,
                output_type,
                &verbosity,
            );
        }
        #[cfg(not(feature = "seeding"))]
        crate::exit_with_error!(
            "Error: Compile with seeding feature in order to generate beams\n\
             Tip: Use cargo flag --features=seeding or pass --seed-file"
        );
    }
}

#[cfg(feature = "seeding")]
fn create_beam_seeder_from_arguments(
    arguments: &ArgMatches,
    charge: ftr,
    rest_mass: ftr,
) -> BeamSeeder {
    let (min_angle, max_angle): (ftr, ftr) =
        cli_utils::get_finite_float_pair_from_required_parseable_argument(arguments, "angle-range");
    let config = BeamSeederConfig {
        number_of_particles: cli_utils::get_value_from_required_parseable_argument(
            arguments,
            "particles",
        ),
        start_position: cli_utils::get_finite_float_pair_from_required_parseable_argument(
            arguments,
            "start-position",
        ),
        mean_momentum: cli_utils::get_finite_float_value_from_required_parseable_argument::<ftr>(
            arguments,
            "mean-momentum",
        ) * MEV,
        momentum_spread: cli_utils::get_finite_float_value_from_required_parseable_argument::<ftr>(
            arguments,
            "momentum-spread",
        ) * MEV,
        angle_range: (min_angle * PI / 180.0, max_angle * PI / 180.0),
        charge,
        rest_mass,
        seed: cli_utils::get_value_from_parseable_argument(arguments, "seed"),
    };
    if arguments.is_present("print-parameter-values") {
        println!("{:#?}", config);
    }
    exit_on_error!(BeamSeeder::new(config), "Error: Invalid beam parameters: {}")
}

fn run_with_seeder<S, Sd>(
    arguments: &ArgMatches,
    simulator: &TrajectorySimulator<'_, S>,
    seeder: Sd,
    output_file_path: &Path,
    output_type: OutputType,
    verbosity: &Verbosity,
) where
    S: FieldSampler + ?Sized,
    Sd: ParticleSeeder,
{
    let outcomes = simulate_ensemble(simulator, seeder, verbosity);

    let mut n_failed = 0;
    let records: Vec<_> = outcomes
        .iter()
        .enumerate()
        .filter_map(|(particle_idx, outcome)| match outcome {
            Ok(outcome) => Some(OutcomeRecord::from(outcome)),
            Err(err) => {
                warn!("Simulation of particle {} failed: {}", particle_idx, err);
                n_failed += 1;
                None
            }
        })
        .collect();

    if verbosity.print_messages() {
        println!(
            "{} particles completed, {} failed",
            records.len(),
            n_failed
        );
    }

    #[cfg(feature = "statistics")]
    report_statistics(arguments, &records, n_failed, verbosity);

    cli_utils::verify_output_file_writable(arguments, output_file_path);
    if verbosity.print_messages() {
        println!("Saving outcomes in {}", output_file_path.display());
    }
    exit_on_error!(
        write_records(&records, output_file_path, output_type),
        "Error: Could not save outcomes: {}"
    );
}

fn write_records(
    records: &[OutcomeRecord],
    output_file_path: &Path,
    output_type: OutputType,
) -> io::Result<()> {
    match output_type {
        OutputType::Csv => {
            let mut writer = BufWriter::new(io_utils::create_file_and_map_err(output_file_path)?);
            io_utils::write_csv(
                &mut writer,
                OutcomeRecord::CSV_HEADER,
                records.iter().map(OutcomeRecord::to_csv_fields),
            )?;
            writer.flush()
        }
        #[cfg(feature = "pickle")]
        OutputType::Pickle => io_utils::save_data_as_pickle(output_file_path, &records),
        #[cfg(feature = "json")]
        OutputType::Json => io_utils::save_data_as_json(output_file_path, &records),
    }
}

#[cfg(feature = "statistics")]
fn report_statistics(
    arguments: &ArgMatches,
    records: &[OutcomeRecord],
    n_failed: usize,
    verbosity: &Verbosity,
) {
    let (min_energy, max_energy): (ftr, ftr) =
        cli_utils::get_finite_float_pair_from_required_parseable_argument(
            arguments,
            "energy-range",
        );
    let n_bins: usize =
        cli_utils::get_value_from_required_parseable_argument(arguments, "energy-bins");
    let mut statistics = exit_on_error!(
        EnsembleStatistics::new((min_energy * MEV, max_energy * MEV), n_bins),
        "Error: Invalid energy histogram: {}"
    );
    records.iter().for_each(|record| statistics.add_record(record));
    (0..n_failed).for_each(|_| statistics.add_failure());

    println!(
        "Detected: {}, absorbed: {}, escaped: {}, timed out: {}, failed: {}",
        statistics.n_detected(),
        statistics.n_absorbed(),
        statistics.n_boundary_escape(),
        statistics.n_time_limit(),
        statistics.n_failed()
    );
    if let Some(efficiency) = statistics.detection_efficiency() {
        println!("Detection efficiency: {:.4}", efficiency);
    }
    if let (Some(mean), Some(std)) = (
        statistics.mean_detected_energy(),
        statistics.detected_energy_std(),
    ) {
        println!(
            "Detected kinetic energy: {:.6} +- {:.6} MeV",
            mean / MEV,
            std / MEV
        );
    }

    if arguments.is_present("spectrum-file") {
        let spectrum_file_path = cli_utils::get_required_path_argument(arguments, "spectrum-file");
        exit_on_false!(
            spectrum_file_path.extension().map_or(false, |extension| extension == "csv"),
            "Error: Spectrum file {} must have extension csv",
            spectrum_file_path.display()
        );
        cli_utils::verify_output_file_writable(arguments, &spectrum_file_path);
        if verbosity.print_messages() {
            println!("Saving spectrum in {}", spectrum_file_path.display());
        }
        exit_on_error!(
            write_spectrum(&statistics, &spectrum_file_path),
            "Error: Could not save spectrum: {}"
        );
    }
}

#[cfg(feature = "statistics")]
fn write_spectrum(statistics: &EnsembleStatistics, spectrum_file_path: &Path) -> io::Result<()> {
    let all = statistics.kinetic_energy_all();
    let detected = statistics.kinetic_energy_detected();
    let mut writer = BufWriter::new(io_utils::create_file_and_map_err(spectrum_file_path)?);
    io_utils::write_csv(
        &mut writer,
        "kinetic_energy,count_all,count_detected",
        all.bin_centers()
            .iter()
            .zip(all.counts().iter().zip(detected.counts().iter()))
            .map(|(center, (count_all, count_detected))| {
                vec![
                    center.to_string(),
                    count_all.to_string(),
                    count_detected.to_string(),
                ]
            }),
    )?;
    writer.flush()
}
