//! Command line interface for simulating the orbit of a single particle.

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
    exit_on_error,
    io::utils as io_utils,
    tracing::{
        ftr,
        particle::ParticleState,
        trajectory::{Trajectory, TrajectoryRecording, TrajectorySimulator},
    },
    units::MEV,
};
use clap::{Arg, ArgMatches, Command};
use std::{
    io::{self, BufWriter, Write},
    path::Path,
};

/// Builds a representation of the `orbit` command line subcommand.
pub fn create_orbit_subcommand(_parent_command_name: &'static str) -> Command<'static> {
    let command = Command::new("orbit")
        .about("Simulate the trajectory of a single charged particle")
        .arg(
            Arg::new("output-file")
                .value_name("OUTPUT_FILE")
                .help(
                    "Path of the file where the trajectory should be saved\n\
                       Writes in the following format based on the file extension:\
                       \n    *.csv: Creates a CSV file with the columns x,y\
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
            Arg::new("position")
                .long("position")
                .require_equals(true)
                .use_value_delimiter(true)
                .require_value_delimiter(true)
                .allow_hyphen_values(true)
                .value_name("X,Y")
                .help("Initial position of the particle [m]")
                .takes_value(true)
                .number_of_values(2)
                .default_value("-2,0"),
        )
        .arg(
            Arg::new("momentum")
                .long("momentum")
                .require_equals(true)
                .use_value_delimiter(true)
                .require_value_delimiter(true)
                .allow_hyphen_values(true)
                .value_name("PX,PY")
                .help("Initial momentum of the particle [MeV]")
                .takes_value(true)
                .number_of_values(2)
                .default_value("1,0"),
        )
        .arg(
            Arg::new("endpoints-only")
                .long("endpoints-only")
                .help("Only save the initial and final position"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Print status messages while simulating"),
        )
        .arg(
            Arg::new("print-parameter-values")
                .long("print-parameter-values")
                .help("Prints the values of all the parameters that will be used")
                .hide(true),
        );
    let command = add_species_arguments_to_subcommand(command);
    let command = add_field_arguments_to_subcommand(command);
    let command = add_absorber_arguments_to_subcommand(command);
    add_simulation_arguments_to_subcommand(command)
}

/// Runs the actions for the `orbit` subcommand using the given arguments.
pub fn run_orbit_subcommand(arguments: &ArgMatches) {
    let output_file_path = cli_utils::get_required_path_argument(arguments, "output-file");
    let output_type = OutputType::from_path(&output_file_path);
    let verbosity = cli_utils::parse_verbosity(arguments, false);

    let field = construct_field_from_options(arguments);
    let absorbers = construct_absorbers_from_options(arguments);
    let mut config = construct_simulator_config_from_options(arguments);
    if arguments.is_present("endpoints-only") {
        config.recording = TrajectoryRecording::Endpoints;
    }

    let (x, y): (ftr, ftr) =
        cli_utils::get_finite_float_pair_from_required_parseable_argument(arguments, "position");
    let (px, py): (ftr, ftr) =
        cli_utils::get_finite_float_pair_from_required_parseable_argument(arguments, "momentum");
    let (charge, rest_mass) = construct_species_from_options(arguments);

    let initial_state = exit_on_error!(
        ParticleState::planar(x, y, px * MEV, py * MEV, charge, rest_mass),
        "Error: Invalid initial particle state: {}"
    );

    if arguments.is_present("print-parameter-values") {
        println!("{:#?}\n{:#?}\n{:#?}", config, absorbers, initial_state);
    }

    let simulator = exit_on_error!(
        TrajectorySimulator::new(config, field.as_ref(), &absorbers),
        "Error: Invalid simulation setup: {}"
    );
    let outcome = exit_on_error!(
        simulator.simulate(initial_state),
        "Error: Simulation failed: {}"
    );

    if verbosity.print_messages() {
        println!(
            "Particle terminated by {} after {} steps with kinetic energy {} MeV",
            outcome.cause(),
            outcome.final_state().step_index(),
            outcome.kinetic_energy() / MEV
        );
    }

    cli_utils::verify_output_file_writable(arguments, &output_file_path);
    if verbosity.print_messages() {
        println!("Saving trajectory in {}", output_file_path.display());
    }
    exit_on_error!(
        write_trajectory(outcome.trajectory(), &output_file_path, output_type),
        "Error: Could not save trajectory: {}"
    );
}

fn write_trajectory(
    trajectory: &Trajectory,
    output_file_path: &Path,
    output_type: OutputType,
) -> io::Result<()> {
    match output_type {
        OutputType::Csv => {
            let mut writer = BufWriter::new(io_utils::create_file_and_map_err(output_file_path)?);
            io_utils::write_csv(
                &mut writer,
                "x,y",
                trajectory
                    .points()
                    .iter()
                    .map(|point| vec![point.x().to_string(), point.y().to_string()]),
            )?;
            writer.flush()
        }
        #[cfg(feature = "pickle")]
        OutputType::Pickle => io_utils::save_data_as_pickle(output_file_path, trajectory),
        #[cfg(feature = "json")]
        OutputType::Json => io_utils::save_data_as_json(output_file_path, trajectory),
    }
}
