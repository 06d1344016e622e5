//! Function for running the command line program.

use super::{
    build, create_field::run_create_field_subcommand, orbit::run_orbit_subcommand,
    simulate::run_simulate_subcommand,
};
use clap::ArgMatches;
use std::time::Instant;

/// Runs the `betatrack` command line program.
pub fn run() {
    run_with_args(build::build().get_matches());
}

/// Runs the `betatrack` command line program with the given parsed arguments.
pub fn run_with_args(arguments: ArgMatches) {
    let start_instant = Instant::now();

    if let Some(orbit_arguments) = arguments.subcommand_matches("orbit") {
        run_orbit_subcommand(orbit_arguments);
    }
    if let Some(simulate_arguments) = arguments.subcommand_matches("simulate") {
        run_simulate_subcommand(simulate_arguments);
    }
    if let Some(create_field_arguments) = arguments.subcommand_matches("create_field") {
        run_create_field_subcommand(create_field_arguments);
    }

    if arguments.is_present("timing") {
        println!("Elapsed time: {} s", start_instant.elapsed().as_secs_f64());
    }
}
