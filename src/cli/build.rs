//! Function for building the command line hierarchy.

use super::{
    create_field::create_create_field_subcommand, orbit::create_orbit_subcommand,
    simulate::create_simulate_subcommand,
};
use clap::{self, Arg, Command};

/// Build the `betatrack` command line hierarchy.
pub fn build() -> Command<'static> {
    let command_name = clap::crate_name!();
    Command::new(command_name)
        .version(clap::crate_version!())
        .author(clap::crate_authors!())
        .about(clap::crate_description!())
        .propagate_version(true)
        .disable_help_subcommand(true)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("timing")
                .short('t')
                .long("timing")
                .help("Display elapsed time when done"),
        )
        .subcommand(create_orbit_subcommand(command_name))
        .subcommand(create_simulate_subcommand(command_name))
        .subcommand(create_create_field_subcommand(command_name))
}
