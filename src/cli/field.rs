//! Command line arguments shared by subcommands that simulate particles.

use crate::{
    absorption::{AbsorberRegion, AbsorberSet},
    cli::utils as cli_utils,
    exit_on_error,
    field::{FieldSampler, FieldUnits, SampledField, UniformField},
    geometry::BoundingBox2,
    interpolation::bilinear::BilinearInterpolator2,
    io::field_map,
    tracing::{ftr, trajectory::TrajectorySimulatorConfig},
    units::{MEV, NANOSECOND, TESLA},
};
use clap::{Arg, ArgGroup, ArgMatches, Command};
use log::info;

/// Adds arguments for the charge and rest mass of the simulated particles.
pub fn add_species_arguments_to_subcommand(command: Command<'static>) -> Command<'static> {
    command
        .arg(
            Arg::new("charge")
                .long("charge")
                .require_equals(true)
                .allow_hyphen_values(true)
                .value_name("VALUE")
                .help("Charge of the particle [e]")
                .takes_value(true)
                .default_value("-1"),
        )
        .arg(
            Arg::new("rest-mass")
                .long("rest-mass")
                .require_equals(true)
                .value_name("VALUE")
                .help("Rest mass of the particle [MeV]")
                .takes_value(true)
                .default_value("0.51099895"),
        )
}

/// Adds arguments for selecting and scaling the magnetic field.
pub fn add_field_arguments_to_subcommand(command: Command<'static>) -> Command<'static> {
    command
        .arg(
            Arg::new("field-map")
                .long("field-map")
                .require_equals(true)
                .value_name("PATH")
                .help("Path to a text file with the field strength on a regular grid")
                .takes_value(true),
        )
        .arg(
            Arg::new("uniform-field")
                .long("uniform-field")
                .require_equals(true)
                .allow_hyphen_values(true)
                .value_name("STRENGTH")
                .help("Use a uniform field of the given strength [T]")
                .takes_value(true),
        )
        .group(
            ArgGroup::new("field-source")
                .args(&["field-map", "uniform-field"])
                .required(true),
        )
        .arg(
            Arg::new("domain")
                .long("domain")
                .require_equals(true)
                .use_value_delimiter(true)
                .require_value_delimiter(true)
                .allow_hyphen_values(true)
                .value_name("XMIN,XMAX,YMIN,YMAX")
                .help("Domain of the uniform field [m] [default: unbounded]")
                .takes_value(true)
                .number_of_values(4)
                .requires("uniform-field"),
        )
        .arg(
            Arg::new("length-unit")
                .long("length-unit")
                .require_equals(true)
                .value_name("VALUE")
                .help("Length of one unit of field map coordinates [m]")
                .takes_value(true)
                .default_value("1"),
        )
        .arg(
            Arg::new("field-unit")
                .long("field-unit")
                .require_equals(true)
                .value_name("VALUE")
                .help("Field strength of one unit of field map values [T]")
                .takes_value(true)
                .default_value("1"),
        )
}

/// Adds arguments for specifying absorber and detector regions.
pub fn add_absorber_arguments_to_subcommand(command: Command<'static>) -> Command<'static> {
    command
        .arg(
            Arg::new("absorber")
                .long("absorber")
                .require_equals(true)
                .use_value_delimiter(true)
                .require_value_delimiter(true)
                .allow_hyphen_values(true)
                .value_name("X1,X2,Y1,Y2")
                .help("Rectangular region absorbing particles [m] (can be repeated)")
                .takes_value(true)
                .multiple_occurrences(true),
        )
        .arg(
            Arg::new("detector")
                .long("detector")
                .require_equals(true)
                .use_value_delimiter(true)
                .require_value_delimiter(true)
                .allow_hyphen_values(true)
                .value_name("X1,X2,Y1,Y2")
                .help("Rectangular region detecting particles [m] (can be repeated)")
                .takes_value(true)
                .multiple_occurrences(true),
        )
}

/// Adds arguments for parameters used by the trajectory simulator.
pub fn add_simulation_arguments_to_subcommand(command: Command<'static>) -> Command<'static> {
    command
        .arg(
            Arg::new("step-size")
                .long("step-size")
                .require_equals(true)
                .value_name("VALUE")
                .help("Proper time step [ns]")
                .takes_value(true)
                .default_value("0.01"),
        )
        .arg(
            Arg::new("max-proper-time")
                .long("max-proper-time")
                .require_equals(true)
                .value_name("VALUE")
                .help("Proper time after which particles are terminated [ns]")
                .takes_value(true)
                .default_value("8"),
        )
        .arg(
            Arg::new("edge-margin")
                .long("edge-margin")
                .require_equals(true)
                .value_name("VALUE")
                .help("Distance from the domain edge at which particles escape [m]")
                .takes_value(true)
                .default_value("0.005"),
        )
        .arg(
            Arg::new("max-steps")
                .long("max-steps")
                .require_equals(true)
                .value_name("NUMBER")
                .help("Maximum number of steps before failing [default: from the time limit]")
                .takes_value(true),
        )
}

/// Returns the charge [e] and rest mass [eV] described by the given arguments.
pub fn construct_species_from_options(arguments: &ArgMatches) -> (ftr, ftr) {
    let charge =
        cli_utils::get_finite_float_value_from_required_parseable_argument(arguments, "charge");
    let rest_mass = cli_utils::get_finite_float_value_from_required_parseable_argument::<ftr>(
        arguments,
        "rest-mass",
    ) * MEV;
    (charge, rest_mass)
}

/// Constructs the magnetic field described by the given arguments.
pub fn construct_field_from_options(arguments: &ArgMatches) -> Box<dyn FieldSampler> {
    if let Some(strength) =
        cli_utils::get_value_from_parseable_argument::<ftr>(arguments, "uniform-field")
    {
        let strength = strength * TESLA;
        let field = match cli_utils::get_finite_float_values_from_parseable_argument::<ftr>(
            arguments, "domain",
        ) {
            Some(bounds) => {
                cli_utils::verify_argument_value_count("domain", &bounds, 4);
                UniformField::new(
                    strength,
                    BoundingBox2::from_bounds((bounds[0], bounds[1]), (bounds[2], bounds[3])),
                )
            }
            None => UniformField::unbounded(strength),
        };
        Box::new(exit_on_error!(field, "Error: Invalid uniform field: {}"))
    } else {
        let field_map_path = cli_utils::get_required_path_argument(arguments, "field-map");
        let units = exit_on_error!(
            FieldUnits::new(
                cli_utils::get_finite_float_value_from_required_parseable_argument(
                    arguments,
                    "length-unit"
                ),
                cli_utils::get_finite_float_value_from_required_parseable_argument::<ftr>(
                    arguments,
                    "field-unit"
                ) * TESLA,
            ),
            "Error: Invalid field units: {}"
        );
        let field_map = exit_on_error!(
            field_map::read_field_map(&field_map_path),
            "Error: Could not read field map: {}"
        );
        let (nx, ny) = field_map.values().dim();
        info!("Read {}x{} field map from {}", nx, ny, field_map_path.display());
        Box::new(exit_on_error!(
            SampledField::new(field_map, BilinearInterpolator2::new(), units),
            "Error: Invalid field map: {}"
        ))
    }
}

/// Constructs the absorber set described by the given arguments.
///
/// Absorbers are tested before detectors, each kind in the order given.
pub fn construct_absorbers_from_options(arguments: &ArgMatches) -> AbsorberSet {
    let mut absorbers = AbsorberSet::new();
    for bounds in
        cli_utils::get_finite_float_groups_from_parseable_argument::<ftr>(arguments, "absorber", 4)
    {
        absorbers.add(exit_on_error!(
            AbsorberRegion::absorber(bounds[0], bounds[1], bounds[2], bounds[3]),
            "Error: Invalid absorber: {}"
        ));
    }
    for bounds in
        cli_utils::get_finite_float_groups_from_parseable_argument::<ftr>(arguments, "detector", 4)
    {
        absorbers.add(exit_on_error!(
            AbsorberRegion::detector(bounds[0], bounds[1], bounds[2], bounds[3]),
            "Error: Invalid detector: {}"
        ));
    }
    absorbers
}

/// Constructs the trajectory simulator configuration described by the given arguments.
pub fn construct_simulator_config_from_options(
    arguments: &ArgMatches,
) -> TrajectorySimulatorConfig {
    let step_size = cli_utils::get_finite_float_value_from_required_parseable_argument::<ftr>(
        arguments,
        "step-size",
    ) * NANOSECOND;
    let max_proper_time = cli_utils::get_finite_float_value_from_required_parseable_argument::<ftr>(
        arguments,
        "max-proper-time",
    ) * NANOSECOND;
    let edge_margin = cli_utils::get_finite_float_value_from_required_parseable_argument::<ftr>(
        arguments,
        "edge-margin",
    );
    let max_steps = cli_utils::get_value_from_parseable_argument(arguments, "max-steps");

    let config = TrajectorySimulatorConfig {
        step_size,
        max_proper_time,
        edge_margin,
        max_steps,
        ..TrajectorySimulatorConfig::default()
    };
    exit_on_error!(config.validate(), "Error: Invalid simulation parameters: {}");
    config
}
