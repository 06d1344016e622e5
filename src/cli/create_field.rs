//! Command line interface for creating field maps of rectangular magnets.

use crate::{
    cli::utils as cli_utils,
    exit_on_error,
    field::ScalarField2,
    geometry::{BoundingBox2, In2D, Vec2},
    grid::regular::RegularGrid2,
    io::field_map,
    tracing::ftr,
};
use clap::{Arg, ArgMatches, Command};

/// Builds a representation of the `create_field` command line subcommand.
pub fn create_create_field_subcommand(_parent_command_name: &'static str) -> Command<'static> {
    Command::new("create_field")
        .about("Create a field map for a set of rectangular magnets")
        .long_about(
            "Create a field map for a set of rectangular magnets.\n\
             Each magnet has a uniform field strength inside its rectangle, and the\n\
             strengths of overlapping magnets are added. The field is zero elsewhere.",
        )
        .arg(
            Arg::new("output-file")
                .value_name("OUTPUT_FILE")
                .help("Path where the field map should be written")
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
            Arg::new("shape")
                .short('s')
                .long("shape")
                .require_equals(true)
                .use_value_delimiter(true)
                .require_value_delimiter(true)
                .value_names(&["NX", "NY"])
                .help("Number of grid cells in the x- and y-direction")
                .takes_value(true)
                .number_of_values(2)
                .required(true),
        )
        .arg(
            Arg::new("x-bounds")
                .short('x')
                .long("x-bounds")
                .require_equals(true)
                .use_value_delimiter(true)
                .require_value_delimiter(true)
                .allow_hyphen_values(true)
                .value_names(&["LOWER", "UPPER"])
                .help("Outer edges of the grid in the x-direction [m]")
                .takes_value(true)
                .number_of_values(2)
                .required(true),
        )
        .arg(
            Arg::new("y-bounds")
                .short('y')
                .long("y-bounds")
                .require_equals(true)
                .use_value_delimiter(true)
                .require_value_delimiter(true)
                .allow_hyphen_values(true)
                .value_names(&["LOWER", "UPPER"])
                .help("Outer edges of the grid in the y-direction [m]")
                .takes_value(true)
                .number_of_values(2)
                .required(true),
        )
        .arg(
            Arg::new("magnet")
                .short('m')
                .long("magnet")
                .require_equals(true)
                .use_value_delimiter(true)
                .require_value_delimiter(true)
                .allow_hyphen_values(true)
                .value_name("X1,X2,Y1,Y2,STRENGTH")
                .help("Rectangle [m] and field strength [T] of a magnet (can be repeated)")
                .takes_value(true)
                .multiple_occurrences(true)
                .required(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Print status messages"),
        )
}

/// Runs the actions for the `create_field` subcommand using the given arguments.
pub fn run_create_field_subcommand(arguments: &ArgMatches) {
    let output_file_path = cli_utils::get_required_path_argument(arguments, "output-file");
    let verbosity = cli_utils::parse_verbosity(arguments, false);

    let shape: Vec<usize> =
        cli_utils::get_values_from_required_parseable_argument(arguments, "shape");
    cli_utils::verify_argument_value_count("shape", &shape, 2);
    let (x_lower, x_upper): (ftr, ftr) =
        cli_utils::get_finite_float_pair_from_required_parseable_argument(arguments, "x-bounds");
    let (y_lower, y_upper): (ftr, ftr) =
        cli_utils::get_finite_float_pair_from_required_parseable_argument(arguments, "y-bounds");

    let grid = exit_on_error!(
        RegularGrid2::from_bounds(
            In2D::new(shape[0], shape[1]),
            Vec2::new(x_lower, y_lower),
            Vec2::new(x_upper, y_upper),
        ),
        "Error: Invalid grid: {}"
    );

    let magnets: Vec<_> =
        cli_utils::get_finite_float_groups_from_parseable_argument::<ftr>(arguments, "magnet", 5)
            .into_iter()
            .map(|values| {
                let rectangle =
                    BoundingBox2::from_bounds((values[0], values[1]), (values[2], values[3]));
                crate::exit_on_false!(
                    rectangle.is_well_formed(),
                    "Error: Magnet rectangle {} is malformed",
                    rectangle
                );
                (rectangle, values[4])
            })
        .collect();

    let field = exit_on_error!(
        ScalarField2::from_function(grid, |point| {
            magnets
                .iter()
                .filter(|(rectangle, _)| rectangle.contains(point))
                .map(|(_, strength)| strength)
                .sum::<ftr>()
        }),
        "Error: Could not create field: {}"
    );

    cli_utils::verify_output_file_writable(arguments, &output_file_path);
    if verbosity.print_messages() {
        println!("Writing field map to {}", output_file_path.display());
    }
    exit_on_error!(
        field_map::write_field_map(&field, &output_file_path),
        "Error: Could not write field map: {}"
    );
}
