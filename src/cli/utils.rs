//! Utilities for creating the command line interface.

use crate::{
    exit_on_error, exit_on_false, exit_on_none, exit_with_error,
    io::{utils as io_utils, OverwriteMode, Verbosity},
    num::BFloat,
};
use clap::ArgMatches;
use indicatif::ProgressStyle;
use lazy_static::lazy_static;
use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

lazy_static! {
    static ref DEFAULT_PROGRESS_STYLE: ProgressStyle =
        ProgressStyle::default_bar().template("Progress: {bar:40}  {percent}% | ETA: {eta}");
}

pub fn parse_value_string<T>(argument_name: &str, value_string: &str) -> T
where
    T: FromStr,
    <T as FromStr>::Err: fmt::Display,
{
    exit_on_error!(
        value_string.parse(),
        "Error: Could not parse value for {0}: {1}",
        argument_name
    )
}

fn parse_value_strings<'a, 'b, T, I>(argument_name: &'a str, value_strings: I) -> Vec<T>
where
    T: FromStr,
    <T as FromStr>::Err: fmt::Display,
    I: Iterator<Item = &'b str>,
{
    value_strings
        .filter_map(|value_string| {
            if value_string.is_empty() {
                None
            } else {
                Some(parse_value_string(argument_name, value_string))
            }
        })
        .collect()
}

fn verify_finite_float_value<F: BFloat>(argument_name: &str, value: F) {
    exit_on_false!(value.is_finite(), "Error: {} must be finite", argument_name);
}

pub fn verify_argument_value_count<T>(argument_name: &str, values: &[T], required_count: usize) {
    let count = values.len();
    exit_on_false!(
        count == required_count,
        "Error: {} must have {} values, got {}",
        argument_name,
        required_count,
        count
    );
}

pub fn get_value_from_required_parseable_argument<T>(
    arguments: &ArgMatches,
    argument_name: &str,
) -> T
where
    T: FromStr,
    <T as FromStr>::Err: fmt::Display,
{
    parse_value_string(
        argument_name,
        exit_on_none!(
            arguments.value_of(argument_name),
            "Error: No value for required argument {}",
            argument_name
        ),
    )
}

pub fn get_value_from_parseable_argument<T>(
    arguments: &ArgMatches,
    argument_name: &str,
) -> Option<T>
where
    T: FromStr,
    <T as FromStr>::Err: fmt::Display,
{
    arguments
        .value_of(argument_name)
        .map(|value_string| parse_value_string(argument_name, value_string))
}

pub fn get_values_from_required_parseable_argument<T>(
    arguments: &ArgMatches,
    argument_name: &str,
) -> Vec<T>
where
    T: FromStr,
    <T as FromStr>::Err: fmt::Display,
{
    parse_value_strings(
        argument_name,
        exit_on_none!(
            arguments.values_of(argument_name),
            "Error: No values for required argument {}",
            argument_name
        ),
    )
}

pub fn get_finite_float_value_from_required_parseable_argument<F>(
    arguments: &ArgMatches,
    argument_name: &str,
) -> F
where
    F: BFloat + FromStr,
    <F as FromStr>::Err: fmt::Display,
{
    let value: F = get_value_from_required_parseable_argument(arguments, argument_name);
    verify_finite_float_value(argument_name, value);
    value
}

pub fn get_finite_float_values_from_parseable_argument<F>(
    arguments: &ArgMatches,
    argument_name: &str,
) -> Option<Vec<F>>
where
    F: BFloat + FromStr,
    <F as FromStr>::Err: fmt::Display,
{
    let values = arguments
        .values_of(argument_name)
        .map(|values| parse_value_strings(argument_name, values));
    if let Some(values) = values.as_ref() {
        values
            .iter()
            .for_each(|&value| verify_finite_float_value(argument_name, value))
    };
    values
}

pub fn get_finite_float_values_from_required_parseable_argument<F>(
    arguments: &ArgMatches,
    argument_name: &str,
) -> Vec<F>
where
    F: BFloat + FromStr,
    <F as FromStr>::Err: fmt::Display,
{
    exit_on_none!(
        get_finite_float_values_from_parseable_argument(arguments, argument_name),
        "Error: No values for required argument {}",
        argument_name
    )
}

/// Parses a comma-separated pair of finite values.
pub fn get_finite_float_pair_from_required_parseable_argument<F>(
    arguments: &ArgMatches,
    argument_name: &str,
) -> (F, F)
where
    F: BFloat + FromStr,
    <F as FromStr>::Err: fmt::Display,
{
    let values = get_finite_float_values_from_required_parseable_argument(arguments, argument_name);
    verify_argument_value_count(argument_name, &values, 2);
    (values[0], values[1])
}

/// Parses every occurrence of a multiple-occurrence argument taking a fixed
/// number of comma-separated finite values.
pub fn get_finite_float_groups_from_parseable_argument<F>(
    arguments: &ArgMatches,
    argument_name: &str,
    group_size: usize,
) -> Vec<Vec<F>>
where
    F: BFloat + FromStr,
    <F as FromStr>::Err: fmt::Display,
{
    let values = get_finite_float_values_from_parseable_argument(arguments, argument_name)
        .unwrap_or_default();
    exit_on_false!(
        values.len() % group_size == 0,
        "Error: Values for {} must come in groups of {}, got {} values",
        argument_name,
        group_size,
        values.len()
    );
    values
        .chunks(group_size)
        .map(|group| group.to_vec())
        .collect()
}

pub fn get_required_path_argument(arguments: &ArgMatches, argument_name: &str) -> PathBuf {
    exit_on_error!(
        PathBuf::from_str(exit_on_none!(
            arguments.value_of(argument_name),
            "Error: No value for required argument {}",
            argument_name
        )),
        "Error: Could not interpret path for {0}: {1}",
        argument_name
    )
}

pub fn overwrite_mode_from_arguments(arguments: &ArgMatches) -> OverwriteMode {
    if arguments.is_present("overwrite") {
        OverwriteMode::Always
    } else if arguments.is_present("no-overwrite") {
        OverwriteMode::Never
    } else {
        OverwriteMode::Ask
    }
}

pub fn parse_verbosity(arguments: &ArgMatches, support_progress: bool) -> Verbosity {
    if support_progress && arguments.is_present("progress") {
        Verbosity::Progress(DEFAULT_PROGRESS_STYLE.clone())
    } else if arguments.is_present("verbose") {
        Verbosity::Messages
    } else {
        Verbosity::Quiet
    }
}

/// Exits unless the output file may be written according to the overwrite options.
pub fn verify_output_file_writable(arguments: &ArgMatches, output_file_path: &Path) {
    let overwrite_mode = overwrite_mode_from_arguments(arguments);
    let writable = exit_on_error!(
        io_utils::check_file_overwrite(output_file_path, overwrite_mode),
        "Error: Could not check output file {0}: {1}",
        output_file_path.display()
    );
    exit_on_false!(
        writable,
        "Error: Not overwriting existing file {}",
        output_file_path.display()
    );
}

/// Format of an output file, determined by its extension.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OutputType {
    Csv,
    #[cfg(feature = "pickle")]
    Pickle,
    #[cfg(feature = "json")]
    Json,
}

impl OutputType {
    pub fn from_path(file_path: &Path) -> Self {
        Self::from_extension(
            file_path
                .extension()
                .unwrap_or_else(|| {
                    exit_with_error!(
                        "Error: Missing extension for output file\n\
                         Valid extensions are: {}",
                        Self::valid_extensions_string()
                    )
                })
                .to_string_lossy()
                .as_ref(),
        )
    }

    fn from_extension(extension: &str) -> Self {
        match extension {
            "csv" => Self::Csv,
            "pickle" => {
                #[cfg(feature = "pickle")]
                {
                    Self::Pickle
                }
                #[cfg(not(feature = "pickle"))]
                exit_with_error!(
                    "Error: Compile with pickle feature in order to write Pickle files\n\
                     Tip: Use cargo flag --features=pickle"
                );
            }
            "json" => {
                #[cfg(feature = "json")]
                {
                    Self::Json
                }
                #[cfg(not(feature = "json"))]
                exit_with_error!(
                    "Error: Compile with json feature in order to write JSON files\n\
                     Tip: Use cargo flag --features=json"
                );
            }
            invalid => exit_with_error!(
                "Error: Invalid extension {} for output file\n\
                 Valid extensions are: {}",
                invalid,
                Self::valid_extensions_string()
            ),
        }
    }

    fn valid_extensions_string() -> String {
        "csv, pickle, json".to_string()
    }
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Csv => "csv",
                #[cfg(feature = "pickle")]
                Self::Pickle => "pickle",
                #[cfg(feature = "json")]
                Self::Json => "json",
            }
        )
    }
}
