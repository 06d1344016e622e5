//! Reading and writing field maps in plain text format.
//!
//! The first non-comment line holds the header `nx ny xmin xmax ymin ymax`,
//! giving the grid shape and the outer cell edges. It is followed by the
//! `nx*ny` field values at the cell centers, separated by whitespace, with
//! the x-index varying fastest. Lines starting with `#` are comments.

use super::utils;
use crate::{
    field::ScalarField2,
    geometry::{Dim2, In2D, Vec2},
    grid::{regular::RegularGrid2, Grid2},
    tracing::ftr,
};
use ndarray::{Array2, ShapeBuilder};
use std::{fmt::Write as _, io, path::Path, str::FromStr};

/// Field map on a regular grid.
pub type FieldMap = ScalarField2<ftr, RegularGrid2<ftr>>;

fn invalid_data<S: Into<String>>(message: S) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message.into())
}

fn parse_token<T>(token: &str, description: &str) -> io::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    token.parse::<T>().map_err(|err| {
        invalid_data(format!(
            "Failed parsing {} string {} in field map: {}",
            description, token, err
        ))
    })
}

/// Parses a field map from the given text.
pub fn parse_field_map(text: &str) -> io::Result<FieldMap> {
    let mut lines = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'));

    let header = lines
        .next()
        .ok_or_else(|| invalid_data("Field map has no header line"))?;
    let header_tokens: Vec<_> = header.split_whitespace().collect();
    if header_tokens.len() != 6 {
        return Err(invalid_data(format!(
            "Field map header must be `nx ny xmin xmax ymin ymax`, got: {}",
            header
        )));
    }
    let nx: usize = parse_token(header_tokens[0], "shape")?;
    let ny: usize = parse_token(header_tokens[1], "shape")?;
    let bounds = header_tokens[2..]
        .iter()
        .map(|token| parse_token::<ftr>(token, "bound"))
        .collect::<io::Result<Vec<_>>>()?;

    let grid = RegularGrid2::from_bounds(
        In2D::new(nx, ny),
        Vec2::new(bounds[0], bounds[2]),
        Vec2::new(bounds[1], bounds[3]),
    )
    .map_err(|err| invalid_data(err.to_string()))?;

    let values = lines
        .flat_map(str::split_whitespace)
        .map(|token| parse_token::<ftr>(token, "value"))
        .collect::<io::Result<Vec<_>>>()?;
    if values.len() != nx * ny {
        return Err(invalid_data(format!(
            "Field map with shape {}x{} must have {} values, found {}",
            nx,
            ny,
            nx * ny,
            values.len()
        )));
    }

    let values = Array2::from_shape_vec((nx, ny).f(), values)
        .map_err(|err| invalid_data(err.to_string()))?;
    ScalarField2::new(grid, values).map_err(|err| invalid_data(err.to_string()))
}

/// Reads a field map from the given file.
pub fn read_field_map(file_path: &Path) -> io::Result<FieldMap> {
    let text = utils::read_text_file(file_path)?;
    parse_field_map(&text).map_err(|err| {
        io::Error::new(
            err.kind(),
            format!("Invalid field map {}: {}", file_path.display(), err),
        )
    })
}

/// Formats the given field map as text, with one line per row of constant y.
pub fn format_field_map<G: Grid2<ftr>>(field: &ScalarField2<ftr, G>) -> String {
    let grid = field.grid();
    let shape = grid.shape();
    let (lower, upper) = (grid.lower_bounds(), grid.upper_bounds());
    let mut text = String::new();

    // Writing to a string cannot fail
    let _ = writeln!(text, "# nx ny xmin xmax ymin ymax");
    let _ = writeln!(
        text,
        "{} {} {} {} {} {}",
        shape[Dim2::X],
        shape[Dim2::Y],
        lower[Dim2::X],
        upper[Dim2::X],
        lower[Dim2::Y],
        upper[Dim2::Y]
    );
    for j in 0..shape[Dim2::Y] {
        let row: Vec<_> = (0..shape[Dim2::X])
            .map(|i| field.value(i, j).to_string())
            .collect();
        let _ = writeln!(text, "{}", row.join(" "));
    }
    text
}

/// Writes the given field map to the given file.
pub fn write_field_map<G: Grid2<ftr>>(
    field: &ScalarField2<ftr, G>,
    file_path: &Path,
) -> io::Result<()> {
    utils::write_text_file(&format_field_map(field), file_path)
}
