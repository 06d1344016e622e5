//! Utilities for input/output.

use super::OverwriteMode;
use std::{
    fs,
    io::{self, BufWriter, Read, Write},
    path::Path,
};

#[cfg(feature = "serialization")]
use serde::Serialize;

/// Opens the file at the given path for reading, with the path included in
/// any error message.
pub fn open_file_and_map_err(file_path: &Path) -> io::Result<fs::File> {
    fs::File::open(file_path).map_err(|err| {
        io::Error::new(
            err.kind(),
            format!("Could not open {}: {}", file_path.display(), err),
        )
    })
}

/// Creates the file at the given path for writing, with the path included
/// in any error message.
pub fn create_file_and_map_err(file_path: &Path) -> io::Result<fs::File> {
    fs::File::create(file_path).map_err(|err| {
        io::Error::new(
            err.kind(),
            format!("Could not create {}: {}", file_path.display(), err),
        )
    })
}

/// Reads and returns the content of the specified text file.
pub fn read_text_file(file_path: &Path) -> io::Result<String> {
    let file = open_file_and_map_err(file_path)?;
    let mut text = String::new();
    let _ = io::BufReader::new(file).read_to_string(&mut text)?;
    Ok(text)
}

/// Writes the given text to the specified file, replacing any existing content.
pub fn write_text_file(text: &str, file_path: &Path) -> io::Result<()> {
    let mut writer = BufWriter::new(create_file_and_map_err(file_path)?);
    writer.write_all(text.as_bytes())?;
    writer.flush()
}

/// Determines whether the file at the given path may be written to.
///
/// Prompts the user on standard input when the file exists and the mode is
/// `Ask`.
pub fn check_file_overwrite(file_path: &Path, mode: OverwriteMode) -> io::Result<bool> {
    if !file_path.exists() {
        return Ok(true);
    }
    match mode {
        OverwriteMode::Always => Ok(true),
        OverwriteMode::Never => Ok(false),
        OverwriteMode::Ask => {
            print!("File {} already exists, overwrite? [y/N] ", file_path.display());
            io::stdout().flush()?;
            let mut answer = String::new();
            io::stdin().read_line(&mut answer)?;
            Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
        }
    }
}

/// Writes the given rows as comma-separated values with a header line.
pub fn write_csv<W, R>(writer: &mut W, header: &str, rows: R) -> io::Result<()>
where
    W: Write,
    R: IntoIterator,
    R::Item: AsRef<[String]>,
{
    writeln!(writer, "{}", header)?;
    for row in rows {
        writeln!(writer, "{}", row.as_ref().join(","))?;
    }
    Ok(())
}

/// Serializes the given data into JSON format and saves it at the given path.
#[cfg(feature = "json")]
pub fn save_data_as_json<T: Serialize>(file_path: &Path, data: &T) -> io::Result<()> {
    let mut writer = BufWriter::new(create_file_and_map_err(file_path)?);
    serde_json::to_writer(&mut writer, data).map_err(io::Error::from)?;
    writer.flush()
}

/// Serializes the given data into protocol 3 pickle format and saves it at the given path.
#[cfg(feature = "pickle")]
pub fn save_data_as_pickle<T: Serialize>(file_path: &Path, data: &T) -> io::Result<()> {
    let mut writer = BufWriter::new(create_file_and_map_err(file_path)?);
    write_data_as_pickle(&mut writer, data)?;
    writer.flush()
}

/// Serializes the given data into protocol 3 pickle format and writes it to the given writer.
#[cfg(feature = "pickle")]
pub fn write_data_as_pickle<W: Write, T: Serialize>(writer: &mut W, data: &T) -> io::Result<()> {
    match serde_pickle::to_writer(writer, data, serde_pickle::SerOptions::new()) {
        Ok(_) => Ok(()),
        Err(serde_pickle::Error::Io(err)) => Err(err),
        Err(err) => Err(io::Error::new(
            io::ErrorKind::Other,
            format!("Unexpected error while serializing data to pickle: {}", err),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_rows_are_joined_with_commas() {
        let mut buffer = Vec::new();
        let rows = vec![
            vec!["1".to_string(), "2".to_string()],
            vec!["3".to_string(), "4".to_string()],
        ];
        write_csv(&mut buffer, "a,b", &rows).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "a,b\n1,2\n3,4\n");
    }

    #[test]
    fn existing_files_are_protected_unless_overwriting() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(!check_file_overwrite(file.path(), OverwriteMode::Never).unwrap());
        assert!(check_file_overwrite(file.path(), OverwriteMode::Always).unwrap());
        let missing = file.path().with_extension("missing");
        assert!(check_file_overwrite(&missing, OverwriteMode::Never).unwrap());
    }

    #[test]
    fn missing_file_error_names_the_path() {
        let err = read_text_file(Path::new("/nonexistent/field.txt")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/field.txt"));
    }
}
