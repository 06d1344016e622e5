//! Reading initial particle states from an input file.

use super::ParticleSeeder;
use crate::{
    io::utils,
    tracing::{ftr, particle::ParticleState},
};
use rayon::{self, prelude::*};
use std::{
    io::{self, BufRead},
    path::Path,
    vec,
};

/// Generator for initial particle states read from an input file.
#[derive(Clone, Debug)]
pub struct ManualSeeder {
    particles: Vec<ParticleState>,
}

impl ManualSeeder {
    /// Creates a new seeder producing particles read from an input file.
    ///
    /// The input file is assumed to be in CSV format, with each line consisting
    /// of the comma-separated values `x,y,px,py` for a single particle, with
    /// positions in meters and momenta in electron volts. Empty lines and lines
    /// starting with `#` are ignored.
    ///
    /// # Parameters
    ///
    /// - `input_file_path`: Path to the input file.
    /// - `charge`: Charge of every particle [e].
    /// - `rest_mass`: Rest mass of every particle [eV].
    ///
    /// # Returns
    ///
    /// A `Result` which is either:
    ///
    /// - `Ok`: Contains a new `ManualSeeder`.
    /// - `Err`: Contains an error encountered while trying to open or parse the input file.
    pub fn new(input_file_path: &Path, charge: ftr, rest_mass: ftr) -> io::Result<Self> {
        let file = utils::open_file_and_map_err(input_file_path)?;
        Self::from_reader(io::BufReader::new(file), charge, rest_mass)
    }

    /// Creates a new seeder parsing particles from the given reader, in the
    /// same format as for [`ManualSeeder::new`].
    pub fn from_reader<R: BufRead>(reader: R, charge: ftr, rest_mass: ftr) -> io::Result<Self> {
        let particles = reader
            .lines()
            .filter_map(|line_result| match line_result {
                Ok(line) => {
                    let trimmed_line = line.trim();
                    if trimmed_line.is_empty() || trimmed_line.starts_with('#') {
                        None
                    } else {
                        Some(parse_particle_line(trimmed_line, charge, rest_mass))
                    }
                }
                Err(err) => Some(Err(err)),
            })
            .collect::<io::Result<Vec<_>>>()?;
        Ok(Self { particles })
    }
}

fn parse_particle_line(line: &str, charge: ftr, rest_mass: ftr) -> io::Result<ParticleState> {
    let values = line
        .split(',')
        .map(|value_str| {
            value_str.trim().parse::<ftr>().map_err(|err| {
                io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!(
                        "Failed parsing value string {} in input file: {}",
                        value_str, err
                    ),
                )
            })
        })
        .collect::<io::Result<Vec<ftr>>>()?;

    if values.len() < 4 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Too few values in input file line: {}", line),
        ));
    }
    ParticleState::planar(values[0], values[1], values[2], values[3], charge, rest_mass)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err.to_string()))
}

impl IntoIterator for ManualSeeder {
    type Item = ParticleState;
    type IntoIter = vec::IntoIter<Self::Item>;
    fn into_iter(self) -> Self::IntoIter {
        self.particles.into_iter()
    }
}

impl IntoParallelIterator for ManualSeeder {
    type Item = ParticleState;
    type Iter = rayon::vec::IntoIter<Self::Item>;
    fn into_par_iter(self) -> Self::Iter {
        self.particles.into_par_iter()
    }
}

impl ParticleSeeder for ManualSeeder {
    fn number_of_particles(&self) -> usize {
        self.particles.len()
    }

    fn retain_particles<P>(&mut self, predicate: P)
    where
        P: FnMut(&ParticleState) -> bool,
    {
        self.particles.retain(predicate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn particles_are_read_from_csv_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# x,y,px,py").unwrap();
        writeln!(file, "-2.0, 0.0, 1e6, 0.0").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "-2.0,0.1,0.0,5e5").unwrap();
        file.flush().unwrap();

        let seeder = ManualSeeder::new(file.path(), -1.0, 511e3).unwrap();
        assert_eq!(seeder.number_of_particles(), 2);
        let particles: Vec<_> = seeder.into_iter().collect();
        assert_eq!(particles[0].planar_position().x(), -2.0);
        assert_eq!(particles[1].momentum().y(), 5e5);
        assert_eq!(particles[1].charge(), -1.0);
    }

    #[test]
    fn malformed_lines_are_reported() {
        let too_short = ManualSeeder::from_reader("1.0,2.0,3.0\n".as_bytes(), 1.0, 1.0);
        assert_eq!(too_short.unwrap_err().kind(), io::ErrorKind::InvalidData);
        let not_a_number = ManualSeeder::from_reader("1.0,two,3.0,4.0\n".as_bytes(), 1.0, 1.0);
        assert_eq!(not_a_number.unwrap_err().kind(), io::ErrorKind::InvalidData);
        let massless = ManualSeeder::from_reader("1.0,2.0,3.0,4.0\n".as_bytes(), 1.0, 0.0);
        assert!(massless.is_err());
    }

    #[test]
    fn particles_can_be_filtered() {
        let mut seeder =
            ManualSeeder::from_reader("0,0,1,0\n5,0,1,0\n".as_bytes(), 1.0, 1.0).unwrap();
        seeder.retain_particles(|particle| particle.planar_position().x() < 1.0);
        assert_eq!(seeder.number_of_particles(), 1);
    }
}
