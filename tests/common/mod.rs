#![allow(dead_code)]

use betatrack::{
    constants::MC2_ELECTRON,
    field::{FieldUnits, SampledField, ScalarField2},
    geometry::{In2D, Vec2},
    grid::regular::RegularGrid2,
    interpolation::bilinear::BilinearInterpolator2,
    io::field_map::FieldMap,
    tracing::{ftr, particle::ParticleState, trajectory::TrajectorySimulatorConfig},
    units::{MEV, NANOSECOND, TESLA},
};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Half-width of the square magnet of the reference spectrometer [m].
pub const MAGNET_HALF_WIDTH: ftr = 1.0;
/// Field strength inside the reference magnet [T].
pub const MAGNET_STRENGTH: ftr = 1e-3;
/// Padding between the magnet and the edge of the field domain [m].
pub const GRID_PADDING: ftr = 2.0;
/// Extent of each grid cell of the reference field map [m].
pub const CELL_EXTENT: ftr = 0.01;

#[cfg(feature = "cli")]
pub fn run<I, T>(args: I)
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let args: Vec<std::ffi::OsString> = std::iter::once("betatrack".into())
        .chain(args.into_iter().map(Into::into))
        .collect();
    betatrack::cli::run::run_with_args(betatrack::cli::build::build().get_matches_from(args));
}

/// Creates the field map of the reference spectrometer magnet, with grid
/// coordinates given in multiples of `length_unit` meters and field values
/// in tesla.
pub fn reference_field_map(length_unit: ftr) -> FieldMap {
    let extent = MAGNET_HALF_WIDTH + GRID_PADDING;
    let n_cells = (2.0 * extent / CELL_EXTENT).round() as usize + 1;
    let half_width = 0.5 * n_cells as ftr * CELL_EXTENT / length_unit;
    let grid = RegularGrid2::from_bounds(
        In2D::same(n_cells),
        Vec2::new(-half_width, -half_width),
        Vec2::new(half_width, half_width),
    )
    .unwrap();
    let magnet_half_width = MAGNET_HALF_WIDTH / length_unit;
    let tolerance = 1e-6 * magnet_half_width;
    ScalarField2::from_function(grid, |point| {
        if point.x().abs() <= magnet_half_width + tolerance
            && point.y().abs() <= magnet_half_width + tolerance
        {
            MAGNET_STRENGTH
        } else {
            0.0
        }
    })
    .unwrap()
}

pub fn reference_sampler(
    length_unit: ftr,
) -> SampledField<RegularGrid2<ftr>, BilinearInterpolator2> {
    SampledField::new(
        reference_field_map(length_unit),
        BilinearInterpolator2::new(),
        FieldUnits::new(length_unit, TESLA).unwrap(),
    )
    .unwrap()
}

/// Electron with 1 MeV of momentum along the x-axis, starting in the field
/// free region to the left of the magnet.
pub fn reference_electron() -> ParticleState {
    ParticleState::planar(-2.0, 0.0, 1.0 * MEV, 0.0, -1.0, MC2_ELECTRON).unwrap()
}

pub fn reference_config() -> TrajectorySimulatorConfig {
    TrajectorySimulatorConfig {
        step_size: 0.01 * NANOSECOND,
        max_proper_time: 8.0 * NANOSECOND,
        ..TrajectorySimulatorConfig::default()
    }
}

/// Distance from the given point to the given center.
pub fn distance(point: (ftr, ftr), center: (ftr, ftr)) -> ftr {
    ((point.0 - center.0).powi(2) + (point.1 - center.1).powi(2)).sqrt()
}

/// Temporary directory for the files written by a single test.
#[derive(Debug)]
pub struct Test {
    output_dir: TempDir,
}

impl Test {
    pub fn new() -> Self {
        Self {
            output_dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn output_path<S: AsRef<str>>(&self, file_name: S) -> PathBuf {
        self.output_dir().join(file_name.as_ref())
    }

    fn output_dir(&self) -> &Path {
        self.output_dir.path()
    }
}

pub fn assert_file_exists<P: AsRef<Path>>(file_path: P) {
    let file_path = file_path.as_ref();
    assert!(
        file_path.exists(),
        "File {} does not exist",
        file_path.to_string_lossy()
    );
}
