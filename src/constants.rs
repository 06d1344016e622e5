//! Physical and mathematical constants.

/// Floating-point precision to use for constants.
#[allow(non_camel_case_types)]
pub type fcn = f64;

// Mathematical constants

pub const PI: fcn = std::f64::consts::PI;

// Physical constants

/// Speed of light in vacuum [m/s].
pub const CLIGHT: fcn = 2.997_924_58e8;
/// Electron rest energy [eV].
pub const MC2_ELECTRON: fcn = 510.998_95e3;
/// Proton rest energy [eV].
pub const MC2_PROTON: fcn = 938.272_088e6;
/// Electron charge in units of the elementary charge.
pub const Q_ELECTRON: fcn = -1.0;
/// Proton charge in units of the elementary charge.
pub const Q_PROTON: fcn = 1.0;
