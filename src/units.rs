//! Units used for particle tracing.
//!
//! Lengths are measured in meters and proper time in light-meters (the
//! distance light travels during the interval). Momenta and energies are
//! measured in electron volts, with momentum implicitly divided by the speed
//! of light. The magnetic field is then measured in electron volts per meter,
//! so that a field of one tesla corresponds to the numerical value of the
//! speed of light in meters per second.

use crate::constants::CLIGHT;

/// Floating-point precision to use for units.
#[allow(non_camel_case_types)]
pub type fun = f64;

/// SI prefixes.
pub mod prefix {
    use super::fun;

    pub const NANO: fun = 1e-9;
    pub const MICRO: fun = 1e-6;
    pub const MILLI: fun = 1e-3;
    pub const CENTI: fun = 1e-2;
    pub const KILO: fun = 1e3;
    pub const MEGA: fun = 1e6;
    pub const GIGA: fun = 1e9;
}

/// One meter [m].
pub const METER: fun = 1.0;
/// One centimeter [m].
pub const CENTIMETER: fun = prefix::CENTI * METER;
/// One millimeter [m].
pub const MILLIMETER: fun = prefix::MILLI * METER;

/// One second of proper time [light-m].
pub const SECOND: fun = CLIGHT;
/// One nanosecond of proper time [light-m].
pub const NANOSECOND: fun = prefix::NANO * SECOND;

/// One electron volt [eV].
pub const ELECTRON_VOLT: fun = 1.0;
/// One kilo electron volt [eV].
pub const KEV: fun = prefix::KILO * ELECTRON_VOLT;
/// One mega electron volt [eV].
pub const MEV: fun = prefix::MEGA * ELECTRON_VOLT;
/// One giga electron volt [eV].
pub const GEV: fun = prefix::GIGA * ELECTRON_VOLT;

/// One tesla [eV/m].
pub const TESLA: fun = CLIGHT;
/// One millitesla [eV/m].
pub const MILLITESLA: fun = prefix::MILLI * TESLA;

/// Computes the gyration radius [m] of a particle with the given momentum [eV]
/// and charge [e] in a field of the given strength [eV/m].
pub fn gyration_radius(momentum: fun, charge: fun, field_strength: fun) -> fun {
    momentum / (charge.abs() * field_strength)
}
