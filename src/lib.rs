//! The `betatrack` crate provides tools for tracing charged particles through
//! the magnetic fields of spectrometers and collimator setups.

pub mod absorption;
pub mod constants;
pub mod ensemble;
pub mod error;
pub mod field;
pub mod geometry;
pub mod grid;
pub mod interpolation;
pub mod io;
pub mod num;
pub mod seeding;
pub mod tracing;
pub mod units;

#[cfg(feature = "cli")]
pub mod cli;
