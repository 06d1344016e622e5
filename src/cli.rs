//! Command line interface.

pub mod build;
pub mod create_field;
pub mod field;
pub mod orbit;
pub mod run;
pub mod simulate;
pub mod utils;
