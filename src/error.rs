//! Error types and error reporting macros.

use thiserror::Error;

/// Errors that can occur while setting up or running a particle simulation.
#[derive(Error, Clone, Debug, PartialEq)]
pub enum SimulationError {
    /// The magnetic field was sampled outside the domain of the field grid.
    #[error("Field was sampled outside the grid domain at ({x}, {y})")]
    InvalidFieldDomain { x: f64, y: f64 },

    /// A configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// No termination condition was satisfied within the maximum number of steps.
    #[error("Simulation did not terminate within {steps} steps")]
    NonTerminatingSimulation { steps: u64 },
}

impl SimulationError {
    /// Creates a new `InvalidConfiguration` error with the given message.
    pub fn invalid_configuration<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfiguration(message.into())
    }
}

/// Result type for simulation operations.
pub type SimulationResult<T> = Result<T, SimulationError>;

/// Returns an `InvalidConfiguration` error with the given formatted message
/// from the enclosing function unless the condition holds.
#[macro_export]
macro_rules! ensure_valid {
    ($condition:expr, $($fmt_arg:tt)*) => {
        if !$condition {
            return Err($crate::error::SimulationError::InvalidConfiguration(format!($($fmt_arg)*)));
        }
    };
}

#[cfg(not(feature = "for-testing"))]
#[macro_export]
macro_rules! exit_with_error {
    ($($print_arg:tt)*) => {{
        eprintln!($($print_arg)*);
        quit::with_code(1);
    }};
}

#[cfg(feature = "for-testing")]
#[macro_export]
macro_rules! exit_with_error {
    ($($print_arg:tt)*) => {{
        panic!($($print_arg)*);
    }};
}

#[macro_export]
macro_rules! exit_on_error {
    ($result:expr, $($print_arg:tt)*) => {
        match $result {
            Ok(value) => value,
            Err(err) => {
                $crate::exit_with_error!($($print_arg)*, err)
            }
        }
    };
}

#[macro_export]
macro_rules! exit_on_false {
    ($logic:expr, $($print_arg:tt)*) => {
        if $logic {
            true
        } else {
            $crate::exit_with_error!($($print_arg)*)
        }
    };
}

#[macro_export]
macro_rules! exit_on_none {
    ($option:expr, $($print_arg:tt)*) => {
        $option.unwrap_or_else(|| $crate::exit_with_error!($($print_arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_positive(value: f64) -> SimulationResult<f64> {
        ensure_valid!(value > 0.0, "Value must be positive, got {}", value);
        Ok(value)
    }

    #[test]
    fn ensure_valid_returns_invalid_configuration() {
        assert_eq!(check_positive(2.0), Ok(2.0));
        assert_eq!(
            check_positive(-1.0),
            Err(SimulationError::InvalidConfiguration(
                "Value must be positive, got -1".to_string()
            ))
        );
    }

    #[test]
    fn error_messages_include_details() {
        let err = SimulationError::InvalidFieldDomain { x: 1.5, y: -2.0 };
        assert_eq!(
            err.to_string(),
            "Field was sampled outside the grid domain at (1.5, -2)"
        );
        let err = SimulationError::NonTerminatingSimulation { steps: 10 };
        assert_eq!(err.to_string(), "Simulation did not terminate within 10 steps");
    }
}
