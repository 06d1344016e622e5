//! Tracing charged particles through a magnetic field.

pub mod particle;
pub mod stepping;
pub mod trajectory;

use crate::absorption::{Collision, OutcomeTag};
use std::fmt;

#[cfg(feature = "serialization")]
use serde::Serialize;

/// Floating-point precision to use for tracing.
#[allow(non_camel_case_types)]
pub type ftr = f64;

/// Reason for terminating a particle trajectory.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize))]
#[cfg_attr(feature = "serialization", serde(rename_all = "snake_case"))]
pub enum TerminationCause {
    /// The proper time limit was exceeded.
    TimeLimit,
    /// The particle came within the edge margin of, or left, the field domain.
    BoundaryEscape,
    /// The particle entered an absorber region.
    Absorbed(Collision),
}

impl TerminationCause {
    /// Returns the numerical outcome code: the tag code of the region for
    /// absorbed particles and the code of a plain absorber otherwise.
    pub fn outcome_code(&self) -> u8 {
        match self {
            Self::Absorbed(collision) => collision.tag.code(),
            _ => OutcomeTag::Absorbed.code(),
        }
    }

    /// Whether the particle was captured by a detector region.
    pub fn is_detected(&self) -> bool {
        matches!(
            self,
            Self::Absorbed(Collision {
                tag: OutcomeTag::Detected,
                ..
            })
        )
    }

    /// Returns a short label for the cause.
    pub fn label(&self) -> &'static str {
        match self {
            Self::TimeLimit => "time_limit",
            Self::BoundaryEscape => "boundary_escape",
            Self::Absorbed(Collision {
                tag: OutcomeTag::Absorbed,
                ..
            }) => "absorbed",
            Self::Absorbed(Collision {
                tag: OutcomeTag::Detected,
                ..
            }) => "detected",
        }
    }
}

impl fmt::Display for TerminationCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absorbed(collision) => write!(f, "{}:{}", self.label(), collision.region_index),
            _ => f.write_str(self.label()),
        }
    }
}
