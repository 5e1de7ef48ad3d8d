//! Error types for recoverable input problems.
//!
//! Every error here leaves the simulation untouched: the offending input is
//! dropped and the previous value is kept.

use std::fmt;

/// Errors produced while applying user input or configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// A color string that is not `#rrggbb`.
    InvalidColorFormat(String),
    /// A gravity selector value outside the preset table.
    UnknownGravityPreset(String),
    /// A tuning file that does not parse or holds an unusable value.
    InvalidTuning(String),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidColorFormat(s) => {
                write!(f, "Invalid color '{}': expected #rrggbb", s)
            }
            SimError::UnknownGravityPreset(s) => write!(
                f,
                "Unknown gravity preset '{}': expected one of earth, moon, jupiter, sun, blackHole",
                s
            ),
            SimError::InvalidTuning(s) => write!(f, "Invalid tuning: {}", s),
        }
    }
}

impl std::error::Error for SimError {}
