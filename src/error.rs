//! Configuration errors.

use thiserror::Error;

/// An invalid simulation configuration.
///
/// These are raised when parameters are built or validated, never while the
/// simulation is running.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("`{name}` must be positive and finite, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("critical density {k0} must lie strictly between 0 and the jam density {kj}")]
    CriticalDensity { k0: f64, kj: f64 },

    #[error("maximum flow {q0} does not match vf * k0 = {expected}")]
    InconsistentCapacity { q0: f64, expected: f64 },

    #[error("jitter standard deviation must be non-negative and finite, got {0}")]
    InvalidJitter(f64),
}

/// The error returned when parsing an unknown diagram name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown fundamental diagram `{0}`, expected triangle, greenshields or drake")]
pub struct UnknownDiagram(pub String);

/// Shorthand result type for configuration.
pub type Result<T> = std::result::Result<T, ConfigError>;
