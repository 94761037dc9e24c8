//! Error types for graph construction and configuration.
//!
//! The per-frame pass never fails; everything here is raised while a graph
//! or monitor is being set up.

use thiserror::Error;
use tickscope_atomic::RingError;

/// Errors raised while configuring a graph or monitor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The configuration was written for a different tick rate than the clock.
    #[error("Clock runs at {clock} ticks/s but the configuration expects {config} ticks/s")]
    ClockRateMismatch {
        /// Tick rate in the configuration.
        config: i64,
        /// Tick rate reported by the clock.
        clock: i64,
    },

    /// A configuration document could not be parsed.
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    /// A ring could not be allocated.
    #[error("Ring allocation failed: {0}")]
    Ring(#[from] RingError),
}

impl GraphError {
    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_configuration(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration(reason.into())
    }

    /// Create a parse error.
    #[must_use]
    pub fn parse(reason: impl Into<String>) -> Self {
        Self::Parse(reason.into())
    }

    /// Whether the error comes from configuration values rather than parsing
    /// or allocation.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfiguration(_) | Self::ClockRateMismatch { .. } | Self::Parse(_)
        )
    }
}

impl From<serde_json::Error> for GraphError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;
