//! Error types for ring construction.

use thiserror::Error;

/// Errors raised while building a ring.
///
/// Nothing on the push or drain paths returns an error: a full ingestion
/// ring drops the value, and retention overflow is a debug assertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RingError {
    /// A ring needs at least one slot.
    #[error("ring capacity must be greater than 0")]
    ZeroCapacity,
}
