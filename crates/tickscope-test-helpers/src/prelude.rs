//! Convenience re-exports for common test utilities.
//!
//! ```rust,ignore
//! use tickscope_test_helpers::prelude::*;
//! ```

pub use crate::must::{must, must_some, must_with};

#[cfg(feature = "fixtures")]
pub use crate::fixtures::{TICKS_PER_MS, evenly_spaced, jittered, ms_to_ticks};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;
