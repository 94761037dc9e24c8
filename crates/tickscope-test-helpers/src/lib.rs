//! Shared test utilities for tickscope.
//!
//! # Modules
//!
//! - [`mod@must`] - Unwrap helpers with good error messages and `#[track_caller]`
//! - [`assertions`] - Float, interval-statistics and ordering assertion macros
//! - [`fixtures`] - Synthetic tick sequences for ring and graph tests
//! - [`prelude`] - Convenience re-exports
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! tickscope-test-helpers = { workspace = true }
//! ```
//!
//! ```rust,ignore
//! use tickscope_test_helpers::prelude::*;
//! ```

#![allow(clippy::panic, reason = "assertion helpers report failures by panicking")]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod assertions;
pub mod must;
pub mod prelude;

#[cfg(feature = "fixtures")]
#[cfg_attr(docsrs, doc(cfg(feature = "fixtures")))]
pub mod fixtures;

pub use must::*;
