//! Graph configuration.
//!
//! All windows are expressed in clock ticks. [`GraphConfig::for_clock_rate`]
//! derives the usual windows from a tick rate: a visible window of 100 ms,
//! an analysis horizon of two seconds and a coalesce threshold of 0.1 ms.

use serde::{Deserialize, Serialize};
use tickscope_atomic::DEFAULT_RING_CAPACITY;

use crate::clock::MonotonicClock;
use crate::error::{GraphError, GraphResult};

/// Windows and capacity for one graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Slot count of both the ingestion and the retention ring.
    pub capacity: usize,
    /// Events whose span overlaps this many ticks before sync time are drawn.
    pub visible_window_ticks: i64,
    /// Events that ended more than this many ticks before sync time expire.
    pub analysis_horizon_ticks: i64,
    /// Events closer than this to their predecessor share a bar.
    pub coalesce_threshold_ticks: i64,
    /// Tick rate the windows were computed for.
    pub ticks_per_second: i64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self::for_clock_rate(MonotonicClock::TICKS_PER_SECOND)
    }
}

impl GraphConfig {
    /// Default windows for a clock running at `ticks_per_second`.
    #[must_use]
    pub const fn for_clock_rate(ticks_per_second: i64) -> Self {
        Self {
            capacity: DEFAULT_RING_CAPACITY,
            visible_window_ticks: ticks_per_second / 10,
            analysis_horizon_ticks: ticks_per_second.saturating_mul(2),
            coalesce_threshold_ticks: ticks_per_second / 10_000,
            ticks_per_second,
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidConfiguration`] if any value is out of
    /// range.
    pub fn validate(&self) -> GraphResult<()> {
        if self.capacity == 0 {
            return Err(GraphError::invalid_configuration(
                "capacity must be greater than 0",
            ));
        }
        if self.ticks_per_second <= 0 {
            return Err(GraphError::invalid_configuration(
                "ticks_per_second must be greater than 0",
            ));
        }
        if self.visible_window_ticks <= 0 {
            return Err(GraphError::invalid_configuration(
                "visible_window_ticks must be greater than 0",
            ));
        }
        if self.analysis_horizon_ticks <= 0 {
            return Err(GraphError::invalid_configuration(
                "analysis_horizon_ticks must be greater than 0",
            ));
        }
        if self.coalesce_threshold_ticks < 0 {
            return Err(GraphError::invalid_configuration(
                "coalesce_threshold_ticks must not be negative",
            ));
        }
        if self.visible_window_ticks > self.analysis_horizon_ticks {
            return Err(GraphError::invalid_configuration(format!(
                "visible_window_ticks ({}) must not exceed analysis_horizon_ticks ({})",
                self.visible_window_ticks, self.analysis_horizon_ticks
            )));
        }
        Ok(())
    }

    /// Convert a tick interval to milliseconds at this tick rate.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        reason = "tick intervals are far below 2^52"
    )]
    pub fn ticks_to_ms(&self, ticks: i64) -> f64 {
        ticks as f64 * 1_000.0 / self.ticks_per_second as f64
    }

    /// Convert milliseconds to ticks at this tick rate, rounding to nearest.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        reason = "window sizes are far below 2^52 ticks"
    )]
    pub fn ms_to_ticks(&self, ms: f64) -> i64 {
        (ms * self.ticks_per_second as f64 / 1_000.0).round() as i64
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Parse`] on malformed JSON, or a validation
    /// error.
    pub fn from_json(json: &str) -> GraphResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Create a configuration builder.
    #[must_use]
    pub fn builder() -> GraphConfigBuilder {
        GraphConfigBuilder::default()
    }
}

/// Builder for [`GraphConfig`].
#[derive(Debug, Default)]
pub struct GraphConfigBuilder {
    config: GraphConfig,
}

impl GraphConfigBuilder {
    /// Reset every window to the defaults for `ticks_per_second`, keeping
    /// the capacity.
    #[must_use]
    pub fn clock_rate(mut self, ticks_per_second: i64) -> Self {
        let capacity = self.config.capacity;
        self.config = GraphConfig::for_clock_rate(ticks_per_second);
        self.config.capacity = capacity;
        self
    }

    /// Set the ring capacity.
    #[must_use]
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.config.capacity = capacity;
        self
    }

    /// Set the visible window in ticks.
    #[must_use]
    pub fn visible_window_ticks(mut self, ticks: i64) -> Self {
        self.config.visible_window_ticks = ticks;
        self
    }

    /// Set the analysis horizon in ticks.
    #[must_use]
    pub fn analysis_horizon_ticks(mut self, ticks: i64) -> Self {
        self.config.analysis_horizon_ticks = ticks;
        self
    }

    /// Set the coalesce threshold in ticks. 0 disables coalescing.
    #[must_use]
    pub fn coalesce_threshold_ticks(mut self, ticks: i64) -> Self {
        self.config.coalesce_threshold_ticks = ticks;
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> GraphResult<GraphConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_windows_follow_clock_rate() {
        let config = GraphConfig::for_clock_rate(1_000_000);
        assert_eq!(config.capacity, 10_000);
        assert_eq!(config.visible_window_ticks, 100_000);
        assert_eq!(config.analysis_horizon_ticks, 2_000_000);
        assert_eq!(config.coalesce_threshold_ticks, 100);
        assert!(config.validate().is_ok());
        assert!(GraphConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let base = GraphConfig::for_clock_rate(1_000_000);
        let cases = [
            GraphConfig {
                capacity: 0,
                ..base.clone()
            },
            GraphConfig {
                ticks_per_second: 0,
                ..base.clone()
            },
            GraphConfig {
                visible_window_ticks: 0,
                ..base.clone()
            },
            GraphConfig {
                analysis_horizon_ticks: -1,
                ..base.clone()
            },
            GraphConfig {
                coalesce_threshold_ticks: -1,
                ..base.clone()
            },
            GraphConfig {
                visible_window_ticks: base.analysis_horizon_ticks + 1,
                ..base.clone()
            },
        ];
        for config in cases {
            assert!(config.validate().is_err(), "{config:?} should be rejected");
        }
    }

    #[test]
    fn test_zero_coalesce_is_valid() {
        let config = GraphConfig::builder()
            .clock_rate(1_000_000)
            .coalesce_threshold_ticks(0)
            .build();
        assert!(config.is_ok());
    }

    #[test]
    fn test_builder_keeps_capacity_across_clock_rate() -> GraphResult<()> {
        let config = GraphConfig::builder()
            .capacity(64)
            .clock_rate(48_000)
            .build()?;
        assert_eq!(config.capacity, 64);
        assert_eq!(config.visible_window_ticks, 4_800);
        Ok(())
    }

    #[test]
    fn test_tick_conversions() {
        let config = GraphConfig::for_clock_rate(1_000_000);
        assert!((config.ticks_to_ms(105) - 0.105).abs() < 1e-12);
        assert_eq!(config.ms_to_ticks(16.7), 16_700);
    }

    #[test]
    fn test_from_json_fills_defaults() -> GraphResult<()> {
        let config = GraphConfig::from_json(r#"{ "capacity": 128 }"#)?;
        assert_eq!(config.capacity, 128);
        assert_eq!(config.ticks_per_second, MonotonicClock::TICKS_PER_SECOND);

        let err = GraphConfig::from_json(r#"{ "capacity": 0 }"#).err();
        assert!(matches!(err, Some(GraphError::InvalidConfiguration(_))));
        Ok(())
    }
}
