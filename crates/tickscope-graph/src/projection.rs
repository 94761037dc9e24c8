//! Pure mapping from elapsed ticks to timeline coordinates.
//!
//! Positions are fractions of the graph width: 1.0 is the sync time at the
//! right edge, 0.0 is one visible window in the past at the left edge.

/// Whether an event `elapsed` ticks old is inside the visible window.
///
/// The boundary itself is outside.
#[inline]
#[must_use]
pub const fn is_visible(elapsed: i64, visible_window: i64) -> bool {
    elapsed < visible_window
}

/// Horizontal position of a point `elapsed` ticks before sync time.
#[inline]
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    reason = "tick windows are far below 2^52"
)]
pub fn timeline_position(elapsed: i64, visible_window: i64) -> f64 {
    1.0 - elapsed as f64 / visible_window as f64
}

/// Pixel column and width of a bar spanning `start_pos..end_pos` on a graph
/// `width` pixels wide. Bars are always at least one pixel wide.
#[inline]
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    reason = "positions are rounded to pixels and saturate on overflow"
)]
pub fn pixel_span(start_pos: f64, end_pos: f64, width: i32) -> (i32, i32) {
    let width = f64::from(width);
    let x = (start_pos * width).round() as i32;
    let end_x = (end_pos * width).round() as i32;
    (x, end_x.saturating_sub(x).max(1))
}

/// Bar height for `count` coalesced events on a graph `height` pixels tall.
///
/// Four events fill the graph; more overflow and are clipped when drawn.
#[inline]
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    reason = "heights saturate on overflow"
)]
pub fn bar_height(height: i32, count: u32) -> i32 {
    (f64::from(height) * f64::from(count) / 4.0) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_boundary_is_exclusive() {
        assert!(is_visible(999, 1_000));
        assert!(!is_visible(1_000, 1_000));
        assert!(is_visible(-5, 1_000));
    }

    #[test]
    fn test_timeline_position() {
        assert!((timeline_position(0, 1_000) - 1.0).abs() < f64::EPSILON);
        assert!((timeline_position(500, 1_000) - 0.5).abs() < f64::EPSILON);
        assert!(timeline_position(1_000, 1_000).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pixel_span_minimum_width() {
        assert_eq!(pixel_span(0.5, 0.5, 200), (100, 1));
        assert_eq!(pixel_span(0.25, 0.5, 200), (50, 50));
    }

    #[test]
    fn test_bar_height_scales_with_count() {
        assert_eq!(bar_height(100, 1), 25);
        assert_eq!(bar_height(100, 4), 100);
        assert_eq!(bar_height(100, 6), 150);
        assert_eq!(bar_height(10, 1), 2);
    }
}
