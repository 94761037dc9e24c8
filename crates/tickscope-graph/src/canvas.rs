//! Drawing surface abstraction.
//!
//! A [`Canvas`] is the handful of primitives a graph needs: filled
//! rectangles, vertical lines, a horizontal gradient, a rectangle outline
//! and text. Coordinates are integer pixels with the origin at the top left.

use serde::{Deserialize, Serialize};

/// RGBA colour with an opacity in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Colour {
    /// Red channel.
    pub red: u8,
    /// Green channel.
    pub green: u8,
    /// Blue channel.
    pub blue: u8,
    /// Opacity.
    pub alpha: f32,
}

impl Colour {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Fully transparent black.
    pub const TRANSPARENT_BLACK: Self = Self::BLACK.with_alpha(0.0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque yellow.
    pub const YELLOW: Self = Self::rgb(255, 255, 0);

    /// An opaque colour.
    #[must_use]
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 1.0,
        }
    }

    /// The same colour with a different opacity.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }

    /// Mean of the three channels.
    #[must_use]
    pub fn brightness(&self) -> u8 {
        let sum = u16::from(self.red) + u16::from(self.green) + u16::from(self.blue);
        u8::try_from(sum / 3).unwrap_or(u8::MAX)
    }

    /// Linear blend towards `other`; `t` is clamped to `0.0..=1.0`.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "blended channels stay within 0..=255"
    )]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (f32::from(a) + (f32::from(b) - f32::from(a)) * t).round() as u8;
        Self {
            red: mix(self.red, other.red),
            green: mix(self.green, other.green),
            blue: mix(self.blue, other.blue),
            alpha: self.alpha + (other.alpha - self.alpha) * t,
        }
    }
}

/// Integer pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Rect {
    /// A rectangle from its position and size.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// One past the right edge.
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// One past the bottom edge.
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Whether the rectangle covers no pixels.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Shrink by `amount` on every side.
    #[must_use]
    pub fn reduced(&self, amount: i32) -> Self {
        Self {
            x: self.x.saturating_add(amount),
            y: self.y.saturating_add(amount),
            width: self.width.saturating_sub(amount.saturating_mul(2)).max(0),
            height: self.height.saturating_sub(amount.saturating_mul(2)).max(0),
        }
    }

    /// Overlap with `other`, empty if they do not intersect.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        Self {
            x,
            y,
            width: right.saturating_sub(x).max(0),
            height: bottom.saturating_sub(y).max(0),
        }
    }

    /// Split off the top `amount` pixels, shrinking `self`.
    pub fn remove_from_top(&mut self, amount: i32) -> Self {
        let amount = amount.clamp(0, self.height.max(0));
        let top = Self::new(self.x, self.y, self.width, amount);
        self.y = self.y.saturating_add(amount);
        self.height = self.height.saturating_sub(amount);
        top
    }

    /// Split off the left `amount` pixels, shrinking `self`.
    pub fn remove_from_left(&mut self, amount: i32) -> Self {
        let amount = amount.clamp(0, self.width.max(0));
        let left = Self::new(self.x, self.y, amount, self.height);
        self.x = self.x.saturating_add(amount);
        self.width = self.width.saturating_sub(amount);
        left
    }
}

/// Drawing primitives used to paint graphs.
pub trait Canvas {
    /// Fill `rect` with `colour`.
    fn fill_rect(&mut self, rect: Rect, colour: Colour);

    /// Draw a one pixel wide vertical line at column `x` from `top` to
    /// `bottom`.
    fn draw_vertical_line(&mut self, x: i32, top: i32, bottom: i32, colour: Colour);

    /// Fill `rect` with a gradient running from `left` at the left edge to
    /// `right` at the right edge.
    fn fill_horizontal_gradient(&mut self, rect: Rect, left: Colour, right: Colour);

    /// Draw a one pixel outline just inside `rect`.
    fn draw_rect_outline(&mut self, rect: Rect, colour: Colour);

    /// Draw `text` top-left aligned in `rect`, clipped to it.
    fn draw_text(&mut self, text: &str, rect: Rect, colour: Colour);

    /// Pixel height of one line of text, including spacing.
    fn line_height(&self) -> i32;

    /// Pixel advance of one monospaced character.
    fn char_width(&self) -> i32;
}
