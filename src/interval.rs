//! Interval arithmetic for ray distances and channel ranges.
//!
//! Provides closed intervals [min, max] used for the "ahead of the origin"
//! test on intersections and for clamping colour channels at encode time.

/// Closed interval [min, max] for range checking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    /// Minimum value of the interval
    pub min: f32,
    /// Maximum value of the interval
    pub max: f32,
}

impl Interval {
    /// Everything at or in front of a ray origin.
    pub const AHEAD: Interval = Interval {
        min: 0.0,
        max: f32::INFINITY,
    };

    /// Displayable range of an 8-bit colour channel.
    pub const CHANNEL: Interval = Interval {
        min: 0.0,
        max: 255.0,
    };

    /// Create a new interval with given min and max values
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Check if the interval contains the given value (inclusive bounds)
    pub fn contains(&self, x: f32) -> bool {
        self.min <= x && x <= self.max
    }

    /// Clamp the given value to be within this interval's bounds
    pub fn clamp(&self, x: f32) -> f32 {
        x.clamp(self.min, self.max)
    }
}
