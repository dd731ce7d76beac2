//! Proportional steering for differential drive

use walle_core::thresholds::{
    BASKET_BASE_SPEED, BASKET_GAIN, DOCK_BASE_SPEED, DOCK_GAIN, TARGET_BASE_SPEED, TARGET_GAIN,
};

/// Steering correction for a normalized error: `-gain * error`
pub fn steer(error: f64, gain: f64) -> f64 {
    -gain * error
}

/// Offset of `position` from the middle of `extent`, scaled so the edges map
/// to roughly -1 and +1. A zero extent yields 0.
pub fn normalized_offset(position: f64, extent: f64) -> f64 {
    let half = extent / 2.0;
    if half == 0.0 {
        return 0.0;
    }
    (position - half) / half
}

/// A base forward speed combined with a fixed steering gain
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteeringController {
    pub base_speed: f64,
    pub gain: f64,
}

impl SteeringController {
    pub const fn new(base_speed: f64, gain: f64) -> Self {
        Self { base_speed, gain }
    }

    /// Trash pursuit on the small camera
    pub const fn target_pursuit() -> Self {
        Self::new(TARGET_BASE_SPEED, TARGET_GAIN)
    }

    /// Driving onto the charging pad
    pub const fn docking() -> Self {
        Self::new(DOCK_BASE_SPEED, DOCK_GAIN)
    }

    /// Driving to the basket
    pub const fn basket_approach() -> Self {
        Self::new(BASKET_BASE_SPEED, BASKET_GAIN)
    }

    /// `(left, right)` wheel commands for `error`. Not clamped; with a base
    /// speed above 1 the result leaves the device's nominal `[-1, 1]` range.
    pub fn command(&self, error: f64) -> (f64, f64) {
        let s = steer(error, self.gain);
        (self.base_speed - s, self.base_speed + s)
    }

    /// Drive straight at the base speed
    pub fn straight(&self) -> (f64, f64) {
        (self.base_speed, self.base_speed)
    }
}
