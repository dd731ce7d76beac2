//! Fixed threshold table for the behavior state machine
//!
//! Every count, coverage ratio, gain, speed and hold time the controller
//! reacts to lives here. These are build-time constants: nothing reads them
//! from configuration.

use std::time::Duration;

// Battery

/// Battery percentage below which patrol hands over to the charger search.
pub const LOW_BATTERY_PERCENT: f64 = 50.0;

// Patrol

/// Minimum dominant-class pixel count in the patrol crop before acting.
pub const PATROL_MIN_COUNT: usize = 10;
/// Differential command used for the in-place scan rotation.
pub const SCAN_ROTATION: (f64, f64) = (0.2, -0.2);
/// Both wheels when a trash pursuit begins.
pub const PURSUIT_ENTRY_SPEED: f64 = 0.5;

// Charging

pub const CHARGER_MIN_COUNT: usize = 50;
pub const CHARGER_SCAN_HOLD: Duration = Duration::from_millis(100);
pub const DOCK_GAIN: f64 = 0.5;
pub const DOCK_BASE_SPEED: f64 = 1.0;
/// Bottom rows sampled to decide the robot sits on the pad.
pub const DOCK_BOTTOM_ROWS: u32 = 2;
pub const DOCKED_COVERAGE: f64 = 0.7;
pub const DOCK_SETTLE_HOLD: Duration = Duration::from_secs(4);
pub const OBSTRUCTION_COVERAGE: f64 = 0.5;
pub const RECOVER_REVERSE_HOLD: Duration = Duration::from_millis(500);
pub const RECOVER_PIVOT_HOLD: Duration = Duration::from_millis(400);

// Trash pursuit and compression

pub const TARGET_GAIN: f64 = 0.4;
pub const TARGET_BASE_SPEED: f64 = 4.0;
/// Small-camera coverage above which the target is close enough to compress.
pub const COMPRESS_COVERAGE: f64 = 0.98;
/// Coverage at or below which the target counts as lost.
pub const TARGET_LOST_COVERAGE: f64 = 0.0;
pub const COMPRESS_NUDGE_SPEED: f64 = 0.5;
pub const COMPRESS_NUDGE_HOLD: Duration = Duration::from_millis(500);
pub const COMPRESS_DWELL: Duration = Duration::from_millis(500);
pub const DISENGAGE_TURN: (f64, f64) = (0.4, -0.4);
pub const DISENGAGE_TURN_HOLD: Duration = Duration::from_millis(2350);
pub const DISENGAGE_PAUSE_HOLD: Duration = Duration::from_millis(500);
pub const DISENGAGE_FORWARD_SPEED: f64 = 0.3;
pub const DISENGAGE_FORWARD_HOLD: Duration = Duration::from_secs(2);

// Delivery

/// First row of the lower-center crop checked after compression.
pub const COMPRESSED_CROP_FROM_ROW: u32 = 20;
pub const COMPRESSED_MIN_COUNT: usize = 30;
pub const CREEP_SPEED: f64 = 0.5;
pub const CREEP_HOLD: Duration = Duration::from_millis(700);
pub const BASKET_MIN_COUNT: usize = 10;
pub const BASKET_GAIN: f64 = 0.5;
pub const BASKET_BASE_SPEED: f64 = 1.0;
pub const DELIVERED_COVERAGE: f64 = 0.4;

// Signals

pub const COMPRESS_ON: i64 = 1;
pub const COMPRESS_OFF: i64 = 0;
