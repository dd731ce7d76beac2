//! Open-loop timed maneuvers
//!
//! A maneuver is a fixed list of wheel commands, each held for a duration.
//! Execution ignores the cameras entirely and cannot be interrupted once
//! started.

use crate::motor::MotorActuator;
use std::time::Duration;
use tracing::{debug, info};
use walle_core::thresholds::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ManeuverStep {
    pub left: f64,
    pub right: f64,
    pub hold: Duration,
}

impl ManeuverStep {
    pub const fn new(left: f64, right: f64, hold: Duration) -> Self {
        Self { left, right, hold }
    }

    pub const fn stop(hold: Duration) -> Self {
        Self::new(0.0, 0.0, hold)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Maneuver {
    pub name: &'static str,
    pub steps: Vec<ManeuverStep>,
}

impl Maneuver {
    pub fn new(name: &'static str, steps: Vec<ManeuverStep>) -> Self {
        Self { name, steps }
    }

    /// One short in-place rotation while searching for the charger
    pub fn scan_pulse() -> Self {
        let (l, r) = SCAN_ROTATION;
        Self::new("scan_pulse", vec![ManeuverStep::new(l, r, CHARGER_SCAN_HOLD)])
    }

    /// Back away from an obstruction and pivot
    pub fn recover() -> Self {
        Self::new(
            "recover",
            vec![
                ManeuverStep::new(-1.0, -1.0, RECOVER_REVERSE_HOLD),
                ManeuverStep::new(-1.0, 1.0, RECOVER_PIVOT_HOLD),
            ],
        )
    }

    /// Stopped on the pad while charging
    pub fn dock_settle() -> Self {
        Self::new("dock_settle", vec![ManeuverStep::stop(DOCK_SETTLE_HOLD)])
    }

    /// Push the target into the compactor
    pub fn compress_nudge() -> Self {
        Self::new(
            "compress_nudge",
            vec![ManeuverStep::new(
                COMPRESS_NUDGE_SPEED,
                COMPRESS_NUDGE_SPEED,
                COMPRESS_NUDGE_HOLD,
            )],
        )
    }

    /// Turn away from the compacted cube, pause, then drive clear
    pub fn disengage() -> Self {
        let (l, r) = DISENGAGE_TURN;
        Self::new(
            "disengage",
            vec![
                ManeuverStep::new(l, r, DISENGAGE_TURN_HOLD),
                ManeuverStep::stop(DISENGAGE_PAUSE_HOLD),
                ManeuverStep::new(
                    DISENGAGE_FORWARD_SPEED,
                    DISENGAGE_FORWARD_SPEED,
                    DISENGAGE_FORWARD_HOLD,
                ),
            ],
        )
    }

    /// Creep onto the compressed cube, then stop
    pub fn creep() -> Self {
        Self::new(
            "creep",
            vec![
                ManeuverStep::new(CREEP_SPEED, CREEP_SPEED, CREEP_HOLD),
                ManeuverStep::stop(Duration::ZERO),
            ],
        )
    }

    pub fn duration(&self) -> Duration {
        self.steps.iter().map(|s| s.hold).sum()
    }
}

/// Runs maneuvers against the motor actuator on the tokio clock
#[derive(Debug, Default)]
pub struct ManeuverExecutor {
    completed: u64,
}

impl ManeuverExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn execute(&mut self, motors: &mut MotorActuator, maneuver: &Maneuver) {
        info!(
            "Maneuver {} ({} steps, {:?})",
            maneuver.name,
            maneuver.steps.len(),
            maneuver.duration()
        );

        for step in &maneuver.steps {
            motors.set_velocity(step.left, step.right);
            if !step.hold.is_zero() {
                debug!("Holding ({}, {}) for {:?}", step.left, step.right, step.hold);
                tokio::time::sleep(step.hold).await;
            }
        }

        self.completed += 1;
    }

    /// Number of maneuvers run to completion
    pub fn completed(&self) -> u64 {
        self.completed
    }
}
