//! Motor devices and the paired left/right actuator

use parking_lot::Mutex;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, trace};

/// A single wheel motor owned by the simulation host.
pub trait MotorDevice: Send {
    fn name(&self) -> &str;

    /// Apply a normalized velocity. Values are passed through unmodified.
    fn set_velocity(&mut self, velocity: f64);
}

/// Drives the left and right motors as a pair.
///
/// Commands are never clamped here; whatever the steering law produced is
/// forwarded to both devices.
pub struct MotorActuator {
    left: Box<dyn MotorDevice>,
    right: Box<dyn MotorDevice>,
    last_command: (f64, f64),
}

impl MotorActuator {
    pub fn new(left: Box<dyn MotorDevice>, right: Box<dyn MotorDevice>) -> Self {
        Self {
            left,
            right,
            last_command: (0.0, 0.0),
        }
    }

    /// Write both wheel velocities
    pub fn set_velocity(&mut self, left: f64, right: f64) {
        if !(-1.0..=1.0).contains(&left) || !(-1.0..=1.0).contains(&right) {
            debug!("Motor command ({:.3}, {:.3}) outside nominal range", left, right);
        }
        self.left.set_velocity(left);
        self.right.set_velocity(right);
        self.last_command = (left, right);
    }

    pub fn set_pair(&mut self, (left, right): (f64, f64)) {
        self.set_velocity(left, right);
    }

    pub fn stop(&mut self) {
        self.set_velocity(0.0, 0.0);
    }

    pub fn last_command(&self) -> (f64, f64) {
        self.last_command
    }
}

/// One velocity write as seen by a [`RecordingMotor`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotorSample {
    pub at: Instant,
    pub velocity: f64,
}

/// A motor that records every command it receives.
///
/// Clones share the same log, so a host can keep a clone while the actuator
/// owns the original.
#[derive(Clone)]
pub struct RecordingMotor {
    name: String,
    log: Arc<Mutex<Vec<MotorSample>>>,
}

impl RecordingMotor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn samples(&self) -> Vec<MotorSample> {
        self.log.lock().clone()
    }

    pub fn velocities(&self) -> Vec<f64> {
        self.log.lock().iter().map(|s| s.velocity).collect()
    }

    pub fn last(&self) -> Option<f64> {
        self.log.lock().last().map(|s| s.velocity)
    }

    pub fn clear(&self) {
        self.log.lock().clear();
    }
}

impl MotorDevice for RecordingMotor {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_velocity(&mut self, velocity: f64) {
        trace!("{} <- {:.3}", self.name, velocity);
        self.log.lock().push(MotorSample {
            at: Instant::now(),
            velocity,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actuator() -> (MotorActuator, RecordingMotor, RecordingMotor) {
        let left = RecordingMotor::new("left");
        let right = RecordingMotor::new("right");
        let actuator = MotorActuator::new(Box::new(left.clone()), Box::new(right.clone()));
        (actuator, left, right)
    }

    #[test]
    fn test_commands_written_in_pairs() {
        let (mut motors, left, right) = actuator();
        motors.set_velocity(0.2, -0.2);
        motors.stop();

        assert_eq!(left.velocities(), vec![0.2, 0.0]);
        assert_eq!(right.velocities(), vec![-0.2, 0.0]);
        assert_eq!(motors.last_command(), (0.0, 0.0));
    }

    #[test]
    fn test_out_of_range_passes_through() {
        let (mut motors, left, right) = actuator();
        motors.set_pair((4.2, 3.8));
        assert_eq!(left.last(), Some(4.2));
        assert_eq!(right.last(), Some(3.8));
    }

    #[test]
    fn test_clear() {
        let (mut motors, left, _) = actuator();
        motors.stop();
        left.clear();
        assert!(left.samples().is_empty());
    }
}
