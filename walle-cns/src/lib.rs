//! walle-cns: Actuation layer for the WALL-E controller
//!
//! Provides:
//! - The proportional steering law used for visual servoing
//! - A paired left/right motor actuator over injected motor devices
//! - Open-loop timed maneuvers (scan pulses, recovery, compression disengage)

pub mod steering;
pub mod motor;
pub mod maneuver;

pub use steering::{steer, normalized_offset, SteeringController};
pub use motor::{MotorDevice, MotorActuator, RecordingMotor, MotorSample};
pub use maneuver::{Maneuver, ManeuverStep, ManeuverExecutor};
