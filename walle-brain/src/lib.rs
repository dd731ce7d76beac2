//! walle-brain: Behavior control for the WALL-E patrol robot
//!
//! A finite-state machine advanced one tick at a time: each tick samples the
//! cameras, classifies the frame, picks motor commands or a timed maneuver,
//! and decides the next state. The [`Driver`] repeats ticks and applies the
//! fault policy when a tick aborts.

pub mod error;
pub mod state;
pub mod machine;
pub mod driver;

pub use error::BrainError;
pub use state::{BehaviorState, RobotState};
pub use machine::{BehaviorStateMachine, Devices};
pub use driver::{Driver, DriverStats, TickOutcome};
