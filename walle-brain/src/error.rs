//! Error types for walle-brain

use thiserror::Error;
use walle_eye::VisionError;

#[derive(Error, Debug)]
pub enum BrainError {
    #[error("Sensor error: {0}")]
    Sensor(#[from] VisionError),

    #[error("Signal error: {0}")]
    Signal(#[from] walle_core::Error),
}

impl BrainError {
    /// Camera faults abort the tick and trigger the restart policy
    pub fn is_sensor_fault(&self) -> bool {
        matches!(self, BrainError::Sensor(_))
    }
}
