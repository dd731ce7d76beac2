//! Error types for walle-eye

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VisionError {
    #[error("Sensor unavailable: {0}")]
    SensorUnavailable(String),

    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}
