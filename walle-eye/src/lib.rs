//! walle-eye: Perception for the WALL-E controller
//!
//! Classifies camera pixels into the object classes the robot cares about
//! (trash, compressed trash, plants, the charging pad and the basket) with
//! fixed color thresholds, and summarizes a frame region as a
//! [`DetectionResult`] (count, coverage, centroid).

pub mod error;
pub mod pixel;
pub mod frame;
pub mod classifier;
pub mod camera;
pub mod replay;

pub use error::VisionError;
pub use pixel::Pixel;
pub use frame::{Frame, Region};
pub use classifier::{ObjectClass, DetectionResult, detect, detect_any, dominant, similar_colors};
pub use camera::{CameraDevice, FrameSampler};
pub use replay::{ReplayCamera, ReplayHandle};
