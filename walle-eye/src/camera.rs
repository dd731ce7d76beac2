//! Camera device seam and frame sampling

use crate::error::VisionError;
use crate::frame::Frame;
use async_trait::async_trait;
use tracing::{debug, error};

/// A camera owned by the simulation host.
///
/// `refresh` asks the device for a new buffer and resolves once it has been
/// delivered; `current_frame` returns the buffer captured by the last refresh.
/// A disconnected device reports `VisionError::SensorUnavailable` from either
/// call.
#[async_trait]
pub trait CameraDevice: Send {
    fn name(&self) -> &str;

    async fn refresh(&mut self) -> Result<(), VisionError>;

    fn current_frame(&self) -> Result<Frame, VisionError>;
}

/// Wraps one camera device and hands out a fresh frame per call
pub struct FrameSampler {
    device: Box<dyn CameraDevice>,
}

impl FrameSampler {
    pub fn new(device: Box<dyn CameraDevice>) -> Self {
        Self { device }
    }

    pub fn device_name(&self) -> &str {
        self.device.name()
    }

    /// Request and return the device's next frame.
    ///
    /// Nothing is cached between calls. Failures are returned as-is; the
    /// caller decides whether to retry on a later tick.
    pub async fn capture(&mut self) -> Result<Frame, VisionError> {
        if let Err(e) = self.device.refresh().await {
            error!("Camera {} refresh failed: {}", self.device.name(), e);
            return Err(e);
        }

        let frame = self.device.current_frame()?;
        debug!(
            "Captured {}x{} frame from {}",
            frame.width(),
            frame.height(),
            self.device.name()
        );
        Ok(frame)
    }
}
