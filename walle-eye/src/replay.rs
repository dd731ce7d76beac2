//! Frame replay camera
//!
//! Serves pre-recorded frames in order. Used by the `walle` binary to drive
//! the controller from image files and by tests to script what each camera
//! sees tick by tick.

use crate::camera::CameraDevice;
use crate::error::VisionError;
use crate::frame::Frame;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// A camera that replays queued frames.
///
/// Each refresh takes the next queued frame. When the queue runs dry the last
/// frame keeps being served. In looping mode frames are re-queued after use.
pub struct ReplayCamera {
    name: String,
    queue: Arc<Mutex<VecDeque<Frame>>>,
    connected: Arc<AtomicBool>,
    looping: bool,
    current: Option<Frame>,
}

/// Host-side control over a [`ReplayCamera`] after it has been handed off
#[derive(Clone)]
pub struct ReplayHandle {
    queue: Arc<Mutex<VecDeque<Frame>>>,
    connected: Arc<AtomicBool>,
}

impl ReplayCamera {
    pub fn new(name: impl Into<String>, frames: impl IntoIterator<Item = Frame>) -> Self {
        Self {
            name: name.into(),
            queue: Arc::new(Mutex::new(frames.into_iter().collect())),
            connected: Arc::new(AtomicBool::new(true)),
            looping: false,
            current: None,
        }
    }

    /// Cycle through the frames forever instead of holding the last one
    pub fn looping(mut self) -> Self {
        self.looping = true;
        self
    }

    /// Load every image file in `paths` as a frame, in order
    pub fn from_paths<P: AsRef<Path>>(
        name: impl Into<String>,
        paths: &[P],
    ) -> Result<Self, VisionError> {
        let name = name.into();
        let mut frames = Vec::with_capacity(paths.len());
        for path in paths {
            frames.push(Frame::open(path)?);
        }
        info!("Loaded {} replay frames for {}", frames.len(), name);
        Ok(Self::new(name, frames))
    }

    pub fn handle(&self) -> ReplayHandle {
        ReplayHandle {
            queue: self.queue.clone(),
            connected: self.connected.clone(),
        }
    }
}

impl ReplayHandle {
    pub fn push(&self, frame: Frame) {
        self.queue.lock().push_back(frame);
    }

    pub fn queued(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
    }

    pub fn reconnect(&self) {
        self.connected.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl CameraDevice for ReplayCamera {
    fn name(&self) -> &str {
        &self.name
    }

    async fn refresh(&mut self) -> Result<(), VisionError> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(VisionError::SensorUnavailable(self.name.clone()));
        }

        let next = {
            let mut queue = self.queue.lock();
            let next = queue.pop_front();
            if self.looping {
                if let Some(frame) = &next {
                    queue.push_back(frame.clone());
                }
            }
            next
        };

        match next {
            Some(frame) => self.current = Some(frame),
            None if self.current.is_some() => {}
            None => {
                warn!("Replay camera {} has no frames", self.name);
                return Err(VisionError::SensorUnavailable(self.name.clone()));
            }
        }

        // Yield like a real device delivering a buffer
        tokio::task::yield_now().await;
        Ok(())
    }

    fn current_frame(&self) -> Result<Frame, VisionError> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(VisionError::SensorUnavailable(self.name.clone()));
        }
        self.current
            .clone()
            .ok_or_else(|| VisionError::SensorUnavailable(self.name.clone()))
    }
}
