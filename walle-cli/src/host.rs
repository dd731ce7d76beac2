//! Replay host: wires recorded frames, logging motors and in-memory signals
//! into the state machine's device slots.

use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;
use walle_brain::Devices;
use walle_cns::MotorDevice;
use walle_core::{MemorySignals, WalleConfig};
use walle_eye::ReplayCamera;

/// A motor that only logs the commands it receives
#[derive(Clone)]
pub struct ConsoleMotor {
    name: String,
    writes: Arc<AtomicU64>,
}

impl ConsoleMotor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            writes: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }
}

impl MotorDevice for ConsoleMotor {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_velocity(&mut self, velocity: f64) {
        self.writes.fetch_add(1, Ordering::Relaxed);
        debug!("{} <- {:.3}", self.name, velocity);
    }
}

/// Host-side handles kept after the devices are handed to the machine
pub struct ReplayHost {
    pub signals: MemorySignals,
    pub left: ConsoleMotor,
    pub right: ConsoleMotor,
}

impl ReplayHost {
    /// Build looping replay cameras from image files and a fixed battery
    /// reading (a fraction in `[0, 1]`)
    pub fn build(
        config: &WalleConfig,
        top: &[PathBuf],
        small: &[PathBuf],
        battery: &str,
    ) -> Result<(Self, Devices)> {
        if top.is_empty() || small.is_empty() {
            bail!("Both cameras need at least one frame");
        }

        let top_camera = ReplayCamera::from_paths(config.top_camera.clone(), top)
            .context("Failed to load top camera frames")?
            .looping();
        let small_camera = ReplayCamera::from_paths(config.small_camera.clone(), small)
            .context("Failed to load small camera frames")?
            .looping();

        let signals = MemorySignals::new();
        signals.set_string(&config.battery_signal, battery);

        let left = ConsoleMotor::new(config.left_motor.clone());
        let right = ConsoleMotor::new(config.right_motor.clone());

        let devices = Devices {
            top_camera: Box::new(top_camera),
            small_camera: Box::new(small_camera),
            left_motor: Box::new(left.clone()),
            right_motor: Box::new(right.clone()),
            signals: Box::new(signals.clone()),
        };

        Ok((Self { signals, left, right }, devices))
    }
}
