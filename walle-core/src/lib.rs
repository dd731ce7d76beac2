//! walle-core: shared building blocks for the WALL-E patrol controller
//!
//! Provides:
//! - The crate-wide `Error`/`Result` pair
//! - The compile-time threshold table that drives every behavior transition
//! - Runtime host wiring configuration (`WalleConfig`)
//! - The `SignalBus` seam to the simulation host's named signals

pub mod error;
pub mod thresholds;
pub mod config;
pub mod signals;

pub use error::{Error, Result};
pub use config::{WalleConfig, RestartPolicy};
pub use signals::{SignalBus, MemorySignals, battery_percent};
