//! Named host signals
//!
//! The simulation host exposes string and integer signals by name. The
//! controller reads the battery level from a string signal and drives the
//! compactor through an integer signal.

use crate::error::{Error, Result};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Access to the host's named signals
pub trait SignalBus: Send {
    /// Read a string signal. Missing signals are `SignalUnavailable`.
    fn get_string_signal(&self, name: &str) -> Result<String>;

    /// Write an integer signal.
    fn set_integer_signal(&mut self, name: &str, value: i64) -> Result<()>;
}

/// Read the battery string signal and convert the `[0, 1]` fraction it carries
/// into a percentage.
pub fn battery_percent(bus: &dyn SignalBus, name: &str) -> Result<f64> {
    let raw = bus.get_string_signal(name)?;
    let fraction: f64 = raw.trim().parse().map_err(|_| Error::InvalidSignalValue {
        signal: name.to_string(),
        value: raw.clone(),
    })?;

    if !fraction.is_finite() {
        return Err(Error::InvalidSignalValue {
            signal: name.to_string(),
            value: raw,
        });
    }

    Ok(fraction * 100.0)
}

/// In-memory signal table shared between the host side and the controller.
///
/// Clones share the same storage, so a test or replay host can keep one handle
/// and hand the other to the state machine. Integer writes are also appended
/// to a history so edge sequences (1 then 0) can be inspected afterwards.
#[derive(Debug, Clone, Default)]
pub struct MemorySignals {
    strings: Arc<RwLock<HashMap<String, String>>>,
    integers: Arc<RwLock<HashMap<String, i64>>>,
    history: Arc<RwLock<Vec<(String, i64)>>>,
}

impl MemorySignals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_string(&self, name: &str, value: impl Into<String>) {
        self.strings.write().insert(name.to_string(), value.into());
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        self.integers.read().get(name).copied()
    }

    /// Every integer write in order, across all signal names
    pub fn integer_history(&self) -> Vec<(String, i64)> {
        self.history.read().clone()
    }
}

impl SignalBus for MemorySignals {
    fn get_string_signal(&self, name: &str) -> Result<String> {
        self.strings
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| Error::SignalUnavailable(name.to_string()))
    }

    fn set_integer_signal(&mut self, name: &str, value: i64) -> Result<()> {
        debug!("Signal {} <- {}", name, value);
        self.integers.write().insert(name.to_string(), value);
        self.history.write().push((name.to_string(), value));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_battery_percent_scales_fraction() {
        let signals = MemorySignals::new();
        signals.set_string("battery", "0.499");
        let level = battery_percent(&signals, "battery").unwrap();
        assert!((level - 49.9).abs() < 1e-9);
    }

    #[test]
    fn test_battery_percent_trims_whitespace() {
        let signals = MemorySignals::new();
        signals.set_string("battery", " 1.0\n");
        assert_eq!(battery_percent(&signals, "battery").unwrap(), 100.0);
    }

    #[test]
    fn test_battery_percent_rejects_garbage() {
        let signals = MemorySignals::new();
        signals.set_string("battery", "full");
        match battery_percent(&signals, "battery") {
            Err(Error::InvalidSignalValue { signal, value }) => {
                assert_eq!(signal, "battery");
                assert_eq!(value, "full");
            }
            other => panic!("Expected InvalidSignalValue, got {:?}", other),
        }
    }

    #[test]
    fn test_battery_percent_rejects_nan() {
        let signals = MemorySignals::new();
        signals.set_string("battery", "NaN");
        assert!(matches!(
            battery_percent(&signals, "battery"),
            Err(Error::InvalidSignalValue { .. })
        ));
    }

    #[test]
    fn test_missing_signal() {
        let signals = MemorySignals::new();
        assert!(matches!(
            battery_percent(&signals, "battery"),
            Err(Error::SignalUnavailable(_))
        ));
    }

    #[test]
    fn test_clones_share_storage() {
        let host = MemorySignals::new();
        let mut controller = host.clone();
        controller.set_integer_signal("compress", 1).unwrap();
        controller.set_integer_signal("compress", 0).unwrap();

        assert_eq!(host.integer("compress"), Some(0));
        assert_eq!(
            host.integer_history(),
            vec![("compress".to_string(), 1), ("compress".to_string(), 0)]
        );
    }
}
