//! Runtime configuration for the controller host wiring
//!
//! Only device/signal names and driver-loop policy live here. Behavior
//! thresholds are fixed in [`crate::thresholds`].

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What the driver loop does with the machine after a tick aborts on a sensor fault
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestartPolicy {
    /// Reset to `Patrol` before the next tick
    ResetToPatrol,
    /// Retry the state that was active when the fault occurred
    ResumeState,
}

impl Default for RestartPolicy {
    fn default() -> Self {
        RestartPolicy::ResetToPatrol
    }
}

/// Controller configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalleConfig {
    /// Wide-area camera used for patrol, docking and basket search
    pub top_camera: String,
    /// Close-range camera used for target approach and compression checks
    pub small_camera: String,
    pub left_motor: String,
    pub right_motor: String,
    /// String signal carrying the battery fraction in `[0, 1]`
    pub battery_signal: String,
    /// Integer signal pulsed to run the compactor
    pub compress_signal: String,
    /// Wait after the host starts before the first tick (milliseconds)
    pub startup_delay_ms: u64,
    /// Stop the driver loop after this many ticks (runs forever when unset)
    pub max_ticks: Option<u64>,
    /// Give up on the post-compression scan after this many ticks (unbounded when unset)
    pub scan_after_compress_limit: Option<u32>,
    pub restart_policy: RestartPolicy,
    /// Default log filter when `RUST_LOG` is not set
    pub log_level: String,
}

impl Default for WalleConfig {
    fn default() -> Self {
        Self {
            top_camera: "top_image_sensor".to_string(),
            small_camera: "small_image_sensor".to_string(),
            left_motor: "motor_left".to_string(),
            right_motor: "motor_right".to_string(),
            battery_signal: "battery".to_string(),
            compress_signal: "compress".to_string(),
            startup_delay_ms: 1000,
            max_ticks: None,
            scan_after_compress_limit: None,
            restart_policy: RestartPolicy::ResetToPatrol,
            log_level: "info".to_string(),
        }
    }
}

impl WalleConfig {
    /// Load configuration from a TOML or JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration text, trying JSON first and then TOML
    pub fn from_str(content: &str) -> Result<Self> {
        if let Ok(config) = serde_json::from_str::<WalleConfig>(content) {
            return Ok(config);
        }
        Ok(toml::from_str::<WalleConfig>(content)?)
    }

    /// Apply `WALLE_*` environment overrides on top of this configuration
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(level) = std::env::var("WALLE_LOG_LEVEL") {
            self.log_level = level;
        }

        if let Ok(ticks) = std::env::var("WALLE_MAX_TICKS") {
            if let Ok(t) = ticks.parse::<u64>() {
                self.max_ticks = Some(t);
            }
        }

        self
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let names = [
            ("top_camera", &self.top_camera),
            ("small_camera", &self.small_camera),
            ("left_motor", &self.left_motor),
            ("right_motor", &self.right_motor),
            ("battery_signal", &self.battery_signal),
            ("compress_signal", &self.compress_signal),
        ];
        for (field, value) in names {
            if value.trim().is_empty() {
                return Err(Error::Configuration(format!("{} must not be empty", field)));
            }
        }

        if self.top_camera == self.small_camera {
            return Err(Error::Configuration(
                "top_camera and small_camera must name different devices".to_string(),
            ));
        }

        if self.left_motor == self.right_motor {
            return Err(Error::Configuration(
                "left_motor and right_motor must name different devices".to_string(),
            ));
        }

        if self.max_ticks == Some(0) {
            return Err(Error::Configuration("max_ticks must be > 0".to_string()));
        }

        if self.scan_after_compress_limit == Some(0) {
            return Err(Error::Configuration(
                "scan_after_compress_limit must be > 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = WalleConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.restart_policy, RestartPolicy::ResetToPatrol);
        assert!(config.scan_after_compress_limit.is_none());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = WalleConfig::from_str(
            r#"
            max_ticks = 500
            restart_policy = "resume_state"
            "#,
        )
        .unwrap();

        assert_eq!(config.max_ticks, Some(500));
        assert_eq!(config.restart_policy, RestartPolicy::ResumeState);
        assert_eq!(config.battery_signal, "battery");
    }

    #[test]
    fn test_json_config() {
        let config = WalleConfig::from_str(r#"{"scan_after_compress_limit": 200}"#).unwrap();
        assert_eq!(config.scan_after_compress_limit, Some(200));
    }

    #[test]
    fn test_rejects_shared_camera() {
        let config = WalleConfig {
            small_camera: "top_image_sensor".to_string(),
            ..WalleConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_rejects_zero_limits() {
        let config = WalleConfig {
            max_ticks: Some(0),
            ..WalleConfig::default()
        };
        assert!(config.validate().is_err());

        let config = WalleConfig {
            scan_after_compress_limit: Some(0),
            ..WalleConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log_level = \"debug\"").unwrap();
        writeln!(file, "startup_delay_ms = 0").unwrap();

        let config = WalleConfig::from_file(file.path()).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.startup_delay_ms, 0);
    }

    #[test]
    fn test_from_file_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_ticks = \"many\"").unwrap();
        assert!(WalleConfig::from_file(file.path()).is_err());
    }
}
