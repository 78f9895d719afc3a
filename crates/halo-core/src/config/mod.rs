mod loader;
pub mod rules;
pub mod template;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::log::LogConfig;

pub use loader::{config_dir, config_path, load, try_load};
pub use rules::{ExclusionRule, default_exclusions, is_excluded};

/// Top-level configuration for halo.
///
/// Loaded from `~/.config/halo/config.toml`. Missing sections
/// fall back to defaults thanks to `#[serde(default)]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Border appearance.
    pub border: BorderConfig,
    /// Window tracking and exclusions.
    pub window: WindowConfig,
    /// Drag/resize burst handling.
    pub throttle: ThrottleConfig,
    /// File logging.
    pub logging: LogConfig,
}

/// Border appearance configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BorderConfig {
    /// Hex color, `#RRGGBB` or `#AARRGGBB`.
    pub color: String,
    /// Border width in pixels at 96 DPI.
    pub width: i32,
    /// Pixels the overlay extends past the window frame. Negative values
    /// draw inside it.
    pub offset: i32,
}

/// Window tracking configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// How often the bordered window is checked to still be in front.
    pub validation_interval_ms: u64,
    /// Poll interval while waiting for a window to finish appearing.
    pub readiness_interval_ms: u64,
    /// Give up waiting for a window to appear after this long.
    pub readiness_timeout_ms: u64,
    /// Windows that never get a border.
    pub exclusions: Vec<ExclusionRule>,
}

/// Burst handling configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrottleConfig {
    /// Transitions closer together than this count as a burst.
    pub rapid_threshold_ms: u64,
    /// Quiet time after a burst before the border is shown again.
    pub quiet_delay_ms: u64,
}

impl Default for BorderConfig {
    fn default() -> Self {
        Self {
            color: "#FFA500".into(),
            width: 4,
            offset: 0,
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            validation_interval_ms: 250,
            readiness_interval_ms: 30,
            readiness_timeout_ms: 700,
            exclusions: default_exclusions(),
        }
    }
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            rapid_threshold_ms: 200,
            quiet_delay_ms: 150,
        }
    }
}

impl WindowConfig {
    pub fn validation_interval(&self) -> Duration {
        Duration::from_millis(self.validation_interval_ms)
    }

    pub fn readiness_interval(&self) -> Duration {
        Duration::from_millis(self.readiness_interval_ms)
    }

    pub fn readiness_timeout(&self) -> Duration {
        Duration::from_millis(self.readiness_timeout_ms)
    }
}

impl ThrottleConfig {
    pub fn rapid_threshold(&self) -> Duration {
        Duration::from_millis(self.rapid_threshold_ms)
    }

    pub fn quiet_delay(&self) -> Duration {
        Duration::from_millis(self.quiet_delay_ms)
    }
}

impl Config {
    /// Clamps values to safe ranges.
    ///
    /// Keeps the border visible, the validator from spinning, and the
    /// readiness wait bounded.
    pub fn validate(&mut self) {
        self.border.width = self.border.width.clamp(1, 32);
        self.border.offset = self.border.offset.clamp(-32, 32);
        self.window.validation_interval_ms = self.window.validation_interval_ms.clamp(50, 5000);
        self.window.readiness_interval_ms = self.window.readiness_interval_ms.clamp(1, 1000);
        self.window.readiness_timeout_ms = self.window.readiness_timeout_ms.min(10_000);
        self.throttle.rapid_threshold_ms = self.throttle.rapid_threshold_ms.min(2000);
        self.throttle.quiet_delay_ms = self.throttle.quiet_delay_ms.clamp(10, 2000);
        self.logging.max_file_mb = self.logging.max_file_mb.clamp(1, 1024);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        // Arrange / Act
        let config = Config::default();

        // Assert
        assert_eq!(config.border.color, "#FFA500");
        assert_eq!(config.border.width, 4);
        assert_eq!(config.window.validation_interval_ms, 250);
        assert_eq!(config.window.readiness_interval_ms, 30);
        assert_eq!(config.window.readiness_timeout_ms, 700);
        assert_eq!(config.throttle.rapid_threshold_ms, 200);
        assert_eq!(config.throttle.quiet_delay_ms, 150);
        assert!(!config.window.exclusions.is_empty());
    }

    #[test]
    fn partial_toml_uses_defaults_for_missing_sections() {
        // Arrange
        let toml_str = "[border]\nwidth = 6\n";

        // Act
        let config: Config = toml::from_str(toml_str).unwrap();

        // Assert
        assert_eq!(config.border.width, 6);
        assert_eq!(config.border.color, "#FFA500");
        assert_eq!(config.throttle, ThrottleConfig::default());
        assert_eq!(config.window.exclusions, default_exclusions());
    }

    #[test]
    fn explicit_exclusions_replace_defaults() {
        // Arrange
        let toml_str = r#"
            [window]
            exclusions = [{ class_name = "Foo" }, { text = "Bar" }]
        "#;

        // Act
        let config: Config = toml::from_str(toml_str).unwrap();

        // Assert
        assert_eq!(config.window.exclusions.len(), 2);
        assert_eq!(config.window.exclusions[0].class_name.as_deref(), Some("Foo"));
        assert_eq!(config.window.exclusions[1].text.as_deref(), Some("Bar"));
    }

    #[test]
    fn validate_clamps_out_of_range_values() {
        // Arrange
        let mut config = Config::default();
        config.border.width = 0;
        config.border.offset = 100;
        config.window.validation_interval_ms = 1;
        config.logging.max_file_mb = u64::MAX;

        // Act
        config.validate();

        // Assert
        assert_eq!(config.border.width, 1);
        assert_eq!(config.border.offset, 32);
        assert_eq!(config.window.validation_interval_ms, 50);
        assert_eq!(config.logging.max_file_mb, 1024);
    }
}
