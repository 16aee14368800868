use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::motion::{EasingRegistry, InertiaConfig};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub controller: ControllerConfig,
    #[serde(default)]
    pub demo: DemoConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            controller: ControllerConfig::default(),
            demo: DemoConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Data directory path (log files for the terminal demo)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// How raw input is turned into timeline progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressMode {
    /// Clamp to [0, 1]; pinned scroll sections with a fixed distance
    Bounded,
    /// Cyclic timeline reduced modulo 1; marquees and infinite carousels
    #[default]
    Wrapping,
}

/// Raw input range that maps onto one full pass of the timeline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(0.0, 100.0)
    }
}

/// Easing curve used for decay plans and demo interpolation
///
/// Deserialized by name through `EasingRegistry`, so every alias it knows
/// is accepted in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EasingType {
    /// Jump straight to the end value
    None,
    Linear,
    /// Ease-out cubic: 1 - (1-t)³
    #[default]
    Cubic,
    /// Ease-out quintic: 1 - (1-t)⁵
    Quintic,
    /// Exponential ease-out: 1 - 2^(-10t)
    EaseOut,
}

impl<'de> Deserialize<'de> for EasingType {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        let registry = EasingRegistry::default();
        registry.get(&name).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "unknown easing '{}', expected one of: {}",
                name,
                registry.names().join(", ")
            ))
        })
    }
}

/// Scrub controller configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// "bounded" or "wrapping"
    #[serde(default)]
    pub mode: ProgressMode,
    /// Raw input range covering one pass of the timeline
    #[serde(default)]
    pub bounds: Bounds,
    /// Upper clamp for the velocity-derived playback rate
    #[serde(default = "default_max_rate")]
    pub max_rate: f64,
    /// Lower clamp for the velocity-derived playback rate (negative = reverse)
    #[serde(default = "default_min_rate")]
    pub min_rate: f64,
    /// Multiplier from velocity (units/ms) to playback rate
    #[serde(default = "default_velocity_to_rate_scale")]
    pub velocity_to_rate_scale: f64,
    /// Time for the rate to ease back to 1.0 after release
    #[serde(default = "default_decay_duration_ms")]
    pub decay_duration_ms: f64,
    /// Treat decreasing positions (leftward/upward drags) as forward playback
    #[serde(default)]
    pub invert_direction: bool,
    /// Time for one pass of the timeline at rate 1.0
    #[serde(default = "default_duration_ms")]
    pub duration_ms: f64,
    /// Easing used when decaying the rate back to baseline
    #[serde(default)]
    pub decay_easing: EasingType,
    /// Distance from 1.0 at which a decaying rate counts as settled
    #[serde(default = "default_settle_epsilon")]
    pub settle_epsilon: f64,
    /// Keep playing at the baseline rate while idle
    #[serde(default)]
    pub autoplay: bool,
    /// A held pointer with no new sample for this long counts as stopped
    #[serde(default = "default_hold_timeout_ms")]
    pub hold_timeout_ms: f64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            mode: ProgressMode::default(),
            bounds: Bounds::default(),
            max_rate: default_max_rate(),
            min_rate: default_min_rate(),
            velocity_to_rate_scale: default_velocity_to_rate_scale(),
            decay_duration_ms: default_decay_duration_ms(),
            invert_direction: false,
            duration_ms: default_duration_ms(),
            decay_easing: EasingType::default(),
            settle_epsilon: default_settle_epsilon(),
            autoplay: false,
            hold_timeout_ms: default_hold_timeout_ms(),
        }
    }
}

impl ControllerConfig {
    /// Reject configurations the controller cannot run with
    pub fn validate(&self) -> crate::Result<()> {
        let numbers = [
            ("bounds.min", self.bounds.min),
            ("bounds.max", self.bounds.max),
            ("max_rate", self.max_rate),
            ("min_rate", self.min_rate),
            ("velocity_to_rate_scale", self.velocity_to_rate_scale),
            ("decay_duration_ms", self.decay_duration_ms),
            ("duration_ms", self.duration_ms),
            ("settle_epsilon", self.settle_epsilon),
            ("hold_timeout_ms", self.hold_timeout_ms),
        ];
        if let Some((name, value)) = numbers.iter().find(|(_, v)| !v.is_finite()) {
            return Err(config_error(format!("{} must be finite, got {}", name, value)));
        }

        if self.bounds.max <= self.bounds.min {
            return Err(config_error(format!(
                "bounds.max ({}) must be greater than bounds.min ({})",
                self.bounds.max, self.bounds.min
            )));
        }
        if self.decay_duration_ms <= 0.0 {
            return Err(config_error(format!(
                "decay_duration_ms must be positive, got {}",
                self.decay_duration_ms
            )));
        }
        if self.duration_ms <= 0.0 {
            return Err(config_error(format!(
                "duration_ms must be positive, got {}",
                self.duration_ms
            )));
        }
        if self.min_rate > self.max_rate {
            return Err(config_error(format!(
                "min_rate ({}) must not exceed max_rate ({})",
                self.min_rate, self.max_rate
            )));
        }
        if self.hold_timeout_ms <= 0.0 {
            return Err(config_error(format!(
                "hold_timeout_ms must be positive, got {}",
                self.hold_timeout_ms
            )));
        }
        if self.settle_epsilon <= 0.0 {
            return Err(config_error(format!(
                "settle_epsilon must be positive, got {}",
                self.settle_epsilon
            )));
        }

        Ok(())
    }

    /// The subset of options the inertia resolver needs
    pub fn inertia(&self) -> InertiaConfig {
        InertiaConfig {
            max_rate: self.max_rate,
            min_rate: self.min_rate,
            velocity_to_rate_scale: self.velocity_to_rate_scale,
            decay_duration_ms: self.decay_duration_ms,
            invert_direction: self.invert_direction,
            decay_easing: self.decay_easing,
        }
    }
}

fn config_error(message: String) -> crate::Error {
    crate::Error::Config(message)
}

/// Settings for the terminal demo host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoConfig {
    /// Frame interval in milliseconds
    #[serde(default = "default_tick_rate")]
    pub tick_rate_ms: u64,
    /// Text scrolled by the marquee demo
    #[serde(default = "default_marquee_text")]
    pub marquee_text: String,
    /// Lines revealed one after another by the stagger demo
    #[serde(default = "default_reveal_lines")]
    pub reveal_lines: Vec<String>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: default_tick_rate(),
            marquee_text: default_marquee_text(),
            reveal_lines: default_reveal_lines(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("scrubline")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_rate() -> f64 {
    6.0
}

fn default_min_rate() -> f64 {
    -6.0
}

fn default_velocity_to_rate_scale() -> f64 {
    4.0
}

fn default_decay_duration_ms() -> f64 {
    800.0
}

fn default_duration_ms() -> f64 {
    4000.0
}

fn default_settle_epsilon() -> f64 {
    1e-3
}

fn default_hold_timeout_ms() -> f64 {
    80.0
}

fn default_tick_rate() -> u64 {
    16 // ~60fps
}

fn default_marquee_text() -> String {
    "scrub * fling * release * decay * ".to_string()
}

fn default_reveal_lines() -> Vec<String> {
    [
        "Drag anywhere to scrub the timeline.",
        "Fling to spin it faster.",
        "Let go and it eases back to speed.",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Expand tilde (~) in path to user's home directory
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(stripped) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(stripped);
            }
        } else if path_str == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        }
    }
    path.to_path_buf()
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from an explicit path, falling back to defaults when absent
    pub fn load_from(path: &std::path::Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate a TOML document
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.controller.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> crate::Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&config_path, self.to_toml()?)?;

        Ok(())
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Get the configuration file path
    /// Always uses ~/.config/scrubline/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("scrubline")
            .join("config.toml")
    }

    /// Get the log file path used by the terminal demo
    pub fn log_path(&self) -> PathBuf {
        self.data_dir().join("scrubline.log")
    }

    /// Get the data directory (with tilde expansion)
    pub fn data_dir(&self) -> PathBuf {
        expand_tilde(&self.general.data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ControllerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.mode, ProgressMode::Wrapping);
        assert_eq!(config.decay_easing, EasingType::Cubic);
        assert!(!config.invert_direction);
        assert!(!config.autoplay);
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        let config = ControllerConfig {
            bounds: Bounds::new(10.0, 10.0),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.is_config());

        let config = ControllerConfig {
            bounds: Bounds::new(10.0, 5.0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_non_positive_durations() {
        let config = ControllerConfig {
            decay_duration_ms: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ControllerConfig {
            duration_ms: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_swapped_rates_and_nan() {
        let config = ControllerConfig {
            min_rate: 3.0,
            max_rate: 2.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = ControllerConfig {
            velocity_to_rate_scale: f64::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [controller]
            mode = "bounded"
            invert_direction = true
            decay_easing = "ease-out-cubic"

            [controller.bounds]
            min = 0.0
            max = 2400.0
            "#,
        )
        .unwrap();

        assert_eq!(config.controller.mode, ProgressMode::Bounded);
        assert!(config.controller.invert_direction);
        assert_eq!(config.controller.decay_easing, EasingType::Cubic);
        assert_eq!(config.controller.bounds, Bounds::new(0.0, 2400.0));
        assert_eq!(config.controller.max_rate, 6.0);
        assert_eq!(config.demo.tick_rate_ms, 16);
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_easing_names_resolve_through_registry() {
        let config = AppConfig::from_toml(
            r#"
            [controller]
            decay_easing = "Ease-Out-Quint"
            "#,
        )
        .unwrap();
        assert_eq!(config.controller.decay_easing, EasingType::Quintic);

        let err = AppConfig::from_toml(
            r#"
            [controller]
            decay_easing = "bounce"
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("unknown easing 'bounce'"));
    }

    #[test]
    fn test_rejects_non_positive_hold_timeout() {
        let config = ControllerConfig {
            hold_timeout_ms: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_controller_is_config_error() {
        let result = AppConfig::from_toml(
            r#"
            [controller]
            decay_duration_ms = 0.0
            "#,
        );
        assert!(matches!(result, Err(crate::Error::Config(_))));
    }

    #[test]
    fn test_toml_round_trip_keeps_controller() {
        let mut config = AppConfig::default();
        config.controller.max_rate = 9.5;
        let text = config.to_toml().unwrap();
        let parsed = AppConfig::from_toml(&text).unwrap();
        assert_eq!(parsed.controller.max_rate, 9.5);
    }
}
