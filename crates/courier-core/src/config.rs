//! Configuration loading and typed config structures for a Courier session.
//!
//! The canonical configuration lives in `courier-config.yaml` at the
//! project root. Every section and field has a default, so an empty file
//! (or no file at all) yields a playable session. Component sections reuse
//! the config structs of the crates that own them.

use std::path::{Path, PathBuf};

use courier_minimap::{CoordinateTransform, MinimapConfig, MinimapError};
use courier_world::{TemperatureConfig, WeatherConfig, WorldError};
use serde::Deserialize;

use crate::delivery::DeliveryConfig;
use crate::pickups::PickupConfig;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The temperature or weather section is invalid.
    #[error("invalid world settings: {source}")]
    World {
        /// The underlying validation error.
        #[from]
        source: WorldError,
    },

    /// The minimap section is invalid.
    #[error("invalid minimap settings: {source}")]
    Minimap {
        /// The underlying validation error.
        #[from]
        source: MinimapError,
    },

    /// A session-level value is out of range.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level game configuration.
///
/// Mirrors the structure of `courier-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GameConfig {
    /// Session identity, seed and pacing.
    #[serde(default)]
    pub session: SessionConfig,

    /// Body-temperature model.
    #[serde(default)]
    pub temperature: TemperatureConfig,

    /// Weather selector.
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Minimap geometry and icons.
    #[serde(default)]
    pub minimap: MinimapConfig,

    /// Customer deliveries.
    #[serde(default)]
    pub delivery: DeliveryConfig,

    /// Collectible pickups.
    #[serde(default)]
    pub pickups: PickupConfig,

    /// Headless scripted driver used by the engine binary.
    #[serde(default)]
    pub driver: DriverConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// High-score persistence.
    #[serde(default)]
    pub high_score: HighScoreConfig,
}

impl GameConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `COURIER_HIGH_SCORE_PATH` overrides `high_score.path` when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.high_score.apply_env_overrides();
        Ok(config)
    }

    /// Check every section so a bad value fails at start-up rather than
    /// mid-run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.temperature.validate()?;
        self.weather.validate()?;
        self.minimap.validate()?;
        CoordinateTransform::new(self.minimap.world_size, self.minimap.minimap_size)?;

        let session = &self.session;
        if !session.frame_dt_secs.is_finite() || session.frame_dt_secs <= 0.0 {
            return Err(invalid("session.frame_dt_secs must be positive"));
        }
        if !session.countdown_step_secs.is_finite() || session.countdown_step_secs < 0.0 {
            return Err(invalid("session.countdown_step_secs must not be negative"));
        }

        let delivery = &self.delivery;
        let delivery_times = [
            delivery.spawn_delay_secs,
            delivery.time_per_unit_distance,
            delivery.min_time_limit_secs,
        ];
        if delivery_times.iter().any(|t| !t.is_finite() || *t < 0.0) {
            return Err(invalid("delivery timings must be finite and not negative"));
        }

        let pickups = &self.pickups;
        if !pickups.expiration_secs.is_finite() || pickups.expiration_secs <= 0.0 {
            return Err(invalid("pickups.expiration_secs must be positive"));
        }
        if !(0.0..=1.0).contains(&pickups.emergency_kit_threshold) {
            return Err(invalid("pickups.emergency_kit_threshold must lie in [0, 1]"));
        }
        Ok(())
    }
}

fn invalid(reason: &str) -> ConfigError {
    ConfigError::Invalid {
        reason: reason.to_owned(),
    }
}

/// Session-level configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SessionConfig {
    /// Human-readable session name.
    #[serde(default = "default_session_name")]
    pub name: String,

    /// Seed for customer and pickup placement.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Game seconds simulated per tick by the headless runner.
    #[serde(default = "default_frame_dt_secs")]
    pub frame_dt_secs: f32,

    /// Real-time milliseconds between ticks (0 = as fast as possible).
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Stop after this many ticks (0 = unlimited).
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,

    /// Seconds per countdown step ("Ready", "3", "2", "1", "Start").
    #[serde(default = "default_countdown_step_secs")]
    pub countdown_step_secs: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            name: default_session_name(),
            seed: default_seed(),
            frame_dt_secs: default_frame_dt_secs(),
            tick_interval_ms: default_tick_interval_ms(),
            max_ticks: default_max_ticks(),
            countdown_step_secs: default_countdown_step_secs(),
        }
    }
}

/// Scripted driver behaviour.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DriverConfig {
    /// Driving speed in world units per second.
    #[serde(default = "default_driver_speed")]
    pub speed: f32,

    /// Distance at which the driver counts as touching an object.
    #[serde(default = "default_interaction_radius")]
    pub interaction_radius: f32,

    /// Body temperature magnitude above which the driver detours for a
    /// corrective pickup.
    #[serde(default = "default_comfort_limit")]
    pub comfort_limit: f32,

    /// Begin the start countdown as soon as the session is up.
    #[serde(default = "default_true")]
    pub auto_start: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            speed: default_driver_speed(),
            interaction_radius: default_interaction_radius(),
            comfort_limit: default_comfort_limit(),
            auto_start: true,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error), used when `RUST_LOG`
    /// is not set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// High-score persistence configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HighScoreConfig {
    /// Path of the JSON high-score file.
    #[serde(default = "default_high_score_path")]
    pub path: PathBuf,
}

impl HighScoreConfig {
    /// Override the file path with `COURIER_HIGH_SCORE_PATH` when set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("COURIER_HIGH_SCORE_PATH") {
            self.path = PathBuf::from(val);
        }
    }
}

impl Default for HighScoreConfig {
    fn default() -> Self {
        Self {
            path: default_high_score_path(),
        }
    }
}

fn default_session_name() -> String {
    "Courier Town".to_owned()
}

const fn default_seed() -> u64 {
    42
}

const fn default_frame_dt_secs() -> f32 {
    0.05
}

const fn default_tick_interval_ms() -> u64 {
    50
}

const fn default_max_ticks() -> u64 {
    12_000
}

const fn default_countdown_step_secs() -> f64 {
    1.0
}

const fn default_driver_speed() -> f32 {
    14.0
}

const fn default_interaction_radius() -> f32 {
    4.0
}

const fn default_comfort_limit() -> f32 {
    45.0
}

const fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_owned()
}

fn default_high_score_path() -> PathBuf {
    PathBuf::from("highscore.json")
}
