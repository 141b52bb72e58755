//! Weather and body-temperature systems for the Courier game core.
//!
//! The two halves form a feedback loop: the [`environment::WeatherSelector`]
//! commits a weather value, the [`temperature::TemperatureModel`] consumes
//! it on every fixed step, and the selector reads the model's adaptation
//! score back when it picks the next weather.
//!
//! # Modules
//!
//! - [`config`] -- Tunables for both systems, loaded from YAML
//! - [`environment`] -- Adaptive weather selector and weather presentation
//! - [`temperature`] -- Fixed-step temperature model with game-over latch
//! - [`error`] -- Error types for world operations

pub mod config;
pub mod environment;
pub mod error;
pub mod temperature;

pub use config::{TemperatureConfig, WeatherConfig};
pub use environment::{
    AudioCue, PlayerSignal, SelectionMemory, SelectionRule, WeatherPresentation, WeatherSelector,
    WeatherTransition, fade_in_volume, presentation,
};
pub use error::WorldError;
pub use temperature::{
    TemperatureModel, TemperatureState, TemperatureTick, adaptation_score, clothing_multiplier,
};
