//! Tunables for the temperature model and the weather selector.
//!
//! These structs are embedded in `courier-config.yaml` under the
//! `temperature` and `weather` keys. Every field has a default, so a partial
//! YAML section only overrides what it names. Validation runs once when a
//! component is constructed; nothing is re-checked per tick.

use serde::Deserialize;

use crate::error::WorldError;

/// Configuration for the body-temperature model.
///
/// Rates are degrees per second; the model multiplies them by
/// `update_interval_secs` on every fixed step.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct TemperatureConfig {
    /// Lower bound; reaching it means hypothermia (default: -100).
    pub min_temperature: f32,

    /// Upper bound; reaching it means hyperthermia (default: 100).
    pub max_temperature: f32,

    /// Temperature change per second during a heatwave (default: 2).
    pub heatwave_rate: f32,

    /// Temperature change per second during a snowstorm (default: -2).
    pub snowstorm_rate: f32,

    /// Multiplier when clothing matches the weather (default: 0.3).
    pub correct_clothing_multiplier: f32,

    /// Multiplier when clothing opposes the weather (default: 8).
    pub inappropriate_clothing_multiplier: f32,

    /// Multiplier when nothing is worn (default: 1.5).
    pub no_clothing_multiplier: f32,

    /// Speed at which an unclothed player drifts back to 0 in normal
    /// weather, per second (default: 1).
    pub recovery_rate: f32,

    /// Fixed step length in seconds (default: 0.1).
    pub update_interval_secs: f32,

    /// Upper bound on fixed steps run by a single `advance` call, so a long
    /// frame hitch cannot stall the host (default: 10).
    pub max_catch_up_steps: u32,

    /// Instant change from a lemonade (default: -30).
    pub lemonade_delta: f32,

    /// Instant change from a hot chocolate (default: 30).
    pub hot_chocolate_delta: f32,

    /// Weather-rate factor while an emergency kit is active (default: 0.25).
    pub resistance_factor: f32,

    /// How long an emergency kit's resistance lasts, in seconds
    /// (default: 15).
    pub resistance_duration_secs: f32,
}

impl Default for TemperatureConfig {
    fn default() -> Self {
        Self {
            min_temperature: -100.0,
            max_temperature: 100.0,
            heatwave_rate: 2.0,
            snowstorm_rate: -2.0,
            correct_clothing_multiplier: 0.3,
            inappropriate_clothing_multiplier: 8.0,
            no_clothing_multiplier: 1.5,
            recovery_rate: 1.0,
            update_interval_secs: 0.1,
            max_catch_up_steps: 10,
            lemonade_delta: -30.0,
            hot_chocolate_delta: 30.0,
            resistance_factor: 0.25,
            resistance_duration_secs: 15.0,
        }
    }
}

impl TemperatureConfig {
    /// Reject values that would make the model meaningless.
    ///
    /// The range must be non-empty and contain 0 (the reset point), the
    /// step length must be positive, and every rate and multiplier must be
    /// finite.
    pub fn validate(&self) -> Result<(), WorldError> {
        let finite = [
            self.min_temperature,
            self.max_temperature,
            self.heatwave_rate,
            self.snowstorm_rate,
            self.correct_clothing_multiplier,
            self.inappropriate_clothing_multiplier,
            self.no_clothing_multiplier,
            self.recovery_rate,
            self.update_interval_secs,
            self.lemonade_delta,
            self.hot_chocolate_delta,
            self.resistance_factor,
            self.resistance_duration_secs,
        ];
        if finite.iter().any(|v| !v.is_finite()) {
            return Err(invalid("temperature settings must be finite numbers"));
        }
        if self.min_temperature >= self.max_temperature {
            return Err(invalid(
                "min_temperature must be strictly below max_temperature",
            ));
        }
        if self.min_temperature > 0.0 || self.max_temperature < 0.0 {
            return Err(invalid("temperature range must contain 0"));
        }
        if self.update_interval_secs <= 0.0 {
            return Err(invalid("update_interval_secs must be positive"));
        }
        if self.max_catch_up_steps == 0 {
            return Err(invalid("max_catch_up_steps must be at least 1"));
        }
        if self.recovery_rate < 0.0 || self.resistance_duration_secs < 0.0 {
            return Err(invalid(
                "recovery_rate and resistance_duration_secs must not be negative",
            ));
        }
        Ok(())
    }

    /// Half of the temperature range; the distance from neutral at which
    /// the adaptation score reaches 0.
    pub fn half_range(&self) -> f32 {
        (self.max_temperature - self.min_temperature) * 0.5
    }
}

/// Configuration for the adaptive weather selector.
///
/// Times are seconds of game time.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Seed for the selector's random stream (default: 42).
    pub seed: u64,

    /// Nominal time between weather changes (default: 30).
    pub base_interval_secs: f64,

    /// Shortest allowed interval after jitter (default: 15).
    pub min_interval_secs: f64,

    /// Longest allowed interval after jitter (default: 45).
    pub max_interval_secs: f64,

    /// Lower end of the uniform jitter added to each interval (default: -5).
    pub jitter_min_secs: f64,

    /// Upper end of the uniform jitter added to each interval (default: 10).
    pub jitter_max_secs: f64,

    /// Interval factor applied while the player is well adapted
    /// (default: 0.8).
    pub adapted_interval_factor: f64,

    /// Chance of returning to normal early from adverse weather
    /// (default: 0.2).
    pub relaxation_chance: f32,

    /// How much longer a relaxation period lasts than the base interval
    /// (default: 1.5).
    pub relaxation_duration_multiplier: f64,

    /// The same weather may be committed at most this many times in a row
    /// (default: 2).
    pub max_same_weather_count: u32,

    /// At most this many adverse picks in a row before normal weather is
    /// forced (default: 3).
    pub max_consecutive_adverse: u32,

    /// Adaptation score above which the player counts as well adapted
    /// (default: 0.7).
    pub adaptation_threshold: f32,

    /// Chance of picking the weather the player's clothing is *not* suited
    /// for, when well adapted (default: 0.8).
    pub adapted_challenge_chance: f32,

    /// Chance of picking the weather the player's clothing is not suited
    /// for, when not well adapted (default: 0.5).
    pub unadapted_challenge_chance: f32,

    /// Chance of returning to normal when leaving adverse weather; the rest
    /// goes to the opposite extreme (default: 0.7).
    pub return_to_normal_chance: f32,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            base_interval_secs: 30.0,
            min_interval_secs: 15.0,
            max_interval_secs: 45.0,
            jitter_min_secs: -5.0,
            jitter_max_secs: 10.0,
            adapted_interval_factor: 0.8,
            relaxation_chance: 0.2,
            relaxation_duration_multiplier: 1.5,
            max_same_weather_count: 2,
            max_consecutive_adverse: 3,
            adaptation_threshold: 0.7,
            adapted_challenge_chance: 0.8,
            unadapted_challenge_chance: 0.5,
            return_to_normal_chance: 0.7,
        }
    }
}

impl WeatherConfig {
    /// Reject interval bounds and probabilities that cannot be honoured.
    pub fn validate(&self) -> Result<(), WorldError> {
        let secs = [
            self.base_interval_secs,
            self.min_interval_secs,
            self.max_interval_secs,
            self.jitter_min_secs,
            self.jitter_max_secs,
            self.adapted_interval_factor,
            self.relaxation_duration_multiplier,
        ];
        if secs.iter().any(|v| !v.is_finite()) {
            return Err(invalid("weather intervals must be finite numbers"));
        }
        if self.min_interval_secs <= 0.0 || self.min_interval_secs > self.max_interval_secs {
            return Err(invalid(
                "min_interval_secs must be positive and not above max_interval_secs",
            ));
        }
        if self.base_interval_secs <= 0.0 {
            return Err(invalid("base_interval_secs must be positive"));
        }
        if self.jitter_min_secs > self.jitter_max_secs {
            return Err(invalid("jitter_min_secs must not exceed jitter_max_secs"));
        }
        let chances = [
            self.relaxation_chance,
            self.adaptation_threshold,
            self.adapted_challenge_chance,
            self.unadapted_challenge_chance,
            self.return_to_normal_chance,
        ];
        if chances.iter().any(|p| !(0.0..=1.0).contains(p)) {
            return Err(invalid("weather probabilities must lie in [0, 1]"));
        }
        if self.max_same_weather_count == 0 || self.max_consecutive_adverse == 0 {
            return Err(invalid(
                "max_same_weather_count and max_consecutive_adverse must be at least 1",
            ));
        }
        Ok(())
    }
}

fn invalid(reason: &str) -> WorldError {
    WorldError::InvalidConfig {
        reason: reason.to_owned(),
    }
}
