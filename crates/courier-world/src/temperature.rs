//! Player body-temperature model.
//!
//! Body temperature is a single scalar in `[min_temperature,
//! max_temperature]`. Weather pushes it up or down, clothing scales that
//! push, and an unclothed player in normal weather slowly drifts back to 0.
//! Hitting either bound ends the run exactly once.
//!
//! # Fixed step
//!
//! The model advances in fixed steps of `update_interval_secs`, independent
//! of the host frame rate. [`TemperatureModel::advance`] accumulates frame
//! time and runs as many steps as have elapsed (bounded by
//! `max_catch_up_steps`); [`TemperatureModel::step`] runs exactly one.
//!
//! | Weather   | No clothing | T-shirt | Winter coat |
//! |-----------|-------------|---------|-------------|
//! | Normal    | recover     | 0       | 0           |
//! | Heatwave  | +2 x 1.5    | +2 x 0.3| +2 x 8      |
//! | Snowstorm | -2 x 1.5    | -2 x 8  | -2 x 0.3    |
//!
//! (rates per second, default configuration)

use courier_types::{ClothingType, DrinkType, FailReason, WeatherType};
use tracing::{debug, info};

use crate::config::TemperatureConfig;
use crate::error::WorldError;

/// Snapshot of the player's thermal state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureState {
    /// Current body temperature.
    pub body_temperature: f32,
    /// Lower bound (hypothermia).
    pub min_temperature: f32,
    /// Upper bound (hyperthermia).
    pub max_temperature: f32,
    /// What the player is wearing.
    pub clothing: ClothingType,
}

/// Outcome of one [`TemperatureModel::advance`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemperatureTick {
    /// Number of fixed steps that ran.
    pub steps: u32,
    /// Set only on the call during which the game-over latch fired.
    pub game_over: Option<FailReason>,
}

/// Fixed-step body-temperature simulation with a single-fire game-over
/// latch.
#[derive(Debug, Clone)]
pub struct TemperatureModel {
    config: TemperatureConfig,
    state: TemperatureState,
    /// Frame time not yet consumed by a fixed step.
    accumulator: f32,
    /// Seconds of emergency-kit resistance left, if active.
    resistance_remaining: Option<f32>,
    game_over: Option<FailReason>,
}

impl TemperatureModel {
    /// Build a model at neutral temperature with no clothing.
    pub fn new(config: TemperatureConfig) -> Result<Self, WorldError> {
        config.validate()?;
        let state = TemperatureState {
            body_temperature: 0.0,
            min_temperature: config.min_temperature,
            max_temperature: config.max_temperature,
            clothing: ClothingType::None,
        };
        Ok(Self {
            config,
            state,
            accumulator: 0.0,
            resistance_remaining: None,
            game_over: None,
        })
    }

    /// The model's configuration.
    pub const fn config(&self) -> &TemperatureConfig {
        &self.config
    }

    /// Current thermal state.
    pub const fn state(&self) -> &TemperatureState {
        &self.state
    }

    /// Current body temperature.
    pub const fn body_temperature(&self) -> f32 {
        self.state.body_temperature
    }

    /// Current clothing.
    pub const fn clothing(&self) -> ClothingType {
        self.state.clothing
    }

    /// The reason the run ended, once the latch has fired.
    pub const fn game_over(&self) -> Option<FailReason> {
        self.game_over
    }

    /// Whether an emergency kit is currently dampening the weather.
    pub const fn resistance_active(&self) -> bool {
        self.resistance_remaining.is_some()
    }

    /// Change the player's clothing. Takes effect on the next step.
    pub fn set_clothing(&mut self, clothing: ClothingType) {
        if self.state.clothing != clothing {
            debug!(from = %self.state.clothing, to = %clothing, "clothing changed");
        }
        self.state.clothing = clothing;
    }

    /// How well the player is coping, in `[0, 1]`; 1 at neutral, 0 at or
    /// beyond half the range away from it.
    pub fn adaptation_score(&self) -> f32 {
        adaptation_score(self.state.body_temperature, self.config.half_range())
    }

    /// Consume `dt` seconds of frame time, running every fixed step that
    /// has elapsed.
    ///
    /// Negative or non-finite `dt` is ignored. When more than
    /// `max_catch_up_steps` steps are owed, the backlog is dropped.
    pub fn advance(&mut self, dt: f32, weather: WeatherType) -> TemperatureTick {
        let mut tick = TemperatureTick {
            steps: 0,
            game_over: None,
        };
        if !dt.is_finite() || dt <= 0.0 {
            return tick;
        }

        let interval = self.config.update_interval_secs;
        self.accumulator += dt;
        while self.accumulator >= interval {
            if tick.steps >= self.config.max_catch_up_steps {
                debug!(
                    backlog_secs = self.accumulator,
                    "temperature backlog dropped"
                );
                self.accumulator %= interval;
                break;
            }
            self.accumulator -= interval;
            tick.steps = tick.steps.saturating_add(1);
            if let Some(reason) = self.step(weather) {
                tick.game_over = Some(reason);
            }
        }
        tick
    }

    /// Run exactly one fixed step under `weather`.
    ///
    /// # Order of operations
    ///
    /// 1. Weather effect (scaled while resistance is active)
    /// 2. Clothing multiplier
    /// 3. Delta = effect x multiplier x interval
    /// 4. Adverse weather applies the delta; normal weather with no
    ///    clothing moves toward 0 without overshooting
    /// 5. Clamp to bounds
    /// 6. Latch game over if a bound was reached
    ///
    /// Returns the failure reason only on the step where the latch fires.
    pub fn step(&mut self, weather: WeatherType) -> Option<FailReason> {
        let interval = self.config.update_interval_secs;

        let mut effect = self.weather_effect(weather);
        if let Some(remaining) = self.resistance_remaining {
            effect *= self.config.resistance_factor;
            let left = remaining - interval;
            self.resistance_remaining = if left > 0.0 { Some(left) } else { None };
            if self.resistance_remaining.is_none() {
                debug!("emergency kit resistance expired");
            }
        }

        let multiplier = clothing_multiplier(&self.config, weather, self.state.clothing);
        let delta = effect * multiplier * interval;

        if weather.is_adverse() {
            self.state.body_temperature += delta;
        } else if self.state.clothing == ClothingType::None {
            let max_step = self.config.recovery_rate * interval;
            self.state.body_temperature = move_towards_zero(self.state.body_temperature, max_step);
        }

        self.settle()
    }

    /// Add `amount` to body temperature immediately.
    pub fn apply_delta(&mut self, amount: f32) -> Option<FailReason> {
        if !amount.is_finite() {
            return None;
        }
        self.state.body_temperature += amount;
        self.settle()
    }

    /// Apply a drink's instant temperature change.
    pub fn apply_drink(&mut self, drink: DrinkType) -> Option<FailReason> {
        let amount = match drink {
            DrinkType::Lemonade => self.config.lemonade_delta,
            DrinkType::HotChocolate => self.config.hot_chocolate_delta,
        };
        debug!(?drink, amount, "drink consumed");
        self.apply_delta(amount)
    }

    /// Set body temperature back to 0. Does not clear the game-over latch.
    pub const fn reset(&mut self) {
        self.state.body_temperature = 0.0;
    }

    /// Reset temperature and dampen weather effects for
    /// `resistance_duration_secs`. Using a kit while one is active restarts
    /// the window.
    pub fn use_emergency_kit(&mut self) {
        self.reset();
        self.resistance_remaining = Some(self.config.resistance_duration_secs);
        info!(
            duration_secs = self.config.resistance_duration_secs,
            factor = self.config.resistance_factor,
            "emergency kit used"
        );
    }

    /// Return to the initial state for a new run, clearing the latch.
    pub fn restart(&mut self) {
        self.state.body_temperature = 0.0;
        self.state.clothing = ClothingType::None;
        self.accumulator = 0.0;
        self.resistance_remaining = None;
        self.game_over = None;
    }

    const fn weather_effect(&self, weather: WeatherType) -> f32 {
        match weather {
            WeatherType::Normal => 0.0,
            WeatherType::Heatwave => self.config.heatwave_rate,
            WeatherType::Snowstorm => self.config.snowstorm_rate,
        }
    }

    /// Clamp into bounds and fire the latch if a bound is reached.
    fn settle(&mut self) -> Option<FailReason> {
        let min = self.state.min_temperature;
        let max = self.state.max_temperature;
        self.state.body_temperature = self.state.body_temperature.clamp(min, max);

        if self.game_over.is_some() {
            return None;
        }
        let reason = if self.state.body_temperature <= min {
            FailReason::Hypothermia
        } else if self.state.body_temperature >= max {
            FailReason::Hyperthermia
        } else {
            return None;
        };
        self.game_over = Some(reason);
        info!(
            %reason,
            body_temperature = self.state.body_temperature,
            "temperature limit reached"
        );
        Some(reason)
    }
}

/// Multiplier applied to the weather effect for the given clothing.
///
/// Matching clothing dampens, opposing clothing amplifies strongly, no
/// clothing amplifies slightly. Clothing in normal weather is neutral.
pub fn clothing_multiplier(
    config: &TemperatureConfig,
    weather: WeatherType,
    clothing: ClothingType,
) -> f32 {
    if clothing == ClothingType::None {
        return config.no_clothing_multiplier;
    }
    if !weather.is_adverse() {
        return 1.0;
    }
    if clothing.suited_for() == Some(weather) {
        config.correct_clothing_multiplier
    } else {
        config.inappropriate_clothing_multiplier
    }
}

/// `1 - clamp01(|temperature| / half_range)`.
pub fn adaptation_score(body_temperature: f32, half_range: f32) -> f32 {
    if half_range <= 0.0 {
        return 0.0;
    }
    1.0 - (body_temperature.abs() / half_range).clamp(0.0, 1.0)
}

fn move_towards_zero(value: f32, max_step: f32) -> f32 {
    if value > 0.0 {
        (value - max_step).max(0.0)
    } else {
        (value + max_step).min(0.0)
    }
}
