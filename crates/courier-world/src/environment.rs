//! Adaptive weather selection.
//!
//! The selector owns the global [`WeatherType`] and decides, whenever its
//! change timer elapses, what comes next. The policy reads the player's
//! clothing and adaptation score so that a comfortable player gets
//! challenged and a struggling one gets relief.
//!
//! # Policy
//!
//! Rules are evaluated in order; the first that fires wins.
//!
//! | # | Rule            | Condition                                  | Next weather                          |
//! |---|-----------------|--------------------------------------------|---------------------------------------|
//! | 1 | Forced change   | same weather committed `max_same` times    | Normal: 50/50 extreme; adverse: 70% Normal, 30% opposite |
//! | 2 | Forced relief   | `max_consecutive_adverse` adverse in a row | Normal                                |
//! | 3 | Relaxation      | adverse and draw < `relaxation_chance`     | Normal, for `base x 1.5`              |
//! | 4 | Adaptive bias   | from Normal                                | extreme the clothing does not suit (0.8 if adapted, else 0.5) |
//! | 4 | Adaptive bias   | from adverse                               | 70% Normal, 30% opposite              |
//!
//! # Interval
//!
//! `base x (0.8 if adapted else 1.0) + U(jitter_min, jitter_max)`, clamped
//! to `[min_interval, max_interval]`.
//!
//! # Determinism
//!
//! All draws come from a [`StdRng`] seeded from the configuration, so a
//! given seed and input sequence always produce the same weather history.

use courier_types::{ClothingType, WeatherType};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::config::WeatherConfig;
use crate::error::WorldError;

/// Bookkeeping that drives anti-repetition and forced relief.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionMemory {
    /// The weather before the most recent change.
    pub last_weather: WeatherType,
    /// How many consecutive commits selected the current weather.
    pub same_weather_count: u32,
    /// How many consecutive commits selected an adverse weather.
    pub consecutive_adverse_count: u32,
    /// Game time (seconds) at which the next change is due.
    pub next_change_at: f64,
}

/// Which policy rule produced a weather value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionRule {
    /// Set directly by the host (intro, tests, debug tools).
    Manual,
    /// The same weather hit its repetition limit.
    ForcedChange,
    /// Too many adverse picks in a row.
    ForcedRelief,
    /// A random early return to normal.
    Relaxation,
    /// Clothing- and adaptation-weighted choice.
    AdaptiveBias,
}

impl core::fmt::Display for SelectionRule {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Manual => "manual",
            Self::ForcedChange => "forced_change",
            Self::ForcedRelief => "forced_relief",
            Self::Relaxation => "relaxation",
            Self::AdaptiveBias => "adaptive_bias",
        };
        f.write_str(name)
    }
}

/// What the selector knows about the player when choosing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerSignal {
    /// Current clothing.
    pub clothing: ClothingType,
    /// Adaptation score in `[0, 1]`.
    pub adaptation_score: f32,
}

impl PlayerSignal {
    /// An unclothed, perfectly neutral player.
    pub const NEUTRAL: Self = Self {
        clothing: ClothingType::None,
        adaptation_score: 1.0,
    };
}

/// A committed weather change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherTransition {
    /// Weather before the commit.
    pub from: WeatherType,
    /// Weather after the commit.
    pub to: WeatherType,
    /// The rule that chose `to`.
    pub rule: SelectionRule,
    /// Game time of the commit.
    pub at: f64,
    /// Game time of the next scheduled change.
    pub next_change_at: f64,
}

/// Timer-gated weather state machine with an adaptive selection policy.
#[derive(Debug, Clone)]
pub struct WeatherSelector {
    config: WeatherConfig,
    current: WeatherType,
    memory: SelectionMemory,
    cycling: bool,
    rng: StdRng,
}

impl WeatherSelector {
    /// Build a selector in normal weather, not yet cycling.
    pub fn new(config: WeatherConfig) -> Result<Self, WorldError> {
        config.validate()?;
        let rng = StdRng::seed_from_u64(config.seed);
        Ok(Self {
            config,
            current: WeatherType::Normal,
            memory: SelectionMemory {
                last_weather: WeatherType::Normal,
                same_weather_count: 1,
                consecutive_adverse_count: 0,
                next_change_at: 0.0,
            },
            cycling: false,
            rng,
        })
    }

    /// The current weather.
    pub const fn current(&self) -> WeatherType {
        self.current
    }

    /// Selection bookkeeping.
    pub const fn memory(&self) -> &SelectionMemory {
        &self.memory
    }

    /// Whether the change timer is running.
    pub const fn is_cycling(&self) -> bool {
        self.cycling
    }

    /// The selector's configuration.
    pub const fn config(&self) -> &WeatherConfig {
        &self.config
    }

    /// Commit `weather` and update the repetition counters.
    ///
    /// Committing the current weather again counts as a repeat. The change
    /// timer is left untouched.
    pub fn set_weather(&mut self, weather: WeatherType, now: f64) -> WeatherTransition {
        self.commit(weather, SelectionRule::Manual, now)
    }

    /// Start the change cycle: the first change is due one base interval
    /// from `now`.
    pub fn start_cycle(&mut self, now: f64) {
        self.cycling = true;
        self.memory.next_change_at = now + self.config.base_interval_secs;
        info!(
            next_change_at = self.memory.next_change_at,
            "weather cycle started"
        );
    }

    /// Stop the change cycle. Pending changes are discarded.
    pub fn stop_cycle(&mut self) {
        if self.cycling {
            info!(weather = %self.current, "weather cycle stopped");
        }
        self.cycling = false;
    }

    /// Change weather if the cycle is running and the timer has elapsed.
    pub fn poll(&mut self, now: f64, signal: PlayerSignal) -> Option<WeatherTransition> {
        if !self.cycling || now < self.memory.next_change_at {
            return None;
        }

        let (next, rule) = self.choose_next(signal);
        let interval = if rule == SelectionRule::Relaxation {
            self.config.base_interval_secs * self.config.relaxation_duration_multiplier
        } else {
            self.next_interval(signal.adaptation_score)
        };
        self.memory.next_change_at = now + interval;
        Some(self.commit(next, rule, now))
    }

    /// Run the selection policy without committing the result.
    ///
    /// Consumes randomness, so two calls may disagree.
    pub fn choose_next(&mut self, signal: PlayerSignal) -> (WeatherType, SelectionRule) {
        let current = self.current;

        // 1. Adverse cap, overrides everything else
        if self.memory.consecutive_adverse_count >= self.config.max_consecutive_adverse {
            return (WeatherType::Normal, SelectionRule::ForcedRelief);
        }

        // 2. Anti-repetition
        if self.memory.same_weather_count >= self.config.max_same_weather_count {
            let next = if current.is_adverse() {
                self.leave_adverse(current)
            } else {
                self.random_extreme()
            };
            return (next, SelectionRule::ForcedChange);
        }

        // 3. Relaxation
        if current.is_adverse() && self.rng.random::<f32>() < self.config.relaxation_chance {
            return (WeatherType::Normal, SelectionRule::Relaxation);
        }

        // 4. Adaptive bias
        let next = if current.is_adverse() {
            self.leave_adverse(current)
        } else {
            self.challenge(signal)
        };
        (next, SelectionRule::AdaptiveBias)
    }

    /// Draw the time until the next change.
    pub fn next_interval(&mut self, adaptation_score: f32) -> f64 {
        let mut interval = self.config.base_interval_secs;
        if adaptation_score > self.config.adaptation_threshold {
            interval *= self.config.adapted_interval_factor;
        }
        let jitter = if self.config.jitter_min_secs < self.config.jitter_max_secs {
            self.rng
                .random_range(self.config.jitter_min_secs..self.config.jitter_max_secs)
        } else {
            self.config.jitter_min_secs
        };
        (interval + jitter).clamp(self.config.min_interval_secs, self.config.max_interval_secs)
    }

    fn commit(&mut self, weather: WeatherType, rule: SelectionRule, now: f64) -> WeatherTransition {
        let from = self.current;
        if weather == from {
            self.memory.same_weather_count = self.memory.same_weather_count.saturating_add(1);
        } else {
            self.memory.same_weather_count = 1;
            self.memory.last_weather = from;
        }
        self.memory.consecutive_adverse_count = if weather.is_adverse() {
            self.memory.consecutive_adverse_count.saturating_add(1)
        } else {
            0
        };
        self.current = weather;

        info!(
            %from,
            to = %weather,
            %rule,
            same_weather_count = self.memory.same_weather_count,
            consecutive_adverse_count = self.memory.consecutive_adverse_count,
            "weather committed"
        );

        WeatherTransition {
            from,
            to: weather,
            rule,
            at: now,
            next_change_at: self.memory.next_change_at,
        }
    }

    fn random_extreme(&mut self) -> WeatherType {
        if self.rng.random::<f32>() < 0.5 {
            WeatherType::Heatwave
        } else {
            WeatherType::Snowstorm
        }
    }

    fn leave_adverse(&mut self, current: WeatherType) -> WeatherType {
        if self.rng.random::<f32>() < self.config.return_to_normal_chance {
            WeatherType::Normal
        } else {
            current.opposite()
        }
    }

    /// From normal weather, pick the extreme the player's clothing does not
    /// suit, more aggressively when they are coping well.
    fn challenge(&mut self, signal: PlayerSignal) -> WeatherType {
        let Some(suited) = signal.clothing.suited_for() else {
            return self.random_extreme();
        };
        let chance = if signal.adaptation_score > self.config.adaptation_threshold {
            self.config.adapted_challenge_chance
        } else {
            self.config.unadapted_challenge_chance
        };
        let roll = self.rng.random::<f32>();
        debug!(clothing = %signal.clothing, chance, roll, "adaptive bias roll");
        if roll < chance {
            suited.opposite()
        } else {
            suited
        }
    }
}

// ---------------------------------------------------------------------------
// Presentation
// ---------------------------------------------------------------------------

/// Background audio selected by the current weather.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioCue {
    /// Ambient town loop.
    Ambient,
    /// Heatwave loop.
    Heatwave,
    /// Snowstorm loop.
    Snowstorm,
}

/// How a weather value should be shown to the player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherPresentation {
    /// Notification text.
    pub label: &'static str,
    /// Notification colour as linear RGB in `[0, 1]`.
    pub color: [f32; 3],
    /// Heat-haze fog visible.
    pub fog_visible: bool,
    /// Snow particles visible.
    pub snow_visible: bool,
    /// Background audio.
    pub audio: AudioCue,
}

/// Notification, effect toggles and audio for `weather`.
pub const fn presentation(weather: WeatherType) -> WeatherPresentation {
    match weather {
        WeatherType::Normal => WeatherPresentation {
            label: "Normal",
            color: [0.0, 1.0, 0.0],
            fog_visible: false,
            snow_visible: false,
            audio: AudioCue::Ambient,
        },
        WeatherType::Heatwave => WeatherPresentation {
            label: "Heatwave",
            color: [1.0, 0.2745, 0.0],
            fog_visible: true,
            snow_visible: false,
            audio: AudioCue::Heatwave,
        },
        WeatherType::Snowstorm => WeatherPresentation {
            label: "Snowstorm",
            color: [0.0, 1.0, 1.0],
            fog_visible: false,
            snow_visible: true,
            audio: AudioCue::Snowstorm,
        },
    }
}

/// Volume of a cue `elapsed_secs` into a linear fade-in.
pub fn fade_in_volume(elapsed_secs: f32, duration_secs: f32) -> f32 {
    if duration_secs <= 0.0 {
        return 1.0;
    }
    (elapsed_secs / duration_secs).clamp(0.0, 1.0)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn selector(config: WeatherConfig) -> WeatherSelector {
        WeatherSelector::new(config).unwrap()
    }

    #[test]
    fn starts_normal_and_idle() {
        let s = selector(WeatherConfig::default());
        assert_eq!(s.current(), WeatherType::Normal);
        assert!(!s.is_cycling());
        assert_eq!(s.memory().same_weather_count, 1);
    }

    #[test]
    fn repeat_commit_counts_up() {
        let mut s = selector(WeatherConfig::default());
        s.set_weather(WeatherType::Normal, 0.0);
        assert_eq!(s.memory().same_weather_count, 2);
        s.set_weather(WeatherType::Heatwave, 1.0);
        assert_eq!(s.memory().same_weather_count, 1);
        assert_eq!(s.memory().last_weather, WeatherType::Normal);
        assert_eq!(s.memory().consecutive_adverse_count, 1);
        s.set_weather(WeatherType::Normal, 2.0);
        assert_eq!(s.memory().consecutive_adverse_count, 0);
    }

    #[test]
    fn forced_change_leaves_repeated_weather() {
        let mut s = selector(WeatherConfig::default());
        s.set_weather(WeatherType::Normal, 0.0);
        let (next, rule) = s.choose_next(PlayerSignal::NEUTRAL);
        assert_eq!(rule, SelectionRule::ForcedChange);
        assert!(next.is_adverse());
    }

    #[test]
    fn forced_relief_after_adverse_streak() {
        let mut s = selector(WeatherConfig::default());
        s.set_weather(WeatherType::Heatwave, 0.0);
        s.set_weather(WeatherType::Snowstorm, 1.0);
        s.set_weather(WeatherType::Heatwave, 2.0);
        let (next, rule) = s.choose_next(PlayerSignal::NEUTRAL);
        assert_eq!(rule, SelectionRule::ForcedRelief);
        assert_eq!(next, WeatherType::Normal);
    }

    #[test]
    fn forced_relief_beats_forced_change() {
        let mut s = selector(WeatherConfig {
            max_same_weather_count: 1,
            max_consecutive_adverse: 2,
            return_to_normal_chance: 0.0,
            ..WeatherConfig::default()
        });
        s.set_weather(WeatherType::Heatwave, 0.0);
        s.set_weather(WeatherType::Snowstorm, 1.0);
        for _ in 0..20 {
            let (next, rule) = s.choose_next(PlayerSignal::NEUTRAL);
            assert_eq!(rule, SelectionRule::ForcedRelief);
            assert_eq!(next, WeatherType::Normal);
        }
    }

    #[test]
    fn relaxation_returns_to_normal_for_longer() {
        let mut s = selector(WeatherConfig {
            relaxation_chance: 1.0,
            ..WeatherConfig::default()
        });
        s.start_cycle(0.0);
        s.set_weather(WeatherType::Snowstorm, 0.0);
        let t = s.poll(30.0, PlayerSignal::NEUTRAL).unwrap();
        assert_eq!(t.rule, SelectionRule::Relaxation);
        assert_eq!(t.to, WeatherType::Normal);
        assert!((t.next_change_at - 75.0).abs() < 1e-9);
    }

    #[test]
    fn adapted_coat_wearer_gets_heatwave() {
        let mut s = selector(WeatherConfig {
            adapted_challenge_chance: 1.0,
            ..WeatherConfig::default()
        });
        let signal = PlayerSignal {
            clothing: ClothingType::WinterCoat,
            adaptation_score: 0.95,
        };
        let (next, rule) = s.choose_next(signal);
        assert_eq!(rule, SelectionRule::AdaptiveBias);
        assert_eq!(next, WeatherType::Heatwave);
    }

    #[test]
    fn adapted_shirt_wearer_gets_snowstorm() {
        let mut s = selector(WeatherConfig {
            adapted_challenge_chance: 1.0,
            ..WeatherConfig::default()
        });
        let signal = PlayerSignal {
            clothing: ClothingType::TShirt,
            adaptation_score: 0.95,
        };
        assert_eq!(s.choose_next(signal).0, WeatherType::Snowstorm);
    }

    #[test]
    fn leaving_adverse_can_flip_to_opposite() {
        let mut s = selector(WeatherConfig {
            relaxation_chance: 0.0,
            return_to_normal_chance: 0.0,
            ..WeatherConfig::default()
        });
        s.set_weather(WeatherType::Heatwave, 0.0);
        let (next, rule) = s.choose_next(PlayerSignal::NEUTRAL);
        assert_eq!(rule, SelectionRule::AdaptiveBias);
        assert_eq!(next, WeatherType::Snowstorm);
    }

    #[test]
    fn poll_waits_for_timer() {
        let mut s = selector(WeatherConfig::default());
        assert!(s.poll(1000.0, PlayerSignal::NEUTRAL).is_none(), "not cycling");
        s.start_cycle(10.0);
        assert!(s.poll(39.9, PlayerSignal::NEUTRAL).is_none());
        let t = s.poll(40.0, PlayerSignal::NEUTRAL).unwrap();
        assert_ne!(t.to, t.from);
        assert!(t.next_change_at >= 40.0 + 15.0);
        assert!(t.next_change_at <= 40.0 + 45.0);
    }

    #[test]
    fn stop_cycle_halts_changes() {
        let mut s = selector(WeatherConfig::default());
        s.start_cycle(0.0);
        s.stop_cycle();
        assert!(s.poll(500.0, PlayerSignal::NEUTRAL).is_none());
    }

    #[test]
    fn interval_stays_in_bounds() {
        let mut s = selector(WeatherConfig::default());
        for i in 0..200 {
            let score = if i % 2 == 0 { 0.9 } else { 0.1 };
            let interval = s.next_interval(score);
            assert!((15.0..=45.0).contains(&interval), "interval {interval}");
        }
    }

    #[test]
    fn same_seed_same_history() {
        let run = || {
            let mut s = selector(WeatherConfig::default());
            s.start_cycle(0.0);
            let mut history = Vec::new();
            let mut now = 0.0;
            for _ in 0..50 {
                now += 1.0;
                if let Some(t) = s.poll(now, PlayerSignal::NEUTRAL) {
                    history.push(t.to);
                }
            }
            history
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn presentation_matches_weather() {
        let p = presentation(WeatherType::Heatwave);
        assert_eq!(p.label, "Heatwave");
        assert!(p.fog_visible);
        assert!(!p.snow_visible);
        assert_eq!(presentation(WeatherType::Snowstorm).audio, AudioCue::Snowstorm);
        assert!(presentation(WeatherType::Snowstorm).snow_visible);
    }

    #[test]
    fn fade_in_ramps_linearly() {
        assert!(fade_in_volume(0.0, 1.0).abs() < f32::EPSILON);
        assert!((fade_in_volume(0.5, 1.0) - 0.5).abs() < f32::EPSILON);
        assert!((fade_in_volume(3.0, 1.0) - 1.0).abs() < f32::EPSILON);
        assert!((fade_in_volume(0.0, 0.0) - 1.0).abs() < f32::EPSILON);
    }
}
