//! Session observer that reports through `tracing`.
//!
//! Stands in for the HUD, audio and minimap widgets of a real client:
//! every notification becomes a structured log line, and a few counters
//! are kept for the end-of-run summary.

use courier_core::delivery::{DeliveryOutcome, ScoreBoard};
use courier_core::flow::GamePhase;
use courier_core::pickups::Pickup;
use courier_core::session::{SessionObserver, TickSummary};
use courier_minimap::MinimapFrame;
use courier_types::FailReason;
use courier_world::{WeatherPresentation, WeatherTransition};
use tracing::{debug, info, trace, warn};

/// Log every `n`th tick summary at debug level.
const SUMMARY_EVERY_TICKS: u64 = 100;

/// Counters collected over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Weather commits, including forced normal weather.
    pub weather_changes: u32,
    /// Pickups the player collected.
    pub pickups_collected: u32,
    /// Customers that spawned.
    pub customers: u32,
}

/// Observer that logs notifications and counts events.
#[derive(Debug, Default)]
pub struct LoggingObserver {
    stats: RunStats,
}

impl LoggingObserver {
    /// A fresh observer with zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters so far.
    pub const fn stats(&self) -> RunStats {
        self.stats
    }
}

impl SessionObserver for LoggingObserver {
    fn on_weather_changed(
        &mut self,
        transition: &WeatherTransition,
        presentation: &WeatherPresentation,
    ) {
        self.stats.weather_changes = self.stats.weather_changes.saturating_add(1);
        info!(
            label = presentation.label,
            color = ?presentation.color,
            fog = presentation.fog_visible,
            snow = presentation.snow_visible,
            audio = ?presentation.audio,
            rule = %transition.rule,
            "weather display updated"
        );
    }

    fn on_game_over(&mut self, reason: FailReason) {
        warn!(%reason, "{}", reason.message());
    }

    fn on_minimap(&mut self, frame: &MinimapFrame) {
        trace!(
            icons = frame.icons.len(),
            missing = frame.missing.len(),
            player_x = frame.player_position.x,
            player_y = frame.player_position.y,
            "minimap laid out"
        );
    }

    fn on_countdown(&mut self, text: &str) {
        info!(text, "countdown");
    }

    fn on_phase_changed(&mut self, phase: GamePhase) {
        info!(%phase, "phase changed");
    }

    fn on_delivery(&mut self, outcome: &DeliveryOutcome, board: &ScoreBoard) {
        match outcome {
            DeliveryOutcome::Spawned(customer) => {
                self.stats.customers = self.stats.customers.saturating_add(1);
                info!(
                    customer = %customer.id,
                    time_limit_secs = customer.time_limit_secs,
                    "new delivery"
                );
            }
            DeliveryOutcome::Completed { points, .. } => {
                info!(points, score = board.score, streak = board.streak, "delivered");
            }
            DeliveryOutcome::Failed { .. } => {
                info!(score = board.score, "delivery missed, streak lost");
            }
        }
    }

    fn on_pickup_spawned(&mut self, pickup: &Pickup) {
        debug!(pickup = %pickup.id, kind = ?pickup.kind, "pickup placed");
    }

    fn on_pickup_collected(&mut self, pickup: &Pickup) {
        self.stats.pickups_collected = self.stats.pickups_collected.saturating_add(1);
        info!(kind = ?pickup.kind, "picked up");
    }

    fn on_tick(&mut self, summary: &TickSummary) {
        if summary.tick % SUMMARY_EVERY_TICKS == 0 {
            debug!(
                tick = summary.tick,
                now = summary.now,
                phase = %summary.phase,
                weather = %summary.weather,
                body_temperature = summary.body_temperature,
                clothing = %summary.clothing,
                score = summary.score,
                "tick"
            );
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use courier_core::config::GameConfig;
    use courier_core::session::{FrameInput, GameSession};

    use super::*;

    #[test]
    fn counts_weather_commits() {
        let mut session = GameSession::new(GameConfig::default()).unwrap();
        let mut observer = LoggingObserver::new();
        session.begin_countdown(&mut observer).unwrap();
        for _ in 0..60 {
            session.tick(0.1, &FrameInput::default(), &mut observer).unwrap();
        }
        session.restart(&mut observer).unwrap();
        // returning to the intro re-commits normal weather
        assert_eq!(observer.stats().weather_changes, 1);
    }
}
