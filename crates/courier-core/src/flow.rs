//! Game flow state machine.
//!
//! A session moves through four phases:
//!
//! ```text
//! Intro --begin_countdown--> Countdown --(5 steps)--> Playing --limit--> GameOver
//!   ^                            |                       |                   |
//!   +------------abort-----------+---------quit----------+------restart------+
//! ```
//!
//! Phases are a tagged enum; entering and leaving a phase produce
//! [`FlowEffect`]s that the session applies to the weather selector and the
//! delivery desk. The countdown is a chain of scheduled [`FlowEvent`]s; when
//! the flow leaves `Countdown` early those entries are cancelled.

use courier_types::FailReason;
use tracing::info;

use crate::scheduler::{ScheduleToken, Scheduler};

/// Errors raised by the game flow.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    /// The requested phase change is not an edge of the state machine.
    #[error("invalid phase transition from {from} to {to}")]
    InvalidTransition {
        /// Phase the flow was in.
        from: GamePhase,
        /// Phase that was requested.
        to: GamePhase,
    },
}

/// The phase a session is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamePhase {
    /// Title / tutorial; weather held at normal.
    Intro,
    /// "Ready, 3, 2, 1, Start" before play begins.
    Countdown,
    /// Weather cycling, deliveries running.
    Playing,
    /// The run ended.
    GameOver(FailReason),
}

impl core::fmt::Display for GamePhase {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Intro => f.write_str("intro"),
            Self::Countdown => f.write_str("countdown"),
            Self::Playing => f.write_str("playing"),
            Self::GameOver(reason) => write!(f, "game_over({reason})"),
        }
    }
}

/// One beat of the start countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CountdownStep {
    /// "Ready"
    Ready,
    /// "3"
    Three,
    /// "2"
    Two,
    /// "1"
    One,
    /// "Start"
    Start,
}

impl CountdownStep {
    /// Every step in display order.
    pub const SEQUENCE: [Self; 5] = [Self::Ready, Self::Three, Self::Two, Self::One, Self::Start];

    /// Text shown for this step.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ready => "Ready",
            Self::Three => "3",
            Self::Two => "2",
            Self::One => "1",
            Self::Start => "Start",
        }
    }
}

/// Scheduled flow payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowEvent {
    /// Show a countdown step.
    Countdown(CountdownStep),
    /// The countdown finished; enter `Playing`.
    EnterPlaying,
}

/// Side effects the session must apply after a flow change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowEffect {
    /// The phase changed.
    PhaseChanged(GamePhase),
    /// Commit normal weather.
    ForceNormalWeather,
    /// Start the weather change cycle.
    StartWeatherCycle,
    /// Stop the weather change cycle.
    StopWeatherCycle,
    /// Start spawning customers.
    EnableDeliveries,
    /// Stop spawning customers and clear the current one.
    DisableDeliveries,
    /// Display countdown text.
    ShowCountdown(&'static str),
}

/// The session's phase plus the countdown entries it owns.
#[derive(Debug, Clone)]
pub struct GameFlow {
    phase: GamePhase,
    step_secs: f64,
    pending: Vec<ScheduleToken>,
}

impl GameFlow {
    /// A flow sitting in `Intro`. Call [`GameFlow::enter_intro`] once the
    /// session is wired up so the intro's enter effects are applied.
    pub const fn new(step_secs: f64) -> Self {
        Self {
            phase: GamePhase::Intro,
            step_secs,
            pending: Vec::new(),
        }
    }

    /// Current phase.
    pub const fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Whether a countdown is waiting to fire.
    pub fn countdown_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Effects of entering the intro, for session start-up.
    pub fn enter_intro(&self) -> Vec<FlowEffect> {
        vec![
            FlowEffect::PhaseChanged(GamePhase::Intro),
            FlowEffect::ForceNormalWeather,
        ]
    }

    /// Leave the intro and schedule "Ready, 3, 2, 1, Start" one step apart,
    /// followed by entry into `Playing`.
    pub fn begin_countdown<T: From<FlowEvent>>(
        &mut self,
        scheduler: &mut Scheduler<T>,
        now: f64,
    ) -> Result<Vec<FlowEffect>, FlowError> {
        let mut effects = self.transition(GamePhase::Countdown, scheduler)?;

        let mut delay = 0.0;
        for step in CountdownStep::SEQUENCE {
            if step == CountdownStep::Ready {
                effects.push(FlowEffect::ShowCountdown(step.label()));
            } else {
                let token = scheduler.schedule_after(now, delay, FlowEvent::Countdown(step).into());
                self.pending.push(token);
            }
            delay += self.step_secs;
        }
        let token = scheduler.schedule_after(now, delay, FlowEvent::EnterPlaying.into());
        self.pending.push(token);
        Ok(effects)
    }

    /// React to a scheduled flow event.
    pub fn handle_event<T>(
        &mut self,
        event: FlowEvent,
        scheduler: &mut Scheduler<T>,
    ) -> Result<Vec<FlowEffect>, FlowError> {
        if self.phase != GamePhase::Countdown {
            return Ok(Vec::new());
        }
        match event {
            FlowEvent::Countdown(step) => Ok(vec![FlowEffect::ShowCountdown(step.label())]),
            FlowEvent::EnterPlaying => self.transition(GamePhase::Playing, scheduler),
        }
    }

    /// End the run.
    pub fn game_over<T>(
        &mut self,
        reason: FailReason,
        scheduler: &mut Scheduler<T>,
    ) -> Result<Vec<FlowEffect>, FlowError> {
        self.transition(GamePhase::GameOver(reason), scheduler)
    }

    /// Return to the intro from any other phase.
    pub fn return_to_intro<T>(
        &mut self,
        scheduler: &mut Scheduler<T>,
    ) -> Result<Vec<FlowEffect>, FlowError> {
        self.transition(GamePhase::Intro, scheduler)
    }

    /// Move to `to`, running the exit effects of the current phase and the
    /// enter effects of the new one.
    pub fn transition<T>(
        &mut self,
        to: GamePhase,
        scheduler: &mut Scheduler<T>,
    ) -> Result<Vec<FlowEffect>, FlowError> {
        let from = self.phase;
        if !is_allowed(from, to) {
            return Err(FlowError::InvalidTransition { from, to });
        }

        let mut effects = Vec::new();
        self.exit(from, scheduler, &mut effects);
        self.phase = to;
        info!(%from, %to, "phase transition");
        effects.push(FlowEffect::PhaseChanged(to));
        enter(to, &mut effects);
        Ok(effects)
    }

    fn exit<T>(
        &mut self,
        phase: GamePhase,
        scheduler: &mut Scheduler<T>,
        effects: &mut Vec<FlowEffect>,
    ) {
        match phase {
            GamePhase::Countdown => {
                for token in self.pending.drain(..) {
                    scheduler.cancel(token);
                }
            }
            GamePhase::Playing => {
                effects.push(FlowEffect::StopWeatherCycle);
                effects.push(FlowEffect::DisableDeliveries);
            }
            GamePhase::Intro | GamePhase::GameOver(_) => {}
        }
    }
}

fn enter(phase: GamePhase, effects: &mut Vec<FlowEffect>) {
    match phase {
        GamePhase::Intro => effects.push(FlowEffect::ForceNormalWeather),
        GamePhase::Playing => {
            effects.push(FlowEffect::StartWeatherCycle);
            effects.push(FlowEffect::EnableDeliveries);
        }
        GamePhase::Countdown | GamePhase::GameOver(_) => {}
    }
}

/// Edges of the phase graph.
const fn is_allowed(from: GamePhase, to: GamePhase) -> bool {
    matches!(
        (from, to),
        (GamePhase::Intro, GamePhase::Countdown)
            | (GamePhase::Countdown, GamePhase::Playing | GamePhase::Intro)
            | (GamePhase::Playing, GamePhase::GameOver(_) | GamePhase::Intro)
            | (GamePhase::GameOver(_), GamePhase::Intro)
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn countdown_texts(effects: &[FlowEffect]) -> Vec<&'static str> {
        effects
            .iter()
            .filter_map(|e| match e {
                FlowEffect::ShowCountdown(text) => Some(*text),
                _ => None,
            })
            .collect()
    }

    /// Drive the scheduler second by second until `Playing`.
    fn run_countdown(flow: &mut GameFlow, scheduler: &mut Scheduler<FlowEvent>) -> Vec<&'static str> {
        let mut texts = countdown_texts(&flow.begin_countdown(scheduler, 0.0).unwrap());
        for second in 1..=5 {
            for event in scheduler.drain_due(f64::from(second)) {
                texts.extend(countdown_texts(&flow.handle_event(event, scheduler).unwrap()));
            }
        }
        texts
    }

    #[test]
    fn countdown_sequence_then_playing() {
        let mut flow = GameFlow::new(1.0);
        let mut scheduler = Scheduler::new();
        let texts = run_countdown(&mut flow, &mut scheduler);
        assert_eq!(texts, vec!["Ready", "3", "2", "1", "Start"]);
        assert_eq!(flow.phase(), GamePhase::Playing);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn entering_playing_starts_systems() {
        let mut flow = GameFlow::new(1.0);
        let mut scheduler: Scheduler<FlowEvent> = Scheduler::new();
        flow.begin_countdown(&mut scheduler, 0.0).unwrap();
        let effects = flow.handle_event(FlowEvent::EnterPlaying, &mut scheduler).unwrap();
        assert!(effects.contains(&FlowEffect::StartWeatherCycle));
        assert!(effects.contains(&FlowEffect::EnableDeliveries));
        assert!(!flow.countdown_pending());
    }

    #[test]
    fn aborting_countdown_cancels_pending_steps() {
        let mut flow = GameFlow::new(1.0);
        let mut scheduler: Scheduler<FlowEvent> = Scheduler::new();
        flow.begin_countdown(&mut scheduler, 0.0).unwrap();
        assert_eq!(scheduler.len(), 5);
        let effects = flow.return_to_intro(&mut scheduler).unwrap();
        assert!(scheduler.is_empty());
        assert!(effects.contains(&FlowEffect::ForceNormalWeather));
        assert_eq!(flow.phase(), GamePhase::Intro);
    }

    #[test]
    fn game_over_stops_systems() {
        let mut flow = GameFlow::new(1.0);
        let mut scheduler = Scheduler::new();
        run_countdown(&mut flow, &mut scheduler);
        let effects = flow.game_over(FailReason::Hypothermia, &mut scheduler).unwrap();
        assert_eq!(
            effects,
            vec![
                FlowEffect::StopWeatherCycle,
                FlowEffect::DisableDeliveries,
                FlowEffect::PhaseChanged(GamePhase::GameOver(FailReason::Hypothermia)),
            ]
        );
    }

    #[test]
    fn game_over_from_intro_is_invalid() {
        let mut flow = GameFlow::new(1.0);
        let mut scheduler: Scheduler<FlowEvent> = Scheduler::new();
        let err = flow.game_over(FailReason::Hyperthermia, &mut scheduler);
        assert!(matches!(err, Err(FlowError::InvalidTransition { .. })));
        assert_eq!(flow.phase(), GamePhase::Intro);
    }

    #[test]
    fn stale_events_are_ignored_outside_countdown() {
        let mut flow = GameFlow::new(1.0);
        let mut scheduler: Scheduler<FlowEvent> = Scheduler::new();
        let effects = flow.handle_event(FlowEvent::EnterPlaying, &mut scheduler).unwrap();
        assert!(effects.is_empty());
        assert_eq!(flow.phase(), GamePhase::Intro);
    }

    #[test]
    fn restart_after_game_over() {
        let mut flow = GameFlow::new(1.0);
        let mut scheduler = Scheduler::new();
        run_countdown(&mut flow, &mut scheduler);
        flow.game_over(FailReason::Hypothermia, &mut scheduler).unwrap();
        flow.return_to_intro(&mut scheduler).unwrap();
        assert_eq!(flow.phase(), GamePhase::Intro);
        flow.begin_countdown(&mut scheduler, 10.0).unwrap();
        assert_eq!(flow.phase(), GamePhase::Countdown);
    }
}
