//! Session loop runner with run controls.
//!
//! [`run_session`] drives [`GameSession::tick`] at a fixed game-time step
//! and adds the control plane around it:
//!
//! - **Bounded runs**: stop after `max_ticks`
//! - **Pause/resume**: the loop parks until resumed
//! - **Variable pacing**: the real-time pause between ticks is adjustable
//! - **Clean shutdown**: a stop request ends the run before the next tick
//!
//! The run also ends on the tick a game over occurs.

use std::sync::Arc;

use tokio::time::Duration;
use tracing::info;

use crate::control::{SessionControl, SessionEndReason};
use crate::session::{FrameInput, GameSession, SessionError, SessionObserver, TickSummary};

/// Errors that can occur during a run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A tick failed.
    #[error("tick error: {source}")]
    Session {
        /// The underlying session error.
        #[from]
        source: SessionError,
    },
}

/// Result of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionResult {
    /// Why the run ended.
    pub end_reason: SessionEndReason,
    /// The last tick summary, if any tick completed.
    pub final_summary: Option<TickSummary>,
    /// Number of ticks executed by this run.
    pub total_ticks: u64,
}

impl SessionResult {
    /// Final score, or 0 if no tick ran.
    pub fn score(&self) -> u32 {
        self.final_summary.map_or(0, |s| s.score)
    }
}

/// Supplies one [`FrameInput`] per tick.
///
/// The engine binary uses a scripted driver; an embedding game would read
/// its player controller here.
pub trait InputSource: Send {
    /// Produce the input for the next tick of `dt` seconds.
    fn next_frame(&mut self, session: &GameSession, dt: f32) -> FrameInput;
}

/// Input source that keeps the player standing where the session last
/// saw them and reports no overlaps.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdleInput;

impl InputSource for IdleInput {
    fn next_frame(&mut self, session: &GameSession, _dt: f32) -> FrameInput {
        FrameInput::at(*session.player_pose())
    }
}

/// Run the session loop until a termination condition is met.
///
/// Every tick advances game time by `dt` seconds regardless of how long
/// the real-time pause between ticks is.
///
/// # Errors
///
/// Returns [`RunnerError`] if a tick fails.
pub async fn run_session(
    session: &mut GameSession,
    input: &mut dyn InputSource,
    control: &Arc<SessionControl>,
    observer: &mut dyn SessionObserver,
    dt: f32,
) -> Result<SessionResult, RunnerError> {
    let mut last_summary: Option<TickSummary> = None;
    let mut total_ticks: u64 = 0;

    info!(
        session_id = %session.id(),
        max_ticks = control.max_ticks(),
        tick_interval_ms = control.tick_interval_ms(),
        dt,
        "session run starting"
    );

    loop {
        // --- Check pause ---
        if control.is_paused() {
            info!("run paused, waiting for resume...");
            control.wait_if_paused().await;
            info!("run resumed");
        }

        // --- Check stop request (before tick) ---
        if control.is_stop_requested() {
            info!("stop requested");
            return Ok(SessionResult {
                end_reason: SessionEndReason::Stopped,
                final_summary: last_summary,
                total_ticks,
            });
        }

        // --- Execute tick ---
        let frame = input.next_frame(session, dt);
        let summary = session.tick(dt, &frame, observer)?;
        total_ticks = total_ticks.saturating_add(1);

        observer.on_tick(&summary);

        // --- Check game over ---
        if let Some(reason) = summary.game_over {
            info!(tick = summary.tick, %reason, "run ended by game over");
            return Ok(SessionResult {
                end_reason: SessionEndReason::GameOver(reason),
                final_summary: Some(summary),
                total_ticks,
            });
        }

        // --- Check tick limit (after tick) ---
        if control.tick_limit_reached(total_ticks) {
            info!(
                tick = summary.tick,
                max_ticks = control.max_ticks(),
                "tick limit reached"
            );
            return Ok(SessionResult {
                end_reason: SessionEndReason::MaxTicksReached,
                final_summary: Some(summary),
                total_ticks,
            });
        }

        last_summary = Some(summary);

        // --- Sleep for tick interval ---
        let interval_ms = control.tick_interval_ms();
        if interval_ms > 0 {
            tokio::time::sleep(Duration::from_millis(interval_ms)).await;
        }
    }
}

/// Log how a run ended.
pub fn log_session_end(result: &SessionResult) {
    info!(
        reason = %result.end_reason,
        total_ticks = result.total_ticks,
        final_tick = result.final_summary.as_ref().map(|s| s.tick),
        game_secs = result.final_summary.as_ref().map(|s| s.now),
        score = result.score(),
        "session ended"
    );
}
