//! Run control shared between the session loop and its host.
//!
//! A [`SessionControl`] is wrapped in [`std::sync::Arc`] and shared
//! between the runner task and whatever drives it (a Ctrl-C handler, a
//! test, an embedding game). Every field is atomic so the loop reads it
//! without taking a lock.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use courier_types::FailReason;
use serde::{Deserialize, Serialize};
use tokio::sync::Notify;

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEndReason {
    /// Reached the configured `max_ticks` limit.
    MaxTicksReached,
    /// A stop was requested.
    Stopped,
    /// Body temperature reached a limit.
    GameOver(FailReason),
}

impl fmt::Display for SessionEndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaxTicksReached => f.write_str("max_ticks_reached"),
            Self::Stopped => f.write_str("stopped"),
            Self::GameOver(reason) => write!(f, "game_over({reason})"),
        }
    }
}

/// Pause, stop and pacing state for one run.
#[derive(Debug)]
pub struct SessionControl {
    /// Whether the loop is paused.
    paused: AtomicBool,

    /// Wakes the loop when resumed.
    resume_notify: Notify,

    /// Whether a stop has been requested.
    stop_requested: AtomicBool,

    /// Real-time pause between ticks, in milliseconds.
    tick_interval_ms: AtomicU64,

    /// Maximum number of ticks (0 = unlimited).
    max_ticks: u64,
}

impl SessionControl {
    /// Control state for a run paced at `tick_interval_ms` that stops after
    /// `max_ticks` ticks (0 = unlimited).
    pub fn new(tick_interval_ms: u64, max_ticks: u64) -> Self {
        Self {
            paused: AtomicBool::new(false),
            resume_notify: Notify::new(),
            stop_requested: AtomicBool::new(false),
            tick_interval_ms: AtomicU64::new(tick_interval_ms),
            max_ticks,
        }
    }

    // -----------------------------------------------------------------------
    // Pause / Resume
    // -----------------------------------------------------------------------

    /// Check whether the run is paused.
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Pause the run. The loop sleeps until resumed.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::Release);
    }

    /// Resume the run and wake the loop.
    pub fn resume(&self) {
        self.paused.store(false, Ordering::Release);
        self.resume_notify.notify_one();
    }

    /// Wait until the run is no longer paused.
    ///
    /// Returns immediately if not paused. A stop request also wakes the
    /// waiter so a paused run can still be shut down.
    pub async fn wait_if_paused(&self) {
        while self.is_paused() && !self.is_stop_requested() {
            self.resume_notify.notified().await;
        }
    }

    // -----------------------------------------------------------------------
    // Stop
    // -----------------------------------------------------------------------

    /// Request a clean stop after the current tick.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
        self.resume_notify.notify_one();
    }

    /// Check whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    // -----------------------------------------------------------------------
    // Pacing
    // -----------------------------------------------------------------------

    /// Current real-time pause between ticks, in milliseconds.
    pub fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms.load(Ordering::Acquire)
    }

    /// Change the pause between ticks. Returns the previous value.
    pub fn set_tick_interval_ms(&self, ms: u64) -> u64 {
        self.tick_interval_ms.swap(ms, Ordering::AcqRel)
    }

    /// Check whether the tick limit has been reached.
    ///
    /// Returns `true` if `max_ticks > 0` and `ticks >= max_ticks`.
    pub const fn tick_limit_reached(&self, ticks: u64) -> bool {
        self.max_ticks > 0 && ticks >= self.max_ticks
    }

    /// The configured tick limit (0 = unlimited).
    pub const fn max_ticks(&self) -> u64 {
        self.max_ticks
    }
}
