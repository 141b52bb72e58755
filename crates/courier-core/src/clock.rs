//! Game clock for a session.
//!
//! The clock is the single source of truth for session time. The host
//! supplies a frame delta on every tick; the clock accumulates it into
//! elapsed game seconds and counts ticks. Every timer in the session
//! (weather changes, scheduled steps, delivery deadlines) compares against
//! [`GameClock::now`].

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,

    /// The frame delta is negative, NaN or infinite.
    #[error("invalid frame delta: {dt}")]
    InvalidDelta {
        /// The rejected delta in seconds.
        dt: f32,
    },
}

/// Monotonic session clock.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GameClock {
    /// Number of ticks run so far.
    tick: u64,

    /// Accumulated game time in seconds.
    elapsed_secs: f64,
}

impl GameClock {
    /// A clock at tick 0, time 0.
    pub const fn new() -> Self {
        Self {
            tick: 0,
            elapsed_secs: 0.0,
        }
    }

    /// Advance by one tick of `dt` seconds. Returns the new tick number.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidDelta`] for a negative or non-finite
    /// delta, and [`ClockError::TickOverflow`] past `u64::MAX` ticks.
    pub fn advance(&mut self, dt: f32) -> Result<u64, ClockError> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(ClockError::InvalidDelta { dt });
        }
        self.tick = self.tick.checked_add(1).ok_or(ClockError::TickOverflow)?;
        self.elapsed_secs += f64::from(dt);
        Ok(self.tick)
    }

    /// Current tick number.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Elapsed game time in seconds.
    pub const fn now(&self) -> f64 {
        self.elapsed_secs
    }

    /// Return to tick 0, time 0.
    pub const fn reset(&mut self) {
        self.tick = 0;
        self.elapsed_secs = 0.0;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn advances_tick_and_time() {
        let mut clock = GameClock::new();
        assert_eq!(clock.advance(0.5).unwrap(), 1);
        assert_eq!(clock.advance(0.25).unwrap(), 2);
        assert!((clock.now() - 0.75).abs() < 1e-9);
    }

    #[test]
    fn zero_delta_still_ticks() {
        let mut clock = GameClock::new();
        clock.advance(0.0).unwrap();
        assert_eq!(clock.tick(), 1);
        assert!(clock.now().abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_bad_delta() {
        let mut clock = GameClock::new();
        assert!(matches!(
            clock.advance(-0.1),
            Err(ClockError::InvalidDelta { .. })
        ));
        assert!(clock.advance(f32::NAN).is_err());
        assert_eq!(clock.tick(), 0, "rejected delta must not tick");
    }

    #[test]
    fn reset_returns_to_origin() {
        let mut clock = GameClock::new();
        clock.advance(3.0).unwrap();
        clock.reset();
        assert_eq!(clock, GameClock::new());
    }
}
