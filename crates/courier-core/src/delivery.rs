//! Customer deliveries and scoring.
//!
//! While deliveries are enabled there is at most one waiting customer. A
//! customer appears at a random spawn point `spawn_delay_secs` after the
//! previous one was resolved, and must be reached before a deadline
//! proportional to its distance from the player. Reaching it extends the
//! streak and scores `streak` points; missing it resets the streak.

use courier_types::{ObjectId, Vec2};
use rand::Rng;
use serde::Deserialize;
use tracing::{info, warn};

use crate::scheduler::{ScheduleToken, Scheduler};

/// Delivery tunables, from the `delivery` section of the config.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DeliveryConfig {
    /// Ground-plane (x, z) points where customers can appear.
    pub spawn_points: Vec<Vec2>,

    /// Seconds between resolving one customer and the next appearing
    /// (default: 2).
    pub spawn_delay_secs: f64,

    /// Seconds of deadline granted per world unit of distance
    /// (default: 0.09).
    pub time_per_unit_distance: f64,

    /// Shortest deadline ever granted (default: 15).
    pub min_time_limit_secs: f64,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            spawn_points: vec![
                Vec2::new(-180.0, 150.0),
                Vec2::new(200.0, 120.0),
                Vec2::new(160.0, -190.0),
                Vec2::new(-140.0, -160.0),
                Vec2::new(20.0, 210.0),
            ],
            spawn_delay_secs: 2.0,
            time_per_unit_distance: 0.09,
            min_time_limit_secs: 15.0,
        }
    }
}

/// Countdown toward a deadline.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DeliveryTimer {
    remaining_secs: f64,
}

impl DeliveryTimer {
    /// A timer with `duration_secs` left.
    pub const fn started(duration_secs: f64) -> Self {
        Self {
            remaining_secs: duration_secs,
        }
    }

    /// Restart with `duration_secs` left.
    pub const fn start(&mut self, duration_secs: f64) {
        self.remaining_secs = duration_secs;
    }

    /// Count down by `dt_secs`. Stops counting once expired.
    pub fn update(&mut self, dt_secs: f64) {
        if self.remaining_secs > 0.0 {
            self.remaining_secs -= dt_secs;
        }
    }

    /// Seconds left; zero or negative once expired.
    pub const fn remaining(&self) -> f64 {
        self.remaining_secs
    }

    /// Whether the deadline has passed.
    pub fn is_expired(&self) -> bool {
        self.remaining_secs <= 0.0
    }
}

/// Score and delivery streak.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreBoard {
    /// Total points this run.
    pub score: u32,
    /// Consecutive successful deliveries.
    pub streak: u32,
    /// Deliveries completed this run.
    pub completed: u32,
    /// Deliveries missed this run.
    pub failed: u32,
}

impl ScoreBoard {
    /// Record a completed delivery. Returns the points awarded.
    pub const fn record_completion(&mut self) -> u32 {
        self.streak = self.streak.saturating_add(1);
        self.score = self.score.saturating_add(self.streak);
        self.completed = self.completed.saturating_add(1);
        self.streak
    }

    /// Record a missed delivery.
    pub const fn record_failure(&mut self) {
        self.streak = 0;
        self.failed = self.failed.saturating_add(1);
    }
}

/// A customer waiting for pickup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Customer {
    /// World object id (also the minimap icon key).
    pub id: ObjectId,
    /// Ground-plane position.
    pub position: Vec2,
    /// Deadline countdown.
    pub timer: DeliveryTimer,
    /// Deadline granted at spawn.
    pub time_limit_secs: f64,
}

/// Scheduled delivery payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryEvent {
    /// Time to place the next customer.
    SpawnCustomer,
}

/// Something that happened at the delivery desk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeliveryOutcome {
    /// A new customer appeared.
    Spawned(Customer),
    /// The player reached the customer in time.
    Completed {
        /// The customer.
        customer: ObjectId,
        /// Points awarded.
        points: u32,
    },
    /// The deadline passed.
    Failed {
        /// The customer.
        customer: ObjectId,
    },
}

/// Runs the customer cycle and keeps score.
#[derive(Debug, Clone)]
pub struct DeliveryDesk {
    config: DeliveryConfig,
    enabled: bool,
    current: Option<Customer>,
    board: ScoreBoard,
    spawn_token: Option<ScheduleToken>,
}

impl DeliveryDesk {
    /// A disabled desk with an empty score board.
    pub const fn new(config: DeliveryConfig) -> Self {
        Self {
            config,
            enabled: false,
            current: None,
            board: ScoreBoard {
                score: 0,
                streak: 0,
                completed: 0,
                failed: 0,
            },
            spawn_token: None,
        }
    }

    /// Whether customers are being spawned.
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The waiting customer, if any.
    pub const fn current(&self) -> Option<&Customer> {
        self.current.as_ref()
    }

    /// Score so far.
    pub const fn board(&self) -> &ScoreBoard {
        &self.board
    }

    /// Start the customer cycle; the first customer appears after the
    /// spawn delay.
    pub fn enable<T: From<DeliveryEvent>>(&mut self, scheduler: &mut Scheduler<T>, now: f64) {
        if self.config.spawn_points.is_empty() {
            warn!("no customer spawn points configured; deliveries stay idle");
        }
        self.enabled = true;
        self.schedule_spawn(scheduler, now);
    }

    /// Stop the cycle. Returns the customer that was waiting so its icon
    /// can be removed.
    pub fn disable<T>(&mut self, scheduler: &mut Scheduler<T>) -> Option<Customer> {
        self.enabled = false;
        if let Some(token) = self.spawn_token.take() {
            scheduler.cancel(token);
        }
        self.current.take()
    }

    /// Clear the score board for a new run.
    pub const fn reset_board(&mut self) {
        self.board = ScoreBoard {
            score: 0,
            streak: 0,
            completed: 0,
            failed: 0,
        };
    }

    /// Place a customer at a random spawn point. Called when a
    /// [`DeliveryEvent::SpawnCustomer`] fires.
    pub fn spawn_customer<R: Rng>(&mut self, player: Vec2, rng: &mut R) -> Option<DeliveryOutcome> {
        self.spawn_token = None;
        if !self.enabled || self.current.is_some() {
            return None;
        }
        let count = self.config.spawn_points.len();
        if count == 0 {
            return None;
        }
        let position = *self.config.spawn_points.get(rng.random_range(0..count))?;
        let distance = f64::from(player.distance(position));
        let time_limit_secs =
            (distance * self.config.time_per_unit_distance).max(self.config.min_time_limit_secs);
        let customer = Customer {
            id: ObjectId::new(),
            position,
            timer: DeliveryTimer::started(time_limit_secs),
            time_limit_secs,
        };
        info!(
            customer = %customer.id,
            x = position.x,
            z = position.y,
            time_limit_secs,
            "customer spawned"
        );
        self.current = Some(customer);
        Some(DeliveryOutcome::Spawned(customer))
    }

    /// Count down the waiting customer's deadline. On expiry the customer
    /// is dropped, the streak resets and the next spawn is scheduled.
    pub fn update<T: From<DeliveryEvent>>(
        &mut self,
        dt_secs: f64,
        scheduler: &mut Scheduler<T>,
        now: f64,
    ) -> Option<DeliveryOutcome> {
        let customer = self.current.as_mut()?;
        customer.timer.update(dt_secs);
        if !customer.timer.is_expired() {
            return None;
        }
        let id = customer.id;
        self.current = None;
        self.board.record_failure();
        info!(customer = %id, streak = self.board.streak, "delivery failed");
        self.schedule_spawn(scheduler, now);
        Some(DeliveryOutcome::Failed { customer: id })
    }

    /// The player reached `customer`. Ignored unless it is the one waiting.
    pub fn complete<T: From<DeliveryEvent>>(
        &mut self,
        customer: ObjectId,
        scheduler: &mut Scheduler<T>,
        now: f64,
    ) -> Option<DeliveryOutcome> {
        if self.current.map(|c| c.id) != Some(customer) {
            return None;
        }
        self.current = None;
        let points = self.board.record_completion();
        info!(
            %customer,
            points,
            score = self.board.score,
            streak = self.board.streak,
            "delivery completed"
        );
        self.schedule_spawn(scheduler, now);
        Some(DeliveryOutcome::Completed { customer, points })
    }

    fn schedule_spawn<T: From<DeliveryEvent>>(&mut self, scheduler: &mut Scheduler<T>, now: f64) {
        if !self.enabled {
            return;
        }
        if let Some(token) = self.spawn_token.take() {
            scheduler.cancel(token);
        }
        self.spawn_token = Some(scheduler.schedule_after(
            now,
            self.config.spawn_delay_secs,
            DeliveryEvent::SpawnCustomer.into(),
        ));
    }
}
