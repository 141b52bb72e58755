//! Session orchestration.
//!
//! A [`GameSession`] owns every subsystem of one game and advances them
//! together from [`GameSession::tick`]. Nothing here is global: the host
//! builds a session from a [`GameConfig`], feeds it one [`FrameInput`] per
//! frame and receives notifications through a [`SessionObserver`].
//!
//! # Tick order
//!
//! 1. Advance the game clock
//! 2. Fire due scheduled entries (countdown beats, customer spawns)
//! 3. Resolve player overlaps reported by the host
//! 4. Poll the weather selector (playing only)
//! 5. Advance the temperature model (playing only)
//! 6. Move to game over if the latch fired
//! 7. Count down delivery and pickup timers, drop the emergency kit
//! 8. Lay out the minimap

use std::collections::BTreeMap;

use courier_minimap::{IconRegistry, IconSpec, MinimapError, MinimapFrame, MinimapInput};
use courier_types::{
    ClothingType, FailReason, ObjectId, PickupKind, Pose, SessionId, Vec2, WeatherType,
};
use courier_world::{
    PlayerSignal, TemperatureModel, WeatherPresentation, WeatherSelector, WeatherTransition,
    WorldError, presentation,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::clock::{ClockError, GameClock};
use crate::config::{ConfigError, GameConfig};
use crate::delivery::{DeliveryDesk, DeliveryEvent, DeliveryOutcome, ScoreBoard};
use crate::flow::{FlowEffect, FlowError, FlowEvent, GameFlow, GamePhase};
use crate::pickups::{Pickup, PickupChanges, PickupDepot};
use crate::scheduler::Scheduler;

/// Errors that can occur while building or ticking a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The configuration failed validation.
    #[error("invalid session configuration: {source}")]
    Config {
        /// The underlying configuration error.
        #[from]
        source: ConfigError,
    },

    /// The clock rejected the frame delta.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },

    /// A phase change was not allowed.
    #[error("flow error: {source}")]
    Flow {
        /// The underlying flow error.
        #[from]
        source: FlowError,
    },

    /// A world subsystem could not be built.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },

    /// The minimap could not be built.
    #[error("minimap error: {source}")]
    Minimap {
        /// The underlying minimap error.
        #[from]
        source: MinimapError,
    },
}

/// Payloads carried by the session scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A countdown beat or the start of play.
    Flow(FlowEvent),
    /// A delivery desk timer.
    Delivery(DeliveryEvent),
}

impl From<FlowEvent> for SessionEvent {
    fn from(event: FlowEvent) -> Self {
        Self::Flow(event)
    }
}

impl From<DeliveryEvent> for SessionEvent {
    fn from(event: DeliveryEvent) -> Self {
        Self::Delivery(event)
    }
}

/// What the host reports for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameInput {
    /// Player pose in world space.
    pub player: Pose,
    /// Camera yaw in degrees, for the minimap camera marker.
    pub camera_yaw_degrees: f32,
    /// Poses of host-owned objects that have minimap icons.
    pub objects: BTreeMap<ObjectId, Pose>,
    /// Objects the player touched this frame.
    pub overlaps: Vec<ObjectId>,
}

impl FrameInput {
    /// A frame with only a player pose.
    pub fn at(player: Pose) -> Self {
        Self {
            player,
            ..Self::default()
        }
    }
}

/// The result of the player touching something.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Interaction {
    /// The waiting customer was served.
    Delivered {
        /// Points awarded.
        points: u32,
    },
    /// A pickup was collected and applied.
    Collected(PickupKind),
    /// Nothing happened (not playing, or not an interactive object).
    Ignored,
}

/// State of the session after one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickSummary {
    /// Tick number just completed.
    pub tick: u64,
    /// Game time in seconds.
    pub now: f64,
    /// Current phase.
    pub phase: GamePhase,
    /// Current weather.
    pub weather: WeatherType,
    /// Body temperature.
    pub body_temperature: f32,
    /// Worn clothing.
    pub clothing: ClothingType,
    /// Score so far.
    pub score: u32,
    /// Current delivery streak.
    pub streak: u32,
    /// Seconds left on the waiting customer's deadline.
    pub customer_remaining_secs: Option<f64>,
    /// Why the run ended, once it has.
    pub game_over: Option<FailReason>,
}

/// Receives session notifications. Every method defaults to a no-op.
pub trait SessionObserver: Send {
    /// The weather changed (or was re-committed).
    fn on_weather_changed(
        &mut self,
        _transition: &WeatherTransition,
        _presentation: &WeatherPresentation,
    ) {
    }

    /// The run ended.
    fn on_game_over(&mut self, _reason: FailReason) {}

    /// A new minimap layout is ready.
    fn on_minimap(&mut self, _frame: &MinimapFrame) {}

    /// Countdown text should be shown.
    fn on_countdown(&mut self, _text: &str) {}

    /// The game phase changed.
    fn on_phase_changed(&mut self, _phase: GamePhase) {}

    /// Something happened at the delivery desk.
    fn on_delivery(&mut self, _outcome: &DeliveryOutcome, _board: &ScoreBoard) {}

    /// A pickup appeared in the world.
    fn on_pickup_spawned(&mut self, _pickup: &Pickup) {}

    /// The player collected a pickup.
    fn on_pickup_collected(&mut self, _pickup: &Pickup) {}

    /// A tick finished.
    fn on_tick(&mut self, _summary: &TickSummary) {}
}

/// Observer that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl SessionObserver for NoOpObserver {}

/// One game, from intro to game over and back.
#[derive(Debug)]
pub struct GameSession {
    id: SessionId,
    config: GameConfig,
    clock: GameClock,
    flow: GameFlow,
    scheduler: Scheduler<SessionEvent>,
    weather: WeatherSelector,
    temperature: TemperatureModel,
    minimap: IconRegistry,
    deliveries: DeliveryDesk,
    pickups: PickupDepot,
    rng: StdRng,
    player: ObjectId,
    player_pose: Pose,
}

impl GameSession {
    /// Validate `config` and build every subsystem. The session starts in
    /// the intro with normal weather.
    pub fn new(config: GameConfig) -> Result<Self, SessionError> {
        config.validate()?;

        let mut minimap = IconRegistry::new(config.minimap.clone())?;
        let player = ObjectId::new();
        minimap.register(player, IconSpec::general(config.minimap.edge_distance), true);

        let mut session = Self {
            id: SessionId::new(),
            clock: GameClock::new(),
            flow: GameFlow::new(config.session.countdown_step_secs),
            scheduler: Scheduler::new(),
            weather: WeatherSelector::new(config.weather.clone())?,
            temperature: TemperatureModel::new(config.temperature.clone())?,
            minimap,
            deliveries: DeliveryDesk::new(config.delivery.clone()),
            pickups: PickupDepot::new(config.pickups.clone()),
            rng: StdRng::seed_from_u64(config.session.seed),
            player,
            player_pose: Pose::default(),
            config,
        };
        let effects = session.flow.enter_intro();
        session.apply_effects(&effects, &mut NoOpObserver);

        info!(
            session_id = %session.id,
            name = %session.config.session.name,
            seed = session.config.session.seed,
            "session created"
        );
        Ok(session)
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Session identifier.
    pub const fn id(&self) -> SessionId {
        self.id
    }

    /// The configuration the session was built from.
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Game clock.
    pub const fn clock(&self) -> &GameClock {
        &self.clock
    }

    /// Current phase.
    pub const fn phase(&self) -> GamePhase {
        self.flow.phase()
    }

    /// Current weather.
    pub const fn weather(&self) -> WeatherType {
        self.weather.current()
    }

    /// Weather selector.
    pub const fn weather_selector(&self) -> &WeatherSelector {
        &self.weather
    }

    /// Temperature model.
    pub const fn temperature(&self) -> &TemperatureModel {
        &self.temperature
    }

    /// Minimap icon registry.
    pub const fn minimap(&self) -> &IconRegistry {
        &self.minimap
    }

    /// Mutable minimap registry, for host-owned icons, zoom and resizing.
    pub const fn minimap_mut(&mut self) -> &mut IconRegistry {
        &mut self.minimap
    }

    /// Delivery desk.
    pub const fn deliveries(&self) -> &DeliveryDesk {
        &self.deliveries
    }

    /// Score so far.
    pub const fn board(&self) -> &ScoreBoard {
        self.deliveries.board()
    }

    /// Active pickups.
    pub const fn pickups(&self) -> &PickupDepot {
        &self.pickups
    }

    /// The player's minimap icon id.
    pub const fn player_id(&self) -> ObjectId {
        self.player
    }

    /// Player pose from the last frame.
    pub const fn player_pose(&self) -> &Pose {
        &self.player_pose
    }

    // -----------------------------------------------------------------------
    // Flow control
    // -----------------------------------------------------------------------

    /// Leave the intro and start the "Ready, 3, 2, 1, Start" countdown.
    /// Temperature and score are reset for the new run.
    pub fn begin_countdown(&mut self, observer: &mut dyn SessionObserver) -> Result<(), SessionError> {
        let effects = self.flow.begin_countdown(&mut self.scheduler, self.clock.now())?;
        self.temperature.restart();
        self.deliveries.reset_board();
        self.apply_effects(&effects, observer);
        Ok(())
    }

    /// Return to the intro from any other phase.
    pub fn restart(&mut self, observer: &mut dyn SessionObserver) -> Result<(), SessionError> {
        let effects = self.flow.return_to_intro(&mut self.scheduler)?;
        self.temperature.restart();
        self.apply_effects(&effects, observer);
        info!(session_id = %self.id, "session restarted");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Host events
    // -----------------------------------------------------------------------

    /// Change the player's clothing.
    pub fn set_clothing(&mut self, clothing: ClothingType) {
        self.temperature.set_clothing(clothing);
    }

    /// Add `amount` to body temperature immediately.
    pub fn apply_temperature_delta(
        &mut self,
        amount: f32,
        observer: &mut dyn SessionObserver,
    ) -> Result<(), SessionError> {
        self.temperature.apply_delta(amount);
        self.check_game_over(observer)?;
        Ok(())
    }

    /// Set body temperature back to neutral.
    pub const fn reset_temperature(&mut self) {
        self.temperature.reset();
    }

    /// The player touched `object`. Only the waiting customer and active
    /// pickups react, and only while playing.
    pub fn on_overlap(
        &mut self,
        object: ObjectId,
        observer: &mut dyn SessionObserver,
    ) -> Result<Interaction, SessionError> {
        if self.flow.phase() != GamePhase::Playing {
            return Ok(Interaction::Ignored);
        }

        let now = self.clock.now();
        if let Some(outcome) = self.deliveries.complete(object, &mut self.scheduler, now) {
            self.minimap.unregister(object);
            observer.on_delivery(&outcome, self.deliveries.board());
            let points = match outcome {
                DeliveryOutcome::Completed { points, .. } => points,
                DeliveryOutcome::Spawned(_) | DeliveryOutcome::Failed { .. } => 0,
            };
            return Ok(Interaction::Delivered { points });
        }

        let Some((pickup, changes)) = self.pickups.collect(object, &mut self.rng) else {
            debug!(%object, "overlap with non-interactive object");
            return Ok(Interaction::Ignored);
        };
        self.apply_pickup_changes(&changes, observer);
        observer.on_pickup_collected(&pickup);
        match pickup.kind {
            PickupKind::Drink(drink) => {
                self.temperature.apply_drink(drink);
            }
            PickupKind::Clothing(clothing) => self.temperature.set_clothing(clothing),
            PickupKind::EmergencyKit => self.temperature.use_emergency_kit(),
        }
        self.check_game_over(observer)?;
        Ok(Interaction::Collected(pickup.kind))
    }

    // -----------------------------------------------------------------------
    // Tick
    // -----------------------------------------------------------------------

    /// Advance the session by `dt` seconds of frame time.
    pub fn tick(
        &mut self,
        dt: f32,
        input: &FrameInput,
        observer: &mut dyn SessionObserver,
    ) -> Result<TickSummary, SessionError> {
        let tick = self.clock.advance(dt)?;
        let now = self.clock.now();
        self.player_pose = input.player;

        for event in self.scheduler.drain_due(now) {
            self.handle_event(event, observer)?;
        }

        for &object in &input.overlaps {
            self.on_overlap(object, observer)?;
        }

        if self.flow.phase() == GamePhase::Playing {
            let signal = PlayerSignal {
                clothing: self.temperature.clothing(),
                adaptation_score: self.temperature.adaptation_score(),
            };
            if let Some(transition) = self.weather.poll(now, signal) {
                notify_weather(&transition, observer);
            }

            self.temperature.advance(dt, self.weather.current());
            self.check_game_over(observer)?;
        }

        if self.flow.phase() == GamePhase::Playing {
            self.update_timers(dt, observer);
        }

        let frame = self.layout_minimap(input);
        observer.on_minimap(&frame);

        let board = self.deliveries.board();
        let phase = self.flow.phase();
        Ok(TickSummary {
            tick,
            now,
            phase,
            weather: self.weather.current(),
            body_temperature: self.temperature.body_temperature(),
            clothing: self.temperature.clothing(),
            score: board.score,
            streak: board.streak,
            customer_remaining_secs: self.deliveries.current().map(|c| c.timer.remaining()),
            game_over: match phase {
                GamePhase::GameOver(reason) => Some(reason),
                GamePhase::Intro | GamePhase::Countdown | GamePhase::Playing => None,
            },
        })
    }

    fn handle_event(
        &mut self,
        event: SessionEvent,
        observer: &mut dyn SessionObserver,
    ) -> Result<(), SessionError> {
        match event {
            SessionEvent::Flow(event) => {
                let effects = self.flow.handle_event(event, &mut self.scheduler)?;
                self.apply_effects(&effects, observer);
                // Anything latched during the countdown ends the run at once.
                self.check_game_over(observer)?;
            }
            SessionEvent::Delivery(DeliveryEvent::SpawnCustomer) => {
                let player = self.player_pose.position.ground();
                if let Some(outcome) = self.deliveries.spawn_customer(player, &mut self.rng) {
                    if let DeliveryOutcome::Spawned(customer) = outcome {
                        self.minimap.register(
                            customer.id,
                            IconSpec::customer(self.config.minimap.edge_distance),
                            false,
                        );
                    }
                    observer.on_delivery(&outcome, self.deliveries.board());
                }
            }
        }
        Ok(())
    }

    fn update_timers(&mut self, dt: f32, observer: &mut dyn SessionObserver) {
        let now = self.clock.now();
        let dt_secs = f64::from(dt);

        if let Some(outcome) = self.deliveries.update(dt_secs, &mut self.scheduler, now) {
            if let DeliveryOutcome::Failed { customer } = outcome {
                self.minimap.unregister(customer);
            }
            observer.on_delivery(&outcome, self.deliveries.board());
        }

        let changes = self.pickups.update(dt_secs, &mut self.rng);
        self.apply_pickup_changes(&changes, observer);

        let state = self.temperature.state();
        if let Some(kit) = self.pickups.check_emergency_kit(
            state.body_temperature,
            state.min_temperature,
            state.max_temperature,
            &self.player_pose,
        ) {
            self.apply_pickup_changes(
                &PickupChanges {
                    removed: Vec::new(),
                    spawned: vec![kit],
                },
                observer,
            );
        }
    }

    /// Move to game over if the temperature latch fired during play.
    fn check_game_over(&mut self, observer: &mut dyn SessionObserver) -> Result<(), SessionError> {
        if self.flow.phase() != GamePhase::Playing {
            return Ok(());
        }
        let Some(reason) = self.temperature.game_over() else {
            return Ok(());
        };
        let effects = self.flow.game_over(reason, &mut self.scheduler)?;
        self.apply_effects(&effects, observer);
        warn!(
            session_id = %self.id,
            %reason,
            score = self.deliveries.board().score,
            "game over: {}",
            reason.message()
        );
        Ok(())
    }

    fn apply_effects(&mut self, effects: &[FlowEffect], observer: &mut dyn SessionObserver) {
        let now = self.clock.now();
        for effect in effects {
            match *effect {
                FlowEffect::PhaseChanged(phase) => {
                    observer.on_phase_changed(phase);
                    match phase {
                        GamePhase::Playing => {
                            let changes = self.pickups.stock(&mut self.rng);
                            self.apply_pickup_changes(&changes, observer);
                        }
                        GamePhase::Intro => {
                            let changes = self.pickups.clear();
                            self.apply_pickup_changes(&changes, observer);
                        }
                        GamePhase::GameOver(reason) => observer.on_game_over(reason),
                        GamePhase::Countdown => {}
                    }
                }
                FlowEffect::ForceNormalWeather => {
                    let transition = self.weather.set_weather(WeatherType::Normal, now);
                    notify_weather(&transition, observer);
                }
                FlowEffect::StartWeatherCycle => self.weather.start_cycle(now),
                FlowEffect::StopWeatherCycle => self.weather.stop_cycle(),
                FlowEffect::EnableDeliveries => self.deliveries.enable(&mut self.scheduler, now),
                FlowEffect::DisableDeliveries => {
                    if let Some(customer) = self.deliveries.disable(&mut self.scheduler) {
                        self.minimap.unregister(customer.id);
                    }
                }
                FlowEffect::ShowCountdown(text) => observer.on_countdown(text),
            }
        }
    }

    fn apply_pickup_changes(&mut self, changes: &PickupChanges, observer: &mut dyn SessionObserver) {
        for id in &changes.removed {
            self.minimap.unregister(*id);
        }
        for pickup in &changes.spawned {
            self.minimap.register(
                pickup.id,
                IconSpec::general(self.config.minimap.edge_distance),
                false,
            );
            observer.on_pickup_spawned(pickup);
        }
    }

    fn layout_minimap(&mut self, input: &FrameInput) -> MinimapFrame {
        let mut poses = input.objects.clone();
        poses.insert(self.player, input.player);
        if let Some(customer) = self.deliveries.current() {
            poses.insert(customer.id, ground_pose(customer.position));
        }
        for pickup in self.pickups.active() {
            poses.insert(pickup.id, ground_pose(pickup.position));
        }
        let minimap_input = MinimapInput {
            player: input.player,
            camera_yaw_degrees: input.camera_yaw_degrees,
        };
        self.minimap.update_all(&minimap_input, &poses)
    }
}

fn ground_pose(position: Vec2) -> Pose {
    Pose::on_ground(position.x, position.y, 0.0)
}

fn notify_weather(transition: &WeatherTransition, observer: &mut dyn SessionObserver) {
    info!(
        from = %transition.from,
        to = %transition.to,
        rule = %transition.rule,
        next_change_at = transition.next_change_at,
        "weather changed"
    );
    observer.on_weather_changed(transition, &presentation(transition.to));
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use courier_types::DrinkType;

    use super::*;

    #[derive(Default)]
    struct Recorder {
        phases: Vec<GamePhase>,
        countdown: Vec<String>,
        weather: Vec<WeatherType>,
        game_over: Vec<FailReason>,
        deliveries: Vec<DeliveryOutcome>,
        minimap_frames: usize,
    }

    impl SessionObserver for Recorder {
        fn on_weather_changed(&mut self, t: &WeatherTransition, _p: &WeatherPresentation) {
            self.weather.push(t.to);
        }
        fn on_game_over(&mut self, reason: FailReason) {
            self.game_over.push(reason);
        }
        fn on_minimap(&mut self, _frame: &MinimapFrame) {
            self.minimap_frames += 1;
        }
        fn on_countdown(&mut self, text: &str) {
            self.countdown.push(text.to_owned());
        }
        fn on_phase_changed(&mut self, phase: GamePhase) {
            self.phases.push(phase);
        }
        fn on_delivery(&mut self, outcome: &DeliveryOutcome, _board: &ScoreBoard) {
            self.deliveries.push(*outcome);
        }
    }

    fn session() -> GameSession {
        GameSession::new(GameConfig::default()).unwrap()
    }

    fn run_secs(session: &mut GameSession, secs: u32, observer: &mut dyn SessionObserver) {
        let input = FrameInput::default();
        for _ in 0..secs * 10 {
            session.tick(0.1, &input, observer).unwrap();
        }
    }

    #[test]
    fn starts_in_intro_with_normal_weather() {
        let session = session();
        assert_eq!(session.phase(), GamePhase::Intro);
        assert_eq!(session.weather(), WeatherType::Normal);
        assert!(!session.weather_selector().is_cycling());
        assert_eq!(session.minimap().follow_target(), Some(session.player_id()));
    }

    #[test]
    fn countdown_reaches_playing() {
        let mut session = session();
        let mut recorder = Recorder::default();
        session.begin_countdown(&mut recorder).unwrap();
        run_secs(&mut session, 6, &mut recorder);

        assert_eq!(recorder.countdown, vec!["Ready", "3", "2", "1", "Start"]);
        assert_eq!(session.phase(), GamePhase::Playing);
        assert!(session.weather_selector().is_cycling());
        assert!(session.deliveries().is_enabled());
        assert_eq!(session.pickups().active().count(), 4);
        assert_eq!(recorder.minimap_frames, 60);
    }

    #[test]
    fn customer_spawns_and_can_be_served() {
        let mut session = session();
        let mut recorder = Recorder::default();
        session.begin_countdown(&mut recorder).unwrap();
        // 5 s countdown plus the 2 s spawn delay
        run_secs(&mut session, 8, &mut recorder);

        let customer = *session.deliveries().current().unwrap();
        assert!(session.minimap().get(customer.id).is_some());

        let interaction = session.on_overlap(customer.id, &mut recorder).unwrap();
        assert_eq!(interaction, Interaction::Delivered { points: 1 });
        assert_eq!(session.board().score, 1);
        assert!(session.minimap().get(customer.id).is_none());
    }

    #[test]
    fn overlaps_are_ignored_outside_play() {
        let mut session = session();
        let stranger = ObjectId::new();
        let interaction = session.on_overlap(stranger, &mut NoOpObserver).unwrap();
        assert_eq!(interaction, Interaction::Ignored);
    }

    #[test]
    fn extreme_delta_ends_the_run_during_play() {
        let mut session = session();
        let mut recorder = Recorder::default();
        session.begin_countdown(&mut recorder).unwrap();
        run_secs(&mut session, 6, &mut recorder);

        session.apply_temperature_delta(500.0, &mut recorder).unwrap();
        assert_eq!(
            session.phase(),
            GamePhase::GameOver(FailReason::Hyperthermia)
        );
        assert_eq!(recorder.game_over, vec![FailReason::Hyperthermia]);
        assert!(!session.weather_selector().is_cycling());
        assert!(!session.deliveries().is_enabled());
    }

    #[test]
    fn collecting_a_drink_changes_temperature() {
        let mut session = session();
        let mut recorder = Recorder::default();
        session.begin_countdown(&mut recorder).unwrap();
        run_secs(&mut session, 6, &mut recorder);

        let lemonade = session
            .pickups()
            .active()
            .find(|p| p.kind == PickupKind::Drink(DrinkType::Lemonade))
            .map(|p| p.id)
            .unwrap();
        let before = session.temperature().body_temperature();
        let interaction = session.on_overlap(lemonade, &mut recorder).unwrap();
        assert_eq!(
            interaction,
            Interaction::Collected(PickupKind::Drink(DrinkType::Lemonade))
        );
        assert!(session.temperature().body_temperature() < before);
        assert!(session.minimap().get(lemonade).is_none());
        assert_eq!(session.pickups().active().count(), 4);
    }

    #[test]
    fn restart_returns_to_intro_and_clears_pickups() {
        let mut session = session();
        let mut recorder = Recorder::default();
        session.begin_countdown(&mut recorder).unwrap();
        run_secs(&mut session, 6, &mut recorder);
        session.apply_temperature_delta(-500.0, &mut recorder).unwrap();

        session.restart(&mut recorder).unwrap();
        assert_eq!(session.phase(), GamePhase::Intro);
        assert_eq!(session.weather(), WeatherType::Normal);
        assert_eq!(session.pickups().active().count(), 0);
        assert!(session.temperature().game_over().is_none());
        // only the player icon is left
        assert_eq!(session.minimap().len(), 1);
    }

    #[test]
    fn countdown_twice_is_rejected() {
        let mut session = session();
        session.begin_countdown(&mut NoOpObserver).unwrap();
        assert!(matches!(
            session.begin_countdown(&mut NoOpObserver),
            Err(SessionError::Flow { .. })
        ));
    }

    #[test]
    fn bad_delta_is_an_error() {
        let mut session = session();
        let result = session.tick(-1.0, &FrameInput::default(), &mut NoOpObserver);
        assert!(matches!(result, Err(SessionError::Clock { .. })));
    }
}
