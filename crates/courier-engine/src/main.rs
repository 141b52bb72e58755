//! Headless engine binary for the Courier game core.
//!
//! Runs a full session without a renderer: a scripted driver plays the
//! game while every HUD, audio and minimap notification is logged.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `courier-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Build the session and read the stored high score
//! 4. Create run controls and install the Ctrl-C handler
//! 5. Start the countdown and run the session loop
//! 6. Submit the final score and log the result

mod driver;
mod error;
mod observer;

use std::path::Path;
use std::sync::Arc;

use courier_core::config::{GameConfig, LoggingConfig};
use courier_core::control::SessionControl;
use courier_core::highscore::HighScoreStore;
use courier_core::runner;
use courier_core::session::GameSession;
use courier_types::Pose;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::driver::ScriptedDriver;
use crate::error::EngineError;
use crate::observer::LoggingObserver;

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if any initialization step or the session itself fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let (config, from_file) = load_config()?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging);
    info!("courier-engine starting");
    if !from_file {
        info!("Config file not found, using defaults");
    }
    info!(
        session_name = config.session.name,
        seed = config.session.seed,
        weather_seed = config.weather.seed,
        frame_dt_secs = config.session.frame_dt_secs,
        tick_interval_ms = config.session.tick_interval_ms,
        max_ticks = config.session.max_ticks,
        "Configuration loaded"
    );

    // 3. Build the session.
    let mut session = GameSession::new(config.clone()).map_err(EngineError::from)?;
    let store = HighScoreStore::new(config.high_score.path.clone());
    let best = store.load().map_err(EngineError::from)?;
    info!(
        session_id = %session.id(),
        high_score = best,
        path = %store.path().display(),
        "Session ready"
    );

    // 4. Run controls.
    let control = Arc::new(SessionControl::new(
        config.session.tick_interval_ms,
        config.session.max_ticks,
    ));
    {
        let control = Arc::clone(&control);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Ctrl-C received, stopping after the current tick");
                control.request_stop();
            }
        });
    }

    // 5. Start and run.
    let mut observer = LoggingObserver::new();
    let mut driver = ScriptedDriver::new(config.driver.clone(), Pose::default());
    if config.driver.auto_start {
        session
            .begin_countdown(&mut observer)
            .map_err(EngineError::from)?;
    } else {
        warn!("auto_start is off; the session idles in the intro");
    }

    let result = runner::run_session(
        &mut session,
        &mut driver,
        &control,
        &mut observer,
        config.session.frame_dt_secs,
    )
    .await
    .map_err(EngineError::from)?;

    // 6. Results.
    runner::log_session_end(&result);
    let score = result.score();
    if store.submit(score).map_err(EngineError::from)? {
        info!(score, previous = best, "New high score!");
    }

    let stats = observer.stats();
    let board = session.board();
    let final_position = driver.pose().position;
    info!(
        end_reason = %result.end_reason,
        score,
        delivered = board.completed,
        missed = board.failed,
        customers = stats.customers,
        weather_changes = stats.weather_changes,
        pickups_collected = stats.pickups_collected,
        final_x = final_position.x,
        final_z = final_position.z,
        "courier-engine shutdown complete"
    );

    Ok(())
}

/// Install the global subscriber. `RUST_LOG` wins over the configured
/// level.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    if logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}

/// Load the game configuration from `courier-config.yaml`.
///
/// Looks for the config file relative to the current working directory.
/// The flag reports whether the file was found.
fn load_config() -> Result<(GameConfig, bool), EngineError> {
    let config_path = Path::new("courier-config.yaml");
    if config_path.exists() {
        let config = GameConfig::from_file(config_path)?;
        Ok((config, true))
    } else {
        Ok((GameConfig::parse("")?, false))
    }
}
