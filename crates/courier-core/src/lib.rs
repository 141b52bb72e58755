//! Game clock, flow, deliveries and session orchestration for the Courier
//! game core.
//!
//! This crate wires the weather, temperature and minimap systems into a
//! playable session that advances one frame at a time.
//!
//! # Modules
//!
//! - [`clock`] -- Game clock with tick counter and elapsed game time.
//! - [`config`] -- Configuration loading from `courier-config.yaml` into
//!   strongly-typed structs.
//! - [`control`] -- Pause, stop and pacing state shared with the runner.
//! - [`delivery`] -- Customer spawning, deadlines and streak scoring.
//! - [`flow`] -- Intro, countdown, playing and game-over phases.
//! - [`highscore`] -- JSON high-score persistence.
//! - [`pickups`] -- Drinks, clothing and the emergency kit.
//! - [`runner`] -- Async session loop with run controls.
//! - [`scheduler`] -- Delayed payloads with cancellation tokens.
//! - [`session`] -- [`GameSession`], the per-frame orchestrator.
//!
//! [`GameSession`]: session::GameSession

pub mod clock;
pub mod config;
pub mod control;
pub mod delivery;
pub mod flow;
pub mod highscore;
pub mod pickups;
pub mod runner;
pub mod scheduler;
pub mod session;
