//! Error types for the engine binary.

/// Top-level error for the engine binary.
///
/// Each variant wraps a subsystem error so `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: courier_core::config::ConfigError,
    },

    /// Session construction or a flow change failed.
    #[error("session error: {source}")]
    Session {
        /// The underlying session error.
        #[from]
        source: courier_core::session::SessionError,
    },

    /// The session loop failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: courier_core::runner::RunnerError,
    },

    /// Reading or writing the high score failed.
    #[error("high score error: {source}")]
    HighScore {
        /// The underlying high-score error.
        #[from]
        source: courier_core::highscore::HighScoreError,
    },
}
