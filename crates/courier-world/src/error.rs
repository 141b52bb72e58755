//! Error types for the `courier-world` crate.
//!
//! Both components validate their configuration at construction; once
//! built, their per-tick operations are infallible.

/// Errors that can occur while building world components.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// A configuration value is out of its meaningful range.
    #[error("invalid world configuration: {reason}")]
    InvalidConfig {
        /// Human-readable description of the problem.
        reason: String,
    },
}
