//! Error types for the `courier-minimap` crate.

/// Errors raised when the minimap is configured with degenerate geometry.
///
/// These are reported once, when the projector or registry is built or
/// resized, never while laying out icons.
#[derive(Debug, thiserror::Error)]
pub enum MinimapError {
    /// A world-size axis is zero, so the scale would divide by zero.
    #[error("world size {axis} axis must be non-zero")]
    ZeroWorldAxis {
        /// Which axis (`"x"` or `"z"`).
        axis: &'static str,
    },

    /// A size, scale or zoom value is NaN or infinite.
    #[error("{field} must be finite")]
    NonFinite {
        /// The offending setting.
        field: &'static str,
    },

    /// The edge pin distance cannot be negative.
    #[error("edge_distance must not be negative, got {edge_distance}")]
    NegativeEdgeDistance {
        /// The rejected distance.
        edge_distance: f32,
    },

    /// Zoom must be strictly positive.
    #[error("zoom must be positive, got {zoom}")]
    InvalidZoom {
        /// The rejected zoom factor.
        zoom: f32,
    },
}
