//! Minimap projection and icon layout for the Courier game core.
//!
//! # Modules
//!
//! - [`projection`] -- Pure world (x, z) to minimap transform
//! - [`registry`] -- Object-to-icon registry with edge pinning and follow
//! - [`config`] -- Minimap geometry and icon sizing
//! - [`error`] -- Error types for minimap setup

pub mod config;
pub mod error;
pub mod projection;
pub mod registry;

pub use config::MinimapConfig;
pub use error::MinimapError;
pub use projection::{CoordinateTransform, project_to_minimap};
pub use registry::{
    CameraMarker, IconHandle, IconLayout, IconRegistry, IconSpec, MinimapFrame, MinimapIcon,
    MinimapInput, layout_icon,
};
