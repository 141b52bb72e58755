//! Shared type definitions for the Courier delivery game core.
//!
//! Every other crate in the workspace depends on this one for the small
//! vocabulary the simulation speaks: weather and clothing enums, the reason
//! a run ended, icon categories, object identifiers, and the planar geometry
//! used by the minimap.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for world objects and sessions
//! - [`enums`] -- Enumeration types (weather, clothing, drinks, failure)
//! - [`geometry`] -- `Vec2`, `Vec3` and `Pose` value types

pub mod enums;
pub mod geometry;
pub mod ids;

// Re-export all public types at crate root for convenience.
pub use enums::{ClothingType, DrinkType, FailReason, IconCategory, PickupKind, WeatherType};
pub use geometry::{Pose, Vec2, Vec3};
pub use ids::{ObjectId, SessionId};
