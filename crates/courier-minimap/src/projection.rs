//! World-to-minimap coordinate projection.
//!
//! The projection is a pure axis-aligned scale: world (x, z) maps to map
//! (x, y) by `minimap_size / world_size` per axis, with a zero translation.
//! Degenerate sizes are rejected when the transform is built.

use courier_types::{Vec2, Vec3};

use crate::error::MinimapError;

/// Immutable world-to-map transform. Rebuild it when the map is resized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateTransform {
    scale: Vec2,
    translation: Vec2,
}

impl CoordinateTransform {
    /// Build the transform for a world of `world_size` (x, z) drawn into a
    /// map of `minimap_size`.
    pub fn new(world_size: Vec2, minimap_size: Vec2) -> Result<Self, MinimapError> {
        if !world_size.is_finite() {
            return Err(MinimapError::NonFinite {
                field: "world_size",
            });
        }
        if !minimap_size.is_finite() {
            return Err(MinimapError::NonFinite {
                field: "minimap_size",
            });
        }
        if world_size.x.abs() <= f32::EPSILON {
            return Err(MinimapError::ZeroWorldAxis { axis: "x" });
        }
        if world_size.y.abs() <= f32::EPSILON {
            return Err(MinimapError::ZeroWorldAxis { axis: "z" });
        }
        Ok(Self {
            scale: Vec2::new(minimap_size.x / world_size.x, minimap_size.y / world_size.y),
            translation: Vec2::ZERO,
        })
    }

    /// Map units per world unit, per axis.
    pub const fn scale(&self) -> Vec2 {
        self.scale
    }

    /// Offset applied after scaling.
    pub const fn translation(&self) -> Vec2 {
        self.translation
    }

    /// Project a ground-plane point (world x, z).
    pub fn project(&self, world: Vec2) -> Vec2 {
        world.component_mul(self.scale) + self.translation
    }

    /// Project a world position, ignoring its height.
    pub fn project_position(&self, position: Vec3) -> Vec2 {
        self.project(position.ground())
    }
}

/// One-shot projection of a world position onto a minimap.
pub fn project_to_minimap(
    position: Vec3,
    world_size: Vec2,
    minimap_size: Vec2,
) -> Result<Vec2, MinimapError> {
    Ok(CoordinateTransform::new(world_size, minimap_size)?.project_position(position))
}
