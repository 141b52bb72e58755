//! Minimap settings, loaded from the `minimap` section of
//! `courier-config.yaml`.

use courier_types::{IconCategory, Vec2};
use serde::Deserialize;

use crate::error::MinimapError;

/// Geometry and icon sizing for the minimap.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MinimapConfig {
    /// Playable world extent along (x, z) (default: 500 x 500).
    pub world_size: Vec2,

    /// Drawn minimap extent (default: 250 x 250).
    pub minimap_size: Vec2,

    /// Base scale for general icons (default: 1).
    pub general_icon_scale: f32,

    /// Base scale for customer icons (default: 1.5).
    pub customer_icon_scale: f32,

    /// Initial zoom factor of the map content (default: 1).
    pub zoom: f32,

    /// Map-space radius at which always-show icons are pinned to the edge
    /// (default: 90).
    pub edge_distance: f32,
}

impl Default for MinimapConfig {
    fn default() -> Self {
        Self {
            world_size: Vec2::new(500.0, 500.0),
            minimap_size: Vec2::new(250.0, 250.0),
            general_icon_scale: 1.0,
            customer_icon_scale: 1.5,
            zoom: 1.0,
            edge_distance: 90.0,
        }
    }
}

impl MinimapConfig {
    /// Base icon scale for `category`, before zoom compensation.
    pub const fn icon_scale(&self, category: IconCategory) -> f32 {
        match category {
            IconCategory::General => self.general_icon_scale,
            IconCategory::Customer => self.customer_icon_scale,
        }
    }

    /// Reject non-finite scales and a non-positive zoom. World and map
    /// sizes are checked when the projection is built.
    pub fn validate(&self) -> Result<(), MinimapError> {
        if !self.general_icon_scale.is_finite() || !self.customer_icon_scale.is_finite() {
            return Err(MinimapError::NonFinite {
                field: "icon_scale",
            });
        }
        if !self.edge_distance.is_finite() {
            return Err(MinimapError::NonFinite {
                field: "edge_distance",
            });
        }
        if self.edge_distance < 0.0 {
            return Err(MinimapError::NegativeEdgeDistance {
                edge_distance: self.edge_distance,
            });
        }
        check_zoom(self.zoom)
    }
}

/// Zoom must be finite and strictly positive.
pub(crate) fn check_zoom(zoom: f32) -> Result<(), MinimapError> {
    if !zoom.is_finite() {
        return Err(MinimapError::NonFinite { field: "zoom" });
    }
    if zoom <= 0.0 {
        return Err(MinimapError::InvalidZoom { zoom });
    }
    Ok(())
}
