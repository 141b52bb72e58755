//! Minimap icon registry.
//!
//! Maps each tracked [`ObjectId`] to one icon and lays every icon out once
//! per frame from the world poses the host supplies. The registry never
//! holds the world objects themselves; an object that has disappeared
//! simply stops receiving layout updates until it is unregistered.
//!
//! Per-frame layout for an icon:
//!
//! 1. Project the object's position.
//! 2. If the icon is always-show and farther than its edge distance from
//!    the player on the map, pin it to the edge circle on the ray toward
//!    the object and rotate it so its up axis maps onto the reversed
//!    direction.
//! 3. Otherwise place it at the projected position, rotated by the
//!    negated world yaw.
//! 4. Scale it by its category scale divided by the current zoom, so icon
//!    size on screen is zoom-invariant.
//!
//! After layout the map content is offset so the follow icon sits at the
//! centre.

use std::collections::BTreeMap;

use courier_types::{IconCategory, ObjectId, Pose, Vec2};
use tracing::debug;

use crate::config::{MinimapConfig, check_zoom};
use crate::error::MinimapError;
use crate::projection::CoordinateTransform;

/// Static description of how an object appears on the minimap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IconSpec {
    /// Which icon scale applies.
    pub category: IconCategory,
    /// Keep the icon visible at the map edge when it is far away.
    pub always_show: bool,
    /// Map-space distance from the player beyond which an always-show icon
    /// is pinned to the edge.
    pub edge_distance: f32,
}

impl IconSpec {
    /// A general icon that is only shown at its true position.
    pub const fn general(edge_distance: f32) -> Self {
        Self {
            category: IconCategory::General,
            always_show: false,
            edge_distance,
        }
    }

    /// A customer icon that stays visible at the map edge.
    pub const fn customer(edge_distance: f32) -> Self {
        Self {
            category: IconCategory::Customer,
            always_show: true,
            edge_distance,
        }
    }
}

/// Where and how an icon is drawn this frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IconLayout {
    /// Map-space position.
    pub position: Vec2,
    /// Rotation around the screen normal, degrees counter-clockwise.
    pub rotation_degrees: f32,
    /// Uniform icon scale.
    pub scale: f32,
    /// Whether the icon was pinned to the edge circle.
    pub clamped: bool,
}

/// A registered icon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimapIcon {
    /// The world object this icon tracks.
    pub object: ObjectId,
    /// Appearance settings.
    pub spec: IconSpec,
    /// Most recent layout; default until the first update.
    pub layout: IconLayout,
}

/// Returned by [`IconRegistry::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IconHandle {
    /// The registered object.
    pub object: ObjectId,
}

/// Per-frame input to [`IconRegistry::update_all`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimapInput {
    /// The player's world pose.
    pub player: Pose,
    /// Camera pivot heading in degrees.
    pub camera_yaw_degrees: f32,
}

/// Camera-direction marker drawn at the player's map position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraMarker {
    /// Map-space position (the player's).
    pub position: Vec2,
    /// Negated camera yaw, degrees.
    pub rotation_degrees: f32,
}

/// The full minimap layout for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct MinimapFrame {
    /// The player's projected position.
    pub player_position: Vec2,
    /// Camera-direction marker.
    pub camera_marker: CameraMarker,
    /// Offset applied to the map content to centre the follow icon.
    pub content_offset: Vec2,
    /// Layout of every icon that received a pose this frame.
    pub icons: Vec<(ObjectId, IconLayout)>,
    /// Registered objects with no pose this frame; they keep their last
    /// layout.
    pub missing: Vec<ObjectId>,
}

/// Object-to-icon map with follow target and zoom.
#[derive(Debug, Clone)]
pub struct IconRegistry {
    config: MinimapConfig,
    transform: CoordinateTransform,
    icons: BTreeMap<ObjectId, MinimapIcon>,
    follow: Option<ObjectId>,
    zoom: f32,
    content_offset: Vec2,
}

impl IconRegistry {
    /// Build an empty registry. Fails on degenerate geometry or zoom.
    pub fn new(config: MinimapConfig) -> Result<Self, MinimapError> {
        config.validate()?;
        let transform = CoordinateTransform::new(config.world_size, config.minimap_size)?;
        let zoom = config.zoom;
        Ok(Self {
            config,
            transform,
            icons: BTreeMap::new(),
            follow: None,
            zoom,
            content_offset: Vec2::ZERO,
        })
    }

    // -------------------------------------------------------------------
    // Registration
    // -------------------------------------------------------------------

    /// Track `object` with the given appearance. Registering an object
    /// again replaces its entry. When `follow` is set the object becomes
    /// the follow target, replacing any previous one.
    pub fn register(&mut self, object: ObjectId, spec: IconSpec, follow: bool) -> IconHandle {
        let icon = MinimapIcon {
            object,
            spec,
            layout: IconLayout::default(),
        };
        if self.icons.insert(object, icon).is_some() {
            debug!(%object, "minimap icon replaced");
        }
        if follow {
            self.follow = Some(object);
        }
        IconHandle { object }
    }

    /// Stop tracking `object`. Unknown objects are ignored. Clears the
    /// follow target if it was this object.
    pub fn unregister(&mut self, object: ObjectId) -> Option<MinimapIcon> {
        let removed = self.icons.remove(&object);
        if self.follow == Some(object) {
            self.follow = None;
        }
        removed
    }

    /// Look up an icon.
    pub fn get(&self, object: ObjectId) -> Option<&MinimapIcon> {
        self.icons.get(&object)
    }

    /// Number of registered icons.
    pub fn len(&self) -> usize {
        self.icons.len()
    }

    /// Whether no icons are registered.
    pub fn is_empty(&self) -> bool {
        self.icons.is_empty()
    }

    /// Iterate registered icons in id order.
    pub fn icons(&self) -> impl Iterator<Item = &MinimapIcon> {
        self.icons.values()
    }

    /// The current follow target.
    pub const fn follow_target(&self) -> Option<ObjectId> {
        self.follow
    }

    // -------------------------------------------------------------------
    // View
    // -------------------------------------------------------------------

    /// Current zoom factor.
    pub const fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Set the zoom factor of the map content.
    pub fn set_zoom(&mut self, zoom: f32) -> Result<(), MinimapError> {
        check_zoom(zoom)?;
        self.zoom = zoom;
        Ok(())
    }

    /// Rebuild the projection for a new drawn map size.
    pub fn resize(&mut self, minimap_size: Vec2) -> Result<(), MinimapError> {
        self.transform = CoordinateTransform::new(self.config.world_size, minimap_size)?;
        self.config.minimap_size = minimap_size;
        Ok(())
    }

    /// The active projection.
    pub const fn transform(&self) -> &CoordinateTransform {
        &self.transform
    }

    /// Offset of the map content from the last update.
    pub const fn content_offset(&self) -> Vec2 {
        self.content_offset
    }

    // -------------------------------------------------------------------
    // Layout
    // -------------------------------------------------------------------

    /// Lay out every registered icon from this frame's world poses.
    pub fn update_all(
        &mut self,
        input: &MinimapInput,
        poses: &BTreeMap<ObjectId, Pose>,
    ) -> MinimapFrame {
        let player_position = self.transform.project_position(input.player.position);
        let mut icons = Vec::with_capacity(self.icons.len());
        let mut missing = Vec::new();

        for icon in self.icons.values_mut() {
            let Some(pose) = poses.get(&icon.object) else {
                missing.push(icon.object);
                continue;
            };
            let scale = self.config.icon_scale(icon.spec.category) / self.zoom;
            let projected = self.transform.project_position(pose.position);
            icon.layout = layout_icon(&icon.spec, projected, pose.yaw_degrees, player_position, scale);
            icons.push((icon.object, icon.layout));
        }

        if let Some(icon) = self.follow.and_then(|id| self.icons.get(&id)) {
            self.content_offset = -icon.layout.position * self.zoom;
        }

        MinimapFrame {
            player_position,
            camera_marker: CameraMarker {
                position: player_position,
                rotation_degrees: -input.camera_yaw_degrees,
            },
            content_offset: self.content_offset,
            icons,
            missing,
        }
    }
}

/// Place one icon relative to the player.
pub fn layout_icon(
    spec: &IconSpec,
    projected: Vec2,
    yaw_degrees: f32,
    player_position: Vec2,
    scale: f32,
) -> IconLayout {
    let offset = projected - player_position;
    if spec.always_show && offset.length() > spec.edge_distance {
        if let Some(direction) = offset.normalized() {
            return IconLayout {
                position: player_position + direction * spec.edge_distance,
                rotation_degrees: direction.x.atan2(-direction.y).to_degrees(),
                scale,
                clamped: true,
            };
        }
    }
    IconLayout {
        position: projected,
        rotation_degrees: -yaw_degrees,
        scale,
        clamped: false,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-3;

    /// 1:1 projection so map distances equal world distances.
    fn registry() -> IconRegistry {
        IconRegistry::new(MinimapConfig {
            world_size: Vec2::new(100.0, 100.0),
            minimap_size: Vec2::new(100.0, 100.0),
            ..MinimapConfig::default()
        })
        .unwrap()
    }

    fn input_at(x: f32, z: f32) -> MinimapInput {
        MinimapInput {
            player: Pose::on_ground(x, z, 0.0),
            camera_yaw_degrees: 30.0,
        }
    }

    #[test]
    fn register_and_unregister() {
        let mut r = registry();
        let id = ObjectId::new();
        r.register(id, IconSpec::general(90.0), false);
        assert_eq!(r.len(), 1);
        assert!(r.unregister(id).is_some());
        assert!(r.is_empty());
        assert!(r.unregister(id).is_none(), "second unregister is a no-op");
    }

    #[test]
    fn follow_target_is_last_writer() {
        let mut r = registry();
        let a = ObjectId::new();
        let b = ObjectId::new();
        r.register(a, IconSpec::general(90.0), true);
        r.register(b, IconSpec::general(90.0), true);
        assert_eq!(r.follow_target(), Some(b));
        r.unregister(b);
        assert_eq!(r.follow_target(), None);
    }

    #[test]
    fn near_icon_uses_projected_position_and_inverted_yaw() {
        let mut r = registry();
        let id = ObjectId::new();
        r.register(id, IconSpec::customer(90.0), false);
        let poses = BTreeMap::from([(id, Pose::on_ground(10.0, 20.0, 45.0))]);
        let frame = r.update_all(&input_at(0.0, 0.0), &poses);
        let (_, layout) = frame.icons.first().copied().unwrap();
        assert!(!layout.clamped);
        assert!((layout.position.x - 10.0).abs() < EPS);
        assert!((layout.position.y - 20.0).abs() < EPS);
        assert!((layout.rotation_degrees + 45.0).abs() < EPS);
    }

    #[test]
    fn far_always_show_icon_is_pinned_to_edge() {
        let mut r = registry();
        let id = ObjectId::new();
        r.register(id, IconSpec::customer(90.0), false);
        let poses = BTreeMap::from([(id, Pose::on_ground(300.0, 0.0, 0.0))]);
        let frame = r.update_all(&input_at(0.0, 0.0), &poses);
        let (_, layout) = frame.icons.first().copied().unwrap();
        assert!(layout.clamped);
        assert!((layout.position.x - 90.0).abs() < EPS);
        assert!(layout.position.y.abs() < EPS);
        // up rotated to face -x
        assert!((layout.rotation_degrees - 90.0).abs() < EPS);
    }

    #[test]
    fn far_regular_icon_is_not_pinned() {
        let mut r = registry();
        let id = ObjectId::new();
        r.register(id, IconSpec::general(90.0), false);
        let poses = BTreeMap::from([(id, Pose::on_ground(300.0, 0.0, 0.0))]);
        let frame = r.update_all(&input_at(0.0, 0.0), &poses);
        let (_, layout) = frame.icons.first().copied().unwrap();
        assert!(!layout.clamped);
        assert!((layout.position.x - 300.0).abs() < EPS);
    }

    #[test]
    fn icon_scale_compensates_zoom() {
        let mut r = registry();
        let general = ObjectId::new();
        let customer = ObjectId::new();
        r.register(general, IconSpec::general(90.0), false);
        r.register(customer, IconSpec::customer(90.0), false);
        r.set_zoom(2.0).unwrap();
        let poses = BTreeMap::from([
            (general, Pose::on_ground(1.0, 1.0, 0.0)),
            (customer, Pose::on_ground(2.0, 2.0, 0.0)),
        ]);
        r.update_all(&input_at(0.0, 0.0), &poses);
        assert!((r.get(general).unwrap().layout.scale - 0.5).abs() < EPS);
        assert!((r.get(customer).unwrap().layout.scale - 0.75).abs() < EPS);
    }

    #[test]
    fn content_centres_on_follow_icon() {
        let mut r = registry();
        let player = ObjectId::new();
        r.register(player, IconSpec::general(90.0), true);
        r.set_zoom(2.0).unwrap();
        let poses = BTreeMap::from([(player, Pose::on_ground(5.0, -3.0, 0.0))]);
        let frame = r.update_all(&input_at(5.0, -3.0), &poses);
        assert!((frame.content_offset.x + 10.0).abs() < EPS);
        assert!((frame.content_offset.y - 6.0).abs() < EPS);
    }

    #[test]
    fn camera_marker_follows_player() {
        let mut r = registry();
        let frame = r.update_all(&input_at(4.0, 8.0), &BTreeMap::new());
        assert!((frame.camera_marker.position.x - 4.0).abs() < EPS);
        assert!((frame.camera_marker.rotation_degrees + 30.0).abs() < EPS);
    }

    #[test]
    fn objects_without_pose_are_reported() {
        let mut r = registry();
        let id = ObjectId::new();
        r.register(id, IconSpec::general(90.0), false);
        let frame = r.update_all(&input_at(0.0, 0.0), &BTreeMap::new());
        assert!(frame.icons.is_empty());
        assert_eq!(frame.missing, vec![id]);
    }

    #[test]
    fn bad_zoom_is_rejected() {
        let mut r = registry();
        assert!(r.set_zoom(0.0).is_err());
        assert!(r.set_zoom(f32::INFINITY).is_err());
        assert!((r.zoom() - 1.0).abs() < EPS);
    }

    #[test]
    fn resize_rebuilds_projection() {
        let mut r = registry();
        r.resize(Vec2::new(50.0, 200.0)).unwrap();
        let p = r.transform().project(Vec2::new(10.0, 10.0));
        assert!((p.x - 5.0).abs() < EPS);
        assert!((p.y - 20.0).abs() < EPS);
    }
}
