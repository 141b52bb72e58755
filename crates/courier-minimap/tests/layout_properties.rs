//! Property tests for projection linearity and edge pinning.

#![allow(clippy::unwrap_used)]

use courier_minimap::{CoordinateTransform, IconSpec, layout_icon};
use courier_types::Vec2;
use proptest::prelude::*;

fn coord() -> impl Strategy<Value = f32> {
    -1000.0f32..1000.0
}

fn size() -> impl Strategy<Value = f32> {
    prop_oneof![1.0f32..2000.0, -2000.0f32..-1.0]
}

proptest! {
    #[test]
    fn projection_is_linear(
        wx in size(), wz in size(), mx in 1.0f32..500.0, my in 1.0f32..500.0,
        ax in coord(), ay in coord(), bx in coord(), by in coord(),
        k in -4.0f32..4.0,
    ) {
        let t = CoordinateTransform::new(Vec2::new(wx, wz), Vec2::new(mx, my)).unwrap();
        let a = Vec2::new(ax, ay);
        let b = Vec2::new(bx, by);

        let sum = t.project(a + b);
        let parts = t.project(a) + t.project(b);
        let tol = 1e-3 * (1.0 + sum.length());
        prop_assert!((sum - parts).length() <= tol, "{sum:?} vs {parts:?}");

        let scaled = t.project(a * k);
        let scaled_parts = t.project(a) * k;
        let tol = 1e-3 * (1.0 + scaled.length());
        prop_assert!((scaled - scaled_parts).length() <= tol, "{scaled:?} vs {scaled_parts:?}");
    }

    #[test]
    fn pinned_icons_sit_on_the_edge_ray(
        px in coord(), py in coord(), ox in coord(), oy in coord(),
        edge in 1.0f32..200.0,
    ) {
        let player = Vec2::new(px, py);
        let object = Vec2::new(ox, oy);
        let spec = IconSpec::customer(edge);
        let layout = layout_icon(&spec, object, 0.0, player, 1.0);

        let distance = player.distance(object);
        if distance > edge {
            prop_assert!(layout.clamped);
            let from_player = layout.position - player;
            prop_assert!((from_player.length() - edge).abs() <= 1e-2, "radius {}", from_player.length());
            let to_object = (object - player).normalized().unwrap();
            let along = from_player.normalized().unwrap();
            prop_assert!((along - to_object).length() <= 1e-3, "off the ray: {along:?} vs {to_object:?}");
        } else {
            prop_assert!(!layout.clamped);
            prop_assert_eq!(layout.position, object);
        }
    }
}

#[test]
fn degenerate_world_fails_at_construction() {
    assert!(CoordinateTransform::new(Vec2::new(0.0, 0.0), Vec2::new(100.0, 100.0)).is_err());
}
