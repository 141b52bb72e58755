//! Planar and spatial value types.
//!
//! The world is a right-handed Y-up space; the ground plane is (x, z). The
//! minimap works in its own 2D space where [`Vec2::y`] is "up" on screen,
//! so a world position maps onto the map through its (x, z) components.

use core::ops::{Add, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// A 2D vector (minimap space, or the world ground plane).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    /// Horizontal component.
    pub x: f32,
    /// Vertical component.
    pub y: f32,
}

impl Vec2 {
    /// The zero vector.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Screen "up" in minimap space.
    pub const UP: Self = Self { x: 0.0, y: 1.0 };

    /// Construct a vector from its components.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean length.
    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Distance between two points.
    pub fn distance(self, other: Self) -> f32 {
        (other - self).length()
    }

    /// Unit vector in the same direction, or `None` for a (near) zero vector.
    pub fn normalized(self) -> Option<Self> {
        let len = self.length();
        if len <= f32::EPSILON || !len.is_finite() {
            return None;
        }
        Some(Self::new(self.x / len, self.y / len))
    }

    /// Component-wise product.
    pub fn component_mul(self, other: Self) -> Self {
        Self::new(self.x * other.x, self.y * other.y)
    }

    /// Whether both components are finite.
    pub const fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

/// A 3D world-space position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    /// East-west axis.
    pub x: f32,
    /// Height.
    pub y: f32,
    /// North-south axis.
    pub z: f32,
}

impl Vec3 {
    /// Construct a position from its components.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Project onto the ground plane as (x, z).
    pub const fn ground(self) -> Vec2 {
        Vec2::new(self.x, self.z)
    }
}

/// Position plus heading of a world object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// World-space position.
    pub position: Vec3,
    /// Heading around the vertical axis, in degrees.
    pub yaw_degrees: f32,
}

impl Pose {
    /// Construct a pose on the ground plane at (x, z) with a heading.
    pub const fn on_ground(x: f32, z: f32, yaw_degrees: f32) -> Self {
        Self {
            position: Vec3::new(x, 0.0, z),
            yaw_degrees,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn length_and_distance() {
        let a = Vec2::new(3.0, 4.0);
        assert!((a.length() - 5.0).abs() < EPS);
        assert!((Vec2::ZERO.distance(a) - 5.0).abs() < EPS);
    }

    #[test]
    fn normalized_has_unit_length() {
        let n = Vec2::new(-6.0, 8.0).normalized().unwrap();
        assert!((n.length() - 1.0).abs() < EPS);
        assert!((n.x + 0.6).abs() < EPS);
    }

    #[test]
    fn zero_vector_has_no_direction() {
        assert!(Vec2::ZERO.normalized().is_none());
    }

    #[test]
    fn ground_drops_height() {
        let p = Vec3::new(1.0, 7.0, -2.0);
        assert_eq!(p.ground(), Vec2::new(1.0, -2.0));
    }
}
