//! Collectible pickups.
//!
//! One pickup of each stocked kind is kept in the world while play is
//! running. A pickup that expires or is collected is replaced by a fresh
//! one of the same kind at a random spawn point. Separately, a single
//! emergency kit is dropped ahead of the player the first time body
//! temperature passes a danger fraction of either limit; it is not
//! replaced.

use std::collections::BTreeMap;

use courier_types::{ClothingType, DrinkType, ObjectId, PickupKind, Pose, Vec2};
use rand::Rng;
use serde::Deserialize;
use tracing::{debug, info};

use crate::delivery::DeliveryTimer;

/// Pickup tunables, from the `pickups` section of the config.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PickupConfig {
    /// Ground-plane (x, z) points where pickups can appear.
    pub spawn_points: Vec<Vec2>,

    /// Kinds kept in stock while playing (default: one of each clothing and
    /// drink).
    pub stock: Vec<PickupKind>,

    /// Seconds before an uncollected pickup is moved elsewhere
    /// (default: 30).
    pub expiration_secs: f64,

    /// Fraction of a temperature limit at which the emergency kit drops
    /// (default: 0.85).
    pub emergency_kit_threshold: f32,

    /// How far ahead of the player the emergency kit is aimed, in world
    /// units (default: 60).
    pub emergency_kit_distance: f32,
}

impl Default for PickupConfig {
    fn default() -> Self {
        Self {
            spawn_points: vec![
                Vec2::new(-60.0, 40.0),
                Vec2::new(70.0, 30.0),
                Vec2::new(40.0, -80.0),
                Vec2::new(-90.0, -50.0),
                Vec2::new(0.0, 100.0),
                Vec2::new(110.0, -120.0),
            ],
            stock: vec![
                PickupKind::Clothing(ClothingType::TShirt),
                PickupKind::Clothing(ClothingType::WinterCoat),
                PickupKind::Drink(DrinkType::HotChocolate),
                PickupKind::Drink(DrinkType::Lemonade),
            ],
            expiration_secs: 30.0,
            emergency_kit_threshold: 0.85,
            emergency_kit_distance: 60.0,
        }
    }
}

/// A pickup lying in the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pickup {
    /// World object id (also the minimap icon key).
    pub id: ObjectId,
    /// What collecting it does.
    pub kind: PickupKind,
    /// Ground-plane position.
    pub position: Vec2,
    /// Time until it is moved; `None` for the emergency kit.
    pub expiry: Option<DeliveryTimer>,
}

/// Pickups added and removed by one depot operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PickupChanges {
    /// Pickups that left the world.
    pub removed: Vec<ObjectId>,
    /// Pickups that entered the world.
    pub spawned: Vec<Pickup>,
}

impl PickupChanges {
    /// Whether nothing changed.
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.spawned.is_empty()
    }
}

/// Owns every active pickup.
#[derive(Debug, Clone)]
pub struct PickupDepot {
    config: PickupConfig,
    active: BTreeMap<ObjectId, Pickup>,
    emergency_kit_dropped: bool,
}

impl PickupDepot {
    /// An empty depot.
    pub const fn new(config: PickupConfig) -> Self {
        Self {
            config,
            active: BTreeMap::new(),
            emergency_kit_dropped: false,
        }
    }

    /// Active pickups in id order.
    pub fn active(&self) -> impl Iterator<Item = &Pickup> {
        self.active.values()
    }

    /// Look up an active pickup.
    pub fn get(&self, id: ObjectId) -> Option<&Pickup> {
        self.active.get(&id)
    }

    /// Whether the emergency kit has been dropped this run.
    pub const fn emergency_kit_dropped(&self) -> bool {
        self.emergency_kit_dropped
    }

    /// Spawn one pickup of each stocked kind.
    pub fn stock<R: Rng>(&mut self, rng: &mut R) -> PickupChanges {
        let mut changes = PickupChanges::default();
        let kinds = self.config.stock.clone();
        for kind in kinds {
            if let Some(pickup) = self.spawn(kind, rng) {
                changes.spawned.push(pickup);
            }
        }
        changes
    }

    /// Remove every pickup and re-arm the emergency kit.
    pub fn clear(&mut self) -> PickupChanges {
        self.emergency_kit_dropped = false;
        let removed = core::mem::take(&mut self.active).into_keys().collect();
        PickupChanges {
            removed,
            spawned: Vec::new(),
        }
    }

    /// Count down expiry timers and relocate expired pickups.
    pub fn update<R: Rng>(&mut self, dt_secs: f64, rng: &mut R) -> PickupChanges {
        let mut expired = Vec::new();
        for pickup in self.active.values_mut() {
            if let Some(timer) = pickup.expiry.as_mut() {
                timer.update(dt_secs);
                if timer.is_expired() {
                    expired.push((pickup.id, pickup.kind));
                }
            }
        }

        let mut changes = PickupChanges::default();
        for (id, kind) in expired {
            self.active.remove(&id);
            debug!(pickup = %id, ?kind, "pickup expired");
            changes.removed.push(id);
            if let Some(fresh) = self.spawn(kind, rng) {
                changes.spawned.push(fresh);
            }
        }
        changes
    }

    /// Take `id` out of the world. Stocked kinds are replaced immediately;
    /// the emergency kit is not.
    pub fn collect<R: Rng>(&mut self, id: ObjectId, rng: &mut R) -> Option<(Pickup, PickupChanges)> {
        let pickup = self.active.remove(&id)?;
        let mut changes = PickupChanges {
            removed: vec![id],
            spawned: Vec::new(),
        };
        if pickup.expiry.is_some() {
            if let Some(fresh) = self.spawn(pickup.kind, rng) {
                changes.spawned.push(fresh);
            }
        }
        info!(pickup = %id, kind = ?pickup.kind, "pickup collected");
        Some((pickup, changes))
    }

    /// Drop the emergency kit if body temperature is past the danger
    /// threshold and no kit has been dropped yet this run.
    ///
    /// The kit lands on the spawn point closest to a spot
    /// `emergency_kit_distance` ahead of the player.
    pub fn check_emergency_kit(
        &mut self,
        body_temperature: f32,
        min_temperature: f32,
        max_temperature: f32,
        player: &Pose,
    ) -> Option<Pickup> {
        if self.emergency_kit_dropped {
            return None;
        }
        let threshold = self.config.emergency_kit_threshold;
        let in_danger = body_temperature < min_temperature * threshold
            || body_temperature > max_temperature * threshold;
        if !in_danger {
            return None;
        }

        let heading = player.yaw_degrees.to_radians();
        let forward = Vec2::new(heading.sin(), heading.cos());
        let aim = player.position.ground() + forward * self.config.emergency_kit_distance;
        let position = self
            .config
            .spawn_points
            .iter()
            .copied()
            .min_by(|a, b| a.distance(aim).total_cmp(&b.distance(aim)))?;

        self.emergency_kit_dropped = true;
        let kit = Pickup {
            id: ObjectId::new(),
            kind: PickupKind::EmergencyKit,
            position,
            expiry: None,
        };
        self.active.insert(kit.id, kit);
        info!(
            pickup = %kit.id,
            body_temperature,
            x = position.x,
            z = position.y,
            "emergency kit dropped"
        );
        Some(kit)
    }

    fn spawn<R: Rng>(&mut self, kind: PickupKind, rng: &mut R) -> Option<Pickup> {
        let count = self.config.spawn_points.len();
        if count == 0 {
            return None;
        }
        let position = *self.config.spawn_points.get(rng.random_range(0..count))?;
        let pickup = Pickup {
            id: ObjectId::new(),
            kind,
            position,
            expiry: Some(DeliveryTimer::started(self.config.expiration_secs)),
        };
        self.active.insert(pickup.id, pickup);
        Some(pickup)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(9)
    }

    #[test]
    fn stocks_one_of_each_kind() {
        let mut depot = PickupDepot::new(PickupConfig::default());
        let changes = depot.stock(&mut rng());
        assert_eq!(changes.spawned.len(), 4);
        assert_eq!(depot.active().count(), 4);
    }

    #[test]
    fn expired_pickups_are_replaced_in_kind() {
        let mut depot = PickupDepot::new(PickupConfig {
            stock: vec![PickupKind::Drink(DrinkType::Lemonade)],
            ..PickupConfig::default()
        });
        let mut r = rng();
        let first = depot.stock(&mut r).spawned.first().copied().unwrap();
        assert!(depot.update(29.0, &mut r).is_empty());
        let changes = depot.update(1.0, &mut r);
        assert_eq!(changes.removed, vec![first.id]);
        let fresh = changes.spawned.first().unwrap();
        assert_eq!(fresh.kind, PickupKind::Drink(DrinkType::Lemonade));
        assert_ne!(fresh.id, first.id);
    }

    #[test]
    fn collecting_replaces_stock() {
        let mut depot = PickupDepot::new(PickupConfig::default());
        let mut r = rng();
        let id = depot.stock(&mut r).spawned.first().unwrap().id;
        let (pickup, changes) = depot.collect(id, &mut r).unwrap();
        assert_eq!(pickup.id, id);
        assert_eq!(changes.spawned.len(), 1);
        assert_eq!(depot.active().count(), 4);
        assert!(depot.collect(id, &mut r).is_none());
    }

    #[test]
    fn emergency_kit_drops_once_near_the_limit() {
        let mut depot = PickupDepot::new(PickupConfig::default());
        let player = Pose::on_ground(0.0, 0.0, 0.0);
        assert!(depot.check_emergency_kit(80.0, -100.0, 100.0, &player).is_none());

        let kit = depot.check_emergency_kit(-90.0, -100.0, 100.0, &player).unwrap();
        assert_eq!(kit.kind, PickupKind::EmergencyKit);
        // straight ahead (+z) by 60 lands closest to (0, 100)
        assert_eq!(kit.position, Vec2::new(0.0, 100.0));
        assert!(depot.check_emergency_kit(95.0, -100.0, 100.0, &player).is_none());

        let mut r = rng();
        let (_, changes) = depot.collect(kit.id, &mut r).unwrap();
        assert!(changes.spawned.is_empty(), "kits are not restocked");
    }

    #[test]
    fn clear_rearms_the_kit() {
        let mut depot = PickupDepot::new(PickupConfig::default());
        let player = Pose::on_ground(0.0, 0.0, 0.0);
        depot.check_emergency_kit(99.0, -100.0, 100.0, &player).unwrap();
        let changes = depot.clear();
        assert_eq!(changes.removed.len(), 1);
        assert!(!depot.emergency_kit_dropped());
    }
}
