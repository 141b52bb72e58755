//! Scripted player for headless runs.
//!
//! The driver steers straight toward one target per frame. It detours for
//! a corrective pickup when body temperature strays past its comfort limit
//! or when the worn clothing does not suit the weather, and otherwise
//! heads for the waiting customer. Anything interactive within the
//! interaction radius is reported as an overlap.

use courier_core::config::DriverConfig;
use courier_core::runner::InputSource;
use courier_core::session::{FrameInput, GameSession};
use courier_types::{ClothingType, DrinkType, ObjectId, PickupKind, Pose, Vec2, WeatherType};
use tracing::trace;

/// Input source that plays the game on its own.
#[derive(Debug, Clone)]
pub struct ScriptedDriver {
    config: DriverConfig,
    pose: Pose,
}

impl ScriptedDriver {
    /// A driver starting at `start`.
    pub const fn new(config: DriverConfig, start: Pose) -> Self {
        Self {
            config,
            pose: start,
        }
    }

    /// Where the driver is now.
    pub const fn pose(&self) -> &Pose {
        &self.pose
    }

    fn step_toward(&mut self, target: Vec2, dt: f32) {
        let here = self.pose.position.ground();
        let offset = target - here;
        let Some(direction) = offset.normalized() else {
            return;
        };
        let reach = (self.config.speed * dt).min(offset.length());
        let next = here + direction * reach;
        self.pose = Pose::on_ground(next.x, next.y, direction.x.atan2(direction.y).to_degrees());
    }
}

impl InputSource for ScriptedDriver {
    fn next_frame(&mut self, session: &GameSession, dt: f32) -> FrameInput {
        if let Some((object, target)) = choose_target(session, self.config.comfort_limit) {
            trace!(%object, x = target.x, z = target.y, "driving toward target");
            self.step_toward(target, dt);
        }

        let here = self.pose.position.ground();
        let radius = self.config.interaction_radius;
        let overlaps = interactive_objects(session)
            .filter(|(_, position)| position.distance(here) <= radius)
            .map(|(id, _)| id)
            .collect();

        FrameInput {
            player: self.pose,
            camera_yaw_degrees: self.pose.yaw_degrees,
            overlaps,
            ..FrameInput::default()
        }
    }
}

/// Pickup kinds worth a detour right now, most urgent first.
pub fn wanted_pickups(
    body_temperature: f32,
    clothing: ClothingType,
    weather: WeatherType,
    comfort_limit: f32,
) -> Vec<PickupKind> {
    let mut wanted = Vec::new();
    if body_temperature.abs() > comfort_limit {
        wanted.push(PickupKind::EmergencyKit);
        let drink = if body_temperature > 0.0 {
            DrinkType::Lemonade
        } else {
            DrinkType::HotChocolate
        };
        wanted.push(PickupKind::Drink(drink));
    }
    let suited = match weather {
        WeatherType::Heatwave => Some(ClothingType::TShirt),
        WeatherType::Snowstorm => Some(ClothingType::WinterCoat),
        WeatherType::Normal => None,
    };
    if let Some(suited) = suited.filter(|s| *s != clothing) {
        wanted.push(PickupKind::Clothing(suited));
    }
    wanted
}

fn choose_target(session: &GameSession, comfort_limit: f32) -> Option<(ObjectId, Vec2)> {
    let here = session.player_pose().position.ground();
    let temperature = session.temperature();
    let wanted = wanted_pickups(
        temperature.body_temperature(),
        temperature.clothing(),
        session.weather(),
        comfort_limit,
    );

    for kind in wanted {
        let nearest = session
            .pickups()
            .active()
            .filter(|p| p.kind == kind)
            .min_by(|a, b| a.position.distance(here).total_cmp(&b.position.distance(here)));
        if let Some(pickup) = nearest {
            return Some((pickup.id, pickup.position));
        }
    }
    session
        .deliveries()
        .current()
        .map(|customer| (customer.id, customer.position))
}

fn interactive_objects(session: &GameSession) -> impl Iterator<Item = (ObjectId, Vec2)> + '_ {
    let customer = session
        .deliveries()
        .current()
        .map(|customer| (customer.id, customer.position));
    customer
        .into_iter()
        .chain(session.pickups().active().map(|p| (p.id, p.position)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use courier_core::config::GameConfig;
    use courier_core::session::NoOpObserver;

    use super::*;

    #[test]
    fn comfortable_player_wants_nothing_in_normal_weather() {
        let wanted = wanted_pickups(10.0, ClothingType::None, WeatherType::Normal, 45.0);
        assert!(wanted.is_empty());
    }

    #[test]
    fn overheated_player_wants_the_kit_then_lemonade_then_a_shirt() {
        let wanted = wanted_pickups(70.0, ClothingType::WinterCoat, WeatherType::Heatwave, 45.0);
        assert_eq!(
            wanted,
            vec![
                PickupKind::EmergencyKit,
                PickupKind::Drink(DrinkType::Lemonade),
                PickupKind::Clothing(ClothingType::TShirt),
            ]
        );
    }

    #[test]
    fn suited_clothing_is_not_wanted_again() {
        let wanted = wanted_pickups(-5.0, ClothingType::WinterCoat, WeatherType::Snowstorm, 45.0);
        assert!(wanted.is_empty());
    }

    #[test]
    fn step_never_overshoots_the_target() {
        let mut driver = ScriptedDriver::new(DriverConfig::default(), Pose::on_ground(0.0, 0.0, 0.0));
        driver.step_toward(Vec2::new(0.0, 1.0), 1.0);
        let here = driver.pose().position.ground();
        assert!(here.distance(Vec2::new(0.0, 1.0)) < 1e-4);
        // heading straight along +z
        assert!(driver.pose().yaw_degrees.abs() < 1e-4);
    }

    #[test]
    fn driver_reaches_a_customer() {
        let mut session = GameSession::new(GameConfig::default()).unwrap();
        session.begin_countdown(&mut NoOpObserver).unwrap();
        let mut driver = ScriptedDriver::new(
            DriverConfig {
                speed: 200.0,
                ..DriverConfig::default()
            },
            Pose::default(),
        );

        for _ in 0..200 {
            let frame = driver.next_frame(&session, 0.1);
            session.tick(0.1, &frame, &mut NoOpObserver).unwrap();
        }
        assert!(session.board().completed > 0);
    }
}
