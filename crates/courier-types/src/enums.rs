//! Enumeration types shared across the game core.
//!
//! Serialized names use `snake_case` so they read naturally in the YAML
//! configuration and in structured log output.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Weather
// ---------------------------------------------------------------------------

/// The current global weather condition.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum WeatherType {
    /// No temperature pressure; unclothed players recover toward neutral.
    #[default]
    Normal,
    /// Drives body temperature upward.
    Heatwave,
    /// Drives body temperature downward.
    Snowstorm,
}

impl WeatherType {
    /// Whether this weather puts pressure on body temperature.
    pub const fn is_adverse(self) -> bool {
        !matches!(self, Self::Normal)
    }

    /// The opposite extreme. `Normal` maps to itself.
    pub const fn opposite(self) -> Self {
        match self {
            Self::Normal => Self::Normal,
            Self::Heatwave => Self::Snowstorm,
            Self::Snowstorm => Self::Heatwave,
        }
    }
}

impl core::fmt::Display for WeatherType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Normal => "normal",
            Self::Heatwave => "heatwave",
            Self::Snowstorm => "snowstorm",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Clothing and consumables
// ---------------------------------------------------------------------------

/// The clothing the player is currently wearing.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ClothingType {
    /// Nothing worn. Amplifies weather slightly and enables recovery.
    #[default]
    None,
    /// Suited to heatwaves, punishing in snowstorms.
    TShirt,
    /// Suited to snowstorms, punishing in heatwaves.
    WinterCoat,
}

impl ClothingType {
    /// The adverse weather this clothing protects against, if any.
    pub const fn suited_for(self) -> Option<WeatherType> {
        match self {
            Self::None => None,
            Self::TShirt => Some(WeatherType::Heatwave),
            Self::WinterCoat => Some(WeatherType::Snowstorm),
        }
    }
}

impl core::fmt::Display for ClothingType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::TShirt => "t_shirt",
            Self::WinterCoat => "winter_coat",
        };
        f.write_str(name)
    }
}

/// A drink that instantly shifts body temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrinkType {
    /// Cools the player down.
    Lemonade,
    /// Warms the player up.
    HotChocolate,
}

/// What a collectible pickup does when the player drives over it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "item")]
pub enum PickupKind {
    /// Applies a drink's instant temperature change.
    Drink(DrinkType),
    /// Changes the player's clothing.
    Clothing(ClothingType),
    /// Resets temperature and grants temporary weather resistance.
    EmergencyKit,
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailReason {
    /// Body temperature reached the lower bound.
    Hypothermia,
    /// Body temperature reached the upper bound.
    Hyperthermia,
}

impl FailReason {
    /// The player-facing game-over message.
    pub const fn message(self) -> &'static str {
        match self {
            Self::Hypothermia => "You froze to death!",
            Self::Hyperthermia => "You died from heatstroke!",
        }
    }
}

impl core::fmt::Display for FailReason {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Hypothermia => "hypothermia",
            Self::Hyperthermia => "hyperthermia",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Minimap
// ---------------------------------------------------------------------------

/// Icon category, selecting which configured icon scale applies.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum IconCategory {
    /// Any non-customer icon (player, pickups, landmarks).
    #[default]
    General,
    /// A waiting customer.
    Customer,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn opposite_swaps_extremes() {
        assert_eq!(WeatherType::Heatwave.opposite(), WeatherType::Snowstorm);
        assert_eq!(WeatherType::Snowstorm.opposite(), WeatherType::Heatwave);
        assert_eq!(WeatherType::Normal.opposite(), WeatherType::Normal);
    }

    #[test]
    fn only_extremes_are_adverse() {
        assert!(!WeatherType::Normal.is_adverse());
        assert!(WeatherType::Heatwave.is_adverse());
        assert!(WeatherType::Snowstorm.is_adverse());
    }

    #[test]
    fn clothing_protection_mapping() {
        assert_eq!(ClothingType::TShirt.suited_for(), Some(WeatherType::Heatwave));
        assert_eq!(
            ClothingType::WinterCoat.suited_for(),
            Some(WeatherType::Snowstorm)
        );
        assert_eq!(ClothingType::None.suited_for(), None);
    }

    #[test]
    fn fail_reason_messages() {
        assert_eq!(FailReason::Hypothermia.message(), "You froze to death!");
        assert_eq!(
            FailReason::Hyperthermia.message(),
            "You died from heatstroke!"
        );
        assert_eq!(FailReason::Hyperthermia.to_string(), "hyperthermia");
    }

    #[test]
    fn pickup_kind_yaml_shape() {
        let json = serde_json::to_string(&PickupKind::Drink(DrinkType::HotChocolate)).unwrap();
        assert_eq!(json, r#"{"kind":"drink","item":"hot_chocolate"}"#);
        let kit: PickupKind = serde_json::from_str(r#"{"kind":"emergency_kit"}"#).unwrap();
        assert_eq!(kit, PickupKind::EmergencyKit);
    }
}
