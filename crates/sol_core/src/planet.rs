//! Planets: stationary garrisons that produce fleets.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::constants::MIN_DISPATCH_GARRISON;
use crate::math::{fixed_serde, Fixed};
use crate::owner::Owner;

/// Stable planet identifier.
///
/// Assigned from the planet's index in the level template list when a
/// level starts. Unique within one session, not across levels.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlanetId(pub u32);

impl std::fmt::Display for PlanetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "planet-{}", self.0)
    }
}

/// A planet and its garrison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Planet {
    /// Unique identifier.
    pub id: PlanetId,
    /// Display name.
    pub name: String,
    /// World position. Only the presentation layer reads this.
    pub position: Vec3,
    /// Visual radius. Only the presentation layer reads this.
    pub size: f32,
    /// Current garrison. Never negative; may be fractional after production.
    #[serde(with = "fixed_serde")]
    pub fleet_count: Fixed,
    /// Faction holding the planet.
    pub owner: Owner,
    /// Fleets gained per economy tick while owned by a non-neutral faction.
    #[serde(with = "fixed_serde")]
    pub production_rate: Fixed,
}

impl Planet {
    /// Create a planet at the origin with no production.
    #[must_use]
    pub fn new(id: PlanetId, name: impl Into<String>, owner: Owner, fleet_count: Fixed) -> Self {
        Self {
            id,
            name: name.into(),
            position: Vec3::ZERO,
            size: 1.0,
            fleet_count,
            owner,
            production_rate: Fixed::ZERO,
        }
    }

    /// Set the production rate.
    #[must_use]
    pub fn with_production(mut self, rate: Fixed) -> Self {
        self.production_rate = rate;
        self
    }

    /// Set the world position.
    #[must_use]
    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Set the visual size.
    #[must_use]
    pub fn with_size(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    /// Whether the garrison is large enough to split.
    #[must_use]
    pub fn can_dispatch(&self) -> bool {
        self.fleet_count >= Fixed::from_num(MIN_DISPATCH_GARRISON)
    }
}
