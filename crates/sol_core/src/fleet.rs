//! Fleets in transit between planets.

use serde::{Deserialize, Serialize};

use crate::math::{fixed_serde, Fixed};
use crate::owner::Owner;
use crate::planet::PlanetId;

/// Unique fleet identifier.
///
/// Issued sequentially by [`GameState`](crate::state::GameState); two fleets
/// of one session never share an id.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct FleetId(pub u64);

impl std::fmt::Display for FleetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "fleet-{}", self.0)
    }
}

/// A group of ships flying from one planet to another.
///
/// Count and owner are fixed at dispatch. A fleet keeps its owner even if
/// the planet it left changes hands while it is in flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetGroup {
    /// Unique identifier.
    pub id: FleetId,
    /// Planet the fleet left. Informational only.
    pub from: PlanetId,
    /// Destination planet.
    pub to: PlanetId,
    /// Ships in the group. Always positive.
    pub count: u32,
    /// Faction the fleet fights for.
    pub owner: Owner,
    /// Transit progress in `[0, 1)`; the fleet arrives once this reaches 1.
    #[serde(with = "fixed_serde")]
    pub progress: Fixed,
    /// Progress gained per simulated second.
    #[serde(with = "fixed_serde")]
    pub speed: Fixed,
}

impl FleetGroup {
    /// Whether the fleet has reached its destination.
    #[must_use]
    pub fn has_arrived(&self) -> bool {
        self.progress >= Fixed::ONE
    }

    /// Advance progress by `speed` scaled to one tick of `seconds`.
    pub fn advance(&mut self, seconds: Fixed) {
        self.progress = self.progress.saturating_add(self.speed.saturating_mul(seconds));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fleet(speed: Fixed) -> FleetGroup {
        FleetGroup {
            id: FleetId(1),
            from: PlanetId(0),
            to: PlanetId(1),
            count: 5,
            owner: Owner::Player,
            progress: Fixed::ZERO,
            speed,
        }
    }

    #[test]
    fn test_advance_scales_with_elapsed_time() {
        let mut a = fleet(Fixed::from_num(0.5));
        let mut b = fleet(Fixed::from_num(0.5));

        a.advance(Fixed::ONE);
        b.advance(Fixed::from_num(0.5));
        b.advance(Fixed::from_num(0.5));

        assert_eq!(a.progress, b.progress);
        assert_eq!(a.progress, Fixed::from_num(0.5));
    }

    #[test]
    fn test_arrives_at_one() {
        let mut f = fleet(Fixed::ONE);
        assert!(!f.has_arrived());
        f.advance(Fixed::ONE);
        assert!(f.has_arrived());
    }
}
