//! Fleet dispatch: splitting a garrison into a fleet in transit.
//!
//! Dispatch is deliberately forgiving. A request that cannot be honoured
//! (unknown planet, garrison below two, ratio that rounds to zero ships)
//! leaves the state untouched and returns `None`. Misclicks are common
//! and must not interrupt play.

use serde::{Deserialize, Serialize};

use crate::constants::FLEET_SPEED_PERCENT;
use crate::fleet::{FleetGroup, FleetId};
use crate::math::{fixed_serde, floor_count, from_count, percent, Fixed};
use crate::planet::PlanetId;
use crate::state::GameState;

/// Default fleet speed in progress per simulated second.
#[must_use]
pub fn default_fleet_speed() -> Fixed {
    percent(FLEET_SPEED_PERCENT)
}

/// A request to send part of one planet's garrison to another planet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchOrder {
    /// Source planet.
    pub from: PlanetId,
    /// Destination planet.
    pub to: PlanetId,
    /// Share of the garrison to send, in `(0, 1]`.
    #[serde(with = "fixed_serde")]
    pub ratio: Fixed,
    /// Transit speed of the new fleet.
    #[serde(with = "fixed_serde")]
    pub speed: Fixed,
}

impl DispatchOrder {
    /// Create an order flying at the default speed.
    #[must_use]
    pub fn new(from: PlanetId, to: PlanetId, ratio: Fixed) -> Self {
        Self {
            from,
            to,
            ratio,
            speed: default_fleet_speed(),
        }
    }

    /// Override the transit speed.
    #[must_use]
    pub fn with_speed(mut self, speed: Fixed) -> Self {
        self.speed = speed;
        self
    }

    /// Ships this order would send from a garrison of `fleet_count`.
    ///
    /// Ratios above one are treated as one; non-positive ratios send nothing.
    #[must_use]
    pub fn count_for(&self, fleet_count: Fixed) -> u32 {
        if self.ratio <= Fixed::ZERO {
            return 0;
        }
        let ratio = self.ratio.min(Fixed::ONE);
        floor_count(fleet_count.saturating_mul(ratio))
    }
}

/// Execute a dispatch order against the state.
///
/// On success the source garrison is debited by
/// `floor(fleet_count * ratio)` and a fleet carrying exactly that many ships
/// is appended, owned by whoever holds the source planet right now.
/// Returns the new fleet's id, or `None` if the order was a no-op.
pub fn dispatch(state: &mut GameState, order: &DispatchOrder) -> Option<FleetId> {
    let source = state.planet(order.from)?;
    if !source.can_dispatch() {
        return None;
    }

    let count = order.count_for(source.fleet_count);
    if count == 0 {
        return None;
    }
    let owner = source.owner;

    let id = state.issue_fleet_id();
    if let Some(source) = state.planet_mut(order.from) {
        source.fleet_count -= from_count(count);
    }
    state.fleets.push(FleetGroup {
        id,
        from: order.from,
        to: order.to,
        count,
        owner,
        progress: Fixed::ZERO,
        speed: order.speed,
    });

    tracing::debug!(
        fleet = %id,
        from = %order.from,
        to = %order.to,
        count,
        owner = %owner,
        "Fleet dispatched"
    );

    Some(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::owner::Owner;
    use crate::planet::Planet;

    fn two_planets(garrison: Fixed) -> GameState {
        GameState::with_planets(vec![
            Planet::new(PlanetId(0), "A", Owner::Player, garrison),
            Planet::new(PlanetId(1), "B", Owner::Ai, Fixed::from_num(50)),
        ])
    }

    fn half(from: u32, to: u32) -> DispatchOrder {
        DispatchOrder::new(PlanetId(from), PlanetId(to), percent(50))
    }

    #[test]
    fn test_dispatch_debits_floor_of_ratio() {
        let mut state = two_planets(Fixed::from_num(10));
        let id = dispatch(&mut state, &half(0, 1)).unwrap();

        assert_eq!(state.planets[0].fleet_count, Fixed::from_num(5));
        let fleet = state.fleet(id).unwrap();
        assert_eq!(fleet.count, 5);
        assert_eq!(fleet.owner, Owner::Player);
        assert_eq!(fleet.progress, Fixed::ZERO);
        assert_eq!(fleet.to, PlanetId(1));
    }

    #[test]
    fn test_dispatch_conserves_fractional_garrison() {
        let mut state = two_planets(Fixed::from_num(7.5));
        let id = dispatch(&mut state, &half(0, 1)).unwrap();

        let fleet = state.fleet(id).unwrap();
        assert_eq!(fleet.count, 3);
        assert_eq!(
            state.planets[0].fleet_count + from_count(fleet.count),
            Fixed::from_num(7.5)
        );
    }

    #[test]
    fn test_dispatch_below_two_is_noop() {
        let mut state = two_planets(Fixed::from_num(1.9));
        let before = state.clone();

        assert!(dispatch(&mut state, &half(0, 1)).is_none());
        assert_eq!(state, before);
    }

    #[test]
    fn test_dispatch_from_unknown_planet_is_noop() {
        let mut state = two_planets(Fixed::from_num(10));
        let before = state.clone();

        assert!(dispatch(&mut state, &half(7, 1)).is_none());
        assert_eq!(state, before);
    }

    #[test]
    fn test_dispatch_full_ratio_empties_planet() {
        let mut state = two_planets(Fixed::from_num(4));
        let order = DispatchOrder::new(PlanetId(0), PlanetId(1), Fixed::ONE);

        dispatch(&mut state, &order).unwrap();
        assert_eq!(state.planets[0].fleet_count, Fixed::ZERO);
        assert_eq!(state.fleets[0].count, 4);
    }

    #[test]
    fn test_ratio_rounding_to_zero_is_noop() {
        let mut state = two_planets(Fixed::from_num(3));
        let order = DispatchOrder::new(PlanetId(0), PlanetId(1), percent(10));

        assert!(dispatch(&mut state, &order).is_none());
        assert!(state.fleets.is_empty());
    }

    #[test]
    fn test_fleet_owner_is_current_source_owner() {
        let mut state = two_planets(Fixed::from_num(10));
        state.planets[0].owner = Owner::AiGreen;

        let id = dispatch(&mut state, &half(0, 1)).unwrap();
        assert_eq!(state.fleet(id).unwrap().owner, Owner::AiGreen);
    }
}
