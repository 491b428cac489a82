//! Production: owned planets grow their garrisons once per economy tick.

use crate::state::GameState;

/// Add each owned planet's production rate to its garrison.
///
/// Neutral planets are left alone. No rounding is applied, so garrisons
/// with fractional rates accumulate fractions.
pub fn run(state: &mut GameState) {
    for planet in state.planets.iter_mut().filter(|p| p.owner.produces()) {
        planet.fleet_count = planet.fleet_count.saturating_add(planet.production_rate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Fixed;
    use crate::owner::Owner;
    use crate::planet::{Planet, PlanetId};

    #[test]
    fn test_owned_planets_produce_neutral_do_not() {
        let mut state = GameState::with_planets(vec![
            Planet::new(PlanetId(0), "A", Owner::Player, Fixed::from_num(10))
                .with_production(Fixed::from_num(1.5)),
            Planet::new(PlanetId(1), "B", Owner::Neutral, Fixed::from_num(20))
                .with_production(Fixed::from_num(3)),
            Planet::new(PlanetId(2), "C", Owner::AiRed, Fixed::from_num(0))
                .with_production(Fixed::from_num(4)),
        ]);

        run(&mut state);
        run(&mut state);

        assert_eq!(state.planets[0].fleet_count, Fixed::from_num(13));
        assert_eq!(state.planets[1].fleet_count, Fixed::from_num(20));
        assert_eq!(state.planets[2].fleet_count, Fixed::from_num(8));
    }

    #[test]
    fn test_production_leaves_fleets_alone() {
        let mut state = GameState::with_planets(vec![Planet::new(
            PlanetId(0),
            "A",
            Owner::Player,
            Fixed::from_num(10),
        )]);
        run(&mut state);
        assert!(state.fleets.is_empty());
    }
}
