//! Fleet motion: advance every fleet one fast tick and land the arrivals.

use crate::combat::{resolve_arrival, ArrivalReport};
use crate::math::Fixed;
use crate::state::GameState;

/// Advance all fleets by `tick_seconds` and resolve those that arrive.
///
/// Arrivals are resolved one at a time in fleet insertion order, each one
/// seeing the destination as left by the previous. Arrived fleets are
/// removed; the rest keep their new progress.
pub fn run(state: &mut GameState, tick_seconds: Fixed) -> Vec<ArrivalReport> {
    for fleet in &mut state.fleets {
        fleet.advance(tick_seconds);
    }

    let (arrived, in_flight): (Vec<_>, Vec<_>) = std::mem::take(&mut state.fleets)
        .into_iter()
        .partition(|f| f.has_arrived());
    state.fleets = in_flight;

    arrived
        .iter()
        .map(|fleet| resolve_arrival(state, fleet))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::ArrivalOutcome;
    use crate::dispatch::{dispatch, DispatchOrder};
    use crate::fleet::{FleetGroup, FleetId};
    use crate::math::percent;
    use crate::owner::Owner;
    use crate::planet::{Planet, PlanetId};

    fn fleet(id: u64, owner: Owner, count: u32, progress: Fixed) -> FleetGroup {
        FleetGroup {
            id: FleetId(id),
            from: PlanetId(1),
            to: PlanetId(0),
            count,
            owner,
            progress,
            speed: Fixed::ONE,
        }
    }

    #[test]
    fn test_fleets_in_flight_keep_progress() {
        let mut state = GameState::with_planets(vec![Planet::new(
            PlanetId(0),
            "A",
            Owner::Ai,
            Fixed::from_num(10),
        )]);
        state.fleets.push(fleet(1, Owner::Player, 3, Fixed::ZERO));

        let reports = run(&mut state, Fixed::from_num(0.25));
        assert!(reports.is_empty());
        assert_eq!(state.fleets[0].progress, Fixed::from_num(0.25));
    }

    #[test]
    fn test_simultaneous_arrivals_resolve_in_order() {
        // Player captures with the first fleet, then the AI fleet hits the
        // new owner's garrison.
        let mut state = GameState::with_planets(vec![Planet::new(
            PlanetId(0),
            "Contested",
            Owner::Neutral,
            Fixed::from_num(5),
        )]);
        state.fleets.push(fleet(1, Owner::Player, 8, Fixed::from_num(0.9)));
        state.fleets.push(fleet(2, Owner::Ai, 2, Fixed::from_num(0.95)));
        state.fleets.push(fleet(3, Owner::Player, 4, Fixed::ZERO));

        let reports = run(&mut state, Fixed::from_num(0.5));

        assert_eq!(reports.len(), 2);
        assert!(matches!(
            reports[0].outcome,
            ArrivalOutcome::Captured {
                previous_owner: Owner::Neutral
            }
        ));
        assert_eq!(reports[1].outcome, ArrivalOutcome::Repelled);

        let planet = &state.planets[0];
        assert_eq!(planet.owner, Owner::Player);
        assert_eq!(planet.fleet_count, Fixed::from_num(1));

        assert_eq!(state.fleets.len(), 1);
        assert_eq!(state.fleets[0].id, FleetId(3));
    }

    #[test]
    fn test_dispatch_then_travel_to_arrival() {
        let mut state = GameState::with_planets(vec![
            Planet::new(PlanetId(0), "A", Owner::Player, Fixed::from_num(10)),
            Planet::new(PlanetId(1), "B", Owner::Ai, Fixed::from_num(50)),
        ]);
        dispatch(
            &mut state,
            &DispatchOrder::new(PlanetId(0), PlanetId(1), percent(50)),
        )
        .unwrap();

        let tick = Fixed::ONE / Fixed::from_num(60);
        let mut ticks = 0;
        while !state.fleets.is_empty() {
            run(&mut state, tick);
            ticks += 1;
            assert!(ticks < 1000, "fleet never arrived");
        }

        assert_eq!(state.planets[1].owner, Owner::Ai);
        assert_eq!(state.planets[1].fleet_count, Fixed::from_num(45));
    }
}
