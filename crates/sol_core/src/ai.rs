//! AI controller for the hostile factions.
//!
//! Runs on the economy tick right after production. Each AI planet decides
//! on its own, against the same post-production snapshot:
//!
//! 1. Skip unless the garrison exceeds [`AI_ATTACK_THRESHOLD`].
//! 2. Collect every planet held by a different owner (player, neutral or a
//!    rival AI). Skip if there are none.
//! 3. Draw a uniform number; attack only if it exceeds [`AI_ATTACK_ROLL`].
//! 4. Pick one target uniformly and commit [`AI_COMMIT_PERCENT`] of the
//!    garrison, floored.
//!
//! Planning reads the snapshot only; orders are committed afterwards, so one
//! planet's attack never influences a sibling's decision in the same tick.
//! The random source is injected so runs are reproducible from a seed.

use rand::Rng;

use crate::constants::{AI_ATTACK_ROLL, AI_ATTACK_THRESHOLD, AI_COMMIT_PERCENT};
use crate::dispatch::{dispatch, DispatchOrder};
use crate::fleet::FleetId;
use crate::math::{percent, Fixed};
use crate::planet::PlanetId;
use crate::state::GameState;

/// Decide this tick's AI attacks without touching the state.
///
/// Planets are visited in list order, and the generator is consumed in that
/// order: one draw per planet that has targets, plus one more for the
/// target pick when the attack goes ahead.
pub fn plan<R: Rng + ?Sized>(state: &GameState, rng: &mut R, speed: Fixed) -> Vec<DispatchOrder> {
    let threshold = Fixed::from_num(AI_ATTACK_THRESHOLD);
    let mut orders = Vec::new();

    for attacker in &state.planets {
        if !attacker.owner.is_hostile() || attacker.fleet_count <= threshold {
            continue;
        }

        let targets: Vec<PlanetId> = state
            .planets
            .iter()
            .filter(|p| p.owner != attacker.owner)
            .map(|p| p.id)
            .collect();
        if targets.is_empty() {
            continue;
        }

        let roll: f64 = rng.gen();
        if roll <= AI_ATTACK_ROLL {
            continue;
        }

        let target = targets[rng.gen_range(0..targets.len())];
        orders.push(
            DispatchOrder::new(attacker.id, target, percent(AI_COMMIT_PERCENT)).with_speed(speed),
        );
    }

    orders
}

/// Plan and commit this tick's AI attacks. Returns the new fleets.
pub fn run<R: Rng + ?Sized>(state: &mut GameState, rng: &mut R, speed: Fixed) -> Vec<FleetId> {
    let orders = plan(state, rng, speed);

    let mut launched = Vec::with_capacity(orders.len());
    for order in &orders {
        if let Some(id) = dispatch(state, order) {
            if let Some(fleet) = state.fleet(id) {
                tracing::debug!(
                    fleet = %id,
                    owner = %fleet.owner,
                    from = %order.from,
                    to = %order.to,
                    count = fleet.count,
                    "AI attack launched"
                );
            }
            launched.push(id);
        }
    }

    launched
}
