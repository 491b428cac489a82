//! Test fixtures and helpers.
//!
//! Pre-built planets, states and sessions for consistent testing.

use fixed::types::I32F32;
use sol_core::data::LevelRegistry;
use sol_core::dispatch::default_fleet_speed;
use sol_core::fleet::FleetGroup;
use sol_core::owner::Owner;
use sol_core::planet::{Planet, PlanetId};
use sol_core::simulation::{SimConfig, Simulation};
use sol_core::state::GameState;

/// Create a fixed-point number from an integer.
#[must_use]
pub fn fixed(n: i32) -> I32F32 {
    I32F32::from_num(n)
}

/// Create a fixed-point number from a float (for tests only).
///
/// Note: In real simulation code, never use floats.
/// This is only for convenient test setup.
#[must_use]
pub fn fixed_f(n: f64) -> I32F32 {
    I32F32::from_num(n)
}

/// The built-in level catalog.
///
/// # Panics
///
/// Panics if the embedded catalog fails to load.
#[must_use]
pub fn builtin_levels() -> LevelRegistry {
    LevelRegistry::builtin().expect("built-in level catalog must load")
}

/// A session already playing `level` with the given AI seed.
///
/// # Panics
///
/// Panics if `level` is not in the built-in catalog.
#[must_use]
pub fn playing_level(level: u32, seed: u64) -> Simulation {
    let mut sim = Simulation::new(SimConfig::with_seed(seed));
    sim.start_level(&builtin_levels(), level)
        .expect("level must exist in the built-in catalog");
    sim
}

/// Builder for hand-made game states.
///
/// Planets get sequential ids in the order they are added.
///
/// ```
/// use sol_core::owner::Owner;
/// use sol_test_utils::fixtures::{fixed, StateBuilder};
///
/// let state = StateBuilder::new()
///     .planet(Owner::Player, fixed(10))
///     .planet(Owner::Ai, fixed(50))
///     .build();
/// assert_eq!(state.planets.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct StateBuilder {
    planets: Vec<Planet>,
    fleets: Vec<(PlanetId, PlanetId, u32, Owner, I32F32)>,
}

impl StateBuilder {
    /// Empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a planet with no production.
    #[must_use]
    pub fn planet(self, owner: Owner, garrison: I32F32) -> Self {
        self.producing_planet(owner, garrison, I32F32::ZERO)
    }

    /// Add a planet with a production rate.
    #[must_use]
    pub fn producing_planet(mut self, owner: Owner, garrison: I32F32, rate: I32F32) -> Self {
        let id = PlanetId(u32::try_from(self.planets.len()).unwrap_or(u32::MAX));
        self.planets
            .push(Planet::new(id, format!("Planet {}", id.0), owner, garrison).with_production(rate));
        self
    }

    /// Add a fleet already in flight.
    #[must_use]
    pub fn fleet(mut self, from: u32, to: u32, count: u32, owner: Owner, progress: I32F32) -> Self {
        self.fleets
            .push((PlanetId(from), PlanetId(to), count, owner, progress));
        self
    }

    /// Build a `Playing` state.
    #[must_use]
    pub fn build(self) -> GameState {
        let mut state = GameState::with_planets(self.planets);
        for (from, to, count, owner, progress) in self.fleets {
            let id = state.issue_fleet_id();
            state.fleets.push(FleetGroup {
                id,
                from,
                to,
                count,
                owner,
                progress,
                speed: default_fleet_speed(),
            });
        }
        state
    }
}

/// Player (10) against AI (50): the canonical two-planet duel.
#[must_use]
pub fn duel() -> GameState {
    StateBuilder::new()
        .planet(Owner::Player, fixed(10))
        .planet(Owner::Ai, fixed(50))
        .build()
}

/// Player (20) next to a neutral rock (5) and an AI stronghold (60).
#[must_use]
pub fn frontier() -> GameState {
    StateBuilder::new()
        .producing_planet(Owner::Player, fixed(20), fixed(1))
        .producing_planet(Owner::Neutral, fixed(5), fixed(1))
        .producing_planet(Owner::Ai, fixed(60), fixed(2))
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_assigns_sequential_ids() {
        let state = frontier();
        let ids: Vec<_> = state.planets.iter().map(|p| p.id.0).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_builder_fleets_get_unique_ids() {
        let state = StateBuilder::new()
            .planet(Owner::Player, fixed(10))
            .planet(Owner::Ai, fixed(10))
            .fleet(0, 1, 3, Owner::Player, fixed_f(0.5))
            .fleet(1, 0, 4, Owner::Ai, fixed(0))
            .build();
        assert_eq!(state.fleets.len(), 2);
        assert_ne!(state.fleets[0].id, state.fleets[1].id);
    }

    #[test]
    fn test_playing_level() {
        let sim = playing_level(1, 42);
        assert!(sim.is_playing());
    }
}
