//! Session container and fixed-step clock.
//!
//! [`Simulation`] owns the single authoritative [`GameState`] plus the
//! session-only pieces around it: the player's selection, the seeded RNG
//! and the tick counter. Every mutation goes through it.
//!
//! # Tick order
//!
//! Each fast tick:
//!
//! 1. Increment the tick counter.
//! 2. On economy ticks (every `economy_interval_ticks`), run production,
//!    then the AI against the post-production snapshot.
//! 3. Advance fleets and resolve arrivals in insertion order.
//! 4. Evaluate win/loss.
//!
//! Nothing runs unless the status is `Playing`.
//!
//! # Determinism
//!
//! - Fixed-point arithmetic throughout (see [`Fixed`])
//! - A seeded [`ChaCha8Rng`], reseeded on every level start
//! - Planets and fleets iterated in list order
//!
//! Two sessions fed the same seed, level and clicks at the same ticks
//! produce the same [`Simulation::state_hash`].
//!
//! # Example
//!
//! ```
//! use sol_core::data::LevelRegistry;
//! use sol_core::planet::PlanetId;
//! use sol_core::simulation::Simulation;
//!
//! let levels = LevelRegistry::builtin().unwrap();
//! let mut sim = Simulation::default();
//! sim.start_level(&levels, 1).unwrap();
//!
//! // Select the player's home world, then send half its garrison.
//! sim.click_planet(PlanetId(0));
//! sim.click_planet(PlanetId(1));
//!
//! for _ in 0..60 {
//!     sim.tick();
//! }
//! assert_eq!(sim.get_tick(), 60);
//! ```

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::combat::ArrivalReport;
use crate::constants::{DEFAULT_SEED, ECONOMY_INTERVAL_TICKS, PLAYER_DISPATCH_PERCENT, TICK_RATE};
use crate::data::{LevelData, LevelRegistry};
use crate::dispatch::default_fleet_speed;
use crate::error::{GameError, Result};
use crate::fleet::FleetId;
use crate::math::{fixed_serde, percent, Fixed};
use crate::planet::PlanetId;
use crate::selection::{ClickOutcome, Selection};
use crate::state::{GameState, GameStatus, PlayerSummary};
use crate::{ai, motion, production, victory};

/// Session tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    /// RNG seed for the AI.
    pub seed: u64,
    /// Fast ticks per simulated second.
    pub tick_rate: u32,
    /// Fast ticks between economy ticks.
    pub economy_interval_ticks: u32,
    /// Transit progress per simulated second for new fleets.
    #[serde(with = "fixed_serde")]
    pub fleet_speed: Fixed,
    /// Share of the garrison a player click sends.
    #[serde(with = "fixed_serde")]
    pub player_dispatch_ratio: Fixed,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            tick_rate: TICK_RATE,
            economy_interval_ticks: ECONOMY_INTERVAL_TICKS,
            fleet_speed: default_fleet_speed(),
            player_dispatch_ratio: percent(PLAYER_DISPATCH_PERCENT),
        }
    }
}

impl SimConfig {
    /// Default config with a different seed.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Simulated seconds covered by one fast tick.
    #[must_use]
    pub fn tick_seconds(&self) -> Fixed {
        Fixed::ONE / Fixed::from_num(self.tick_rate.max(1))
    }

    fn economy_interval(&self) -> u64 {
        u64::from(self.economy_interval_ticks.max(1))
    }
}

/// Everything that happened during one fast tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickEvents {
    /// Tick number after the step.
    pub tick: u64,
    /// Whether production and the AI ran.
    pub economy: bool,
    /// Fleets launched by player clicks since the previous tick.
    pub player_dispatches: Vec<FleetId>,
    /// Fleets launched by the AI this tick.
    pub ai_dispatches: Vec<FleetId>,
    /// Arrivals resolved this tick, in resolution order.
    pub arrivals: Vec<ArrivalReport>,
    /// New status, if it changed.
    pub status_change: Option<GameStatus>,
}

/// The game session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Simulation {
    config: SimConfig,
    tick: u64,
    state: GameState,
    selection: Selection,
    rng: ChaCha8Rng,
    #[serde(with = "fixed_serde")]
    accumulator: Fixed,
    pending_dispatches: Vec<FleetId>,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}

impl Simulation {
    /// Create a session sitting in the menu.
    #[must_use]
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            tick: 0,
            state: GameState::menu(),
            selection: Selection::new(config.player_dispatch_ratio, config.fleet_speed),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            accumulator: Fixed::ZERO,
            pending_dispatches: Vec::new(),
        }
    }

    /// Session configuration.
    #[must_use]
    pub const fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Fast ticks since the level started.
    #[must_use]
    pub const fn get_tick(&self) -> u64 {
        self.tick
    }

    /// The authoritative game state.
    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> GameStatus {
        self.state.status
    }

    /// Whether a level is running.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.state.status == GameStatus::Playing
    }

    /// Currently selected source planet.
    #[must_use]
    pub const fn selected(&self) -> Option<PlanetId> {
        self.selection.selected()
    }

    /// HUD aggregates for the player.
    #[must_use]
    pub fn player_summary(&self) -> PlayerSummary {
        self.state.player_summary()
    }

    /// Start level `id` from `levels`.
    ///
    /// # Errors
    ///
    /// [`GameError::LevelNotFound`] for an unknown id, or
    /// [`GameError::InvalidLevel`] if the level fails validation. The
    /// session is left untouched on error.
    pub fn start_level(&mut self, levels: &LevelRegistry, id: u32) -> Result<()> {
        let level = levels.get(id).ok_or(GameError::LevelNotFound(id))?;
        self.start_level_data(level)
    }

    /// Start a level from fixture data.
    ///
    /// # Errors
    ///
    /// [`GameError::InvalidLevel`] if the level fails validation.
    pub fn start_level_data(&mut self, level: &LevelData) -> Result<()> {
        level.validate()?;

        self.state = GameState::from_level(level);
        self.reset_session();

        tracing::info!(
            level = level.id,
            name = %level.name,
            planets = self.state.planets.len(),
            seed = self.config.seed,
            "Level started"
        );
        Ok(())
    }

    /// Drop the running game and go back to the menu.
    pub fn return_to_menu(&mut self) {
        let mut menu = GameState::menu();
        menu.current_level = self.state.current_level;
        self.state = menu;
        self.reset_session();
        tracing::info!("Returned to menu");
    }

    fn reset_session(&mut self) {
        self.tick = 0;
        self.accumulator = Fixed::ZERO;
        self.selection.clear();
        self.pending_dispatches.clear();
        self.rng = ChaCha8Rng::seed_from_u64(self.config.seed);
    }

    /// Handle a player click on a planet.
    ///
    /// Ignored unless a level is running.
    pub fn click_planet(&mut self, planet: PlanetId) -> ClickOutcome {
        if !self.is_playing() {
            return ClickOutcome::Ignored;
        }

        let outcome = self.selection.click(&mut self.state, planet);
        if let ClickOutcome::Dispatched(Some(id)) = outcome {
            self.pending_dispatches.push(id);
        }
        outcome
    }

    /// Run one fast tick.
    ///
    /// Does nothing outside `Playing`; the returned events then carry the
    /// unchanged tick number and nothing else.
    pub fn tick(&mut self) -> TickEvents {
        let mut events = TickEvents {
            tick: self.tick,
            ..TickEvents::default()
        };
        if !self.is_playing() {
            return events;
        }

        self.tick += 1;
        events.tick = self.tick;
        events.player_dispatches = std::mem::take(&mut self.pending_dispatches);

        if self.tick % self.config.economy_interval() == 0 {
            production::run(&mut self.state);
            events.ai_dispatches = ai::run(&mut self.state, &mut self.rng, self.config.fleet_speed);
            events.economy = true;
        }

        events.arrivals = motion::run(&mut self.state, self.config.tick_seconds());

        let status = victory::evaluate(&self.state);
        if status != self.state.status {
            self.state.status = status;
            self.selection.clear();
            events.status_change = Some(status);
            tracing::info!(
                tick = self.tick,
                level = self.state.current_level,
                status = ?status,
                "Game over"
            );
        }

        #[cfg(feature = "debug-validation")]
        if let Err(e) = self.check_invariants() {
            tracing::error!(tick = self.tick, error = %e, "Invariant violated");
        }

        #[cfg(debug_assertions)]
        {
            let hash = self.state_hash();
            tracing::trace!(tick = self.tick, state_hash = hash, "Simulation state hash");
        }

        events
    }

    /// Feed `seconds` of wall time into the fixed-step clock.
    ///
    /// Runs as many whole ticks as the accumulated time covers and keeps
    /// the remainder for the next call. Outside `Playing` the time is
    /// discarded.
    pub fn advance(&mut self, seconds: Fixed) -> Vec<TickEvents> {
        if !self.is_playing() {
            self.accumulator = Fixed::ZERO;
            return Vec::new();
        }
        if seconds <= Fixed::ZERO {
            return Vec::new();
        }

        let step = self.config.tick_seconds();
        self.accumulator = self.accumulator.saturating_add(seconds);

        let mut events = Vec::new();
        while self.accumulator >= step && self.is_playing() {
            self.accumulator -= step;
            events.push(self.tick());
        }
        if !self.is_playing() {
            self.accumulator = Fixed::ZERO;
        }
        events
    }

    /// Run ticks until the game ends or `max_ticks` more have elapsed.
    ///
    /// Returns the final status.
    pub fn run_until_finished(&mut self, max_ticks: u64) -> GameStatus {
        for _ in 0..max_ticks {
            if !self.is_playing() {
                break;
            }
            self.tick();
        }
        self.status()
    }

    /// Check state invariants.
    ///
    /// # Errors
    ///
    /// [`GameError::InvalidState`] naming the first violation found.
    pub fn check_invariants(&self) -> Result<()> {
        for planet in &self.state.planets {
            if planet.fleet_count < Fixed::ZERO {
                return Err(GameError::InvalidState(format!(
                    "{} has a negative garrison",
                    planet.id
                )));
            }
        }
        for fleet in &self.state.fleets {
            if fleet.count == 0 {
                return Err(GameError::InvalidState(format!("{} is empty", fleet.id)));
            }
            if fleet.progress >= Fixed::ONE {
                return Err(GameError::InvalidState(format!(
                    "{} arrived but is still in flight",
                    fleet.id
                )));
            }
            if fleet.id.0 >= self.state.next_fleet_id() {
                return Err(GameError::InvalidState(format!(
                    "{} was never issued",
                    fleet.id
                )));
            }
        }
        Ok(())
    }

    /// Hash of the simulation-relevant state.
    ///
    /// Covers the tick, status, level, planets and fleets (sorted by id,
    /// fixed-point values by their bits). The selection and the clock
    /// remainder are excluded.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();

        self.tick.hash(&mut hasher);
        self.state.status.hash(&mut hasher);
        self.state.current_level.hash(&mut hasher);
        self.state.next_fleet_id().hash(&mut hasher);

        let mut planets: Vec<_> = self.state.planets.iter().collect();
        planets.sort_by_key(|p| p.id);
        planets.len().hash(&mut hasher);
        for planet in planets {
            planet.id.hash(&mut hasher);
            planet.owner.hash(&mut hasher);
            planet.fleet_count.to_bits().hash(&mut hasher);
            planet.production_rate.to_bits().hash(&mut hasher);
        }

        let mut fleets: Vec<_> = self.state.fleets.iter().collect();
        fleets.sort_by_key(|f| f.id);
        fleets.len().hash(&mut hasher);
        for fleet in fleets {
            fleet.id.hash(&mut hasher);
            fleet.from.hash(&mut hasher);
            fleet.to.hash(&mut hasher);
            fleet.count.hash(&mut hasher);
            fleet.owner.hash(&mut hasher);
            fleet.progress.to_bits().hash(&mut hasher);
            fleet.speed.to_bits().hash(&mut hasher);
        }

        hasher.finish()
    }

    /// Serialize the whole session, RNG included.
    ///
    /// # Errors
    ///
    /// [`GameError::InvalidState`] if encoding fails.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        bincode::serialize(self)
            .map_err(|e| GameError::InvalidState(format!("Failed to serialize simulation: {e}")))
    }

    /// Restore a session from [`Simulation::serialize`] output.
    ///
    /// # Errors
    ///
    /// [`GameError::InvalidState`] if the bytes are not a valid session.
    pub fn deserialize(data: &[u8]) -> Result<Self> {
        bincode::deserialize(data)
            .map_err(|e| GameError::InvalidState(format!("Failed to deserialize simulation: {e}")))
    }
}
