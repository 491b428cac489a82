//! Replay recording and playback.
//!
//! A replay stores the session as it was right after the level started
//! (seed and RNG included) plus every planet click with the tick it was
//! issued on. Replaying the clicks against the stored start reproduces
//! the game exactly.

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::planet::PlanetId;
use crate::selection::ClickOutcome;
use crate::simulation::{Simulation, TickEvents};

/// Replay encoding version.
pub const REPLAY_VERSION: u32 = 1;

/// A click and the tick it was issued on.
///
/// A click recorded at tick `t` was applied after `t` ticks had run,
/// before tick `t + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayClick {
    /// Ticks elapsed when the click happened.
    pub tick: u64,
    /// Planet clicked.
    pub planet: PlanetId,
}

/// A recorded game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replay {
    /// Encoding version.
    pub version: u32,
    /// Level played.
    pub level: u32,
    /// AI seed.
    pub seed: u64,
    /// Serialized session at level start.
    pub initial_state: Vec<u8>,
    /// Clicks in the order they were issued.
    pub clicks: Vec<ReplayClick>,
    /// Tick the recording stopped at.
    pub final_tick: u64,
    /// State hash at `final_tick`.
    pub final_hash: u64,
}

impl Replay {
    /// Start recording from a session that has just started a level.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be serialized.
    pub fn new(initial: &Simulation) -> Result<Self> {
        Ok(Self {
            version: REPLAY_VERSION,
            level: initial.state().current_level,
            seed: initial.config().seed,
            initial_state: initial.serialize()?,
            clicks: Vec::new(),
            final_tick: initial.get_tick(),
            final_hash: initial.state_hash(),
        })
    }

    /// Record a click.
    pub fn record_click(&mut self, tick: u64, planet: PlanetId) {
        self.clicks.push(ReplayClick { tick, planet });
    }

    /// Close the recording against the session's current state.
    pub fn finalize(&mut self, simulation: &Simulation) {
        self.final_tick = simulation.get_tick();
        self.final_hash = simulation.state_hash();
    }

    /// Session at level start.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored session is corrupt.
    pub fn restore_initial_state(&self) -> Result<Simulation> {
        Simulation::deserialize(&self.initial_state)
    }

    /// Clicks issued at `tick`.
    pub fn clicks_at_tick(&self, tick: u64) -> impl Iterator<Item = &ReplayClick> {
        self.clicks.iter().filter(move |c| c.tick == tick)
    }

    /// Recorded length in ticks.
    #[must_use]
    pub const fn duration(&self) -> u64 {
        self.final_tick
    }

    /// Encode for storage or transport.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self)
            .map_err(|e| GameError::InvalidState(format!("Failed to serialize replay: {e}")))
    }

    /// Decode bytes produced by [`Replay::to_bytes`].
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not a replay or the version differs.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let replay: Self = bincode::deserialize(bytes)
            .map_err(|e| GameError::InvalidState(format!("Failed to deserialize replay: {e}")))?;

        if replay.version != REPLAY_VERSION {
            return Err(GameError::InvalidState(format!(
                "Replay version mismatch: expected {REPLAY_VERSION}, got {}",
                replay.version
            )));
        }
        Ok(replay)
    }
}

/// Session wrapper that records every click it forwards.
#[derive(Debug, Clone)]
pub struct ReplayRecorder {
    simulation: Simulation,
    replay: Replay,
}

impl ReplayRecorder {
    /// Start recording. `simulation` should have just started a level.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be serialized.
    pub fn new(simulation: Simulation) -> Result<Self> {
        let replay = Replay::new(&simulation)?;
        Ok(Self { simulation, replay })
    }

    /// Forward a click and record it.
    pub fn click_planet(&mut self, planet: PlanetId) -> ClickOutcome {
        self.replay.record_click(self.simulation.get_tick(), planet);
        self.simulation.click_planet(planet)
    }

    /// Run one tick.
    pub fn tick(&mut self) -> TickEvents {
        self.simulation.tick()
    }

    /// The recorded session.
    #[must_use]
    pub const fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    /// Stop recording and return the replay.
    #[must_use]
    pub fn finish(mut self) -> Replay {
        self.replay.finalize(&self.simulation);
        self.replay
    }
}

/// Replay playback controller.
#[derive(Debug)]
pub struct ReplayPlayer {
    replay: Replay,
    simulation: Simulation,
    click_index: usize,
}

impl ReplayPlayer {
    /// Load a replay for playback.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial state cannot be restored.
    pub fn new(replay: Replay) -> Result<Self> {
        let simulation = replay.restore_initial_state()?;
        Ok(Self {
            replay,
            simulation,
            click_index: 0,
        })
    }

    /// Apply due clicks and run one tick.
    ///
    /// Returns true while there are more ticks to play.
    pub fn advance(&mut self) -> bool {
        if self.is_finished() {
            return false;
        }
        self.apply_due_clicks();
        self.simulation.tick();
        !self.is_finished()
    }

    fn apply_due_clicks(&mut self) {
        let now = self.simulation.get_tick();
        while let Some(click) = self.replay.clicks.get(self.click_index) {
            if click.tick > now {
                break;
            }
            self.simulation.click_planet(click.planet);
            self.click_index += 1;
        }
    }

    /// Jump to `target_tick` (clamped to the recording), replaying from the
    /// start if it lies behind the current position.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial state cannot be restored.
    pub fn seek(&mut self, target_tick: u64) -> Result<()> {
        if target_tick < self.simulation.get_tick() {
            self.simulation = self.replay.restore_initial_state()?;
            self.click_index = 0;
        }

        let target = target_tick.min(self.replay.final_tick);
        while self.simulation.get_tick() < target {
            let before = self.simulation.get_tick();
            self.apply_due_clicks();
            self.simulation.tick();
            if self.simulation.get_tick() == before {
                // The game ended before the target; nothing left to run.
                break;
            }
        }

        // Clicks issued after the last tick but before recording stopped.
        if self.simulation.get_tick() == self.replay.final_tick {
            self.apply_due_clicks();
        }
        Ok(())
    }

    /// Current tick.
    #[must_use]
    pub const fn current_tick(&self) -> u64 {
        self.simulation.get_tick()
    }

    /// The session being replayed.
    #[must_use]
    pub const fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    /// The replay being played.
    #[must_use]
    pub const fn replay(&self) -> &Replay {
        &self.replay
    }

    /// Whether playback reached the recorded end.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.simulation.get_tick() >= self.replay.final_tick || !self.simulation.is_playing()
    }

    /// Replay to the end and compare against the recorded hash.
    ///
    /// # Errors
    ///
    /// [`GameError::ReplayMismatch`] if the hashes differ, or a restore error.
    pub fn verify(&mut self) -> Result<()> {
        self.seek(self.replay.final_tick)?;
        let actual = self.simulation.state_hash();
        if actual != self.replay.final_hash {
            return Err(GameError::ReplayMismatch {
                expected: self.replay.final_hash,
                actual,
            });
        }
        Ok(())
    }

    /// Playback position in percent.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn progress_percent(&self) -> f64 {
        if self.replay.final_tick == 0 {
            100.0
        } else {
            (self.current_tick() as f64 / self.replay.final_tick as f64) * 100.0
        }
    }
}
