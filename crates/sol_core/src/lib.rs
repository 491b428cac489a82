//! # Sol Core
//!
//! Deterministic simulation core for Sol Dominion, a planet-conquest RTS.
//!
//! This crate contains **only** the authoritative game logic:
//! - No rendering
//! - No IO (the level catalog is embedded at compile time)
//! - No system randomness (the AI draws from a seeded RNG)
//! - No floating-point math in the simulation (uses fixed-point)
//!
//! This separation enables:
//! - Headless runs and batch balance testing
//! - Replay systems
//! - Determinism testing
//!
//! ## Crate Structure
//!
//! - [`simulation`] - Session container and fixed-step clock
//! - [`state`] - Planets, fleets and status
//! - [`dispatch`] - Splitting garrisons into fleets
//! - [`selection`] - Player click intent
//! - [`production`] - Garrison growth
//! - [`ai`] - Hostile faction decisions
//! - [`motion`], [`combat`] - Fleet transit and arrival resolution
//! - [`victory`] - Win/loss evaluation
//! - [`data`] - Level fixtures
//! - [`replay`] - Recording and playback
//! - [`math`] - Fixed-point math utilities

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod ai;
pub mod combat;
pub mod constants;
pub mod data;
pub mod dispatch;
pub mod error;
pub mod fleet;
pub mod math;
pub mod motion;
pub mod owner;
pub mod planet;
pub mod production;
pub mod replay;
pub mod selection;
pub mod simulation;
pub mod state;
pub mod victory;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::combat::{ArrivalOutcome, ArrivalReport};
    pub use crate::data::{LevelData, LevelRegistry, PlanetTemplate};
    pub use crate::dispatch::{dispatch, DispatchOrder};
    pub use crate::error::{GameError, Result};
    pub use crate::fleet::{FleetGroup, FleetId};
    pub use crate::math::Fixed;
    pub use crate::owner::Owner;
    pub use crate::planet::{Planet, PlanetId};
    pub use crate::replay::{Replay, ReplayPlayer, ReplayRecorder};
    pub use crate::selection::ClickOutcome;
    pub use crate::simulation::{SimConfig, Simulation, TickEvents};
    pub use crate::state::{GameState, GameStatus, PlayerSummary};
}
