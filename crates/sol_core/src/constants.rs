//! Game rule constants.
//!
//! Percentages are whole numbers and converted with [`crate::math::percent`].

/// Simulation ticks per simulated second (motion cadence).
pub const TICK_RATE: u32 = 60;

/// Fast ticks between economy ticks (production + AI).
pub const ECONOMY_INTERVAL_TICKS: u32 = TICK_RATE;

/// A planet needs at least this many fleets before it may dispatch.
pub const MIN_DISPATCH_GARRISON: i32 = 2;

/// Share of the garrison sent by a player click, in percent.
pub const PLAYER_DISPATCH_PERCENT: i32 = 50;

/// An AI planet only considers attacking above this garrison.
pub const AI_ATTACK_THRESHOLD: i32 = 30;

/// An AI planet attacks when its uniform draw exceeds this value.
pub const AI_ATTACK_ROLL: f64 = 0.7;

/// Share of the garrison an AI attack commits, in percent.
pub const AI_COMMIT_PERCENT: i32 = 50;

/// Default fleet speed: transit progress per simulated second, in percent.
///
/// At 60 ticks per second this is 0.005 progress per tick, a little over
/// three seconds from launch to arrival.
pub const FLEET_SPEED_PERCENT: i32 = 30;

/// Default RNG seed.
pub const DEFAULT_SEED: u64 = 42;
