//! Headless Sol Dominion runner for autopilot play and CI verification.
//!
//! This crate drives `sol_core` sessions without any presentation layer:
//!
//! - **Interactive control**: a controller process plays through JSON
//!   commands on stdin, with responses on stdout
//! - **Balance runs**: scripted player strategies play many seeds in
//!   parallel and the outcomes are aggregated
//! - **Determinism checks**: the same seed run repeatedly, plus a
//!   record-and-replay round trip, must agree on the final state hash
//!
//! # Protocol
//!
//! Communication uses JSON lines (one JSON object per line):
//!
//! - **stdin**: Commands from the controller (start_level, click, tick, ...)
//! - **stdout**: State snapshots and responses (JSON)
//! - **stderr**: Logs (human-readable)
//!
//! See [`protocol`] for the full command and response set.
//!
//! # Example
//!
//! ```bash
//! # Run interactively
//! printf '{"cmd":"start_level","level":1}\n{"cmd":"tick","count":60}\n' | cargo run -p sol_headless
//!
//! # Balance run
//! cargo run -p sol_headless -- batch --level 3 --count 200 --strategy turtle
//!
//! # Verify determinism
//! cargo run -p sol_headless -- verify --level 5 --seed 12345
//! ```

#![forbid(unsafe_code)]

pub mod batch;
pub mod error;
pub mod game_runner;
pub mod level_loader;
pub mod metrics;
pub mod protocol;
pub mod runner;
pub mod strategies;

pub use batch::{run_batch, verify_determinism, BatchConfig, BatchResults, VerifyReport};
pub use error::{HeadlessError, Result};
pub use game_runner::{record_game, run_game, GameConfig};
pub use level_loader::load_levels;
pub use metrics::{BatchSummary, GameMetrics, GameOutcome, MetricsCollector};
pub use protocol::{Command, Response};
pub use runner::{HeadlessConfig, HeadlessRunner};
pub use strategies::{Strategy, StrategyExecutor};
