//! Interactive headless runner.
//!
//! Reads [`Command`]s as JSON lines, applies them to one session and
//! writes [`Response`]s. Command handling is synchronous: every command is
//! answered before the next line is read.

use std::io::{self, BufRead, Write};

use tracing::{debug, info};

use sol_core::data::LevelRegistry;
use sol_core::math::Fixed;
use sol_core::planet::PlanetId;
use sol_core::simulation::{SimConfig, Simulation, TickEvents};
use sol_core::state::GameStatus;

use crate::error::Result;
use crate::protocol::{describe_click, Command, GameResult, LevelInfo, Response};

/// Headless runner configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadlessConfig {
    /// Seed for the AI.
    pub seed: u64,
    /// Upper bound on a single `tick` command.
    pub max_ticks_per_command: u32,
    /// Upper bound on a single `advance` command, in seconds.
    pub max_advance_seconds: u32,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            seed: sol_core::constants::DEFAULT_SEED,
            max_ticks_per_command: 60 * 60 * 10,
            max_advance_seconds: 60 * 10,
        }
    }
}

/// Headless runner driving one session.
#[derive(Debug)]
pub struct HeadlessRunner {
    config: HeadlessConfig,
    levels: LevelRegistry,
    sim: Simulation,
    finished: bool,
}

impl HeadlessRunner {
    /// Create a runner sitting at the menu.
    #[must_use]
    pub fn new(levels: LevelRegistry, config: HeadlessConfig) -> Self {
        Self {
            sim: Simulation::new(SimConfig::with_seed(config.seed)),
            config,
            levels,
            finished: false,
        }
    }

    /// The session being driven.
    #[must_use]
    pub const fn simulation(&self) -> &Simulation {
        &self.sim
    }

    /// Whether `quit` has been received.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Parse and handle one input line. Blank lines produce nothing.
    pub fn handle_line(&mut self, line: &str) -> Vec<Response> {
        let line = line.trim();
        if line.is_empty() {
            return Vec::new();
        }
        match Command::from_json(line) {
            Ok(cmd) => self.handle(cmd),
            Err(e) => vec![Response::error(format!("parse error: {e}"), None)],
        }
    }

    /// Handle one command.
    pub fn handle(&mut self, cmd: Command) -> Vec<Response> {
        let name = cmd.name();
        debug!(cmd = name, "Handling command");

        match cmd {
            Command::StartLevel { level } => match self.sim.start_level(&self.levels, level) {
                Ok(()) => {
                    let title = self.levels.get(level).map_or("", |l| l.name.as_str());
                    vec![Response::ack_with(name, format!("level {level}: {title}"))]
                }
                Err(e) => vec![Response::error(e.to_string(), Some(name))],
            },
            Command::Click { planet } => {
                let outcome = self.sim.click_planet(PlanetId(planet));
                vec![Response::ack_with(name, describe_click(outcome))]
            }
            Command::Menu => {
                self.sim.return_to_menu();
                vec![Response::ack(name)]
            }
            Command::Tick { count } => self.tick(count),
            Command::Advance { seconds } => self.advance(seconds),
            Command::Query => vec![Response::state(&self.sim)],
            Command::Hash => vec![Response::StateHash {
                tick: self.sim.get_tick(),
                hash: self.sim.state_hash(),
            }],
            Command::Levels => vec![Response::Levels {
                levels: LevelInfo::catalog(&self.levels),
            }],
            Command::Quit => {
                self.finished = true;
                vec![Response::Bye]
            }
        }
    }

    fn tick(&mut self, count: u32) -> Vec<Response> {
        if count > self.config.max_ticks_per_command {
            return vec![Response::error(
                format!(
                    "count {count} exceeds the limit of {}",
                    self.config.max_ticks_per_command
                ),
                Some("tick"),
            )];
        }
        if let Some(error) = self.require_level("tick") {
            return vec![error];
        }

        let mut responses = Vec::new();
        for _ in 0..count {
            if !self.sim.is_playing() {
                break;
            }
            let events = self.sim.tick();
            self.push_game_over(&events, &mut responses);
        }
        responses.push(Response::state(&self.sim));
        responses
    }

    fn advance(&mut self, seconds: f64) -> Vec<Response> {
        if !seconds.is_finite()
            || seconds < 0.0
            || seconds > f64::from(self.config.max_advance_seconds)
        {
            return vec![Response::error(
                format!(
                    "seconds must be between 0 and {}, got {seconds}",
                    self.config.max_advance_seconds
                ),
                Some("advance"),
            )];
        }
        if let Some(error) = self.require_level("advance") {
            return vec![error];
        }

        let mut responses = Vec::new();
        for events in self.sim.advance(Fixed::saturating_from_num(seconds)) {
            self.push_game_over(&events, &mut responses);
        }
        responses.push(Response::state(&self.sim));
        responses
    }

    fn require_level(&self, cmd: &str) -> Option<Response> {
        (self.sim.status() == GameStatus::Menu)
            .then(|| Response::error("no level is running; send start_level first", Some(cmd)))
    }

    fn push_game_over(&self, events: &TickEvents, responses: &mut Vec<Response>) {
        if let Some(result) = events.status_change.and_then(GameResult::from_status) {
            info!(tick = events.tick, ?result, "Level ended");
            responses.push(Response::GameOver {
                result,
                level: self.sim.state().current_level,
                tick: events.tick,
            });
        }
    }

    /// Run the command loop until `quit` or end of input.
    ///
    /// Writes `ready` first and `bye` last, flushing after every command.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input or writing output fails.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        output.write_all(Response::ready(self.sim.get_tick()).to_json_line().as_bytes())?;
        output.flush()?;

        for line in input.lines() {
            let line = line?;
            for response in self.handle_line(&line) {
                output.write_all(response.to_json_line().as_bytes())?;
            }
            output.flush()?;
            if self.finished {
                return Ok(());
            }
        }

        info!("Input closed without quit");
        output.write_all(Response::Bye.to_json_line().as_bytes())?;
        output.flush()?;
        Ok(())
    }

    /// Run the command loop on stdin and stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if stdin or stdout fails.
    pub fn run_stdio(&mut self) -> Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.run(stdin.lock(), stdout.lock())
    }
}
