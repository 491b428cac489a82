//! JSON-lines protocol for driving a session from another process.
//!
//! The runner communicates via JSON lines (one JSON object per line):
//!
//! **Input (stdin):** commands from the controller
//! **Output (stdout):** responses and state snapshots
//!
//! # Protocol Flow
//!
//! 1. Runner starts, outputs `{"type":"ready","version":"1.0","tick":0}`
//! 2. Controller sends commands as JSON lines
//! 3. Runner answers every command with at least one line
//! 4. When a game ends, the runner emits `{"type":"game_over",...}`
//!
//! # Example Session
//!
//! ```text
//! <- {"type":"ready","version":"1.0","tick":0}
//! -> {"cmd":"start_level","level":1}
//! <- {"type":"ack","cmd":"start_level","detail":"level 1: Inner Ring Conflict"}
//! -> {"cmd":"click","planet":0}
//! <- {"type":"ack","cmd":"click","detail":"selected planet-0"}
//! -> {"cmd":"click","planet":1}
//! <- {"type":"ack","cmd":"click","detail":"dispatched fleet 1"}
//! -> {"cmd":"tick","count":60}
//! <- {"type":"state","tick":60,"status":"Playing",...}
//! -> {"cmd":"quit"}
//! <- {"type":"bye"}
//! ```

use serde::{Deserialize, Serialize};

use sol_core::data::LevelRegistry;
use sol_core::owner::Owner;
use sol_core::selection::ClickOutcome;
use sol_core::simulation::Simulation;
use sol_core::state::GameStatus;

/// Protocol version reported in the ready line.
pub const PROTOCOL_VERSION: &str = "1.0";

// ============================================================================
// Input Commands (controller -> runner)
// ============================================================================

/// Commands accepted by the headless runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Command {
    /// Load a level from the catalog and start playing it.
    StartLevel { level: u32 },

    /// Click a planet, exactly as a player would.
    Click { planet: u32 },

    /// Abandon the current level.
    Menu,

    /// Advance the simulation by N ticks (default: 1).
    Tick {
        #[serde(default = "default_tick_count")]
        count: u32,
    },

    /// Feed wall-clock seconds into the fixed-step clock.
    Advance { seconds: f64 },

    /// Report the current state without advancing time.
    Query,

    /// Report the state hash (for determinism checks).
    Hash,

    /// List the level catalog.
    Levels,

    /// Shut the runner down.
    Quit,
}

fn default_tick_count() -> u32 {
    1
}

// ============================================================================
// Output Responses (runner -> controller)
// ============================================================================

/// Responses written by the headless runner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    /// Runner is ready to accept commands.
    Ready { version: String, tick: u64 },

    /// Acknowledgment of a command.
    Ack {
        cmd: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        detail: Option<String>,
    },

    /// A command could not be processed.
    Error {
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cmd: Option<String>,
    },

    /// Full snapshot of the session.
    State(StateView),

    /// The level catalog.
    Levels { levels: Vec<LevelInfo> },

    /// State hash at a tick.
    StateHash { tick: u64, hash: u64 },

    /// The running level has ended.
    GameOver {
        result: GameResult,
        level: u32,
        tick: u64,
    },

    /// Sent once before shutdown.
    Bye,
}

// ============================================================================
// State Types
// ============================================================================

/// Snapshot of a running session. Counts are reported as floats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateView {
    pub tick: u64,
    pub status: GameStatus,
    pub level: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<u32>,
    pub planets: Vec<PlanetView>,
    pub fleets: Vec<FleetView>,
    pub summary: SummaryView,
    pub hash: u64,
}

/// One planet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetView {
    pub id: u32,
    pub name: String,
    pub owner: Owner,
    pub fleet_count: f64,
    pub production_rate: f64,
}

/// One fleet in transit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetView {
    pub id: u64,
    pub from: u32,
    pub to: u32,
    pub owner: Owner,
    pub count: u32,
    pub progress: f64,
}

/// The player's HUD numbers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryView {
    pub total_fleets: f64,
    pub planets_owned: usize,
    pub planets_total: usize,
}

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelInfo {
    pub id: u32,
    pub name: String,
    pub planets: usize,
}

/// How a level ended, from the player's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameResult {
    Victory,
    Defeat,
}

impl GameResult {
    /// Map a terminal status to a result.
    #[must_use]
    pub const fn from_status(status: GameStatus) -> Option<Self> {
        match status {
            GameStatus::Won => Some(Self::Victory),
            GameStatus::Lost => Some(Self::Defeat),
            _ => None,
        }
    }
}

impl StateView {
    /// Capture the current session.
    #[must_use]
    pub fn capture(sim: &Simulation) -> Self {
        let state = sim.state();
        let summary = sim.player_summary();
        Self {
            tick: sim.get_tick(),
            status: sim.status(),
            level: state.current_level,
            selected: sim.selected().map(|p| p.0),
            planets: state
                .planets
                .iter()
                .map(|p| PlanetView {
                    id: p.id.0,
                    name: p.name.clone(),
                    owner: p.owner,
                    fleet_count: p.fleet_count.to_num(),
                    production_rate: p.production_rate.to_num(),
                })
                .collect(),
            fleets: state
                .fleets
                .iter()
                .map(|f| FleetView {
                    id: f.id.0,
                    from: f.from.0,
                    to: f.to.0,
                    owner: f.owner,
                    count: f.count,
                    progress: f.progress.to_num(),
                })
                .collect(),
            summary: SummaryView {
                total_fleets: summary.total_fleets.to_num(),
                planets_owned: summary.planets_owned,
                planets_total: summary.planets_total,
            },
            hash: sim.state_hash(),
        }
    }
}

impl LevelInfo {
    /// List every level in a registry.
    #[must_use]
    pub fn catalog(levels: &LevelRegistry) -> Vec<Self> {
        levels
            .levels()
            .iter()
            .map(|l| Self {
                id: l.id,
                name: l.name.clone(),
                planets: l.planets.len(),
            })
            .collect()
    }
}

// ============================================================================
// Helpers
// ============================================================================

impl Response {
    /// Create a ready response.
    #[must_use]
    pub fn ready(tick: u64) -> Self {
        Self::Ready {
            version: PROTOCOL_VERSION.to_string(),
            tick,
        }
    }

    /// Create a bare acknowledgment.
    #[must_use]
    pub fn ack(cmd: &str) -> Self {
        Self::Ack {
            cmd: cmd.to_string(),
            detail: None,
        }
    }

    /// Create an acknowledgment with a note.
    #[must_use]
    pub fn ack_with(cmd: &str, detail: impl Into<String>) -> Self {
        Self::Ack {
            cmd: cmd.to_string(),
            detail: Some(detail.into()),
        }
    }

    /// Create an error response.
    #[must_use]
    pub fn error(message: impl Into<String>, cmd: Option<&str>) -> Self {
        Self::Error {
            message: message.into(),
            cmd: cmd.map(String::from),
        }
    }

    /// Snapshot of the session.
    #[must_use]
    pub fn state(sim: &Simulation) -> Self {
        Self::State(StateView::capture(sim))
    }

    /// Serialize to a JSON line (with newline).
    #[must_use]
    pub fn to_json_line(&self) -> String {
        let mut json = serde_json::to_string(self).unwrap_or_else(|e| {
            format!(r#"{{"type":"error","message":"serialization failed: {e}"}}"#)
        });
        json.push('\n');
        json
    }
}

/// Human-readable description of a click result.
#[must_use]
pub fn describe_click(outcome: ClickOutcome) -> String {
    match outcome {
        ClickOutcome::Selected(p) => format!("selected {p}"),
        ClickOutcome::Deselected(p) => format!("deselected {p}"),
        ClickOutcome::Dispatched(Some(id)) => format!("dispatched fleet {}", id.0),
        ClickOutcome::Dispatched(None) => "dispatch refused".to_string(),
        ClickOutcome::Ignored => "ignored".to_string(),
    }
}

impl Command {
    /// Parse from a JSON line.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Command name for acknowledgments.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::StartLevel { .. } => "start_level",
            Self::Click { .. } => "click",
            Self::Menu => "menu",
            Self::Tick { .. } => "tick",
            Self::Advance { .. } => "advance",
            Self::Query => "query",
            Self::Hash => "hash",
            Self::Levels => "levels",
            Self::Quit => "quit",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sol_core::planet::PlanetId;

    #[test]
    fn test_parse_tick_command() {
        let cmd = Command::from_json(r#"{"cmd":"tick","count":60}"#).unwrap();
        assert_eq!(cmd, Command::Tick { count: 60 });
    }

    #[test]
    fn test_default_tick_count() {
        let cmd = Command::from_json(r#"{"cmd":"tick"}"#).unwrap();
        assert_eq!(cmd, Command::Tick { count: 1 });
    }

    #[test]
    fn test_parse_start_level_and_click() {
        assert_eq!(
            Command::from_json(r#"{"cmd":"start_level","level":3}"#).unwrap(),
            Command::StartLevel { level: 3 }
        );
        assert_eq!(
            Command::from_json(r#"{"cmd":"click","planet":2}"#).unwrap(),
            Command::Click { planet: 2 }
        );
    }

    #[test]
    fn test_unknown_command_is_rejected() {
        assert!(Command::from_json(r#"{"cmd":"spawn","x":1}"#).is_err());
        assert!(Command::from_json("not json").is_err());
    }

    #[test]
    fn test_names_match_wire_tags() {
        for (json, name) in [
            (r#"{"cmd":"menu"}"#, "menu"),
            (r#"{"cmd":"advance","seconds":0.5}"#, "advance"),
            (r#"{"cmd":"query"}"#, "query"),
            (r#"{"cmd":"hash"}"#, "hash"),
            (r#"{"cmd":"levels"}"#, "levels"),
            (r#"{"cmd":"quit"}"#, "quit"),
        ] {
            assert_eq!(Command::from_json(json).unwrap().name(), name);
        }
    }

    #[test]
    fn test_response_lines() {
        let ready = Response::ready(0).to_json_line();
        assert!(ready.ends_with('\n'));
        assert!(ready.contains(r#""type":"ready""#));

        let ack = Response::ack("menu").to_json_line();
        assert!(!ack.contains("detail"));

        let over = Response::GameOver {
            result: GameResult::Defeat,
            level: 1,
            tick: 900,
        }
        .to_json_line();
        assert!(over.contains(r#""result":"defeat""#));
    }

    #[test]
    fn test_state_snapshot_reports_floats() {
        let levels = LevelRegistry::builtin().unwrap();
        let mut sim = Simulation::default();
        sim.start_level(&levels, 1).unwrap();
        sim.click_planet(PlanetId(0));

        let view = StateView::capture(&sim);
        assert_eq!(view.level, 1);
        assert_eq!(view.selected, Some(0));
        assert_eq!(view.planets.len(), 3);
        assert!((view.planets[0].fleet_count - 10.0).abs() < 1e-9);

        let json = Response::State(view.clone()).to_json_line();
        let back: Response = serde_json::from_str(json.trim()).unwrap();
        assert_eq!(back, Response::State(view));
    }

    #[test]
    fn test_describe_click() {
        assert_eq!(
            describe_click(ClickOutcome::Selected(PlanetId(4))),
            "selected planet-4"
        );
        assert_eq!(describe_click(ClickOutcome::Ignored), "ignored");
    }
}
