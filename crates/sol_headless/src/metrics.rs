//! Game metrics collection for balance analysis.

use serde::{Deserialize, Serialize};

use sol_core::combat::ArrivalOutcome;
use sol_core::owner::Owner;
use sol_core::simulation::{Simulation, TickEvents};
use sol_core::state::GameStatus;

/// How a headless game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOutcome {
    /// The player eliminated every hostile faction.
    Won,
    /// The player was eliminated.
    Lost,
    /// The tick limit ran out first.
    Timeout,
}

impl GameOutcome {
    /// Outcome for a session's status once the run stops.
    #[must_use]
    pub const fn from_status(status: GameStatus) -> Self {
        match status {
            GameStatus::Won => Self::Won,
            GameStatus::Lost => Self::Lost,
            _ => Self::Timeout,
        }
    }
}

/// A planet changing hands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureEvent {
    /// Tick of the arrival.
    pub tick: u64,
    /// Planet id.
    pub planet: u32,
    /// Owner before the arrival.
    pub previous_owner: Owner,
    /// Owner after the arrival.
    pub new_owner: Owner,
}

/// Complete metrics for a single game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameMetrics {
    /// Unique game identifier.
    pub game_id: String,
    /// Level played.
    pub level: u32,
    /// Random seed used.
    pub seed: u64,
    /// Player strategy name.
    pub strategy: String,
    /// How the game ended.
    pub outcome: GameOutcome,
    /// Total game duration in ticks.
    pub duration_ticks: u64,
    /// Fleets the player launched.
    pub player_dispatches: u32,
    /// Fleets the AI factions launched.
    pub ai_dispatches: u32,
    /// Planets the player took.
    pub planets_captured: u32,
    /// Planets the player lost.
    pub planets_lost: u32,
    /// Most planets the player held at once.
    pub peak_planets_owned: usize,
    /// Planets the player held at the end.
    pub final_planets_owned: usize,
    /// Player ships on planets and in flight at the end.
    pub final_player_fleets: f64,
    /// Tick of the player's first capture.
    pub first_capture_tick: Option<u64>,
    /// Every ownership change, in order.
    pub captures: Vec<CaptureEvent>,
    /// Final simulation state hash (for determinism validation).
    pub final_state_hash: u64,
}

/// Accumulates metrics tick by tick.
#[derive(Debug, Clone)]
pub struct MetricsCollector {
    game_id: String,
    strategy: String,
    player_dispatches: u32,
    ai_dispatches: u32,
    planets_captured: u32,
    planets_lost: u32,
    peak_planets_owned: usize,
    first_capture_tick: Option<u64>,
    captures: Vec<CaptureEvent>,
}

impl MetricsCollector {
    /// Start collecting for a session that has just started a level.
    #[must_use]
    pub fn new(game_id: impl Into<String>, strategy: impl Into<String>, sim: &Simulation) -> Self {
        Self {
            game_id: game_id.into(),
            strategy: strategy.into(),
            player_dispatches: 0,
            ai_dispatches: 0,
            planets_captured: 0,
            planets_lost: 0,
            peak_planets_owned: sim.player_summary().planets_owned,
            first_capture_tick: None,
            captures: Vec::new(),
        }
    }

    /// Fold one tick's events in.
    pub fn observe(&mut self, events: &TickEvents, sim: &Simulation) {
        self.player_dispatches += saturating_len(events.player_dispatches.len());
        self.ai_dispatches += saturating_len(events.ai_dispatches.len());

        for report in &events.arrivals {
            let ArrivalOutcome::Captured { previous_owner } = report.outcome else {
                continue;
            };
            if report.owner == Owner::Player {
                self.planets_captured += 1;
                self.first_capture_tick.get_or_insert(events.tick);
            }
            if previous_owner == Owner::Player {
                self.planets_lost += 1;
            }
            self.captures.push(CaptureEvent {
                tick: events.tick,
                planet: report.planet.0,
                previous_owner,
                new_owner: report.owner,
            });
        }

        self.peak_planets_owned = self
            .peak_planets_owned
            .max(sim.player_summary().planets_owned);
    }

    /// Close out the game.
    #[must_use]
    pub fn finish(self, sim: &Simulation) -> GameMetrics {
        let summary = sim.player_summary();
        GameMetrics {
            game_id: self.game_id,
            level: sim.state().current_level,
            seed: sim.config().seed,
            strategy: self.strategy,
            outcome: GameOutcome::from_status(sim.status()),
            duration_ticks: sim.get_tick(),
            player_dispatches: self.player_dispatches,
            ai_dispatches: self.ai_dispatches,
            planets_captured: self.planets_captured,
            planets_lost: self.planets_lost,
            peak_planets_owned: self.peak_planets_owned,
            final_planets_owned: summary.planets_owned,
            final_player_fleets: summary.total_fleets.to_num(),
            first_capture_tick: self.first_capture_tick,
            captures: self.captures,
            final_state_hash: sim.state_hash(),
        }
    }
}

fn saturating_len(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

/// Aggregate over a batch of games.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Games summarised.
    pub games: u32,
    /// Player victories.
    pub wins: u32,
    /// Player defeats.
    pub losses: u32,
    /// Games that hit the tick limit.
    pub timeouts: u32,
    /// Wins over games.
    pub win_rate: f64,
    /// Mean duration in ticks.
    pub mean_duration_ticks: f64,
    /// Mean duration of decided games only.
    pub mean_decided_duration_ticks: Option<f64>,
    /// Mean player dispatches per game.
    pub mean_player_dispatches: f64,
    /// Mean player captures per game.
    pub mean_planets_captured: f64,
}

impl BatchSummary {
    /// Summarise a set of games.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_games(games: &[GameMetrics]) -> Self {
        if games.is_empty() {
            return Self::default();
        }

        let count = |outcome: GameOutcome| {
            saturating_len(games.iter().filter(|g| g.outcome == outcome).count())
        };
        let n = games.len() as f64;
        let mean = |f: fn(&GameMetrics) -> f64| games.iter().map(f).sum::<f64>() / n;

        let decided: Vec<f64> = games
            .iter()
            .filter(|g| g.outcome != GameOutcome::Timeout)
            .map(|g| g.duration_ticks as f64)
            .collect();
        let wins = count(GameOutcome::Won);

        Self {
            games: saturating_len(games.len()),
            wins,
            losses: count(GameOutcome::Lost),
            timeouts: count(GameOutcome::Timeout),
            win_rate: f64::from(wins) / n,
            mean_duration_ticks: mean(|g| g.duration_ticks as f64),
            mean_decided_duration_ticks: (!decided.is_empty())
                .then(|| decided.iter().sum::<f64>() / decided.len() as f64),
            mean_player_dispatches: mean(|g| f64::from(g.player_dispatches)),
            mean_planets_captured: mean(|g| f64::from(g.planets_captured)),
        }
    }
}
