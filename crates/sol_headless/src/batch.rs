//! Batch game runner for balance testing.
//!
//! Runs many seeds of one level in parallel using rayon and aggregates
//! the results. Also hosts the determinism check behind `verify`.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use sol_core::data::LevelRegistry;
use sol_core::replay::{Replay, ReplayPlayer};

use crate::error::{HeadlessError, Result};
use crate::game_runner::{record_game, run_game, GameConfig, DEFAULT_MAX_TICKS};
use crate::metrics::{BatchSummary, GameMetrics, GameOutcome};
use crate::strategies::Strategy;

/// Configuration for a batch run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Level to play
    pub level: u32,
    /// Number of games to run
    pub game_count: u32,
    /// Maximum parallel games (0 = use rayon default)
    pub parallel_games: u32,
    /// Output directory for results
    pub output_dir: PathBuf,
    /// Starting seed; game `i` uses `seed_start + i`
    pub seed_start: u64,
    /// Maximum ticks per game
    pub max_ticks: u64,
    /// Player strategy preset or RON file
    pub strategy: String,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            level: 1,
            game_count: 100,
            parallel_games: 0,
            output_dir: PathBuf::from("results"),
            seed_start: 0,
            max_ticks: DEFAULT_MAX_TICKS,
            strategy: "greedy".to_string(),
        }
    }
}

impl BatchConfig {
    /// Create config for a specific level
    #[must_use]
    pub fn new(level: u32, game_count: u32) -> Self {
        Self {
            level,
            game_count,
            ..Default::default()
        }
    }

    /// Set output directory
    #[must_use]
    pub fn with_output(mut self, dir: PathBuf) -> Self {
        self.output_dir = dir;
        self
    }

    /// Set seed start
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed_start = seed;
        self
    }

    /// Set strategy
    #[must_use]
    pub fn with_strategy(mut self, strategy: &str) -> Self {
        self.strategy = strategy.to_string();
        self
    }

    /// Set per-game tick limit
    #[must_use]
    pub fn with_max_ticks(mut self, max_ticks: u64) -> Self {
        self.max_ticks = max_ticks;
        self
    }

    /// File name the results are saved under inside `output_dir`
    #[must_use]
    pub fn results_file(&self) -> PathBuf {
        self.output_dir.join(format!(
            "batch_level{}_{}_{}.json",
            self.level,
            Path::new(&self.strategy)
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("custom"),
            self.seed_start
        ))
    }
}

/// Results from a batch run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResults {
    /// Configuration used
    pub config: BatchConfig,
    /// Individual game metrics, in seed order
    pub games: Vec<GameMetrics>,
    /// Aggregate summary
    pub summary: BatchSummary,
    /// Total runtime
    pub duration_seconds: f64,
    /// Errors encountered
    pub errors: Vec<BatchError>,
}

impl BatchResults {
    /// Save results to JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load results from JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

/// Error during batch run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchError {
    /// Game index
    pub game_index: u32,
    /// Seed used
    pub seed: u64,
    /// Error message
    pub message: String,
}

/// Progress tracking for batch runs
#[derive(Debug)]
pub struct BatchProgress {
    total: u32,
    completed: AtomicU32,
    wins: AtomicU32,
    start_time: Instant,
}

impl BatchProgress {
    /// Create new progress tracker
    #[must_use]
    pub fn new(total: u32) -> Self {
        Self {
            total,
            completed: AtomicU32::new(0),
            wins: AtomicU32::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record a completed game and return the new completion count
    pub fn record_completion(&self, outcome: GameOutcome) -> u32 {
        if outcome == GameOutcome::Won {
            self.wins.fetch_add(1, Ordering::Relaxed);
        }
        self.completed.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Get current completion count
    #[must_use]
    pub fn current(&self) -> u32 {
        self.completed.load(Ordering::Relaxed)
    }

    /// Get completion percentage
    #[must_use]
    pub fn percentage(&self) -> f64 {
        f64::from(self.current()) / f64::from(self.total.max(1)) * 100.0
    }

    /// Player win rate over completed games
    #[must_use]
    pub fn win_rate(&self) -> f64 {
        let completed = self.current();
        if completed == 0 {
            return 0.0;
        }
        f64::from(self.wins.load(Ordering::Relaxed)) / f64::from(completed)
    }

    /// Get estimated time remaining
    #[must_use]
    pub fn eta(&self) -> Duration {
        let completed = self.current();
        if completed == 0 {
            return Duration::from_secs(0);
        }
        let per_game = self.start_time.elapsed().as_secs_f64() / f64::from(completed);
        let remaining = self.total.saturating_sub(completed);
        Duration::from_secs_f64(per_game * f64::from(remaining))
    }

    /// Log progress
    pub fn report(&self) {
        let eta = self.eta();
        info!(
            "Batch progress: {}/{} ({:.1}%), win rate {:.1}%, ETA {}m {}s",
            self.current(),
            self.total,
            self.percentage(),
            self.win_rate() * 100.0,
            eta.as_secs() / 60,
            eta.as_secs() % 60
        );
    }
}

/// Run a batch of games
///
/// # Errors
///
/// Fails before running anything if the strategy cannot be resolved or
/// the thread pool cannot be built. Per-game failures are collected in
/// [`BatchResults::errors`].
pub fn run_batch(levels: Arc<LevelRegistry>, config: BatchConfig) -> Result<BatchResults> {
    let strategy = Strategy::resolve(&config.strategy)?;
    let start = Instant::now();
    let progress = BatchProgress::new(config.game_count);

    info!(
        "Starting batch run: {} games of level {} with strategy '{}'",
        config.game_count, config.level, strategy.name
    );

    let play = |i: u32| {
        let seed = config.seed_start.wrapping_add(u64::from(i));
        let game = GameConfig {
            game_id: format!("level{}_seed{seed}", config.level),
            levels: Arc::clone(&levels),
            level: config.level,
            seed,
            max_ticks: config.max_ticks,
            strategy: strategy.clone(),
        };

        match run_game(&game) {
            Ok(metrics) => {
                let completed = progress.record_completion(metrics.outcome);
                if completed % 10 == 0 {
                    debug!("Progress: {}/{}", completed, config.game_count);
                }
                if completed % 100 == 0 {
                    progress.report();
                }
                Ok(metrics)
            }
            Err(e) => {
                warn!("Game {} failed: {}", i, e);
                Err(BatchError {
                    game_index: i,
                    seed,
                    message: e.to_string(),
                })
            }
        }
    };
    let run_all = || {
        (0..config.game_count)
            .into_par_iter()
            .map(play)
            .collect::<Vec<_>>()
    };

    let results = if config.parallel_games > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(config.parallel_games as usize)
            .build()
            .map_err(|e| HeadlessError::InvalidArgument(e.to_string()))?
            .install(run_all)
    } else {
        run_all()
    };

    let (games, errors): (Vec<_>, Vec<_>) = results.into_iter().partition(|r| r.is_ok());
    let games: Vec<GameMetrics> = games.into_iter().filter_map(|r| r.ok()).collect();
    let errors: Vec<BatchError> = errors.into_iter().filter_map(|r| r.err()).collect();

    let summary = BatchSummary::from_games(&games);
    let duration_seconds = start.elapsed().as_secs_f64();

    info!(
        "Batch complete: {} games in {:.1}s, {} won, {} lost, {} timed out",
        games.len(),
        duration_seconds,
        summary.wins,
        summary.losses,
        summary.timeouts
    );

    Ok(BatchResults {
        config,
        games,
        summary,
        duration_seconds,
        errors,
    })
}

/// Outcome of a determinism check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyReport {
    /// Final state hash of each run.
    pub hashes: Vec<u64>,
    /// Duration of each run.
    pub durations: Vec<u64>,
    /// Every run ended on the same tick and hash.
    pub consistent: bool,
    /// A recorded replay of the game reproduced the same hash.
    pub replay_verified: bool,
}

impl VerifyReport {
    /// Both checks passed.
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.consistent && self.replay_verified
    }
}

/// Verify determinism by running the same seed several times in parallel,
/// then recording the game and replaying it from bytes.
///
/// # Errors
///
/// Returns an error if a run cannot start. Mismatches are reported in the
/// returned [`VerifyReport`], not as errors.
pub fn verify_determinism(config: &GameConfig, runs: u32) -> Result<VerifyReport> {
    let results: Vec<GameMetrics> = (0..runs.max(1))
        .into_par_iter()
        .map(|_| run_game(config))
        .collect::<Result<_>>()?;

    let hashes: Vec<u64> = results.iter().map(|m| m.final_state_hash).collect();
    let durations: Vec<u64> = results.iter().map(|m| m.duration_ticks).collect();
    let consistent = hashes.windows(2).all(|w| w[0] == w[1])
        && durations.windows(2).all(|w| w[0] == w[1]);

    let replay = record_game(config)?;
    let replay = Replay::from_bytes(&replay.to_bytes()?)?;
    let recorded_hash = replay.final_hash;
    let replay_verified = match ReplayPlayer::new(replay)?.verify() {
        Ok(()) => hashes.first() == Some(&recorded_hash),
        Err(e) => {
            warn!("Replay verification failed: {e}");
            false
        }
    };

    if consistent {
        info!(runs = hashes.len(), hash = hashes[0], "Runs agree");
    } else {
        warn!(?hashes, ?durations, "Runs diverged");
    }

    Ok(VerifyReport {
        hashes,
        durations,
        consistent,
        replay_verified,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn levels() -> Arc<LevelRegistry> {
        Arc::new(LevelRegistry::builtin().unwrap())
    }

    #[test]
    fn test_batch_config_default() {
        let config = BatchConfig::default();
        assert_eq!(config.game_count, 100);
        assert_eq!(config.level, 1);
        assert_eq!(config.strategy, "greedy");
    }

    #[test]
    fn test_batch_config_builder() {
        let config = BatchConfig::new(4, 500)
            .with_output(PathBuf::from("/tmp/results"))
            .with_seed(12345)
            .with_strategy("turtle");

        assert_eq!(config.level, 4);
        assert_eq!(config.game_count, 500);
        assert_eq!(config.seed_start, 12345);
        assert_eq!(
            config.results_file(),
            PathBuf::from("/tmp/results/batch_level4_turtle_12345.json")
        );
    }

    #[test]
    fn test_progress_tracking() {
        let progress = BatchProgress::new(100);
        assert_eq!(progress.current(), 0);
        assert_eq!(progress.win_rate(), 0.0);

        progress.record_completion(GameOutcome::Won);
        progress.record_completion(GameOutcome::Lost);
        assert_eq!(progress.record_completion(GameOutcome::Won), 3);

        assert!((progress.win_rate() - 0.666).abs() < 0.01);
        assert!((progress.percentage() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_run_batch_small() {
        let config = BatchConfig::new(1, 6).with_max_ticks(1800);
        let results = run_batch(levels(), config).unwrap();

        assert_eq!(results.games.len(), 6);
        assert!(results.errors.is_empty());
        assert_eq!(results.summary.games, 6);
        let seeds: Vec<u64> = results.games.iter().map(|g| g.seed).collect();
        assert_eq!(seeds, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_batch_with_fixed_pool_matches_default_pool() {
        let config = BatchConfig::new(2, 4).with_max_ticks(1200).with_seed(9);
        let a = run_batch(levels(), config.clone()).unwrap();
        let mut pinned = config;
        pinned.parallel_games = 2;
        let b = run_batch(levels(), pinned).unwrap();
        assert_eq!(a.games, b.games);
    }

    #[test]
    fn test_missing_level_is_collected_as_error() {
        let results = run_batch(levels(), BatchConfig::new(42, 3)).unwrap();
        assert!(results.games.is_empty());
        assert_eq!(results.errors.len(), 3);
        assert_eq!(results.summary, BatchSummary::default());
    }

    #[test]
    fn test_unknown_strategy_fails_fast() {
        let config = BatchConfig::new(1, 3).with_strategy("kamikaze");
        assert!(matches!(
            run_batch(levels(), config),
            Err(HeadlessError::UnknownStrategy(_))
        ));
    }

    #[test]
    fn test_verify_determinism() {
        let config = GameConfig::new(levels(), 5)
            .with_seed(12345)
            .with_max_ticks(2400);
        let report = verify_determinism(&config, 4).unwrap();
        assert_eq!(report.hashes.len(), 4);
        assert!(report.passed());
    }

    #[test]
    fn test_batch_results_save_load() {
        let config = BatchConfig::new(1, 3).with_max_ticks(600);
        let results = run_batch(levels(), config).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("results.json");

        results.save(&path).unwrap();
        assert!(path.exists());

        let loaded = BatchResults::load(&path).unwrap();
        assert_eq!(loaded.games.len(), 3);
        assert_eq!(loaded.config.level, 1);
    }
}
