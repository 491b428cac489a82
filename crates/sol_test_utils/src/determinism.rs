//! Determinism testing utilities.
//!
//! Provides a harness for verifying that the simulation
//! produces identical results given identical inputs.
//!
//! # Testing Strategy
//!
//! A session must be reproducible from its seed and its click stream, or
//! replays and batch statistics are worthless. Sources of non-determinism
//! include:
//!
//! - **Floating-point math**: fractional production rates accumulate.
//!   We use fixed-point arithmetic via [`sol_core::math::Fixed`] throughout.
//!
//! - **Unseeded randomness**: the AI draws from a `ChaCha8Rng` seeded from
//!   the session config, reseeded on every level start.
//!
//! - **Iteration order**: planets and fleets live in vectors and are
//!   always visited in insertion order.
//!
//! # Test Levels
//!
//! 1. **Unit tests**: individual systems (dispatch, arrival, AI)
//! 2. **Property tests**: random states and click scripts stay deterministic
//! 3. **Integration tests**: full levels are reproducible
//! 4. **Parallel tests**: N sessions on N threads all match

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::thread;

use sol_core::planet::PlanetId;
use sol_core::simulation::Simulation;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Hashes from each run.
    pub hashes: Vec<u64>,
    /// Number of ticks simulated.
    pub ticks: u64,
}

impl DeterminismResult {
    /// Get all unique hashes (should be 1 for deterministic simulation).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.clone();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that the simulation was deterministic, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the simulation produced different hashes across runs.
    pub fn assert_deterministic(&self) {
        if !self.is_deterministic {
            let unique = self.unique_hashes();
            panic!(
                "Simulation is non-deterministic!\n\
                 Runs: {}\n\
                 Ticks: {}\n\
                 Unique hashes: {} (expected 1)\n\
                 All hashes: {:?}",
                self.hashes.len(),
                self.ticks,
                unique.len(),
                self.hashes
            );
        }
    }
}

/// A planet click scheduled at a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScriptedClick {
    /// Ticks elapsed before the click is applied.
    pub tick: u64,
    /// Planet clicked.
    pub planet: PlanetId,
}

/// Run `ticks` ticks, applying each scripted click once its tick is reached.
///
/// Clicks must be sorted by tick.
pub fn run_script(sim: &mut Simulation, script: &[ScriptedClick], ticks: u64) {
    let mut next = 0;
    for tick in 0..ticks {
        while let Some(click) = script.get(next) {
            if click.tick > tick {
                break;
            }
            sim.click_planet(click.planet);
            next += 1;
        }
        sim.tick();
    }
}

/// Run a simulation multiple times and verify determinism.
///
/// # Arguments
///
/// * `runs` - Number of times to run the simulation
/// * `ticks` - Number of ticks to simulate per run
/// * `setup` - Function to create initial simulation state
/// * `step` - Function to advance simulation by one tick
/// * `hash` - Function to compute state hash
///
/// # Example
///
/// ```
/// use sol_test_utils::determinism::verify_determinism;
/// use sol_test_utils::fixtures::playing_level;
///
/// let result = verify_determinism(
///     3,   // Run 3 times
///     120, // 120 ticks each
///     || playing_level(1, 42),
///     |sim| { sim.tick(); },
///     |sim| sim.state_hash(),
/// );
/// result.assert_deterministic();
/// ```
pub fn verify_determinism<S, Setup, Step, HashFn>(
    runs: usize,
    ticks: u64,
    setup: Setup,
    step: Step,
    hash: HashFn,
) -> DeterminismResult
where
    Setup: Fn() -> S,
    Step: Fn(&mut S),
    HashFn: Fn(&S) -> u64,
{
    let mut hashes = Vec::with_capacity(runs);

    for _ in 0..runs {
        let mut state = setup();

        for _ in 0..ticks {
            step(&mut state);
        }

        hashes.push(hash(&state));
    }

    let is_deterministic = hashes.windows(2).all(|w| w[0] == w[1]);

    DeterminismResult {
        is_deterministic,
        hashes,
        ticks,
    }
}

/// Run the same session setup twice with the same click script.
///
/// Returns `true` if both runs end with identical state hashes.
pub fn verify_simulation_determinism<F>(setup_fn: F, script: &[ScriptedClick], ticks: u64) -> bool
where
    F: Fn() -> Simulation,
{
    let mut a = setup_fn();
    let mut b = setup_fn();
    run_script(&mut a, script, ticks);
    run_script(&mut b, script, ticks);
    a.state_hash() == b.state_hash()
}

/// Run N sessions on N threads and collect final hashes.
///
/// Catches anything that leaks thread-local or global state into the
/// simulation.
///
/// # Panics
///
/// Panics if a worker thread panics.
pub fn run_parallel_simulations<F>(setup_fn: F, num_sims: usize, num_ticks: u64) -> DeterminismResult
where
    F: Fn() -> Simulation + Sync,
{
    let hashes: Vec<u64> = thread::scope(|s| {
        let handles: Vec<_> = (0..num_sims)
            .map(|_| {
                s.spawn(|| {
                    let mut sim = setup_fn();
                    for _ in 0..num_ticks {
                        sim.tick();
                    }
                    sim.state_hash()
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().expect("simulation thread panicked"))
            .collect()
    });

    DeterminismResult {
        is_deterministic: hashes.windows(2).all(|w| w[0] == w[1]),
        hashes,
        ticks: num_ticks,
    }
}

/// Compare two simulation runs tick-by-tick, finding first divergence.
///
/// # Returns
///
/// `None` if simulations are deterministic, `Some(tick)` if they diverge
/// at that tick.
pub fn find_first_divergence<F>(setup_fn: F, num_ticks: u64) -> Option<u64>
where
    F: Fn() -> Simulation,
{
    let mut sim1 = setup_fn();
    let mut sim2 = setup_fn();

    if sim1.state_hash() != sim2.state_hash() {
        return Some(0);
    }

    for tick in 1..=num_ticks {
        sim1.tick();
        sim2.tick();

        if sim1.state_hash() != sim2.state_hash() {
            return Some(tick);
        }
    }

    None
}

/// Verify that a serialization round trip preserves the session exactly,
/// both now and for `continue_ticks` ticks afterwards (RNG state included).
pub fn verify_serialization_determinism<F>(setup_fn: F, num_ticks: u64, continue_ticks: u64) -> bool
where
    F: Fn() -> Simulation,
{
    let mut sim = setup_fn();
    for _ in 0..num_ticks {
        sim.tick();
    }

    let Ok(bytes) = sim.serialize() else {
        return false;
    };
    let Ok(mut restored) = Simulation::deserialize(&bytes) else {
        return false;
    };
    if sim.state_hash() != restored.state_hash() {
        return false;
    }

    for _ in 0..continue_ticks {
        sim.tick();
        restored.tick();
    }
    sim.state_hash() == restored.state_hash()
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Proptest strategies for simulation testing.
///
/// These strategies generate random but reproducible inputs for
/// property-based testing.
pub mod strategies {
    use proptest::prelude::*;
    use sol_core::math::{percent, Fixed};
    use sol_core::owner::Owner;
    use sol_core::planet::PlanetId;
    use sol_core::state::GameState;

    use super::ScriptedClick;
    use crate::fixtures::StateBuilder;

    /// Any owner.
    pub fn arb_owner() -> impl Strategy<Value = Owner> {
        proptest::sample::select(Owner::ALL.to_vec())
    }

    /// A garrison in hundredths, 0 to 500.
    pub fn arb_garrison() -> impl Strategy<Value = Fixed> {
        (0i32..50_000).prop_map(|n| Fixed::from_num(n) / Fixed::from_num(100))
    }

    /// A production rate in quarter steps, 0 to 5.
    pub fn arb_production_rate() -> impl Strategy<Value = Fixed> {
        (0i32..=20).prop_map(|n| Fixed::from_num(n) / Fixed::from_num(4))
    }

    /// A dispatch ratio in whole percent, 1% to 100%.
    pub fn arb_ratio() -> impl Strategy<Value = Fixed> {
        (1i32..=100).prop_map(percent)
    }

    /// A state with 2 to `max_planets` planets of random owners.
    pub fn arb_state(max_planets: usize) -> impl Strategy<Value = GameState> {
        proptest::collection::vec(
            (arb_owner(), arb_garrison(), arb_production_rate()),
            2..=max_planets.max(2),
        )
        .prop_map(|planets| {
            planets
                .into_iter()
                .fold(StateBuilder::new(), |builder, (owner, garrison, rate)| {
                    builder.producing_planet(owner, garrison, rate)
                })
                .build()
        })
    }

    /// A click script over `num_planets` planets within `max_tick` ticks,
    /// sorted by tick.
    pub fn arb_click_script(
        num_planets: u32,
        max_tick: u64,
        max_len: usize,
    ) -> impl Strategy<Value = Vec<ScriptedClick>> {
        proptest::collection::vec((0..max_tick.max(1), 0..num_planets.max(1)), 0..max_len)
            .prop_map(|mut clicks| {
                clicks.sort_by_key(|(tick, _)| *tick);
                clicks
                    .into_iter()
                    .map(|(tick, planet)| ScriptedClick {
                        tick,
                        planet: PlanetId(planet),
                    })
                    .collect()
            })
    }
}
