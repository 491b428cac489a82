//! Scripted player strategies for headless playtesting.
//!
//! An autopilot plays the player's side using the same two-click
//! selection protocol as a human: click a source planet, then a target.
//! Strategies are plain data so balance runs can load them from RON.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use sol_core::math::{floor_count, from_count, Fixed};
use sol_core::owner::Owner;
use sol_core::planet::{Planet, PlanetId};
use sol_core::selection::ClickOutcome;
use sol_core::simulation::Simulation;
use sol_core::state::GameState;

use crate::error::{HeadlessError, Result};

/// Whether the autopilot attacks at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Posture {
    /// Never clicks.
    Passive,
    /// Attacks whenever the numbers allow.
    Aggressive,
}

/// A player strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    /// Strategy name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Attack or sit still.
    pub posture: Posture,
    /// Ticks between decisions.
    pub decision_interval_ticks: u64,
    /// Smallest garrison a source planet must hold before it attacks.
    pub min_garrison: f64,
    /// Required ratio of ships sent to the target's remaining defence.
    pub advantage: f64,
}

impl Default for Strategy {
    fn default() -> Self {
        Self::greedy()
    }
}

impl Strategy {
    /// Never issues an order. The baseline for AI pressure tests.
    #[must_use]
    pub fn passive() -> Self {
        Self {
            name: "passive".to_string(),
            description: "Never dispatches; measures how long the AI takes to win".to_string(),
            posture: Posture::Passive,
            decision_interval_ticks: 60,
            min_garrison: 0.0,
            advantage: 0.0,
        }
    }

    /// Sends from the strongest planet to the weakest reachable target as
    /// soon as the fleet would win.
    #[must_use]
    pub fn greedy() -> Self {
        Self {
            name: "greedy".to_string(),
            description: "Strongest planet attacks the weakest target it can beat".to_string(),
            posture: Posture::Aggressive,
            decision_interval_ticks: 30,
            min_garrison: 10.0,
            advantage: 1.0,
        }
    }

    /// Builds a large garrison and only strikes with overwhelming force.
    #[must_use]
    pub fn turtle() -> Self {
        Self {
            name: "turtle".to_string(),
            description: "Holds a large reserve and attacks only with a wide margin".to_string(),
            posture: Posture::Aggressive,
            decision_interval_ticks: 120,
            min_garrison: 60.0,
            advantage: 1.5,
        }
    }

    /// Look up a preset by name (case-insensitive).
    pub fn preset(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "passive" => Ok(Self::passive()),
            "greedy" => Ok(Self::greedy()),
            "turtle" => Ok(Self::turtle()),
            _ => Err(HeadlessError::UnknownStrategy(name.to_string())),
        }
    }

    /// Names of every preset.
    #[must_use]
    pub const fn preset_names() -> [&'static str; 3] {
        ["passive", "greedy", "turtle"]
    }

    /// Load a strategy from a RON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    /// Load from a RON string.
    pub fn from_ron_str(ron: &str) -> Result<Self> {
        let strategy: Self = ron::from_str(ron)?;
        strategy.validate()?;
        Ok(strategy)
    }

    /// Resolve a preset name or, failing that, a RON file path.
    pub fn resolve(name_or_path: &str) -> Result<Self> {
        match Self::preset(name_or_path) {
            Ok(strategy) => Ok(strategy),
            Err(e) if Path::new(name_or_path).is_file() => {
                tracing::debug!("{e}; loading strategy file {name_or_path}");
                Self::load(name_or_path)
            }
            Err(e) => Err(e),
        }
    }

    /// Reject values that cannot drive a decision.
    pub fn validate(&self) -> Result<()> {
        if self.decision_interval_ticks == 0 {
            return Err(HeadlessError::InvalidArgument(format!(
                "strategy {}: decision_interval_ticks must be positive",
                self.name
            )));
        }
        for (field, value) in [
            ("min_garrison", self.min_garrison),
            ("advantage", self.advantage),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(HeadlessError::InvalidArgument(format!(
                    "strategy {}: {field} must be a non-negative number, got {value}",
                    self.name
                )));
            }
        }
        Ok(())
    }

    /// Pick a `(source, target)` pair for the current state, if any.
    ///
    /// The source is the player's strongest planet that may dispatch and
    /// holds at least `min_garrison`. The target is the non-player planet
    /// with the smallest defence left after the player's fleets already
    /// heading there land. The attack goes ahead only if the ships sent
    /// exceed that defence times `advantage`.
    #[must_use]
    pub fn choose(&self, sim: &Simulation) -> Option<(PlanetId, PlanetId)> {
        if self.posture == Posture::Passive {
            return None;
        }

        let state = sim.state();
        let min_garrison = Fixed::saturating_from_num(self.min_garrison);
        let advantage = Fixed::saturating_from_num(self.advantage);

        let source = state
            .planets_owned_by(Owner::Player)
            .filter(|p| p.can_dispatch() && p.fleet_count >= min_garrison)
            .max_by_key(|p| p.fleet_count)?;
        let sent = from_count(floor_count(
            source.fleet_count * sim.config().player_dispatch_ratio,
        ));

        let (target, defence) = state
            .planets
            .iter()
            .filter(|p| p.owner != Owner::Player)
            .map(|p| (p, remaining_defence(state, p)))
            .filter(|(_, defence)| *defence >= Fixed::ZERO)
            .min_by_key(|(_, defence)| *defence)?;

        (sent > defence.saturating_mul(advantage)).then_some((source.id, target.id))
    }
}

impl FromStr for Strategy {
    type Err = HeadlessError;

    fn from_str(s: &str) -> Result<Self> {
        Self::preset(s)
    }
}

/// Garrison left on `planet` after the player's inbound fleets land.
fn remaining_defence(state: &GameState, planet: &Planet) -> Fixed {
    let inbound = state
        .fleets_owned_by(Owner::Player)
        .filter(|f| f.to == planet.id)
        .fold(Fixed::ZERO, |acc, f| acc.saturating_add(from_count(f.count)));
    planet.fleet_count.saturating_sub(inbound)
}

/// Runs a strategy against a session.
#[derive(Debug, Clone)]
pub struct StrategyExecutor {
    strategy: Strategy,
    orders_issued: u32,
    orders_refused: u32,
}

impl StrategyExecutor {
    /// Create an executor.
    #[must_use]
    pub const fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            orders_issued: 0,
            orders_refused: 0,
        }
    }

    /// The strategy being played.
    #[must_use]
    pub const fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    /// Dispatches that produced a fleet.
    #[must_use]
    pub const fn orders_issued(&self) -> u32 {
        self.orders_issued
    }

    /// Dispatches the session refused.
    #[must_use]
    pub const fn orders_refused(&self) -> u32 {
        self.orders_refused
    }

    /// Clicks to send this tick, in order.
    ///
    /// Empty off the decision cadence. A stale selection is cleared by
    /// clicking it again before the new pair.
    #[must_use]
    pub fn plan_clicks(&self, sim: &Simulation) -> Vec<PlanetId> {
        if !sim.is_playing() || sim.get_tick() % self.strategy.decision_interval_ticks != 0 {
            return Vec::new();
        }
        let Some((source, target)) = self.strategy.choose(sim) else {
            return Vec::new();
        };

        let mut clicks = Vec::with_capacity(3);
        if let Some(selected) = sim.selected() {
            clicks.push(selected);
        }
        clicks.push(source);
        clicks.push(target);
        clicks
    }

    /// Record the outcome of a click this executor planned.
    pub fn record(&mut self, outcome: ClickOutcome) {
        match outcome {
            ClickOutcome::Dispatched(Some(_)) => self.orders_issued += 1,
            ClickOutcome::Dispatched(None) => self.orders_refused += 1,
            _ => {}
        }
    }

    /// Plan and apply this tick's clicks directly on a session.
    pub fn step(&mut self, sim: &mut Simulation) {
        for planet in self.plan_clicks(sim) {
            let outcome = sim.click_planet(planet);
            self.record(outcome);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sol_core::data::LevelRegistry;

    fn session(ron: &str) -> Simulation {
        let levels = LevelRegistry::from_ron_str(ron, "test.ron").unwrap();
        let mut sim = Simulation::default();
        sim.start_level(&levels, 1).unwrap();
        sim
    }

    const FRONTIER: &str = r#"[
        LevelData(
            id: 1,
            name: "Frontier",
            planets: [
                (name: "Home", fleet_count: 40.0, owner: Player, production_rate: 1.0),
                (name: "Rock", fleet_count: 5.0, owner: Neutral),
                (name: "Hive", fleet_count: 60.0, owner: Ai, production_rate: 2.0),
            ],
        ),
    ]"#;

    #[test]
    fn test_presets_by_name() {
        for name in Strategy::preset_names() {
            let strategy: Strategy = name.parse().unwrap();
            assert_eq!(strategy.name, name);
            assert!(strategy.validate().is_ok());
        }
        assert!(Strategy::preset("GREEDY").is_ok());
        assert!(matches!(
            Strategy::preset("rush"),
            Err(HeadlessError::UnknownStrategy(_))
        ));
    }

    #[test]
    fn test_passive_never_clicks() {
        let sim = session(FRONTIER);
        let executor = StrategyExecutor::new(Strategy::passive());
        assert!(executor.plan_clicks(&sim).is_empty());
    }

    #[test]
    fn test_greedy_hits_weakest_target() {
        let sim = session(FRONTIER);
        assert_eq!(
            Strategy::greedy().choose(&sim),
            Some((PlanetId(0), PlanetId(1)))
        );
    }

    #[test]
    fn test_turtle_waits_for_a_reserve() {
        let sim = session(FRONTIER);
        assert_eq!(Strategy::turtle().choose(&sim), None);
    }

    #[test]
    fn test_inbound_fleets_count_against_defence() {
        let mut sim = session(FRONTIER);
        let mut executor = StrategyExecutor::new(Strategy::greedy());
        executor.step(&mut sim);
        assert_eq!(executor.orders_issued(), 1);
        assert_eq!(sim.state().fleets.len(), 1);

        // Rock is already covered; Home now has 20 and sends 10, short of 60.
        assert_eq!(Strategy::greedy().choose(&sim), None);
    }

    #[test]
    fn test_off_cadence_ticks_do_nothing() {
        let mut sim = session(FRONTIER);
        sim.tick();
        let executor = StrategyExecutor::new(Strategy::greedy());
        assert!(executor.plan_clicks(&sim).is_empty());
    }

    #[test]
    fn test_stale_selection_is_cleared_first() {
        let mut sim = session(FRONTIER);
        sim.click_planet(PlanetId(0));
        let executor = StrategyExecutor::new(Strategy::greedy());
        assert_eq!(
            executor.plan_clicks(&sim),
            vec![PlanetId(0), PlanetId(0), PlanetId(1)]
        );
    }

    #[test]
    fn test_strategy_from_ron() {
        let strategy = Strategy::from_ron_str(
            r#"Strategy(
                name: "cautious",
                description: "test",
                posture: Aggressive,
                decision_interval_ticks: 10,
                min_garrison: 25.0,
                advantage: 2.0,
            )"#,
        )
        .unwrap();
        assert_eq!(strategy.decision_interval_ticks, 10);

        assert!(matches!(
            Strategy::from_ron_str(
                r#"Strategy(name: "bad", description: "", posture: Passive,
                    decision_interval_ticks: 0, min_garrison: 0.0, advantage: 0.0)"#
            ),
            Err(HeadlessError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_huge_garrisons_do_not_overflow() {
        let mut sim = session(
            r#"[LevelData(id: 1, name: "Giants", planets: [
                (name: "Home", fleet_count: 2000000000.0, owner: Player),
                (name: "Hive", fleet_count: 2000000000.0, owner: Ai),
            ])]"#,
        );
        let mut executor = StrategyExecutor::new(Strategy::greedy());
        for _ in 0..4 {
            executor.step(&mut sim);
            sim.tick();
        }
        assert!(sim.player_summary().total_fleets > Fixed::ZERO);
    }
}
