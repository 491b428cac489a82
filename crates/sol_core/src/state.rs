//! The authoritative game state.
//!
//! [`GameState`] is plain data. It is only mutated through the systems in
//! [`dispatch`](crate::dispatch), [`production`](crate::production),
//! [`ai`](crate::ai), [`motion`](crate::motion) and
//! [`victory`](crate::victory), all driven by
//! [`Simulation`](crate::simulation::Simulation).

use serde::{Deserialize, Serialize};

use crate::data::LevelData;
use crate::fleet::{FleetGroup, FleetId};
use crate::math::{from_count, Fixed};
use crate::owner::Owner;
use crate::planet::{Planet, PlanetId};

/// Top-level session status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    /// No level loaded.
    #[default]
    Menu,
    /// A level is running.
    Playing,
    /// Every hostile faction has been eliminated.
    Won,
    /// The player has been eliminated.
    Lost,
    /// Reserved for multiplayer matchmaking; never entered by the core.
    Lobby,
}

impl GameStatus {
    /// Whether the game has ended.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Aggregates the HUD shows for the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerSummary {
    /// Garrisons on player planets plus ships in player fleets.
    pub total_fleets: Fixed,
    /// Planets the player holds.
    pub planets_owned: usize,
    /// Planets on the map.
    pub planets_total: usize,
}

impl PlayerSummary {
    /// Share of the map the player holds, in `[0, 1]`.
    #[must_use]
    pub fn domination(&self) -> Fixed {
        if self.planets_total == 0 {
            return Fixed::ZERO;
        }
        Fixed::from_num(self.planets_owned) / Fixed::from_num(self.planets_total)
    }
}

/// Complete state of one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// All planets, in template order.
    pub planets: Vec<Planet>,
    /// Fleets currently in transit.
    pub fleets: Vec<FleetGroup>,
    /// Session status.
    pub status: GameStatus,
    /// Level that was last started.
    pub current_level: u32,
    /// Reserved for multiplayer.
    pub multiplayer: bool,
    /// Reserved for multiplayer.
    pub room_id: Option<String>,
    /// Reserved for multiplayer.
    pub player_id: Option<String>,
    /// Next fleet id to hand out.
    next_fleet_id: u64,
}

impl Default for GameState {
    fn default() -> Self {
        Self::menu()
    }
}

impl GameState {
    /// Empty state shown while in the menu.
    #[must_use]
    pub fn menu() -> Self {
        Self {
            planets: Vec::new(),
            fleets: Vec::new(),
            status: GameStatus::Menu,
            current_level: 1,
            multiplayer: false,
            room_id: None,
            player_id: None,
            next_fleet_id: 1,
        }
    }

    /// Fresh playing state built from level fixture data.
    ///
    /// Planet ids are assigned from template order.
    #[must_use]
    pub fn from_level(level: &LevelData) -> Self {
        let planets = level
            .planets
            .iter()
            .enumerate()
            .map(|(index, template)| template.instantiate(PlanetId(index as u32)))
            .collect();

        Self {
            planets,
            status: GameStatus::Playing,
            current_level: level.id,
            ..Self::menu()
        }
    }

    /// Build a playing state directly from planets (tests, tools).
    #[must_use]
    pub fn with_planets(planets: Vec<Planet>) -> Self {
        Self {
            planets,
            status: GameStatus::Playing,
            ..Self::menu()
        }
    }

    /// Look up a planet by id.
    #[must_use]
    pub fn planet(&self, id: PlanetId) -> Option<&Planet> {
        self.planets.iter().find(|p| p.id == id)
    }

    /// Look up a planet by id, mutably.
    pub fn planet_mut(&mut self, id: PlanetId) -> Option<&mut Planet> {
        self.planets.iter_mut().find(|p| p.id == id)
    }

    /// Look up a fleet by id.
    #[must_use]
    pub fn fleet(&self, id: FleetId) -> Option<&FleetGroup> {
        self.fleets.iter().find(|f| f.id == id)
    }

    /// Reserve the next fleet id.
    pub fn issue_fleet_id(&mut self) -> FleetId {
        let id = FleetId(self.next_fleet_id);
        self.next_fleet_id += 1;
        id
    }

    /// Next fleet id that will be issued.
    #[must_use]
    pub const fn next_fleet_id(&self) -> u64 {
        self.next_fleet_id
    }

    /// Planets held by `owner`.
    pub fn planets_owned_by(&self, owner: Owner) -> impl Iterator<Item = &Planet> {
        self.planets.iter().filter(move |p| p.owner == owner)
    }

    /// Fleets flying for `owner`.
    pub fn fleets_owned_by(&self, owner: Owner) -> impl Iterator<Item = &FleetGroup> {
        self.fleets.iter().filter(move |f| f.owner == owner)
    }

    /// Whether any hostile planet or hostile fleet remains.
    #[must_use]
    pub fn hostiles_remain(&self) -> bool {
        self.planets.iter().any(|p| p.owner.is_hostile())
            || self.fleets.iter().any(|f| f.owner.is_hostile())
    }

    /// Whether the player still holds a planet or has a fleet in flight.
    #[must_use]
    pub fn player_remains(&self) -> bool {
        self.planets_owned_by(Owner::Player).next().is_some()
            || self.fleets_owned_by(Owner::Player).next().is_some()
    }

    /// Aggregates for the HUD.
    #[must_use]
    pub fn player_summary(&self) -> PlayerSummary {
        let garrisons = self
            .planets_owned_by(Owner::Player)
            .fold(Fixed::ZERO, |acc, p| acc.saturating_add(p.fleet_count));
        let in_flight = self
            .fleets_owned_by(Owner::Player)
            .fold(Fixed::ZERO, |acc, f| acc.saturating_add(from_count(f.count)));

        PlayerSummary {
            total_fleets: garrisons.saturating_add(in_flight),
            planets_owned: self.planets_owned_by(Owner::Player).count(),
            planets_total: self.planets.len(),
        }
    }
}
