//! Level fixture data.

use std::collections::HashSet;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::math::{decimal_serde, Fixed};
use crate::owner::Owner;
use crate::planet::{Planet, PlanetId};

/// Built-in level catalog, embedded at compile time.
const BUILTIN_LEVELS: &str = include_str!("../../assets/levels.ron");

/// Source label used in parse errors for the built-in catalog.
const BUILTIN_SOURCE: &str = "<builtin levels.ron>";

/// Complete level definition.
///
/// # Example RON
///
/// ```ron
/// LevelData(
///     id: 1,
///     name: "Inner Ring Conflict",
///     planets: [
///         (name: "Mercury", position: (-10.0, 0.0, 0.0), size: 1.5,
///          fleet_count: 10.0, owner: Player, production_rate: 1.0),
///     ],
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelData {
    /// Level identifier shown in the menu.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Planet templates; ids follow list order.
    pub planets: Vec<PlanetTemplate>,
}

/// A planet as authored in a level file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetTemplate {
    /// Display name.
    pub name: String,
    /// World position.
    #[serde(default)]
    pub position: Vec3,
    /// Visual radius.
    #[serde(default = "default_size")]
    pub size: f32,
    /// Starting garrison.
    #[serde(with = "decimal_serde")]
    pub fleet_count: Fixed,
    /// Starting owner.
    pub owner: Owner,
    /// Fleets per economy tick.
    #[serde(with = "decimal_serde", default = "default_production_rate")]
    pub production_rate: Fixed,
}

/// Default planet size.
const fn default_size() -> f32 {
    1.0
}

/// Default production rate.
fn default_production_rate() -> Fixed {
    Fixed::ONE
}

impl PlanetTemplate {
    /// Materialize a planet with the given id.
    #[must_use]
    pub fn instantiate(&self, id: PlanetId) -> Planet {
        Planet::new(id, self.name.clone(), self.owner, self.fleet_count)
            .with_production(self.production_rate)
            .at(self.position)
            .with_size(self.size)
    }
}

impl LevelData {
    /// Check that the level can be played.
    ///
    /// A level needs a name, at least one player planet and at least one
    /// hostile planet (otherwise it would end on the first tick), and no
    /// negative garrisons or production rates.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| GameError::InvalidLevel {
            level: self.id,
            message,
        };

        if self.name.trim().is_empty() {
            return Err(invalid("level name is empty".into()));
        }
        if !self.planets.iter().any(|p| p.owner == Owner::Player) {
            return Err(invalid("no planet is owned by the player".into()));
        }
        if !self.planets.iter().any(|p| p.owner.is_hostile()) {
            return Err(invalid("no planet is owned by an AI faction".into()));
        }

        for planet in &self.planets {
            if planet.name.trim().is_empty() {
                return Err(invalid("planet with an empty name".into()));
            }
            if planet.fleet_count < Fixed::ZERO {
                return Err(invalid(format!("{} has a negative garrison", planet.name)));
            }
            if planet.production_rate < Fixed::ZERO {
                return Err(invalid(format!(
                    "{} has a negative production rate",
                    planet.name
                )));
            }
        }

        Ok(())
    }
}

/// Ordered collection of levels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelRegistry {
    levels: Vec<LevelData>,
}

impl LevelRegistry {
    /// Build a registry from already-parsed levels.
    #[must_use]
    pub fn new(levels: Vec<LevelData>) -> Self {
        Self { levels }
    }

    /// The built-in five-level campaign.
    pub fn builtin() -> Result<Self> {
        let registry = Self::from_ron_str(BUILTIN_LEVELS, BUILTIN_SOURCE)?;
        registry.validate()?;
        Ok(registry)
    }

    /// Parse a RON list of levels. `source` labels errors.
    pub fn from_ron_str(ron_text: &str, source: &str) -> Result<Self> {
        let levels: Vec<LevelData> =
            ron::from_str(ron_text).map_err(|e| GameError::DataParseError {
                path: source.to_string(),
                message: e.to_string(),
            })?;
        Ok(Self { levels })
    }

    /// Validate every level and check ids are unique.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for level in &self.levels {
            if !seen.insert(level.id) {
                return Err(GameError::InvalidLevel {
                    level: level.id,
                    message: "duplicate level id".into(),
                });
            }
            level.validate()?;
        }
        Ok(())
    }

    /// Find a level by id.
    #[must_use]
    pub fn get(&self, id: u32) -> Option<&LevelData> {
        self.levels.iter().find(|l| l.id == id)
    }

    /// All levels in catalog order.
    #[must_use]
    pub fn levels(&self) -> &[LevelData] {
        &self.levels
    }

    /// Number of levels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Whether the registry has no levels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}
