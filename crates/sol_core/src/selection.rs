//! Player intent: the two-click "select source, pick target" gesture.
//!
//! The selection is session state, not game state. It is never hashed and
//! never affects the simulation until it turns into a dispatch.

use serde::{Deserialize, Serialize};

use crate::dispatch::{dispatch, DispatchOrder};
use crate::fleet::FleetId;
use crate::math::{fixed_serde, Fixed};
use crate::owner::Owner;
use crate::planet::PlanetId;
use crate::state::GameState;

/// What a planet click did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClickOutcome {
    /// A player planet became the selected source.
    Selected(PlanetId),
    /// The selected planet was clicked again and deselected.
    Deselected(PlanetId),
    /// A target was clicked with a source selected. Holds the new fleet,
    /// or `None` if the source could not dispatch. The selection is
    /// cleared either way.
    Dispatched(Option<FleetId>),
    /// Nothing happened.
    Ignored,
}

/// The currently selected source planet, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    selected: Option<PlanetId>,
    #[serde(with = "fixed_serde")]
    ratio: Fixed,
    #[serde(with = "fixed_serde")]
    speed: Fixed,
}

impl Selection {
    /// Empty selection dispatching `ratio` of the garrison at `speed`.
    #[must_use]
    pub const fn new(ratio: Fixed, speed: Fixed) -> Self {
        Self {
            selected: None,
            ratio,
            speed,
        }
    }

    /// The selected planet.
    #[must_use]
    pub const fn selected(&self) -> Option<PlanetId> {
        self.selected
    }

    /// Drop the selection.
    pub fn clear(&mut self) {
        self.selected = None;
    }

    /// Handle a click on `planet`.
    pub fn click(&mut self, state: &mut GameState, planet: PlanetId) -> ClickOutcome {
        let Some(clicked) = state.planet(planet) else {
            return ClickOutcome::Ignored;
        };

        match self.selected {
            None if clicked.owner == Owner::Player => {
                self.selected = Some(planet);
                ClickOutcome::Selected(planet)
            }
            None => ClickOutcome::Ignored,
            Some(source) if source == planet => {
                self.selected = None;
                ClickOutcome::Deselected(planet)
            }
            Some(source) => {
                self.selected = None;
                let order = DispatchOrder::new(source, planet, self.ratio).with_speed(self.speed);
                ClickOutcome::Dispatched(dispatch(state, &order))
            }
        }
    }
}
