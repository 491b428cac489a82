//! Win/loss evaluation.

use crate::state::{GameState, GameStatus};

/// Decide the status after a fast tick.
///
/// Only a `Playing` state can change. The player loses once they hold no
/// planet and have no fleet in flight; they win once no AI faction holds a
/// planet or has a fleet in flight. Neutral planets count for nobody. When
/// both happen on the same tick the loss takes precedence.
#[must_use]
pub fn evaluate(state: &GameState) -> GameStatus {
    if state.status != GameStatus::Playing {
        return state.status;
    }
    if !state.player_remains() {
        return GameStatus::Lost;
    }
    if !state.hostiles_remain() {
        return GameStatus::Won;
    }
    GameStatus::Playing
}
