//! Arrival resolution: what happens when a fleet reaches its destination.
//!
//! The rules are simple attrition with no randomness:
//!
//! - Friendly destination: the fleet joins the garrison.
//! - Hostile destination, attackers outnumber defenders: the planet changes
//!   hands and keeps the surviving attackers.
//! - Hostile destination otherwise: the garrison absorbs the attack. A
//!   garrison reduced to exactly zero keeps its owner.
//!
//! "Hostile" here means any owner other than the fleet's, neutral included.

use serde::{Deserialize, Serialize};

use crate::fleet::{FleetGroup, FleetId};
use crate::math::{fixed_serde, from_count, Fixed};
use crate::owner::Owner;
use crate::planet::PlanetId;
use crate::state::GameState;

/// Result of one fleet arriving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArrivalOutcome {
    /// Same owner; ships added to the garrison.
    Reinforced,
    /// Attackers won; the planet changed hands.
    Captured {
        /// Who held the planet before.
        previous_owner: Owner,
    },
    /// Defenders held; garrison reduced.
    Repelled,
    /// Destination no longer exists; the fleet vanished.
    Dropped,
}

/// A resolved arrival, as reported in tick events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrivalReport {
    /// The fleet that arrived.
    pub fleet: FleetId,
    /// Its owner.
    pub owner: Owner,
    /// Its destination.
    pub planet: PlanetId,
    /// Ships it carried.
    pub count: u32,
    /// What happened.
    pub outcome: ArrivalOutcome,
    /// Destination garrison afterwards (zero when dropped).
    #[serde(with = "fixed_serde")]
    pub garrison_after: Fixed,
}

/// Apply one arrived fleet to its destination planet.
///
/// The fleet itself is not removed from the state; the caller owns that.
pub fn resolve_arrival(state: &mut GameState, fleet: &FleetGroup) -> ArrivalReport {
    let mut report = ArrivalReport {
        fleet: fleet.id,
        owner: fleet.owner,
        planet: fleet.to,
        count: fleet.count,
        outcome: ArrivalOutcome::Dropped,
        garrison_after: Fixed::ZERO,
    };

    let Some(target) = state.planet_mut(fleet.to) else {
        tracing::debug!(fleet = %fleet.id, to = %fleet.to, "Arrival dropped: destination missing");
        return report;
    };

    let ships = from_count(fleet.count);
    report.outcome = if target.owner == fleet.owner {
        target.fleet_count = target.fleet_count.saturating_add(ships);
        ArrivalOutcome::Reinforced
    } else if ships > target.fleet_count {
        let previous_owner = target.owner;
        target.fleet_count = ships - target.fleet_count;
        target.owner = fleet.owner;
        ArrivalOutcome::Captured { previous_owner }
    } else {
        target.fleet_count -= ships;
        ArrivalOutcome::Repelled
    };
    report.garrison_after = target.fleet_count;

    tracing::debug!(
        fleet = %fleet.id,
        owner = %fleet.owner,
        planet = %fleet.to,
        count = fleet.count,
        outcome = ?report.outcome,
        garrison = %report.garrison_after,
        "Fleet arrived"
    );

    report
}
