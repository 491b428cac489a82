//! Owner (faction) definitions.

use serde::{Deserialize, Serialize};

/// The faction controlling a planet or fleet.
///
/// Ownership is exclusive: every planet and every fleet has exactly one owner.
/// The AI factions are all hostile to the player and to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Owner {
    /// Unclaimed. Neutral planets never produce and never attack.
    Neutral,
    /// The human player.
    Player,
    /// Default AI faction.
    Ai,
    /// Red AI faction.
    AiRed,
    /// Green AI faction.
    AiGreen,
}

impl Owner {
    /// Every owner, in declaration order.
    pub const ALL: [Owner; 5] = [
        Owner::Neutral,
        Owner::Player,
        Owner::Ai,
        Owner::AiRed,
        Owner::AiGreen,
    ];

    /// Whether this owner is one of the AI factions.
    #[must_use]
    pub const fn is_hostile(self) -> bool {
        matches!(self, Self::Ai | Self::AiRed | Self::AiGreen)
    }

    /// Whether planets of this owner gain fleets from production.
    #[must_use]
    pub const fn produces(self) -> bool {
        !matches!(self, Self::Neutral)
    }

    /// Get the display name for this owner.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Neutral => "Neutral",
            Self::Player => "Player",
            Self::Ai => "Crimson Directorate",
            Self::AiRed => "Red Syndicate",
            Self::AiGreen => "Verdant Compact",
        }
    }

    /// Get the short name for this owner.
    #[must_use]
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Player => "player",
            Self::Ai => "ai",
            Self::AiRed => "ai_red",
            Self::AiGreen => "ai_green",
        }
    }
}

impl std::fmt::Display for Owner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.short_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_ai_factions_are_hostile() {
        let hostile: Vec<_> = Owner::ALL.into_iter().filter(|o| o.is_hostile()).collect();
        assert_eq!(hostile, vec![Owner::Ai, Owner::AiRed, Owner::AiGreen]);
    }

    #[test]
    fn neutral_does_not_produce() {
        assert!(!Owner::Neutral.produces());
        assert!(Owner::Player.produces());
        assert!(Owner::AiGreen.produces());
    }
}
