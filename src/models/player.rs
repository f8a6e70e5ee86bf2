//! Player identity: stable id plus display name.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (used in pairings, game lookups, and placements).
pub type PlayerId = Uuid;

/// Whether the player has a durable account behind them. The credential itself
/// never enters the orchestration core.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerKind {
    #[default]
    Guest,
    Registered,
}

/// A tournament participant.
///
/// Equality is defined on `id` alone: two values with the same id represent
/// the same player even when the rest of the fields differ. All lookups in the
/// session and the engines key on `PlayerId`, never on reference identity.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub kind: PlayerKind,
}

impl PartialEq for Player {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Player {}

impl Player {
    /// Create a guest player with a fresh id.
    pub fn guest(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind: PlayerKind::Guest,
        }
    }

    /// Create a registered player carrying an existing durable id.
    pub fn registered(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            kind: PlayerKind::Registered,
        }
    }
}
