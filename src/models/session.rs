//! Live tournament session state: one per active lobby code.

use crate::games::{Game, GameKind};
use crate::models::{Player, PlayerId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;
use uuid::Uuid;

/// Durable identifier of a tournament, stable across the session's lifetime.
pub type TournamentId = Uuid;

/// Clamped round counters pushed to the lobby group as `PlayersUpdated`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RoundInfo {
    pub current_round: usize,
    pub total_rounds: usize,
}

/// In-memory state of one tournament session.
///
/// Engines live in `engines`; `game_by_player` maps a player's stable id to an
/// index into that vector. Two players are opponents iff they map to the same
/// index. Both collections are cleared and rebuilt every round.
pub struct TournamentSession {
    pub code: String,
    pub tournament_id: TournamentId,
    /// Maximum roster size, fixed at creation.
    pub capacity: usize,
    /// Fixed at creation, 1-5.
    pub number_of_rounds: usize,
    /// 0 before any round starts; increments only on successful round advance.
    pub current_round: usize,
    pub tournament_started: bool,
    pub round_started: bool,
    /// Ordered roster, unique by id.
    pub players: Vec<Player>,
    /// One game kind per round, length >= `number_of_rounds`.
    pub round_plan: Vec<GameKind>,
    engines: Vec<Box<dyn Game>>,
    game_by_player: HashMap<PlayerId, usize>,
    /// Touched by every lobby/orchestrator operation; drives idle reclamation.
    pub last_activity: Instant,
}

impl TournamentSession {
    pub fn new(
        code: impl Into<String>,
        capacity: usize,
        number_of_rounds: usize,
        round_plan: Vec<GameKind>,
    ) -> Self {
        Self {
            code: code.into(),
            tournament_id: Uuid::new_v4(),
            capacity,
            number_of_rounds,
            current_round: 0,
            tournament_started: false,
            round_started: false,
            players: Vec::new(),
            round_plan,
            engines: Vec::new(),
            game_by_player: HashMap::new(),
            last_activity: Instant::now(),
        }
    }

    pub fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    /// Drop the previous round's engines and player mapping.
    pub fn clear_games(&mut self) {
        self.engines.clear();
        self.game_by_player.clear();
    }

    /// Install the engines for a freshly paired round. Every player of every
    /// engine is mapped to its index; unpaired players get no entry.
    pub fn set_round_games(&mut self, engines: Vec<Box<dyn Game>>) {
        self.clear_games();
        for (idx, engine) in engines.iter().enumerate() {
            for player in engine.players() {
                self.game_by_player.insert(player.id, idx);
            }
        }
        self.engines = engines;
    }

    pub fn game_for(&self, player: PlayerId) -> Option<&dyn Game> {
        let idx = *self.game_by_player.get(&player)?;
        Some(self.engines[idx].as_ref())
    }

    pub fn game_for_mut(&mut self, player: PlayerId) -> Option<&mut dyn Game> {
        let idx = *self.game_by_player.get(&player)?;
        Some(self.engines[idx].as_mut())
    }

    /// The distinct engines of the current round, in pairing order.
    pub fn games(&self) -> impl Iterator<Item = &dyn Game> {
        self.engines.iter().map(|g| g.as_ref())
    }

    /// True when every engine of the round reports over. Vacuously true with
    /// no engines (before the first round starts).
    pub fn all_games_over(&self) -> bool {
        self.engines.iter().all(|g| g.is_over())
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Round counters for display: both clamped to at least 1, current never
    /// above total.
    pub fn round_info(&self) -> RoundInfo {
        let total_rounds = self.number_of_rounds.max(1);
        let current_round = self.current_round.max(1).min(total_rounds);
        RoundInfo {
            current_round,
            total_rounds,
        }
    }
}
