//! Durable storage seam: narrow async operations over tournament, game, and
//! placement rows. Storage technology stays behind the trait; the crate ships
//! an in-memory implementation for the binary and for tests.

use crate::games::GameKind;
use crate::models::{PlayerId, TournamentId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use uuid::Uuid;

/// Durable identifier of one game row.
pub type GameId = Uuid;

/// Per-player outcome code for a game.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// Not decided yet, or a draw.
    #[default]
    Undetermined,
    Winner,
    Loser,
}

/// One row per engine per round.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameRow {
    pub game_id: GameId,
    pub tournament_id: TournamentId,
    pub game_kind: GameKind,
    pub round_number: usize,
}

/// One row per player participating in a game.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlacementRow {
    pub user_id: PlayerId,
    pub game_id: GameId,
    /// 1-based position in the engine's turn order.
    pub turn_order: usize,
    pub placement: Placement,
}

/// Storage failure. Callers log the detail and surface a generic message.
#[derive(Clone, Debug)]
pub struct GatewayError(pub String);

impl std::fmt::Display for GatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "persistence failure: {}", self.0)
    }
}

impl std::error::Error for GatewayError {}

/// Narrow async surface the orchestrator consumes. Calls are suspension
/// points; the orchestrator keeps the session lock across them.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Idempotent insert: a tournament row is created at most once per id.
    async fn ensure_tournament(&self, tournament_id: TournamentId) -> Result<(), GatewayError>;

    /// Insert one game row plus one placement row per player, placements
    /// starting at `Undetermined` with 1-based turn order.
    async fn insert_game_and_placements(
        &self,
        tournament_id: TournamentId,
        round_number: usize,
        game_kind: GameKind,
        player_ids_in_turn_order: &[PlayerId],
    ) -> Result<GameId, GatewayError>;

    async fn load_games_for_round(
        &self,
        tournament_id: TournamentId,
        round_number: usize,
    ) -> Result<Vec<GameRow>, GatewayError>;

    async fn load_placements_for_game(
        &self,
        game_id: GameId,
    ) -> Result<Vec<PlacementRow>, GatewayError>;

    async fn update_placement(
        &self,
        user_id: PlayerId,
        game_id: GameId,
        value: Placement,
    ) -> Result<(), GatewayError>;
}

#[derive(Default)]
struct MemoryRows {
    tournaments: Vec<TournamentId>,
    games: Vec<GameRow>,
    placements: Vec<PlacementRow>,
}

/// Mutex-guarded vectors standing in for the relational store.
#[derive(Default)]
pub struct MemoryGateway {
    rows: Mutex<MemoryRows>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    fn rows(&self) -> Result<std::sync::MutexGuard<'_, MemoryRows>, GatewayError> {
        self.rows
            .lock()
            .map_err(|_| GatewayError("memory gateway lock poisoned".to_string()))
    }

    /// Number of tournament rows (test inspection).
    pub fn tournament_count(&self) -> usize {
        self.rows.lock().unwrap_or_else(|e| e.into_inner()).tournaments.len()
    }

    /// Snapshot of all game rows (test inspection).
    pub fn game_rows(&self) -> Vec<GameRow> {
        self.rows.lock().unwrap_or_else(|e| e.into_inner()).games.clone()
    }

    /// Snapshot of all placement rows (test inspection).
    pub fn placement_rows(&self) -> Vec<PlacementRow> {
        self.rows.lock().unwrap_or_else(|e| e.into_inner()).placements.clone()
    }
}

#[async_trait]
impl PersistenceGateway for MemoryGateway {
    async fn ensure_tournament(&self, tournament_id: TournamentId) -> Result<(), GatewayError> {
        let mut rows = self.rows()?;
        if !rows.tournaments.contains(&tournament_id) {
            rows.tournaments.push(tournament_id);
        }
        Ok(())
    }

    async fn insert_game_and_placements(
        &self,
        tournament_id: TournamentId,
        round_number: usize,
        game_kind: GameKind,
        player_ids_in_turn_order: &[PlayerId],
    ) -> Result<GameId, GatewayError> {
        let game_id = Uuid::new_v4();
        let mut rows = self.rows()?;
        rows.games.push(GameRow {
            game_id,
            tournament_id,
            game_kind,
            round_number,
        });
        for (i, &user_id) in player_ids_in_turn_order.iter().enumerate() {
            rows.placements.push(PlacementRow {
                user_id,
                game_id,
                turn_order: i + 1,
                placement: Placement::Undetermined,
            });
        }
        Ok(game_id)
    }

    async fn load_games_for_round(
        &self,
        tournament_id: TournamentId,
        round_number: usize,
    ) -> Result<Vec<GameRow>, GatewayError> {
        let rows = self.rows()?;
        Ok(rows
            .games
            .iter()
            .filter(|g| g.tournament_id == tournament_id && g.round_number == round_number)
            .cloned()
            .collect())
    }

    async fn load_placements_for_game(
        &self,
        game_id: GameId,
    ) -> Result<Vec<PlacementRow>, GatewayError> {
        let rows = self.rows()?;
        Ok(rows
            .placements
            .iter()
            .filter(|p| p.game_id == game_id)
            .cloned()
            .collect())
    }

    async fn update_placement(
        &self,
        user_id: PlayerId,
        game_id: GameId,
        value: Placement,
    ) -> Result<(), GatewayError> {
        let mut rows = self.rows()?;
        match rows
            .placements
            .iter_mut()
            .find(|p| p.user_id == user_id && p.game_id == game_id)
        {
            Some(row) => {
                row.placement = value;
                Ok(())
            }
            None => Err(GatewayError(format!(
                "no placement row for user {user_id} in game {game_id}"
            ))),
        }
    }
}
