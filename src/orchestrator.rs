//! Tournament lifecycle: starting tournaments, pairing and starting rounds,
//! routing moves to engines, and reconciling finished rounds into durable
//! placement rows.
//!
//! Every operation on a session runs inside that session's lock, held across
//! persistence awaits, so a round advance can never interleave with a move or
//! a reconciliation on the same session. Operations on different sessions run
//! in parallel.

use crate::games::{create_game, Game, MoveOutcome};
use crate::models::{Player, PlayerId, RoundInfo, TournamentSession};
use crate::persistence::{GameRow, PersistenceGateway, Placement};
use crate::realtime::{LobbyEvent, PlayerEvent, RealtimeChannel};
use crate::store::SessionStore;
use rand::seq::SliceRandom;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;

/// Errors from orchestrator operations. All recoverable and reported as a
/// reason to the caller; session state is left unchanged on failure unless
/// noted on the operation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    SessionNotFound,
    NotStarted,
    NotEnoughPlayers,
    AllRoundsCompleted,
    /// Round counter would run past the plan (1-based round in the message).
    NoPlanForRound { round: usize },
    RoundInProgress,
    GameStartFailed,
    /// The player has no engine in the current round.
    GameNotFound,
    /// Storage failed; the detail is logged, never surfaced.
    Storage,
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::SessionNotFound => write!(f, "Tournament session not found."),
            TournamentError::NotStarted => write!(f, "Tournament has not started yet."),
            TournamentError::NotEnoughPlayers => write!(f, "Not enough players."),
            TournamentError::AllRoundsCompleted => {
                write!(f, "All tournament rounds have been completed.")
            }
            TournamentError::NoPlanForRound { round } => {
                write!(f, "No game type configured for round {round}.")
            }
            TournamentError::RoundInProgress => {
                write!(f, "Round is still in progress. Wait for all games to finish.")
            }
            TournamentError::GameStartFailed => {
                write!(f, "Failed to start game for a player group.")
            }
            TournamentError::GameNotFound => write!(f, "No game found for this player."),
            TournamentError::Storage => write!(f, "An unexpected error occurred."),
        }
    }
}

impl std::error::Error for TournamentError {}

/// Drives sessions through `Lobby -> Started -> RoundInProgress(k) -> ... ->
/// Completed`.
pub struct TournamentOrchestrator {
    store: Arc<SessionStore>,
    persistence: Arc<dyn PersistenceGateway>,
    realtime: Arc<dyn RealtimeChannel>,
}

impl TournamentOrchestrator {
    pub fn new(
        store: Arc<SessionStore>,
        persistence: Arc<dyn PersistenceGateway>,
        realtime: Arc<dyn RealtimeChannel>,
    ) -> Self {
        Self {
            store,
            persistence,
            realtime,
        }
    }

    /// Close the roster and mark the tournament started. Requires at least
    /// two players. Creates the durable tournament row if it does not already
    /// exist; repeated calls never create duplicates.
    pub async fn start_tournament(&self, code: &str) -> Result<(), TournamentError> {
        let shared = self
            .store
            .get(code)
            .ok_or(TournamentError::SessionNotFound)?;
        let mut session = shared.lock().await;
        if session.players.len() < 2 {
            return Err(TournamentError::NotEnoughPlayers);
        }
        session.touch();
        session.tournament_started = true;
        let tournament_id = session.tournament_id;
        if let Err(e) = self.persistence.ensure_tournament(tournament_id).await {
            log::error!("failed to persist tournament {tournament_id}: {e}");
            return Err(TournamentError::Storage);
        }
        log::info!("tournament {code} started with {} players", session.players.len());
        Ok(())
    }

    /// Full round-start action: gate on tournament/round state, advance the
    /// round, persist its skeleton rows, and notify clients.
    pub async fn start_round(&self, code: &str) -> Result<(), TournamentError> {
        let shared = self
            .store
            .get(code)
            .ok_or(TournamentError::SessionNotFound)?;
        let mut session = shared.lock().await;
        if !session.tournament_started {
            return Err(TournamentError::NotStarted);
        }
        if session.round_started && !session.all_games_over() {
            return Err(TournamentError::RoundInProgress);
        }

        Self::advance_round(&mut session)?;
        self.log_round_start_locked(&session).await?;

        self.realtime
            .send_to_lobby(code, LobbyEvent::PlayersUpdated(session.round_info()))
            .await;
        for game in session.games() {
            for player in game.players() {
                self.realtime
                    .send_to_player(
                        player.id,
                        PlayerEvent::GameStarted {
                            game_kind: game.kind(),
                        },
                    )
                    .await;
            }
        }
        Ok(())
    }

    /// Pair the roster and start one engine per pair. Exposed separately for
    /// callers that drive persistence and notification themselves.
    pub async fn start_next_round(&self, code: &str) -> Result<(), TournamentError> {
        let shared = self
            .store
            .get(code)
            .ok_or(TournamentError::SessionNotFound)?;
        let mut session = shared.lock().await;
        Self::advance_round(&mut session)
    }

    /// Persist the just-started round: one game row per distinct engine plus
    /// placement rows at `Undetermined`.
    pub async fn log_round_start(&self, code: &str) -> Result<(), TournamentError> {
        let shared = self
            .store
            .get(code)
            .ok_or(TournamentError::SessionNotFound)?;
        let session = shared.lock().await;
        self.log_round_start_locked(&session).await
    }

    /// Route a move payload to the acting player's engine. On an accepted
    /// move, both players of the pair receive the updated state; if that move
    /// finished the last open game of the round, results are reconciled. A
    /// faulted move is reported back to the acting player only.
    pub async fn route_move(
        &self,
        code: &str,
        player: PlayerId,
        payload: Value,
    ) -> Result<MoveOutcome, TournamentError> {
        let shared = self
            .store
            .get(code)
            .ok_or(TournamentError::SessionNotFound)?;
        let mut session = shared.lock().await;
        session.touch();
        // Scope the engine borrow so the session is usable again afterwards.
        let (outcome, accepted) = {
            let game = session
                .game_for_mut(player)
                .ok_or(TournamentError::GameNotFound)?;
            let outcome = game.apply_move(&payload, player);
            let accepted = if outcome.is_accepted() {
                let pair: Vec<PlayerId> = game.players().iter().map(|p| p.id).collect();
                Some((game.state(), pair))
            } else {
                None
            };
            (outcome, accepted)
        };
        match &outcome {
            MoveOutcome::Accepted => {
                let Some((state, pair)) = accepted else {
                    return Ok(outcome);
                };
                for id in pair {
                    self.realtime
                        .send_to_player(
                            id,
                            PlayerEvent::GameUpdate {
                                state: state.clone(),
                            },
                        )
                        .await;
                }
                if session.round_started && session.all_games_over() {
                    log::info!("all games ended for tournament {code}, saving results");
                    self.reconcile_locked(&session).await?;
                }
                self.realtime
                    .send_to_lobby(code, LobbyEvent::PlayersUpdated(session.round_info()))
                    .await;
            }
            MoveOutcome::Rejected(reason) => {
                log::debug!("move by {player} in {code} rejected: {reason}");
            }
            MoveOutcome::Fault(fault) => {
                log::warn!("move by {player} in {code} refused: {fault}");
                self.realtime
                    .send_to_player(
                        player,
                        PlayerEvent::Error {
                            message: fault.to_string(),
                        },
                    )
                    .await;
            }
        }
        Ok(outcome)
    }

    /// Write placements for the just-finished round. Idempotent: only rows
    /// still at `Undetermined` are touched, so re-running after a partial
    /// failure (or twice) changes nothing that is already set.
    pub async fn reconcile_results(&self, code: &str) -> Result<(), TournamentError> {
        let shared = self
            .store
            .get(code)
            .ok_or(TournamentError::SessionNotFound)?;
        let session = shared.lock().await;
        self.reconcile_locked(&session).await
    }

    /// Runs reconciliation only if the round is marked started and every
    /// engine reports over.
    pub async fn check_and_reconcile(&self, code: &str) -> Result<(), TournamentError> {
        let shared = self
            .store
            .get(code)
            .ok_or(TournamentError::SessionNotFound)?;
        let session = shared.lock().await;
        if session.round_started && session.all_games_over() {
            self.reconcile_locked(&session).await?;
        }
        Ok(())
    }

    /// The acting player's current engine snapshot, if they have a game this
    /// round.
    pub async fn game_state(&self, code: &str, player: PlayerId) -> Option<Value> {
        let shared = self.store.get(code)?;
        let session = shared.lock().await;
        session.game_for(player).map(|g| g.state())
    }

    /// Clamped round counters; defaults to 1/1 when the session is unknown.
    pub async fn round_info(&self, code: &str) -> RoundInfo {
        match self.store.get(code) {
            Some(shared) => shared.lock().await.round_info(),
            None => RoundInfo {
                current_round: 1,
                total_rounds: 1,
            },
        }
    }

    /// Shuffle the roster, pair consecutive players, and start one engine per
    /// pair. An odd player out gets no game this round. All-or-nothing: if
    /// any engine fails to construct, no pairing survives and the round
    /// counter does not move.
    fn advance_round(session: &mut TournamentSession) -> Result<(), TournamentError> {
        if session.current_round >= session.number_of_rounds {
            return Err(TournamentError::AllRoundsCompleted);
        }
        if session.players.len() < 2 {
            return Err(TournamentError::NotEnoughPlayers);
        }
        if session.current_round >= session.round_plan.len() {
            return Err(TournamentError::NoPlanForRound {
                round: session.current_round + 1,
            });
        }

        session.touch();
        session.round_started = false;
        session.clear_games();

        let kind = session.round_plan[session.current_round];
        let mut roster = session.players.clone();
        roster.shuffle(&mut rand::thread_rng());

        let mut engines: Vec<Box<dyn Game>> = Vec::with_capacity(roster.len() / 2);
        for pair in roster.chunks_exact(2) {
            match create_game(kind, pair.to_vec()) {
                Ok(engine) => engines.push(engine),
                Err(e) => {
                    log::warn!("engine construction failed for {}: {e}", session.code);
                    session.clear_games();
                    return Err(TournamentError::GameStartFailed);
                }
            }
        }

        session.set_round_games(engines);
        session.current_round += 1;
        session.round_started = true;
        log::info!(
            "round {} of {} started for {} ({kind}, {} games)",
            session.current_round,
            session.number_of_rounds,
            session.code,
            session.players.len() / 2
        );
        Ok(())
    }

    async fn log_round_start_locked(&self, session: &TournamentSession) -> Result<(), TournamentError> {
        let Some(plan_index) = session.current_round.checked_sub(1) else {
            log::warn!("no round started yet for {}, nothing to log", session.code);
            return Ok(());
        };
        let Some(&kind) = session.round_plan.get(plan_index) else {
            log::warn!(
                "round {} of {} has no plan entry, nothing to log",
                session.current_round,
                session.code
            );
            return Ok(());
        };

        for game in session.games() {
            let ids: Vec<PlayerId> = game.players().iter().map(|p| p.id).collect();
            if let Err(e) = self
                .persistence
                .insert_game_and_placements(session.tournament_id, session.current_round, kind, &ids)
                .await
            {
                log::error!(
                    "failed to persist round {} of tournament {}: {e}",
                    session.current_round,
                    session.tournament_id
                );
                return Err(TournamentError::Storage);
            }
        }
        Ok(())
    }

    /// Match each finished engine to its durable game row by player-id-set
    /// equality and write winner/loser placements. Draws leave every row at
    /// `Undetermined`.
    async fn reconcile_locked(&self, session: &TournamentSession) -> Result<(), TournamentError> {
        let rows = self
            .persistence
            .load_games_for_round(session.tournament_id, session.current_round)
            .await
            .map_err(|e| {
                log::error!(
                    "failed to load games for round {} of tournament {}: {e}",
                    session.current_round,
                    session.tournament_id
                );
                TournamentError::Storage
            })?;
        if rows.is_empty() {
            log::warn!(
                "no durable games for round {} of tournament {}",
                session.current_round,
                session.tournament_id
            );
            return Ok(());
        }

        for game in session.games().filter(|g| g.is_over()) {
            self.score_game(game, &rows).await?;
        }
        Ok(())
    }

    /// Score one finished engine against the round's durable rows.
    async fn score_game(&self, game: &dyn Game, rows: &[GameRow]) -> Result<(), TournamentError> {
        let winner: Option<&Player> = game.winner();
        let engine_ids: HashSet<PlayerId> = game.players().iter().map(|p| p.id).collect();

        for row in rows {
            let placements = self
                .persistence
                .load_placements_for_game(row.game_id)
                .await
                .map_err(|e| {
                    log::error!("failed to load placements for game {}: {e}", row.game_id);
                    TournamentError::Storage
                })?;
            let row_ids: HashSet<PlayerId> = placements.iter().map(|p| p.user_id).collect();
            if row_ids != engine_ids {
                continue;
            }

            for placement in &placements {
                if placement.placement != Placement::Undetermined {
                    continue;
                }
                let value = match winner {
                    // A draw leaves every row undetermined.
                    None => continue,
                    Some(w) if w.id == placement.user_id => Placement::Winner,
                    Some(_) => Placement::Loser,
                };
                self.persistence
                    .update_placement(placement.user_id, row.game_id, value)
                    .await
                    .map_err(|e| {
                        log::error!(
                            "failed to set placement for user {} in game {}: {e}",
                            placement.user_id,
                            row.game_id
                        );
                        TournamentError::Storage
                    })?;
            }
            break;
        }
        Ok(())
    }
}
