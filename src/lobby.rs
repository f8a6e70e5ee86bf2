//! Pre-tournament roster management: lobby creation, join/leave, round plans.

use crate::games::{random_round_plan, GameKind};
use crate::models::{Player, PlayerId, TournamentSession};
use crate::store::SessionStore;
use rand::Rng;
use std::sync::Arc;

/// Rounds per tournament are bounded at creation.
pub const MIN_ROUNDS: usize = 1;
pub const MAX_ROUNDS: usize = 5;

/// Errors from lobby operations. All recoverable; the message goes back to
/// the caller as-is.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LobbyError {
    /// No live session for this code.
    NotFound,
    /// The tournament has started; the roster is closed.
    AlreadyStarted,
    /// Roster is at capacity.
    Full,
    /// A player with this id is already in the roster.
    NameTaken,
    /// Rounds must be within 1-5.
    InvalidRoundCount { requested: usize },
    /// Capacity must fit at least one pair.
    InvalidCapacity { requested: usize },
    /// An explicit plan entry is not on the game allow-list.
    UnknownGameKind(String),
    /// An explicit plan does not cover every round.
    PlanTooShort { rounds: usize, planned: usize },
}

impl std::fmt::Display for LobbyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LobbyError::NotFound => write!(f, "Game does not exist."),
            LobbyError::AlreadyStarted => write!(f, "Game already started."),
            LobbyError::Full => write!(f, "Lobby is full."),
            LobbyError::NameTaken => write!(f, "Name already taken."),
            LobbyError::InvalidRoundCount { requested } => {
                write!(
                    f,
                    "Number of rounds must be between {MIN_ROUNDS} and {MAX_ROUNDS} (got {requested})."
                )
            }
            LobbyError::InvalidCapacity { requested } => {
                write!(f, "Lobby capacity must be at least 2 (got {requested}).")
            }
            LobbyError::UnknownGameKind(name) => write!(f, "Unknown game type: {name}."),
            LobbyError::PlanTooShort { rounds, planned } => {
                write!(f, "Game plan covers {planned} rounds but {rounds} are needed.")
            }
        }
    }
}

impl std::error::Error for LobbyError {}

/// Creates sessions in the store and manages rosters until the tournament
/// starts.
pub struct LobbyManager {
    store: Arc<SessionStore>,
}

impl LobbyManager {
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self { store }
    }

    /// Create a session and return its lobby code.
    ///
    /// The round plan is `round_count` uniform random draws from the
    /// allow-list, unless `use_random_plan` is false and an explicit non-empty
    /// plan is given; explicit plan names are parsed case-insensitively and
    /// must cover every round.
    pub fn create_lobby(
        &self,
        capacity: usize,
        round_count: usize,
        use_random_plan: bool,
        explicit_plan: Option<&[String]>,
    ) -> Result<String, LobbyError> {
        if !(MIN_ROUNDS..=MAX_ROUNDS).contains(&round_count) {
            return Err(LobbyError::InvalidRoundCount {
                requested: round_count,
            });
        }
        if capacity < 2 {
            return Err(LobbyError::InvalidCapacity {
                requested: capacity,
            });
        }

        let plan = match explicit_plan {
            Some(names) if !use_random_plan && !names.is_empty() => {
                let parsed: Result<Vec<GameKind>, LobbyError> = names
                    .iter()
                    .map(|name| {
                        GameKind::parse(name).ok_or_else(|| LobbyError::UnknownGameKind(name.clone()))
                    })
                    .collect();
                let parsed = parsed?;
                if parsed.len() < round_count {
                    return Err(LobbyError::PlanTooShort {
                        rounds: round_count,
                        planned: parsed.len(),
                    });
                }
                parsed
            }
            _ => random_round_plan(round_count),
        };

        let code = self.generate_unique_code();
        self.store
            .insert(TournamentSession::new(&code, capacity, round_count, plan));
        log::info!("created lobby {code} ({round_count} rounds, capacity {capacity})");
        Ok(code)
    }

    /// Whether `player_id` could join right now. Checks run in order: session
    /// exists, tournament not started, roster not full, id not already
    /// present; the first failing check wins.
    pub async fn can_join(&self, code: &str, player_id: PlayerId) -> Result<(), LobbyError> {
        let shared = self.store.get(code).ok_or(LobbyError::NotFound)?;
        let session = shared.lock().await;
        Self::check_can_join(&session, player_id)
    }

    /// Re-runs the `can_join` checks and appends the player on success.
    pub async fn join(&self, code: &str, player: Player) -> Result<(), LobbyError> {
        let shared = self.store.get(code).ok_or(LobbyError::NotFound)?;
        let mut session = shared.lock().await;
        Self::check_can_join(&session, player.id)?;
        session.touch();
        session.players.push(player);
        Ok(())
    }

    /// Remove the player if present. A roster drained to zero tears the
    /// session down entirely, whatever state it was in. Returns false only
    /// when no session exists for `code`.
    pub async fn leave(&self, code: &str, player_id: PlayerId) -> bool {
        let Some(shared) = self.store.get(code) else {
            return false;
        };
        let mut session = shared.lock().await;
        session.touch();
        session.players.retain(|p| p.id != player_id);
        if session.players.is_empty() {
            log::info!("lobby {code} is empty, removing session");
            return self.store.remove(code);
        }
        true
    }

    /// Roster snapshot; empty when the session does not exist.
    pub async fn players_in_lobby(&self, code: &str) -> Vec<Player> {
        match self.store.get(code) {
            Some(shared) => shared.lock().await.players.clone(),
            None => Vec::new(),
        }
    }

    fn check_can_join(session: &TournamentSession, player_id: PlayerId) -> Result<(), LobbyError> {
        if session.tournament_started {
            return Err(LobbyError::AlreadyStarted);
        }
        if session.players.len() >= session.capacity {
            return Err(LobbyError::Full);
        }
        if session.players.iter().any(|p| p.id == player_id) {
            return Err(LobbyError::NameTaken);
        }
        Ok(())
    }

    /// 4-digit code, re-rolled while it collides with a live session.
    fn generate_unique_code(&self) -> String {
        let mut rng = rand::thread_rng();
        loop {
            let code = rng.gen_range(1000..10000).to_string();
            if !self.store.contains(&code) {
                return code;
            }
        }
    }
}
