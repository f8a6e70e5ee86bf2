//! Mini-game tournament server core: lobby management, round orchestration,
//! and the three built-in two-player games.

pub mod games;
pub mod lobby;
pub mod models;
pub mod orchestrator;
pub mod persistence;
pub mod realtime;
pub mod store;

pub use games::{
    create_game, random_round_plan, ConnectFourGame, Game, GameCreateError, GameKind, MoveFault,
    MoveOutcome, RockPaperScissorsGame, TicTacToeGame, VALID_GAME_KINDS,
};
pub use lobby::{LobbyError, LobbyManager, MAX_ROUNDS, MIN_ROUNDS};
pub use models::{Player, PlayerId, PlayerKind, RoundInfo, TournamentId, TournamentSession};
pub use orchestrator::{TournamentError, TournamentOrchestrator};
pub use persistence::{
    GameId, GameRow, GatewayError, MemoryGateway, PersistenceGateway, Placement, PlacementRow,
};
pub use realtime::{LobbyEvent, LogChannel, NullChannel, PlayerEvent, RealtimeChannel};
pub use store::{SessionStore, SharedSession};
