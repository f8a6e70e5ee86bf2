//! Engine construction: allow-list, factory, and random round plans.

use crate::games::{
    ConnectFourGame, Game, GameKind, RockPaperScissorsGame, TicTacToeGame,
};
use crate::models::Player;
use rand::Rng;

/// The fixed allow-list of games a round plan may select from.
pub const VALID_GAME_KINDS: [GameKind; 3] = [
    GameKind::TicTacToe,
    GameKind::RockPaperScissors,
    GameKind::ConnectFour,
];

/// Engine construction failure.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum GameCreateError {
    /// Every built-in game is played by exactly two players.
    WrongPlayerCount { got: usize },
}

impl std::fmt::Display for GameCreateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameCreateError::WrongPlayerCount { got } => {
                write!(f, "Games require exactly 2 players (got {got})")
            }
        }
    }
}

impl std::error::Error for GameCreateError {}

/// Construct an engine of `kind` for exactly two players. The order of
/// `players` fixes turn order: index 0 acts first.
pub fn create_game(kind: GameKind, players: Vec<Player>) -> Result<Box<dyn Game>, GameCreateError> {
    let pair: [Player; 2] = players
        .try_into()
        .map_err(|v: Vec<Player>| GameCreateError::WrongPlayerCount { got: v.len() })?;
    Ok(match kind {
        GameKind::TicTacToe => Box::new(TicTacToeGame::new(pair)),
        GameKind::RockPaperScissors => Box::new(RockPaperScissorsGame::new(pair)),
        GameKind::ConnectFour => Box::new(ConnectFourGame::new(pair)),
    })
}

/// `count` independent uniform draws from the allow-list, one per round.
pub fn random_round_plan(count: usize) -> Vec<GameKind> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| VALID_GAME_KINDS[rng.gen_range(0..VALID_GAME_KINDS.len())])
        .collect()
}
