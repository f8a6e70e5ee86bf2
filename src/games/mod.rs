//! The three built-in game engines and their common contract.

mod connect_four;
mod factory;
mod rock_paper_scissors;
mod tic_tac_toe;

pub use connect_four::ConnectFourGame;
pub use factory::{create_game, random_round_plan, GameCreateError, VALID_GAME_KINDS};
pub use rock_paper_scissors::RockPaperScissorsGame;
pub use tic_tac_toe::TicTacToeGame;

use crate::models::{Player, PlayerId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which of the built-in games a round runs.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameKind {
    TicTacToe,
    RockPaperScissors,
    ConnectFour,
}

impl GameKind {
    /// Parse a kind from its name, ignoring case (accepts `TicTacToe`,
    /// `tictactoe`, `CONNECTFOUR`, ...).
    pub fn parse(name: &str) -> Option<GameKind> {
        match name.to_ascii_lowercase().as_str() {
            "tictactoe" => Some(GameKind::TicTacToe),
            "rockpaperscissors" => Some(GameKind::RockPaperScissors),
            "connectfour" => Some(GameKind::ConnectFour),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameKind::TicTacToe => "TicTacToe",
            GameKind::RockPaperScissors => "RockPaperScissors",
            GameKind::ConnectFour => "ConnectFour",
        }
    }
}

impl std::fmt::Display for GameKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A move that could not be applied and is reported back to the acting player.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MoveFault {
    /// Payload could not be interpreted as this game's move shape.
    Format(String),
    /// Well-formed but violates the game's rules (out-of-range target, occupied cell).
    Illegal(String),
}

impl std::fmt::Display for MoveFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoveFault::Format(detail) => write!(f, "Move could not be interpreted: {detail}"),
            MoveFault::Illegal(detail) => write!(f, "Invalid move: {detail}"),
        }
    }
}

/// Outcome of handing a move payload to an engine. All three engines speak
/// this type; the orchestrator never sees a game-specific error.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MoveOutcome {
    /// Move applied; game state advanced.
    Accepted,
    /// Move ignored without an error event (off-turn, finished game, stranger).
    /// The reason is only logged.
    Rejected(&'static str),
    /// Move refused; the reason goes back to the acting player.
    Fault(MoveFault),
}

impl MoveOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, MoveOutcome::Accepted)
    }
}

/// Common contract of the three engines. One instance per pair, per round;
/// index 0 of `players` acts first where turn order matters.
pub trait Game: Send {
    fn kind(&self) -> GameKind;

    /// The fixed pair, in construction (turn) order.
    fn players(&self) -> &[Player; 2];

    fn is_over(&self) -> bool;

    fn winner(&self) -> Option<&Player>;

    /// Interpret `payload` and apply it on behalf of `player`.
    fn apply_move(&mut self, payload: &Value, player: PlayerId) -> MoveOutcome;

    /// Snapshot of board/choices/turn/winner, pushed to the pair after every
    /// accepted move. Shape is game-specific.
    fn state(&self) -> Value;
}

/// Index of `player` within the pair, or `None` for a stranger.
pub(crate) fn pair_slot(players: &[Player; 2], player: PlayerId) -> Option<usize> {
    players.iter().position(|p| p.id == player)
}
