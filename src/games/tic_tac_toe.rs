//! Turn-based 3x3 grid game: three in a row/column/diagonal wins.

use crate::games::{pair_slot, Game, GameKind, MoveFault, MoveOutcome};
use crate::models::{Player, PlayerId};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Mark {
    Empty = 0,
    X = 1,
    O = 2,
}

#[derive(Deserialize)]
struct TicTacToeMove {
    x: usize,
    y: usize,
}

pub struct TicTacToeGame {
    players: [Player; 2],
    board: [[Mark; 3]; 3],
    turn_index: usize,
    winner: Option<Player>,
    game_over: bool,
}

impl TicTacToeGame {
    pub fn new(players: [Player; 2]) -> Self {
        Self {
            players,
            board: [[Mark::Empty; 3]; 3],
            turn_index: 0,
            winner: None,
            game_over: false,
        }
    }

    fn place(&mut self, x: usize, y: usize) -> MoveOutcome {
        if x >= 3 || y >= 3 {
            return MoveOutcome::Fault(MoveFault::Illegal(format!(
                "Cell ({x}, {y}) is out of bounds (valid: 0-2)"
            )));
        }
        if self.board[x][y] != Mark::Empty {
            return MoveOutcome::Fault(MoveFault::Illegal(format!(
                "Cell ({x}, {y}) is already occupied"
            )));
        }
        let mark = if self.turn_index == 0 { Mark::X } else { Mark::O };
        self.board[x][y] = mark;
        if let Some(result) = self.evaluate(x, y) {
            self.game_over = true;
            self.winner = match result {
                Mark::X => Some(self.players[0].clone()),
                Mark::O => Some(self.players[1].clone()),
                Mark::Empty => None,
            };
        }
        self.turn_index ^= 1;
        MoveOutcome::Accepted
    }

    /// Win/draw check through the just-placed cell. `Some(Mark::Empty)` means
    /// a draw (board full, no line).
    fn evaluate(&self, x: usize, y: usize) -> Option<Mark> {
        let mark = self.board[x][y];
        let row = (0..3).all(|c| self.board[x][c] == mark);
        let col = (0..3).all(|r| self.board[r][y] == mark);
        let diag = (0..3).all(|i| self.board[i][i] == mark)
            || (0..3).all(|i| self.board[i][2 - i] == mark);
        if row || col || diag {
            return Some(mark);
        }
        if self
            .board
            .iter()
            .all(|row| row.iter().all(|&c| c != Mark::Empty))
        {
            return Some(Mark::Empty);
        }
        None
    }
}

impl Game for TicTacToeGame {
    fn kind(&self) -> GameKind {
        GameKind::TicTacToe
    }

    fn players(&self) -> &[Player; 2] {
        &self.players
    }

    fn is_over(&self) -> bool {
        self.game_over
    }

    fn winner(&self) -> Option<&Player> {
        self.winner.as_ref()
    }

    fn apply_move(&mut self, payload: &Value, player: PlayerId) -> MoveOutcome {
        if self.game_over {
            return MoveOutcome::Rejected("game is already over");
        }
        let mv: TicTacToeMove = match serde_json::from_value(payload.clone()) {
            Ok(mv) => mv,
            Err(e) => return MoveOutcome::Fault(MoveFault::Format(e.to_string())),
        };
        let slot = match pair_slot(&self.players, player) {
            Some(slot) => slot,
            None => return MoveOutcome::Rejected("player is not in this game"),
        };
        if slot != self.turn_index {
            return MoveOutcome::Rejected("not this player's turn");
        }
        self.place(mv.x, mv.y)
    }

    fn state(&self) -> Value {
        let board: Vec<Vec<u8>> = self
            .board
            .iter()
            .map(|row| row.iter().map(|&c| c as u8).collect())
            .collect();
        json!({
            "board": board,
            "player_turn": self.players[self.turn_index],
            "winner": self.winner,
            "game_over": self.game_over,
        })
    }
}
