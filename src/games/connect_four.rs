//! Gravity-drop connection game on a 6x7 grid: four in a row wins.

use crate::games::{pair_slot, Game, GameKind, MoveFault, MoveOutcome};
use crate::models::{Player, PlayerId};
use serde::Deserialize;
use serde_json::{json, Value};

const ROWS: usize = 6;
const COLS: usize = 7;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Color {
    Empty = 0,
    Red = 1,
    Yellow = 2,
}

#[derive(Deserialize)]
struct ConnectFourMove {
    column: usize,
}

pub struct ConnectFourGame {
    players: [Player; 2],
    board: [[Color; COLS]; ROWS],
    turn_index: usize,
    winner: Option<Player>,
    game_over: bool,
}

impl ConnectFourGame {
    pub fn new(players: [Player; 2]) -> Self {
        Self {
            players,
            board: [[Color::Empty; COLS]; ROWS],
            turn_index: 0,
            winner: None,
            game_over: false,
        }
    }

    fn drop_piece(&mut self, column: usize) -> MoveOutcome {
        if column >= COLS {
            return MoveOutcome::Fault(MoveFault::Illegal(format!(
                "Column {column} is out of bounds (valid: 0-{})",
                COLS - 1
            )));
        }
        // Gravity: lowest empty row in the column, bottom row is ROWS-1.
        let row = match (0..ROWS).rev().find(|&r| self.board[r][column] == Color::Empty) {
            Some(row) => row,
            None => return MoveOutcome::Rejected("column is full"),
        };
        let color = if self.turn_index == 0 { Color::Red } else { Color::Yellow };
        self.board[row][column] = color;
        if let Some(result) = self.evaluate(row, column) {
            self.game_over = true;
            self.winner = match result {
                Color::Red => Some(self.players[0].clone()),
                Color::Yellow => Some(self.players[1].clone()),
                Color::Empty => None,
            };
        }
        self.turn_index ^= 1;
        MoveOutcome::Accepted
    }

    /// Win/draw check from the just-placed cell. `Some(Color::Empty)` means a
    /// draw (board full, no four-in-a-row).
    fn evaluate(&self, row: usize, col: usize) -> Option<Color> {
        let color = self.board[row][col];
        let directions = [(0i32, 1i32), (1, 0), (1, 1), (1, -1)];
        if directions
            .iter()
            .any(|&(dr, dc)| self.has_line(row, col, dr, dc, color))
        {
            return Some(color);
        }
        if self
            .board
            .iter()
            .all(|row| row.iter().all(|&c| c != Color::Empty))
        {
            return Some(Color::Empty);
        }
        None
    }

    /// Count same-color cells along both directions of `(dr, dc)` from the
    /// placed cell, extending up to 3 cells each way.
    fn has_line(&self, row: usize, col: usize, dr: i32, dc: i32, color: Color) -> bool {
        let mut count = 1;
        for sign in [1i32, -1] {
            for step in 1..=3 {
                let r = row as i32 + dr * step * sign;
                let c = col as i32 + dc * step * sign;
                if r < 0 || r >= ROWS as i32 || c < 0 || c >= COLS as i32 {
                    break;
                }
                if self.board[r as usize][c as usize] != color {
                    break;
                }
                count += 1;
                if count == 4 {
                    return true;
                }
            }
        }
        false
    }
}

impl Game for ConnectFourGame {
    fn kind(&self) -> GameKind {
        GameKind::ConnectFour
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
        let mv: ConnectFourMove = match serde_json::from_value(payload.clone()) {
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
        self.drop_piece(mv.column)
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
