//! Simultaneous two-choice game. No turn order; each player submits one
//! choice and the outcome is evaluated once both slots are filled.

use crate::games::{pair_slot, Game, GameKind, MoveFault, MoveOutcome};
use crate::models::{Player, PlayerId};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Choice {
    Rock,
    Paper,
    Scissors,
}

impl Choice {
    fn beats(self, other: Choice) -> bool {
        matches!(
            (self, other),
            (Choice::Rock, Choice::Scissors)
                | (Choice::Paper, Choice::Rock)
                | (Choice::Scissors, Choice::Paper)
        )
    }
}

#[derive(Deserialize)]
struct RockPaperScissorsMove {
    choice: Choice,
}

pub struct RockPaperScissorsGame {
    players: [Player; 2],
    choices: [Option<Choice>; 2],
    winner: Option<Player>,
    result: Option<String>,
    game_over: bool,
}

impl RockPaperScissorsGame {
    pub fn new(players: [Player; 2]) -> Self {
        Self {
            players,
            choices: [None, None],
            winner: None,
            result: None,
            game_over: false,
        }
    }

    /// Fixed outcome table, evaluated exactly once when the second choice lands.
    fn evaluate(&mut self) {
        let (c0, c1) = match (self.choices[0], self.choices[1]) {
            (Some(a), Some(b)) => (a, b),
            _ => return,
        };
        self.game_over = true;
        if c0 == c1 {
            self.winner = None;
            self.result = Some("Draw!".to_string());
        } else if c0.beats(c1) {
            self.winner = Some(self.players[0].clone());
            self.result = Some(format!("{} wins!", self.players[0].name));
        } else {
            self.winner = Some(self.players[1].clone());
            self.result = Some(format!("{} wins!", self.players[1].name));
        }
    }
}

impl Game for RockPaperScissorsGame {
    fn kind(&self) -> GameKind {
        GameKind::RockPaperScissors
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
        let mv: RockPaperScissorsMove = match serde_json::from_value(payload.clone()) {
            Ok(mv) => mv,
            Err(e) => return MoveOutcome::Fault(MoveFault::Format(e.to_string())),
        };
        let slot = match pair_slot(&self.players, player) {
            Some(slot) => slot,
            None => return MoveOutcome::Rejected("player is not in this game"),
        };
        if self.choices[slot].is_some() {
            return MoveOutcome::Rejected("choice already made");
        }
        self.choices[slot] = Some(mv.choice);
        self.evaluate();
        MoveOutcome::Accepted
    }

    fn state(&self) -> Value {
        json!({
            "winner": self.winner,
            "result": self.result,
            "game_over": self.game_over,
        })
    }
}
