//! Engine tests: move legality, win/draw detection, and outcome normalization
//! for the three built-in games.

use serde_json::json;
use tournament_arcade::{
    ConnectFourGame, Game, MoveFault, MoveOutcome, Player, RockPaperScissorsGame, TicTacToeGame,
};

fn pair() -> [Player; 2] {
    [Player::guest("Alice"), Player::guest("Bob")]
}

fn cell(x: usize, y: usize) -> serde_json::Value {
    json!({ "x": x, "y": y })
}

fn column(c: usize) -> serde_json::Value {
    json!({ "column": c })
}

fn choice(name: &str) -> serde_json::Value {
    json!({ "choice": name })
}

#[test]
fn tic_tac_toe_row_win_then_rejects_further_moves() {
    let players = pair();
    let (a, b) = (players[0].id, players[1].id);
    let mut game = TicTacToeGame::new(players);

    assert_eq!(game.apply_move(&cell(0, 0), a), MoveOutcome::Accepted);
    assert_eq!(game.apply_move(&cell(1, 0), b), MoveOutcome::Accepted);
    assert_eq!(game.apply_move(&cell(0, 1), a), MoveOutcome::Accepted);
    assert_eq!(game.apply_move(&cell(1, 1), b), MoveOutcome::Accepted);
    assert_eq!(game.apply_move(&cell(0, 2), a), MoveOutcome::Accepted);

    assert!(game.is_over());
    assert_eq!(game.winner().map(|p| p.id), Some(a));
    assert!(matches!(
        game.apply_move(&cell(2, 2), b),
        MoveOutcome::Rejected(_)
    ));
    assert!(matches!(
        game.apply_move(&cell(2, 2), a),
        MoveOutcome::Rejected(_)
    ));
}

#[test]
fn tic_tac_toe_off_turn_move_is_silent_rejection() {
    let players = pair();
    let b = players[1].id;
    let mut game = TicTacToeGame::new(players);

    // Index 0 acts first; Bob is not on turn.
    assert!(matches!(
        game.apply_move(&cell(0, 0), b),
        MoveOutcome::Rejected(_)
    ));
    assert!(!game.is_over());
}

#[test]
fn tic_tac_toe_out_of_range_and_occupied_are_faults() {
    let players = pair();
    let (a, b) = (players[0].id, players[1].id);
    let mut game = TicTacToeGame::new(players);

    assert!(matches!(
        game.apply_move(&cell(3, 0), a),
        MoveOutcome::Fault(MoveFault::Illegal(_))
    ));
    // A fault does not consume the turn.
    assert_eq!(game.apply_move(&cell(1, 1), a), MoveOutcome::Accepted);
    assert!(matches!(
        game.apply_move(&cell(1, 1), b),
        MoveOutcome::Fault(MoveFault::Illegal(_))
    ));
}

#[test]
fn tic_tac_toe_malformed_payload_is_format_fault() {
    let players = pair();
    let a = players[0].id;
    let mut game = TicTacToeGame::new(players);

    assert!(matches!(
        game.apply_move(&json!({ "row": 0 }), a),
        MoveOutcome::Fault(MoveFault::Format(_))
    ));
}

#[test]
fn tic_tac_toe_stranger_is_silent_rejection() {
    let players = pair();
    let mut game = TicTacToeGame::new(players);

    let stranger = Player::guest("Mallory");
    assert!(matches!(
        game.apply_move(&cell(0, 0), stranger.id),
        MoveOutcome::Rejected(_)
    ));
}

#[test]
fn tic_tac_toe_full_board_without_line_is_draw() {
    let players = pair();
    let (a, b) = (players[0].id, players[1].id);
    let mut game = TicTacToeGame::new(players);

    // X O X / X O O / O X X - no line for either mark.
    let moves = [
        (a, 0, 0),
        (b, 0, 1),
        (a, 0, 2),
        (b, 1, 1),
        (a, 1, 0),
        (b, 1, 2),
        (a, 2, 1),
        (b, 2, 0),
        (a, 2, 2),
    ];
    for (player, x, y) in moves {
        assert_eq!(game.apply_move(&cell(x, y), player), MoveOutcome::Accepted);
    }

    assert!(game.is_over());
    assert!(game.winner().is_none());
}

#[test]
fn rock_paper_scissors_outcome_unset_until_both_choose() {
    let players = pair();
    let (a, b) = (players[0].id, players[1].id);
    let mut game = RockPaperScissorsGame::new(players);

    assert_eq!(game.apply_move(&choice("rock"), a), MoveOutcome::Accepted);
    assert!(!game.is_over());
    assert!(game.winner().is_none());

    assert_eq!(
        game.apply_move(&choice("scissors"), b),
        MoveOutcome::Accepted
    );
    assert!(game.is_over());
    assert_eq!(game.winner().map(|p| p.id), Some(a));
}

#[test]
fn rock_paper_scissors_equal_choices_draw() {
    let players = pair();
    let (a, b) = (players[0].id, players[1].id);
    let mut game = RockPaperScissorsGame::new(players);

    assert_eq!(game.apply_move(&choice("paper"), b), MoveOutcome::Accepted);
    assert_eq!(game.apply_move(&choice("paper"), a), MoveOutcome::Accepted);
    assert!(game.is_over());
    assert!(game.winner().is_none());
    assert_eq!(game.state()["result"], "Draw!");
}

#[test]
fn rock_paper_scissors_second_choice_is_silent_rejection() {
    let players = pair();
    let a = players[0].id;
    let mut game = RockPaperScissorsGame::new(players);

    assert_eq!(game.apply_move(&choice("rock"), a), MoveOutcome::Accepted);
    assert!(matches!(
        game.apply_move(&choice("paper"), a),
        MoveOutcome::Rejected(_)
    ));
    assert!(!game.is_over());
}

#[test]
fn rock_paper_scissors_malformed_payload_is_format_fault() {
    let players = pair();
    let a = players[0].id;
    let mut game = RockPaperScissorsGame::new(players);

    assert!(matches!(
        game.apply_move(&json!({ "choice": "lizard" }), a),
        MoveOutcome::Fault(MoveFault::Format(_))
    ));
    assert!(matches!(
        game.apply_move(&json!(42), a),
        MoveOutcome::Fault(MoveFault::Format(_))
    ));
}

#[test]
fn connect_four_diagonal_win() {
    let players = pair();
    let (a, b) = (players[0].id, players[1].id);
    let mut game = ConnectFourGame::new(players);

    // Staircase: red ends up on (5,0), (4,1), (3,2), (2,3) bottom-left to
    // upper-right.
    let moves = [
        (a, 0),
        (b, 1),
        (a, 1),
        (b, 2),
        (a, 2),
        (b, 3),
        (a, 2),
        (b, 3),
        (a, 3),
        (b, 0),
        (a, 3),
    ];
    for (player, col) in moves {
        assert_eq!(game.apply_move(&column(col), player), MoveOutcome::Accepted);
    }

    assert!(game.is_over());
    assert_eq!(game.winner().map(|p| p.id), Some(a));
}

#[test]
fn connect_four_vertical_win() {
    let players = pair();
    let (a, b) = (players[0].id, players[1].id);
    let mut game = ConnectFourGame::new(players);

    for _ in 0..3 {
        assert_eq!(game.apply_move(&column(0), a), MoveOutcome::Accepted);
        assert_eq!(game.apply_move(&column(1), b), MoveOutcome::Accepted);
    }
    assert_eq!(game.apply_move(&column(0), a), MoveOutcome::Accepted);

    assert!(game.is_over());
    assert_eq!(game.winner().map(|p| p.id), Some(a));
}

#[test]
fn connect_four_full_column_rejected_without_mutation() {
    let players = pair();
    let (a, b) = (players[0].id, players[1].id);
    let mut game = ConnectFourGame::new(players);

    // Fill column 0 with alternating colors (6 rows, no four-in-a-row).
    for _ in 0..3 {
        assert_eq!(game.apply_move(&column(0), a), MoveOutcome::Accepted);
        assert_eq!(game.apply_move(&column(0), b), MoveOutcome::Accepted);
    }

    let before = game.state();
    assert!(matches!(
        game.apply_move(&column(0), a),
        MoveOutcome::Rejected(_)
    ));
    assert_eq!(game.state(), before);
    // Still this player's turn; a legal move elsewhere is accepted.
    assert_eq!(game.apply_move(&column(1), a), MoveOutcome::Accepted);
}

#[test]
fn connect_four_out_of_range_column_is_fault() {
    let players = pair();
    let a = players[0].id;
    let mut game = ConnectFourGame::new(players);

    assert!(matches!(
        game.apply_move(&column(7), a),
        MoveOutcome::Fault(MoveFault::Illegal(_))
    ));
}
