//! Lobby tests: creation validation, join-check ordering, and teardown.

use std::sync::Arc;
use tournament_arcade::{GameKind, LobbyError, LobbyManager, Player, SessionStore};

fn manager() -> (Arc<SessionStore>, LobbyManager) {
    let store = Arc::new(SessionStore::new());
    (Arc::clone(&store), LobbyManager::new(store))
}

#[test]
fn create_lobby_validates_round_count_and_capacity() {
    let (_, lobby) = manager();
    assert!(matches!(
        lobby.create_lobby(8, 0, true, None),
        Err(LobbyError::InvalidRoundCount { .. })
    ));
    assert!(matches!(
        lobby.create_lobby(8, 6, true, None),
        Err(LobbyError::InvalidRoundCount { .. })
    ));
    assert!(matches!(
        lobby.create_lobby(1, 3, true, None),
        Err(LobbyError::InvalidCapacity { .. })
    ));
}

#[test]
fn create_lobby_registers_session_with_random_plan() {
    let (store, lobby) = manager();
    let code = lobby.create_lobby(8, 3, true, None).unwrap();
    assert!(store.contains(&code));

    let shared = store.get(&code).unwrap();
    let session = shared.blocking_lock();
    assert_eq!(session.code, code);
    assert_eq!(session.number_of_rounds, 3);
    assert_eq!(session.current_round, 0);
    assert!(!session.tournament_started);
    assert_eq!(session.round_plan.len(), 3);
}

#[test]
fn explicit_plan_is_parsed_case_insensitively() {
    let (store, lobby) = manager();
    let plan = vec!["tictactoe".to_string(), "CONNECTFOUR".to_string()];
    let code = lobby.create_lobby(4, 2, false, Some(plan.as_slice())).unwrap();

    let shared = store.get(&code).unwrap();
    let session = shared.blocking_lock();
    assert_eq!(
        session.round_plan,
        vec![GameKind::TicTacToe, GameKind::ConnectFour]
    );
}

#[test]
fn explicit_plan_rejects_unknown_kind_and_short_plan() {
    let (_, lobby) = manager();
    let bad = vec!["chess".to_string()];
    assert!(matches!(
        lobby.create_lobby(4, 1, false, Some(bad.as_slice())),
        Err(LobbyError::UnknownGameKind(_))
    ));

    let short = vec!["tictactoe".to_string()];
    assert!(matches!(
        lobby.create_lobby(4, 2, false, Some(short.as_slice())),
        Err(LobbyError::PlanTooShort { rounds: 2, planned: 1 })
    ));
}

#[tokio::test]
async fn join_appends_and_can_join_orders_checks() {
    let (store, lobby) = manager();
    let code = lobby.create_lobby(2, 1, true, None).unwrap();

    let alice = Player::guest("Alice");
    let bob = Player::guest("Bob");
    lobby.join(&code, alice.clone()).await.unwrap();

    // A member of a non-full, non-started lobby: duplicate id wins over capacity.
    assert_eq!(
        lobby.can_join(&code, alice.id).await,
        Err(LobbyError::NameTaken)
    );

    lobby.join(&code, bob.clone()).await.unwrap();
    let carol = Player::guest("Carol");
    assert_eq!(lobby.can_join(&code, carol.id).await, Err(LobbyError::Full));

    // Once started, "already started" wins over "full" for a non-member.
    {
        let shared = store.get(&code).unwrap();
        shared.lock().await.tournament_started = true;
    }
    assert_eq!(
        lobby.can_join(&code, carol.id).await,
        Err(LobbyError::AlreadyStarted)
    );
}

#[tokio::test]
async fn can_join_unknown_code_reports_not_found() {
    let (_, lobby) = manager();
    assert_eq!(
        lobby.can_join("0000", Player::guest("Alice").id).await,
        Err(LobbyError::NotFound)
    );
}

#[tokio::test]
async fn leave_removes_player_and_tears_down_empty_session() {
    let (store, lobby) = manager();
    let code = lobby.create_lobby(4, 1, true, None).unwrap();

    let alice = Player::guest("Alice");
    let bob = Player::guest("Bob");
    lobby.join(&code, alice.clone()).await.unwrap();
    lobby.join(&code, bob.clone()).await.unwrap();

    assert!(lobby.leave(&code, alice.id).await);
    assert_eq!(lobby.players_in_lobby(&code).await.len(), 1);
    assert!(store.contains(&code));

    assert!(lobby.leave(&code, bob.id).await);
    assert!(!store.contains(&code));

    assert!(!lobby.leave(&code, bob.id).await);
}

#[tokio::test]
async fn lobby_codes_are_unique_among_live_sessions() {
    let (store, lobby) = manager();
    for _ in 0..50 {
        lobby.create_lobby(4, 1, true, None).unwrap();
    }
    assert_eq!(store.len(), 50);
}
