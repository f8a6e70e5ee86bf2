//! Group-addressed push channel. The transport itself (websockets, SSE, ...)
//! lives outside this crate; the orchestrator only relies on being able to
//! address a per-lobby group and a per-player group.

use crate::games::GameKind;
use crate::models::{PlayerId, RoundInfo};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

/// Events addressed to everyone in a lobby.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum LobbyEvent {
    PlayersUpdated(RoundInfo),
    Error { message: String },
}

/// Events addressed to a single player's connections.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum PlayerEvent {
    GameStarted { game_kind: GameKind },
    GameUpdate { state: Value },
    Error { message: String },
}

/// Push side of the real-time surface. Delivery is fire-and-forget: a lost
/// notification never fails the operation that produced it.
#[async_trait]
pub trait RealtimeChannel: Send + Sync {
    async fn send_to_lobby(&self, code: &str, event: LobbyEvent);
    async fn send_to_player(&self, player: PlayerId, event: PlayerEvent);
}

/// Drops every event. For tests that do not care about notifications.
#[derive(Default)]
pub struct NullChannel;

#[async_trait]
impl RealtimeChannel for NullChannel {
    async fn send_to_lobby(&self, _code: &str, _event: LobbyEvent) {}
    async fn send_to_player(&self, _player: PlayerId, _event: PlayerEvent) {}
}

/// Logs every event at debug level. Used by the binary until a transport is
/// plugged in.
#[derive(Default)]
pub struct LogChannel;

#[async_trait]
impl RealtimeChannel for LogChannel {
    async fn send_to_lobby(&self, code: &str, event: LobbyEvent) {
        log::debug!("lobby {code}: {event:?}");
    }

    async fn send_to_player(&self, player: PlayerId, event: PlayerEvent) {
        log::debug!("player {player}: {event:?}");
    }
}
