//! Single binary server: lobby REST surface over the orchestration core.
//! Run with: cargo run --bin server
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.

use actix_web::{
    delete, get, post,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tournament_arcade::{
    LobbyError, LobbyManager, LogChannel, MemoryGateway, Player, SessionStore, TournamentError,
    TournamentOrchestrator,
};
use uuid::Uuid;

/// Sessions idle for this long are reclaimed by the cleanup task.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

struct AppState {
    lobby: LobbyManager,
    orchestrator: TournamentOrchestrator,
}

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateLobbyBody {
    #[serde(default = "default_capacity")]
    capacity: usize,
    #[serde(default = "default_rounds")]
    rounds: usize,
    #[serde(default)]
    use_random_games: bool,
    #[serde(default)]
    game_types: Option<Vec<String>>,
}

fn default_capacity() -> usize {
    8
}

fn default_rounds() -> usize {
    3
}

#[derive(Deserialize)]
struct JoinBody {
    name: String,
    /// Durable account id; omitted for guests.
    #[serde(default)]
    id: Option<Uuid>,
}

#[derive(Deserialize)]
struct MoveBody {
    payload: Value,
}

/// Path segment: lobby code (e.g. /api/lobbies/{code})
#[derive(Deserialize)]
struct LobbyPath {
    code: String,
}

/// Path segments: lobby code and player id.
#[derive(Deserialize)]
struct LobbyPlayerPath {
    code: String,
    player_id: Uuid,
}

fn lobby_error_response(e: LobbyError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        LobbyError::NotFound => HttpResponse::NotFound().json(body),
        _ => HttpResponse::BadRequest().json(body),
    }
}

fn tournament_error_response(e: TournamentError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        TournamentError::SessionNotFound => HttpResponse::NotFound().json(body),
        TournamentError::Storage => HttpResponse::InternalServerError().json(body),
        _ => HttpResponse::BadRequest().json(body),
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "tournament-arcade",
    })
}

/// Create a lobby and return its code.
#[post("/api/lobbies")]
async fn api_create_lobby(state: Data<AppState>, body: Json<CreateLobbyBody>) -> HttpResponse {
    match state.lobby.create_lobby(
        body.capacity,
        body.rounds,
        body.use_random_games,
        body.game_types.as_deref(),
    ) {
        Ok(code) => HttpResponse::Ok().json(serde_json::json!({ "code": code })),
        Err(e) => lobby_error_response(e),
    }
}

/// Whether the player could join right now.
#[get("/api/lobbies/{code}/can-join/{player_id}")]
async fn api_can_join(state: Data<AppState>, path: Path<LobbyPlayerPath>) -> HttpResponse {
    match state.lobby.can_join(&path.code, path.player_id).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "ok": true })),
        Err(e) => lobby_error_response(e),
    }
}

/// List players in the lobby.
#[get("/api/lobbies/{code}/players")]
async fn api_list_players(state: Data<AppState>, path: Path<LobbyPath>) -> HttpResponse {
    HttpResponse::Ok().json(state.lobby.players_in_lobby(&path.code).await)
}

/// Join the lobby (guest unless a durable id is supplied). Returns the player.
#[post("/api/lobbies/{code}/players")]
async fn api_join(state: Data<AppState>, path: Path<LobbyPath>, body: Json<JoinBody>) -> HttpResponse {
    let player = match body.id {
        Some(id) => Player::registered(id, body.name.trim()),
        None => Player::guest(body.name.trim()),
    };
    match state.lobby.join(&path.code, player.clone()).await {
        Ok(()) => HttpResponse::Ok().json(player),
        Err(e) => lobby_error_response(e),
    }
}

/// Leave the lobby. An emptied lobby is torn down.
#[delete("/api/lobbies/{code}/players/{player_id}")]
async fn api_leave(state: Data<AppState>, path: Path<LobbyPlayerPath>) -> HttpResponse {
    let ok = state.lobby.leave(&path.code, path.player_id).await;
    if ok {
        HttpResponse::Ok().json(serde_json::json!({ "ok": true }))
    } else {
        HttpResponse::NotFound().json(serde_json::json!({ "error": "Game does not exist." }))
    }
}

/// Start the tournament (closes the roster).
#[post("/api/lobbies/{code}/start")]
async fn api_start_tournament(state: Data<AppState>, path: Path<LobbyPath>) -> HttpResponse {
    match state.orchestrator.start_tournament(&path.code).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "ok": true })),
        Err(e) => tournament_error_response(e),
    }
}

/// Start the next round: pair players, start engines, persist skeleton rows.
#[post("/api/lobbies/{code}/rounds")]
async fn api_start_round(state: Data<AppState>, path: Path<LobbyPath>) -> HttpResponse {
    match state.orchestrator.start_round(&path.code).await {
        Ok(()) => HttpResponse::Ok().json(state.orchestrator.round_info(&path.code).await),
        Err(e) => tournament_error_response(e),
    }
}

/// Clamped round counters for display.
#[get("/api/lobbies/{code}/round-info")]
async fn api_round_info(state: Data<AppState>, path: Path<LobbyPath>) -> HttpResponse {
    HttpResponse::Ok().json(state.orchestrator.round_info(&path.code).await)
}

/// Submit a move on behalf of a player.
#[post("/api/lobbies/{code}/players/{player_id}/moves")]
async fn api_make_move(
    state: Data<AppState>,
    path: Path<LobbyPlayerPath>,
    body: Json<MoveBody>,
) -> HttpResponse {
    match state
        .orchestrator
        .route_move(&path.code, path.player_id, body.into_inner().payload)
        .await
    {
        Ok(outcome) => {
            HttpResponse::Ok().json(serde_json::json!({ "accepted": outcome.is_accepted() }))
        }
        Err(e) => tournament_error_response(e),
    }
}

/// Current engine snapshot for the player, if they have a game this round.
#[get("/api/lobbies/{code}/players/{player_id}/game")]
async fn api_game_state(state: Data<AppState>, path: Path<LobbyPlayerPath>) -> HttpResponse {
    match state
        .orchestrator
        .game_state(&path.code, path.player_id)
        .await
    {
        Some(game_state) => HttpResponse::Ok().json(game_state),
        None => HttpResponse::NotFound()
            .json(serde_json::json!({ "error": "No game found for this player." })),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let store = Arc::new(SessionStore::new());
    let persistence = Arc::new(MemoryGateway::new());
    let realtime = Arc::new(LogChannel);
    let state = Data::new(AppState {
        lobby: LobbyManager::new(Arc::clone(&store)),
        orchestrator: TournamentOrchestrator::new(Arc::clone(&store), persistence, realtime),
    });

    // Background task: every 30 minutes, remove sessions idle for 12+ hours
    let store_cleanup = Arc::clone(&store);
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let removed = store_cleanup.purge_inactive(INACTIVITY_TIMEOUT);
            if removed > 0 {
                log::info!("Cleaned up {} inactive session(s)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_create_lobby)
            .service(api_can_join)
            .service(api_list_players)
            .service(api_join)
            .service(api_leave)
            .service(api_start_tournament)
            .service(api_start_round)
            .service(api_round_info)
            .service(api_make_move)
            .service(api_game_state)
    })
    .bind(bind)?
    .run()
    .await
}
