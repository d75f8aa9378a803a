// Shared fakes for integration tests: an in-memory game server and an HTTP RCON gateway.
#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use axum::{Json, Router, extract::State, http::HeaderMap, http::StatusCode, routing::post};
use geofence_worker::domain::{
    GameServer, PlayerObservation, RconError, SessionSnapshot, WorldPosition,
};
use serde_json::{Value, json};

pub fn session(map: &str) -> SessionSnapshot {
    SessionSnapshot {
        map_name: map.to_string(),
        game_mode: "Warfare".to_string(),
        player_count: 40,
    }
}

#[derive(Default)]
struct ServerState {
    session: SessionSnapshot,
    players: Vec<PlayerObservation>,
    fail_punish: bool,
    session_fetches: usize,
    player_fetches: usize,
    punish_attempts: usize,
    warnings: Vec<String>,
    punished: Vec<String>,
}

// Scripted game server; a successful punishment kills the player.
#[derive(Clone)]
pub struct FakeServer {
    state: Arc<Mutex<ServerState>>,
}

impl FakeServer {
    pub fn new(session: SessionSnapshot) -> Self {
        Self {
            state: Arc::new(Mutex::new(ServerState {
                session,
                ..ServerState::default()
            })),
        }
    }

    pub fn set_session(&self, session: SessionSnapshot) {
        self.lock().session = session;
    }

    pub fn fail_punish(&self, fail: bool) {
        self.lock().fail_punish = fail;
    }

    // Places a player; the origin means not spawned.
    pub fn place(&self, id: &str, team: &str, position: WorldPosition) {
        let player = PlayerObservation {
            id: id.to_string(),
            name: id.to_string(),
            team: team.to_string(),
            position,
            spawned: position.is_spawned(),
        };
        let mut guard = self.lock();
        match guard.players.iter_mut().find(|p| p.id == id) {
            Some(existing) => *existing = player,
            None => guard.players.push(player),
        }
    }

    pub fn remove(&self, id: &str) {
        self.lock().players.retain(|p| p.id != id);
    }

    pub fn session_fetches(&self) -> usize {
        self.lock().session_fetches
    }

    pub fn player_fetches(&self) -> usize {
        self.lock().player_fetches
    }

    pub fn punish_attempts(&self) -> usize {
        self.lock().punish_attempts
    }

    pub fn warnings(&self) -> Vec<String> {
        self.lock().warnings.clone()
    }

    pub fn punished(&self) -> Vec<String> {
        self.lock().punished.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ServerState> {
        self.state.lock().expect("fake server mutex poisoned")
    }
}

#[async_trait]
impl GameServer for FakeServer {
    async fn fetch_session(&self) -> Result<SessionSnapshot, RconError> {
        let mut guard = self.lock();
        guard.session_fetches += 1;
        Ok(guard.session.clone())
    }

    async fn fetch_players(&self) -> Result<Vec<PlayerObservation>, RconError> {
        let mut guard = self.lock();
        guard.player_fetches += 1;
        Ok(guard.players.clone())
    }

    async fn send_warning(&self, player_name: &str, _message: &str) -> Result<(), RconError> {
        self.lock().warnings.push(player_name.to_string());
        Ok(())
    }

    async fn punish(&self, player_id: &str, _reason: &str) -> Result<(), RconError> {
        let mut guard = self.lock();
        guard.punish_attempts += 1;
        if guard.fail_punish {
            return Err(RconError::Transport("punish failed".to_string()));
        }
        guard.punished.push(player_id.to_string());
        if let Some(player) = guard.players.iter_mut().find(|p| p.id == player_id) {
            player.position = WorldPosition::default();
            player.spawned = false;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Clone, Default)]
struct GatewayState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    // Keyed by command name, or `GetServerInformation:<body>` for reads.
    responses: Arc<Mutex<HashMap<String, (StatusCode, Value)>>>,
}

// RCON gateway on an ephemeral port that replays canned envelopes.
pub struct FakeGateway {
    pub base_url: String,
    state: GatewayState,
}

impl FakeGateway {
    pub async fn spawn() -> Self {
        let state = GatewayState::default();
        let app = Router::new()
            .route("/rcon", post(handle_command))
            .with_state(state.clone());

        // Bind to an ephemeral port to avoid collisions with local services.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral test port");
        let addr = listener.local_addr().expect("get local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("gateway failed");
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
        }
    }

    pub fn respond(&self, key: &str, status: StatusCode, envelope: Value) {
        self.state
            .responses
            .lock()
            .expect("responses mutex poisoned")
            .insert(key.to_string(), (status, envelope));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state
            .requests
            .lock()
            .expect("requests mutex poisoned")
            .clone()
    }
}

async fn handle_command(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let authorization = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let name = body["name"].as_str().unwrap_or_default().to_string();
    let key = match body["contentBody"].as_str() {
        Some(target) if name == "GetServerInformation" => format!("{name}:{target}"),
        _ => name,
    };

    state
        .requests
        .lock()
        .expect("requests mutex poisoned")
        .push(RecordedRequest {
            authorization,
            body,
        });

    let response = state
        .responses
        .lock()
        .expect("responses mutex poisoned")
        .get(&key)
        .cloned();
    let (status, envelope) = response.unwrap_or((
        StatusCode::OK,
        json!({ "statusCode": 200, "statusMessage": "OK", "contentBody": null }),
    ));
    (status, Json(envelope))
}
