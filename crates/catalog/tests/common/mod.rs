//! In-process mock of the games REST backend.
//!
//! Speaks the backend field shape (`name`, numeric ids) on
//! `/api/games` and `/api/games/{id}`.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use gaming_hub_catalog::HttpRemote;

#[derive(Debug, Default)]
pub struct BackendState {
    pub games: Vec<Value>,
    pub next_id: i64,
    /// When set, every request answers with this status.
    pub fail_status: Option<u16>,
}

type Shared = Arc<RwLock<BackendState>>;

pub struct MockBackend {
    addr: SocketAddr,
    state: Shared,
    handle: JoinHandle<()>,
}

impl MockBackend {
    pub async fn start() -> Self {
        Self::start_with(Vec::new()).await
    }

    pub async fn start_with(games: Vec<Value>) -> Self {
        let state = Arc::new(RwLock::new(BackendState {
            next_id: games.len() as i64 + 1,
            games,
            fail_status: None,
        }));

        let app = Router::new()
            .route("/api/games", get(list_games).post(create_game))
            .route("/api/games/{id}", put(update_game).delete(delete_game))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            state,
            handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/api/games", self.addr)
    }

    pub fn remote(&self) -> HttpRemote {
        HttpRemote::new(self.base_url(), Duration::from_secs(5)).unwrap()
    }

    pub async fn fail_with(&self, status: Option<u16>) {
        self.state.write().await.fail_status = status;
    }

    pub async fn games(&self) -> Vec<Value> {
        self.state.read().await.games.clone()
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// A base URL on a port nobody is listening on.
pub async fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/api/games")
}

pub fn backend_game(id: i64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": format!("{name} description"),
        "image": "https://example.com/game.png",
        "price": 12.0,
        "category": "Arcade",
        "duration": "45 minutes",
        "difficulty": "Medium",
        "players": "1-4"
    })
}

fn failure(state: &BackendState) -> Option<Response> {
    state
        .fail_status
        .and_then(|code| StatusCode::from_u16(code).ok())
        .map(|code| code.into_response())
}

fn id_of(game: &Value) -> String {
    match &game["id"] {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

async fn list_games(State(state): State<Shared>) -> Response {
    let state = state.read().await;
    if let Some(resp) = failure(&state) {
        return resp;
    }
    Json(Value::Array(state.games.clone())).into_response()
}

async fn create_game(State(state): State<Shared>, Json(mut body): Json<Value>) -> Response {
    let mut state = state.write().await;
    if let Some(resp) = failure(&state) {
        return resp;
    }
    body["id"] = json!(state.next_id);
    state.next_id += 1;
    state.games.push(body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn update_game(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(mut body): Json<Value>,
) -> Response {
    let mut state = state.write().await;
    if let Some(resp) = failure(&state) {
        return resp;
    }
    let Some(index) = state.games.iter().position(|g| id_of(g) == id) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    body["id"] = state.games[index]["id"].clone();
    state.games[index] = body.clone();
    Json(body).into_response()
}

async fn delete_game(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    let mut state = state.write().await;
    if let Some(resp) = failure(&state) {
        return resp;
    }
    let before = state.games.len();
    state.games.retain(|g| id_of(g) != id);
    if state.games.len() == before {
        return StatusCode::NOT_FOUND.into_response();
    }
    StatusCode::NO_CONTENT.into_response()
}
