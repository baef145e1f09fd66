//! In-process stand-in for the tracking server's REST API.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

#[derive(Default)]
struct StubState {
    blocklist: Vec<Value>,
    visits: Vec<Value>,
    deleted: Vec<String>,
    failing: bool,
}

type Shared = Arc<Mutex<StubState>>;

pub struct StubServer {
    addr: SocketAddr,
    state: Shared,
}

impl StubServer {
    pub async fn start(blocklist: Vec<Value>) -> Self {
        let state: Shared = Arc::new(Mutex::new(StubState {
            blocklist,
            ..StubState::default()
        }));

        let app = Router::new()
            .route("/api/blocklist", get(list_rules).post(add_rule))
            .route("/api/blocklist/*key", delete(remove_rule))
            .route("/api/visits", post(add_visit))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn set_blocklist(&self, blocklist: Vec<Value>) {
        self.state.lock().unwrap().blocklist = blocklist;
    }

    /// Make every endpoint answer 500 until cleared.
    pub fn set_failing(&self, failing: bool) {
        self.state.lock().unwrap().failing = failing;
    }

    pub fn visits(&self) -> Vec<Value> {
        self.state.lock().unwrap().visits.clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.state.lock().unwrap().deleted.clone()
    }
}

fn failure() -> (StatusCode, Json<Value>) {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": "database unavailable"})))
}

async fn list_rules(State(state): State<Shared>) -> (StatusCode, Json<Value>) {
    let state = state.lock().unwrap();
    if state.failing {
        return failure();
    }
    (StatusCode::OK, Json(Value::Array(state.blocklist.clone())))
}

async fn add_rule(State(state): State<Shared>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let mut state = state.lock().unwrap();
    if state.failing {
        return failure();
    }
    let url = body["url"].clone();
    if state.blocklist.iter().any(|entry| entry["url"] == url) {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "URL is already blocked"})));
    }
    state.blocklist.push(body);
    (StatusCode::CREATED, Json(json!({"status": "success"})))
}

async fn remove_rule(State(state): State<Shared>, Path(key): Path<String>) -> (StatusCode, Json<Value>) {
    let mut state = state.lock().unwrap();
    if state.failing {
        return failure();
    }
    state.deleted.push(key.clone());

    let position = match key.parse::<usize>() {
        Ok(index) if index < state.blocklist.len() => Some(index),
        Ok(_) => None,
        Err(_) => state.blocklist.iter().position(|entry| entry["url"] == key.as_str()),
    };

    match position {
        Some(index) => {
            state.blocklist.remove(index);
            (StatusCode::OK, Json(json!({"status": "success"})))
        }
        None => (StatusCode::NOT_FOUND, Json(json!({"error": "URL not found in blocklist"}))),
    }
}

async fn add_visit(State(state): State<Shared>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let mut state = state.lock().unwrap();
    if state.failing {
        return failure();
    }
    state.visits.push(body);
    (StatusCode::CREATED, Json(json!({"status": "success"})))
}
