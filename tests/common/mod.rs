#![allow(dead_code)]

use std::{
    collections::{HashMap, VecDeque},
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    Form, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    routing::{get, post},
};
use serde_json::json;
use spotify_current_playing::config::Settings;
use tokio::net::TcpListener;

pub type Reply = (StatusCode, String);

/// Stand-in for the accounts service and the Web API.
///
/// Replies are served in order; once a queue is empty the endpoint answers
/// with its default (204 for playback, 500 for tokens).
#[derive(Default)]
pub struct MockState {
    pub playing: Mutex<VecDeque<Reply>>,
    pub tokens: Mutex<VecDeque<Reply>>,
    pub bearers: Mutex<Vec<String>>,
    pub token_requests: Mutex<Vec<HashMap<String, String>>>,
}

impl MockState {
    pub fn push_playing(&self, status: StatusCode, body: impl Into<String>) {
        self.playing.lock().unwrap().push_back((status, body.into()));
    }

    pub fn push_token(&self, status: StatusCode, body: impl Into<String>) {
        self.tokens.lock().unwrap().push_back((status, body.into()));
    }

    pub fn bearers(&self) -> Vec<String> {
        self.bearers.lock().unwrap().clone()
    }

    pub fn token_requests(&self) -> Vec<HashMap<String, String>> {
        self.token_requests.lock().unwrap().clone()
    }
}

pub struct MockSpotify {
    pub addr: SocketAddr,
    pub state: Arc<MockState>,
}

impl MockSpotify {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new()
            .route("/v1/me/player/currently-playing", get(currently_playing))
            .route("/api/token", post(token))
            .with_state(Arc::clone(&state));

        let addr = serve(app).await;
        Self { addr, state }
    }

    /// Settings pointing every endpoint at this mock.
    pub fn settings(&self) -> Settings {
        Settings {
            auth_url: format!("http://{}/authorize", self.addr),
            token_url: format!("http://{}/api/token", self.addr),
            api_url: format!("http://{}/v1", self.addr),
            redirect_uri: "http://127.0.0.1:3000/callback".to_string(),
            server_address: "127.0.0.1:0".to_string(),
            client_id: None,
            poll_interval: Duration::from_millis(20),
            ..Settings::default()
        }
    }
}

async fn currently_playing(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
) -> Reply {
    if let Some(auth) = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        state.bearers.lock().unwrap().push(auth.to_string());
    }
    state
        .playing
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or((StatusCode::NO_CONTENT, String::new()))
}

async fn token(
    State(state): State<Arc<MockState>>,
    Form(form): Form<HashMap<String, String>>,
) -> Reply {
    state.token_requests.lock().unwrap().push(form);
    state.tokens.lock().unwrap().pop_front().unwrap_or((
        StatusCode::INTERNAL_SERVER_ERROR,
        "no token reply queued".to_string(),
    ))
}

/// Serves `app` on an ephemeral local port.
pub async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

pub fn playing_body(artist: &str, album: &str, title: &str) -> String {
    json!({
        "is_playing": true,
        "progress_ms": 1000,
        "currently_playing_type": "track",
        "item": {
            "name": title,
            "album": { "name": album },
            "artists": [ { "name": artist }, { "name": "Featured Guest" } ]
        }
    })
    .to_string()
}

pub fn paused_body(artist: &str, album: &str, title: &str) -> String {
    json!({
        "is_playing": false,
        "item": {
            "name": title,
            "album": { "name": album },
            "artists": [ { "name": artist } ]
        }
    })
    .to_string()
}

pub fn expired_body() -> String {
    json!({ "error": { "status": 401, "message": "The access token expired" } }).to_string()
}

pub fn token_body(access: &str, refresh: Option<&str>) -> String {
    let mut body = json!({
        "access_token": access,
        "token_type": "Bearer",
        "scope": "user-read-currently-playing",
        "expires_in": 3600
    });
    if let Some(refresh) = refresh {
        body["refresh_token"] = json!(refresh);
    }
    body.to_string()
}
