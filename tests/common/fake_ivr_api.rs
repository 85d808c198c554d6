//! Fake IVR Twitch API server for integration tests.
//!
//! Spins up a minimal `axum` HTTP server on a random TCP port bound to
//! 127.0.0.1. Serves `GET /v2/twitch/user?login=<login>` in the shape the
//! real API uses: a JSON array, empty when the login is unknown.
//!
//! # Example
//!
//! ```rust,no_run
//! let api = FakeIvrApi::start().await.unwrap();
//! api.add_user("abcd1234", "アブシディ").await;
//! let client = IvrClient::new(api.base_url(), Duration::from_secs(1));
//! ```

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

#[derive(Default)]
struct ApiState {
    users: HashMap<String, String>,
    /// Logins that answer with this status instead of a body.
    failures: HashMap<String, u16>,
    /// Requests seen per login.
    hits: HashMap<String, usize>,
    /// Delay before answering, to hold requests in flight.
    delay: Option<Duration>,
}

/// Handle to the running fake server.
pub struct FakeIvrApi {
    addr: SocketAddr,
    state: Arc<Mutex<ApiState>>,
}

impl FakeIvrApi {
    /// Start the fake server on a random port. Returns once it is listening.
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state = Arc::new(Mutex::new(ApiState::default()));

        let app = Router::new()
            .route("/v2/twitch/user", get(user))
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Ok(Self { addr, state })
    }

    /// Start on a dedicated thread with its own runtime, for tests that are
    /// not async themselves (the headless binary tests).
    pub fn start_blocking(users: &[(&str, &str)]) -> Self {
        let (tx, rx) = std::sync::mpsc::channel();
        let users: Vec<(String, String)> =
            users.iter().map(|(l, d)| (l.to_string(), d.to_string())).collect();
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().unwrap();
            runtime.block_on(async move {
                let api = FakeIvrApi::start().await.unwrap();
                for (login, display) in &users {
                    api.add_user(login, display).await;
                }
                tx.send(FakeIvrApi { addr: api.addr, state: api.state.clone() }).unwrap();
                std::future::pending::<()>().await;
            });
        });
        rx.recv().unwrap()
    }

    /// Base URL for the API (e.g. `http://127.0.0.1:PORT`).
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn add_user(&self, login: &str, display: &str) {
        self.state.lock().await.users.insert(login.to_string(), display.to_string());
    }

    pub async fn fail_with(&self, login: &str, status: u16) {
        self.state.lock().await.failures.insert(login.to_string(), status);
    }

    pub async fn set_delay(&self, delay: Duration) {
        self.state.lock().await.delay = Some(delay);
    }

    /// How many requests arrived for `login`.
    pub async fn requests_for(&self, login: &str) -> usize {
        self.state.lock().await.hits.get(login).copied().unwrap_or(0)
    }
}

async fn user(
    State(state): State<Arc<Mutex<ApiState>>>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let login = params.get("login").cloned().unwrap_or_default();
    let (delay, failure, display) = {
        let mut state = state.lock().await;
        *state.hits.entry(login.clone()).or_default() += 1;
        (state.delay, state.failures.get(&login).copied(), state.users.get(&login).cloned())
    };
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    if let Some(status) = failure {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (status, Json(serde_json::json!({ "error": "fake failure" })));
    }
    let body = match display {
        Some(display) => serde_json::json!([{ "login": login, "displayName": display }]),
        None => serde_json::json!([]),
    };
    (StatusCode::OK, Json(body))
}
