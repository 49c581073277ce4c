//! In-process fake mailcow server for integration testing
//!
//! # How the mailcow admin API works
//!
//! mailcow exposes a JSON API under `/api/v1/`. Every request carries
//! the API key in an `X-API-Key` header. Writes are `POST`s to
//! `add/<object>`, `edit/<object>` or `delete/<object>`; reads are
//! `GET`s to `get/<object>/<id>`.
//!
//! ```text
//!   Client:  POST /api/v1/add/mailbox   {"local_part": "alice", ...}
//!   Server:  200 [{"type": "success", "msg": ["mailbox_added", "alice"]}]
//! ```
//!
//! Refusals are *not* signalled with an HTTP status: the server still
//! answers 200, with `"type": "danger"` in the entry. Only a bad API
//! key produces a non-200 (401) answer.

use super::handlers::{
    handle_add_mailbox, handle_delete_mailbox, handle_edit_mailbox, handle_edit_user_acl,
    handle_get_mailbox,
};
use super::state::{Mailcow, StoredMailbox, entry};
use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

/// The API key the fake server accepts.
pub const API_KEY: &str = "test-api-key";

/// A request the server received, with its decoded JSON body.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: Value,
}

type Reply = (StatusCode, Json<Value>);

/// State shared by every route.
#[derive(Clone)]
struct Shared {
    state: Arc<Mutex<Mailcow>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl Shared {
    fn record(&self, method: &str, path: &str, body: &Value) {
        self.requests.lock().unwrap().push(RecordedRequest {
            method: method.to_string(),
            path: path.to_string(),
            body: body.clone(),
        });
    }

    /// Record a POST and run its handler, unless the path is refused.
    fn write(
        &self,
        path: &str,
        body: &Value,
        handler: fn(&mut Mailcow, &Value) -> (u16, Value),
    ) -> Reply {
        self.record("POST", path, body);

        let mut state = self.state.lock().unwrap();
        if state.is_refused(path) {
            return refused();
        }
        reply(handler(&mut state, body))
    }
}

/// A fake mailcow server on localhost with an OS-assigned port.
///
/// Every authenticated request is recorded, in arrival order, so tests
/// can assert on exactly what the client sent.
pub struct FakeMailcowServer {
    port: u16,
    shared: Shared,
    /// Handle to the background task so it lives as long as the server.
    _handle: tokio::task::JoinHandle<()>,
}

impl FakeMailcowServer {
    /// Start a new fake server with the given state.
    ///
    /// Binds to `127.0.0.1:0` and serves the router from a spawned
    /// tokio task, which ends with the test runtime.
    pub async fn start(state: Mailcow) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind to ephemeral port");
        let port = listener.local_addr().unwrap().port();

        let shared = Shared {
            state: Arc::new(Mutex::new(state)),
            requests: Arc::new(Mutex::new(Vec::new())),
        };

        let app = router(shared.clone());
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            port,
            shared,
            _handle: handle,
        }
    }

    /// The port the server is listening on.
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Base URL to configure the client with.
    pub fn url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// Requests received so far, in order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.shared.requests.lock().unwrap().clone()
    }

    /// Paths of the requests received so far, in order.
    pub fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.path).collect()
    }

    /// Current server-side copy of a mailbox.
    pub fn mailbox(&self, username: &str) -> Option<StoredMailbox> {
        self.shared.state.lock().unwrap().find(username).cloned()
    }
}

fn router(shared: Shared) -> Router {
    Router::new()
        .route("/api/v1/add/mailbox", post(add_mailbox))
        .route("/api/v1/edit/mailbox", post(edit_mailbox))
        .route("/api/v1/delete/mailbox", post(delete_mailbox))
        .route("/api/v1/edit/user-acl", post(edit_user_acl))
        .route("/api/v1/get/mailbox/:email", get(get_mailbox))
        .fallback(not_found)
        .layer(middleware::from_fn(require_api_key))
        .with_state(shared)
}

/// mailcow rejects requests without a valid key before routing them.
async fn require_api_key(request: Request, next: Next) -> Response {
    let key = request
        .headers()
        .get("x-api-key")
        .and_then(|value| value.to_str().ok());
    if key != Some(API_KEY) {
        let body = json!({"type": "error", "msg": "authentication failed"});
        return (StatusCode::UNAUTHORIZED, Json(body)).into_response();
    }
    next.run(request).await
}

async fn add_mailbox(State(shared): State<Shared>, Json(body): Json<Value>) -> Reply {
    shared.write("/api/v1/add/mailbox", &body, handle_add_mailbox)
}

async fn edit_mailbox(State(shared): State<Shared>, Json(body): Json<Value>) -> Reply {
    shared.write("/api/v1/edit/mailbox", &body, handle_edit_mailbox)
}

async fn delete_mailbox(State(shared): State<Shared>, Json(body): Json<Value>) -> Reply {
    shared.write("/api/v1/delete/mailbox", &body, handle_delete_mailbox)
}

async fn edit_user_acl(State(shared): State<Shared>, Json(body): Json<Value>) -> Reply {
    shared.write("/api/v1/edit/user-acl", &body, handle_edit_user_acl)
}

async fn get_mailbox(State(shared): State<Shared>, Path(email): Path<String>) -> Reply {
    let path = format!("/api/v1/get/mailbox/{email}");
    shared.record("GET", &path, &Value::Null);

    let state = shared.state.lock().unwrap();
    if state.is_refused(&path) {
        return refused();
    }
    reply(handle_get_mailbox(&state, &email))
}

async fn not_found() -> Reply {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"type": "error", "msg": "route not found"})),
    )
}

fn refused() -> Reply {
    (StatusCode::OK, Json(json!([entry("danger", &["forced_failure"])])))
}

fn reply((status, body): (u16, Value)) -> Reply {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake_mailcow::MailcowBuilder;

    fn shared(state: Mailcow) -> Shared {
        Shared {
            state: Arc::new(Mutex::new(state)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    #[test]
    fn refused_path_leaves_state_untouched() {
        let shared = shared(MailcowBuilder::new().refuse("/api/v1/add/mailbox").build());
        let body = json!({"local_part": "a", "domain": "b", "password": "p", "password2": "p"});

        let (status, Json(answer)) =
            shared.write("/api/v1/add/mailbox", &body, handle_add_mailbox);

        assert_eq!(status, StatusCode::OK);
        assert_eq!(answer[0]["type"], "danger");
        assert!(shared.state.lock().unwrap().mailboxes.is_empty());
        assert_eq!(shared.requests.lock().unwrap().len(), 1);
    }
}
