//! Scripted transport and fixtures for tests.
//!
//! Enabled for this crate's own tests and, through the `testing` feature, for
//! downstream crates that exercise services against a fake backend.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use uuid::Uuid;

use crate::auth::{AuthUser, MemorySessionStore, Session};
use crate::client::Backend;
use crate::config::BackendConfig;
use crate::error::BackendError;
use crate::transport::{Body, HttpRequest, HttpResponse, Method, Transport};

/// Fixed "now" used by [`fixed_clock`]: 2024-03-05T07:08:09.123Z.
pub const NOW_MS: i64 = 1_709_622_489_123;

#[must_use]
pub fn fixed_clock() -> i64 {
    NOW_MS
}

pub type Scripted = Result<HttpResponse, BackendError>;

struct Route {
    method: Method,
    fragment: String,
    responses: VecDeque<Scripted>,
}

/// Transport that replays scripted responses and records every request.
///
/// Routed responses (matched by method and URL fragment) are consumed first;
/// anything else is answered from the FIFO queue.
#[derive(Default)]
pub struct MockTransport {
    queue: Mutex<VecDeque<Scripted>>,
    routes: Mutex<Vec<Route>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for the next unrouted request.
    pub fn push(&self, response: Scripted) {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner).push_back(response);
    }

    /// Queue a response for the next request whose URL contains `fragment`.
    pub fn on(&self, method: Method, fragment: &str, response: Scripted) {
        let mut routes = self.routes.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(route) = routes.iter_mut().find(|r| r.method == method && r.fragment == fragment) {
            route.responses.push_back(response);
        } else {
            routes.push(Route { method, fragment: fragment.to_owned(), responses: VecDeque::from([response]) });
        }
    }

    #[must_use]
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Requests whose URL contains `fragment`.
    #[must_use]
    pub fn requests_to(&self, fragment: &str) -> Vec<HttpRequest> {
        self.requests().into_iter().filter(|r| r.url.contains(fragment)).collect()
    }

    #[must_use]
    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).last().cloned()
    }

    fn take_routed(&self, request: &HttpRequest) -> Option<Scripted> {
        let mut routes = self.routes.lock().unwrap_or_else(PoisonError::into_inner);
        routes
            .iter_mut()
            .filter(|r| r.method == request.method && request.url.contains(&r.fragment))
            .find_map(|r| r.responses.pop_front())
    }
}

#[async_trait::async_trait(?Send)]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, BackendError> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).push(request.clone());
        if let Some(response) = self.take_routed(&request) {
            return response;
        }
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| {
                Err(BackendError::Transport(format!(
                    "no scripted response for {} {}",
                    request.method.as_str(),
                    request.url
                )))
            })
    }
}

/// `200 OK` with a JSON body.
#[must_use]
pub fn ok_json(value: &serde_json::Value) -> Scripted {
    Ok(HttpResponse::new(200, value.to_string()))
}

/// Response with a status and JSON body.
#[must_use]
pub fn status_json(status: u16, value: &serde_json::Value) -> Scripted {
    Ok(HttpResponse::new(status, value.to_string()))
}

/// Empty-bodied response (e.g. `201`/`204` for minimal writes).
#[must_use]
pub fn empty(status: u16) -> Scripted {
    Ok(HttpResponse::new(status, ""))
}

/// Count response carrying the total in `Content-Range`.
#[must_use]
pub fn count(total: u64) -> Scripted {
    Ok(HttpResponse::new(200, "[]").with_header("Content-Range", format!("*/{total}")))
}

/// PostgREST single-row "no rows" error.
#[must_use]
pub fn no_rows() -> Scripted {
    status_json(
        406,
        &serde_json::json!({
            "code": "PGRST116",
            "message": "JSON object requested, multiple (or no) rows returned",
            "details": "The result contains 0 rows"
        }),
    )
}

#[must_use]
pub fn config() -> BackendConfig {
    BackendConfig {
        url: "https://abcd.example.co".to_owned(),
        anon_key: "anon-key".to_owned(),
        image_bucket: "prompt-images".to_owned(),
    }
}

#[must_use]
pub fn user(id: Uuid, email: &str) -> AuthUser {
    AuthUser { id, email: Some(email.to_owned()), user_metadata: serde_json::Map::new() }
}

/// A session valid for an hour after [`NOW_MS`].
#[must_use]
pub fn session(user: AuthUser) -> Session {
    Session {
        access_token: "access-token".to_owned(),
        refresh_token: "refresh-token".to_owned(),
        token_type: "bearer".to_owned(),
        expires_in: 3600,
        expires_at: Some(NOW_MS / 1000 + 3600),
        user,
    }
}

/// Backend over `transport` with an in-memory session store and fixed clock.
#[must_use]
pub fn backend(transport: Arc<MockTransport>) -> Backend {
    Backend::with_clock(config(), transport, Box::new(MemorySessionStore::default()), fixed_clock)
}

/// Backend whose auth client already holds `session`.
#[must_use]
pub fn signed_in_backend(transport: Arc<MockTransport>, session: Session) -> Backend {
    let store = MemorySessionStore::with_session(session.clone());
    let backend = Backend::with_clock(config(), transport, Box::new(store), fixed_clock);
    backend.auth().adopt_session(session);
    backend
}

/// Decoded JSON body of a recorded request; `Null` when there is none.
#[must_use]
pub fn json_body(request: &HttpRequest) -> serde_json::Value {
    match &request.body {
        Some(Body::Json(text)) => serde_json::from_str(text).unwrap_or(serde_json::Value::Null),
        _ => serde_json::Value::Null,
    }
}

/// Decoded values of query parameter `key`, in order.
#[must_use]
pub fn query_param(request: &HttpRequest, key: &str) -> Vec<String> {
    url::Url::parse(&request.url)
        .map(|url| url.query_pairs().filter(|(k, _)| k == key).map(|(_, v)| v.into_owned()).collect())
        .unwrap_or_default()
}
