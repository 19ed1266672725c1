//! Managed-auth session client.
//!
//! DESIGN
//! ======
//! The client owns the current [`Session`] and persists it through a
//! [`SessionStore`]. Every state change is broadcast to subscribers as an
//! [`AuthChange`] over an unbounded channel; a subscription unregisters
//! itself when dropped. Token refresh is driven by the caller ticking
//! [`AuthClient::auto_refresh_tick`] on a timer, so this crate never spawns.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::task::{Context, Poll};

use futures::Stream;
use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::clock::Clock;
use crate::config::BackendConfig;
use crate::error::{BackendError, auth_error};
use crate::transport::{HttpRequest, Method, Transport};

/// How often the caller should invoke [`AuthClient::auto_refresh_tick`].
pub const AUTO_REFRESH_TICK_MS: u64 = 30_000;
/// Sessions expiring within this margin are refreshed.
pub const EXPIRY_MARGIN_MS: i64 = 90_000;

// =============================================================================
// TYPES
// =============================================================================

/// The authenticated principal as reported by the auth service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: Map<String, Value>,
}

impl AuthUser {
    /// String value from the free-form user metadata.
    #[must_use]
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.user_metadata.get(key).and_then(Value::as_str)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub expires_in: i64,
    /// Expiry as Unix seconds.
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: AuthUser,
}

fn default_token_type() -> String {
    "bearer".to_owned()
}

impl Session {
    /// True when the session expires within `margin_ms` of `now_ms`.
    #[must_use]
    pub fn expires_within(&self, now_ms: i64, margin_ms: i64) -> bool {
        match self.expires_at {
            Some(at) => at.saturating_mul(1000) - now_ms <= margin_ms,
            None => false,
        }
    }

    fn stamp_expiry(mut self, now_ms: i64) -> Self {
        if self.expires_at.is_none() && self.expires_in > 0 {
            self.expires_at = Some(now_ms / 1000 + self.expires_in);
        }
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthEvent {
    InitialSession,
    SignedIn,
    SignedOut,
    TokenRefreshed,
    UserUpdated,
}

/// One broadcast state change.
#[derive(Clone, Debug, PartialEq)]
pub struct AuthChange {
    pub event: AuthEvent,
    pub session: Option<Session>,
}

/// Result of a sign-up: either signed in immediately, or awaiting email
/// confirmation with only the user record.
#[derive(Clone, Debug, PartialEq)]
pub enum SignUp {
    Session(Session),
    Pending(AuthUser),
}

impl SignUp {
    #[must_use]
    pub fn user(&self) -> &AuthUser {
        match self {
            Self::Session(session) => &session.user,
            Self::Pending(user) => user,
        }
    }
}

/// Persistence for the current session.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Option<Session>;
    fn save(&self, session: &Session);
    fn clear(&self);
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn with_session(session: Session) -> Self {
        Self { slot: Mutex::new(Some(session)) }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Option<Session> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn save(&self, session: &Session) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
    }

    fn clear(&self) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl<T: SessionStore + ?Sized> SessionStore for Arc<T> {
    fn load(&self) -> Option<Session> {
        (**self).load()
    }

    fn save(&self, session: &Session) {
        (**self).save(session);
    }

    fn clear(&self) {
        (**self).clear();
    }
}

// =============================================================================
// SUBSCRIPTION
// =============================================================================

/// Stream of [`AuthChange`]s. Dropping it unsubscribes.
pub struct AuthSubscription {
    id: u64,
    receiver: UnboundedReceiver<AuthChange>,
    owner: Weak<Inner>,
}

impl Stream for AuthSubscription {
    type Item = AuthChange;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.receiver).poll_next(cx)
    }
}

impl Drop for AuthSubscription {
    fn drop(&mut self) {
        if let Some(inner) = self.owner.upgrade() {
            inner.listeners().retain(|(id, _)| *id != self.id);
        }
    }
}

// =============================================================================
// CLIENT
// =============================================================================

struct Inner {
    config: BackendConfig,
    transport: Arc<dyn Transport>,
    store: Box<dyn SessionStore>,
    clock: Clock,
    session: Mutex<Option<Session>>,
    listeners: Mutex<Vec<(u64, UnboundedSender<AuthChange>)>>,
    next_listener: AtomicU64,
}

impl Inner {
    fn listeners(&self) -> std::sync::MutexGuard<'_, Vec<(u64, UnboundedSender<AuthChange>)>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Clone)]
pub struct AuthClient {
    inner: Arc<Inner>,
}

impl AuthClient {
    #[must_use]
    pub fn new(
        config: BackendConfig,
        transport: Arc<dyn Transport>,
        store: Box<dyn SessionStore>,
        clock: Clock,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                transport,
                store,
                clock,
                session: Mutex::new(None),
                listeners: Mutex::new(Vec::new()),
                next_listener: AtomicU64::new(1),
            }),
        }
    }

    /// Register for auth state changes.
    #[must_use]
    pub fn subscribe(&self) -> AuthSubscription {
        let (tx, rx) = mpsc::unbounded();
        let id = self.inner.next_listener.fetch_add(1, Ordering::Relaxed);
        self.inner.listeners().push((id, tx));
        AuthSubscription { id, receiver: rx, owner: Arc::downgrade(&self.inner) }
    }

    #[cfg(test)]
    pub(crate) fn subscriber_count(&self) -> usize {
        self.inner.listeners().len()
    }

    /// Current session, if signed in.
    #[must_use]
    pub fn session(&self) -> Option<Session> {
        self.inner.session.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    #[must_use]
    pub fn user(&self) -> Option<AuthUser> {
        self.session().map(|s| s.user)
    }

    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.session().map(|s| s.access_token)
    }

    /// Install a known session without broadcasting.
    #[cfg(any(test, feature = "testing"))]
    pub fn adopt_session(&self, session: Session) {
        self.inner.store.save(&session);
        self.set_session(Some(session));
    }

    /// Load the persisted session, refreshing it if it is about to expire,
    /// and broadcast [`AuthEvent::InitialSession`].
    pub async fn initialize(&self) -> Option<Session> {
        let mut session = self.inner.store.load();
        if let Some(stored) = session.clone()
            && stored.expires_within((self.inner.clock)(), EXPIRY_MARGIN_MS)
        {
            session = match self.request_refresh(&stored.refresh_token).await {
                Ok(fresh) => Some(fresh),
                Err(BackendError::Auth { status, message }) => {
                    log::warn!("auth: stored session rejected ({status}): {message}");
                    self.inner.store.clear();
                    None
                }
                Err(e) => {
                    log::warn!("auth: could not refresh stored session: {e}");
                    Some(stored)
                }
            };
        }
        if let Some(s) = &session {
            self.inner.store.save(s);
        }
        self.set_session(session.clone());
        self.emit(AuthEvent::InitialSession, session.clone());
        session
    }

    /// Password sign-in.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Auth`] for rejected credentials.
    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, BackendError> {
        let request = HttpRequest::new(Method::Post, self.inner.config.auth_url("token?grant_type=password"))
            .json(&serde_json::json!({ "email": email, "password": password }))?;
        let session: Session = self.send_json(request, None).await?;
        let session = session.stamp_expiry((self.inner.clock)());
        self.store_and_emit(AuthEvent::SignedIn, session.clone());
        Ok(session)
    }

    /// Register a new account. `metadata` becomes the user's metadata.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Auth`] when the service rejects the sign-up.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        redirect_to: Option<&str>,
        metadata: Map<String, Value>,
    ) -> Result<SignUp, BackendError> {
        let mut url = self.inner.config.auth_url("signup");
        if let Some(redirect) = redirect_to
            && let Ok(mut parsed) = url::Url::parse(&url)
        {
            parsed.query_pairs_mut().append_pair("redirect_to", redirect);
            url = parsed.into();
        }
        let request = HttpRequest::new(Method::Post, url)
            .json(&serde_json::json!({ "email": email, "password": password, "data": metadata }))?;
        let body: Value = self.send_json(request, None).await?;

        if body.get("access_token").is_some() {
            let session: Session = decode_value(body)?;
            let session = session.stamp_expiry((self.inner.clock)());
            self.store_and_emit(AuthEvent::SignedIn, session.clone());
            return Ok(SignUp::Session(session));
        }
        let user = match body.get("user") {
            Some(user) if user.is_object() => decode_value(user.clone())?,
            _ => decode_value(body)?,
        };
        Ok(SignUp::Pending(user))
    }

    /// Clear the local session, broadcast [`AuthEvent::SignedOut`], then
    /// revoke the token remotely. Remote failure is logged and ignored.
    pub async fn sign_out(&self) {
        let token = self.access_token();
        self.inner.store.clear();
        self.set_session(None);
        self.emit(AuthEvent::SignedOut, None);

        if let Some(token) = token {
            let request = HttpRequest::new(Method::Post, self.inner.config.auth_url("logout"));
            if let Err(e) = self.send(request, Some(&token)).await {
                log::warn!("auth: remote sign-out failed: {e}");
            }
        }
    }

    /// Exchange the refresh token for a new session.
    ///
    /// A rejected refresh token ends the session and broadcasts
    /// [`AuthEvent::SignedOut`].
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::NotAuthenticated`] without a session, or the
    /// refresh failure.
    pub async fn refresh_session(&self) -> Result<Session, BackendError> {
        let current = self.session().ok_or(BackendError::NotAuthenticated)?;
        match self.request_refresh(&current.refresh_token).await {
            Ok(session) => {
                self.store_and_emit(AuthEvent::TokenRefreshed, session.clone());
                Ok(session)
            }
            Err(e @ BackendError::Auth { .. }) => {
                log::warn!("auth: refresh rejected, signing out: {e}");
                self.inner.store.clear();
                self.set_session(None);
                self.emit(AuthEvent::SignedOut, None);
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Refresh when the session is inside the expiry margin. Returns whether
    /// a refresh happened.
    ///
    /// # Errors
    ///
    /// Propagates [`AuthClient::refresh_session`] failures.
    pub async fn auto_refresh_tick(&self) -> Result<bool, BackendError> {
        let due = self
            .session()
            .is_some_and(|s| s.expires_within((self.inner.clock)(), EXPIRY_MARGIN_MS));
        if !due {
            return Ok(false);
        }
        self.refresh_session().await.map(|_| true)
    }

    /// Fetch the current user from the auth service.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::NotAuthenticated`] without a session.
    pub async fn get_user(&self) -> Result<AuthUser, BackendError> {
        let token = self.access_token().ok_or(BackendError::NotAuthenticated)?;
        let request = HttpRequest::new(Method::Get, self.inner.config.auth_url("user"));
        self.send_json(request, Some(&token)).await
    }

    /// Replace the user's metadata and broadcast [`AuthEvent::UserUpdated`].
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::NotAuthenticated`] without a session.
    pub async fn update_user_metadata(&self, metadata: Map<String, Value>) -> Result<AuthUser, BackendError> {
        let token = self.access_token().ok_or(BackendError::NotAuthenticated)?;
        let request = HttpRequest::new(Method::Put, self.inner.config.auth_url("user"))
            .json(&serde_json::json!({ "data": metadata }))?;
        let user: AuthUser = self.send_json(request, Some(&token)).await?;
        if let Some(mut session) = self.session() {
            session.user = user.clone();
            self.store_and_emit(AuthEvent::UserUpdated, session);
        }
        Ok(user)
    }

    // -------------------------------------------------------------------------

    async fn request_refresh(&self, refresh_token: &str) -> Result<Session, BackendError> {
        let request = HttpRequest::new(Method::Post, self.inner.config.auth_url("token?grant_type=refresh_token"))
            .json(&serde_json::json!({ "refresh_token": refresh_token }))?;
        let session: Session = self.send_json(request, None).await?;
        Ok(session.stamp_expiry((self.inner.clock)()))
    }

    async fn send(&self, request: HttpRequest, bearer: Option<&str>) -> Result<String, BackendError> {
        let bearer = bearer.unwrap_or(self.inner.config.anon_key.as_str()).to_owned();
        let request = request
            .header("apikey", self.inner.config.anon_key.clone())
            .header("Authorization", format!("Bearer {bearer}"));
        let response = self.inner.transport.send(request).await?;
        if response.is_success() {
            Ok(response.body)
        } else {
            Err(auth_error(response.status, &response.body))
        }
    }

    async fn send_json<T: serde::de::DeserializeOwned>(
        &self,
        request: HttpRequest,
        bearer: Option<&str>,
    ) -> Result<T, BackendError> {
        let body = self.send(request, bearer).await?;
        serde_json::from_str(&body).map_err(|e| BackendError::Decode(format!("auth response: {e}")))
    }

    fn set_session(&self, session: Option<Session>) {
        *self.inner.session.lock().unwrap_or_else(PoisonError::into_inner) = session;
    }

    fn store_and_emit(&self, event: AuthEvent, session: Session) {
        self.inner.store.save(&session);
        self.set_session(Some(session.clone()));
        self.emit(event, Some(session));
    }

    fn emit(&self, event: AuthEvent, session: Option<Session>) {
        log::debug!("auth: {event:?}");
        let change = AuthChange { event, session };
        self.inner
            .listeners()
            .retain(|(_, tx)| tx.unbounded_send(change.clone()).is_ok());
    }
}

fn decode_value<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, BackendError> {
    serde_json::from_value(value).map_err(|e| BackendError::Decode(format!("auth response: {e}")))
}
