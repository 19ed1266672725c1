//! Session bootstrap and account actions.
//!
//! SYSTEM CONTEXT
//! ==============
//! The app subscribes to the backend auth stream once at start-up and feeds
//! each change through [`handle_auth_change`]. Role lookup and profile
//! creation run beside the main flow: their failures are logged and leave
//! the session intact.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::future::Future;

use backend::schema::{self, IdRow, NewProfile, UserRole};
use backend::{AuthChange, AuthUser, Backend, BackendError, Insert, Select, Session, SignUp};
use futures::future::{self, Either};
use uuid::Uuid;

use crate::error::ServiceError;
use crate::services::profile::fetch_role;
use crate::state::StateCell;
use crate::state::auth::{AuthState, FollowUp};

const UNEXPECTED_SIGNUP_ERROR: &str = "An unexpected error occurred during signup. Please try again.";

// =============================================================================
// BOOTSTRAP
// =============================================================================

/// Wait for the first auth event, giving up when `timeout` fires first.
///
/// # Errors
///
/// [`ServiceError::TimedOut`] when the timeout wins or the stream ends
/// without an event.
pub async fn race_first_event<F, T>(first: F, timeout: T) -> Result<AuthChange, ServiceError>
where
    F: Future<Output = Option<AuthChange>>,
    T: Future<Output = ()>,
{
    let first = std::pin::pin!(first);
    let timeout = std::pin::pin!(timeout);
    match future::select(first, timeout).await {
        Either::Left((Some(change), _)) => Ok(change),
        Either::Left((None, _)) => {
            log::warn!("session: auth stream closed before the first event");
            Err(ServiceError::TimedOut)
        }
        Either::Right(((), _)) => {
            log::warn!("session: auth bootstrap timed out");
            Err(ServiceError::TimedOut)
        }
    }
}

/// Apply one auth change and run its follow-up work.
pub async fn handle_auth_change(backend: &Backend, auth: &impl StateCell<AuthState>, change: &AuthChange) {
    log::info!("session: auth event {:?} user={:?}", change.event, change.session.as_ref().map(|s| s.user.id));
    let Some(follow_up) = auth.modify(|state| state.apply(change)) else {
        return;
    };
    run_follow_up(backend, auth, follow_up).await;
}

/// Role lookup and profile check, run concurrently.
pub async fn run_follow_up(backend: &Backend, auth: &impl StateCell<AuthState>, follow_up: FollowUp) {
    let FollowUp { fetch_role: role_for, ensure_profile: profile_for, signed_in } = follow_up;

    let role_task = async {
        let Some(user_id) = role_for else { return };
        let role = match fetch_role(backend, user_id).await {
            Ok(role) => Some(role),
            Err(e) => {
                log::warn!("session: role lookup failed for {user_id}: {e}");
                None
            }
        };
        auth.modify(|state| state.role_resolved(user_id, role, signed_in));
    };
    let profile_task = async {
        if let Some(user) = profile_for {
            ensure_profile(backend, &user).await;
        }
    };
    futures::join!(role_task, profile_task);
}

/// Profile row for a user who signed in without one.
pub fn default_profile(user: &AuthUser) -> NewProfile {
    let username = user
        .email
        .as_deref()
        .and_then(|e| e.split('@').next())
        .filter(|local| !local.is_empty())
        .unwrap_or("user")
        .to_owned();
    let full_name = user.metadata_str("full_name").map_or_else(|| username.clone(), str::to_owned);
    NewProfile { id: user.id, username, full_name, role: UserRole::User }
}

/// Create the user's profile when it does not exist yet. Never fails; any
/// problem is logged.
pub async fn ensure_profile(backend: &Backend, user: &AuthUser) {
    let select = Select::new(schema::USER_PROFILES).columns("id").eq("id", user.id);
    match backend.fetch_one::<IdRow>(&select).await {
        Ok(_) => {}
        Err(e) if e.is_no_rows() => {
            log::info!("session: no profile for {}, creating one", user.id);
            let created = match Insert::new(schema::USER_PROFILES, &default_profile(user)) {
                Ok(insert) => backend.execute(&insert).await,
                Err(e) => Err(e),
            };
            if let Err(e) = created {
                log::warn!("session: failed to create profile: {e}");
            }
        }
        Err(e) => log::warn!("session: profile check failed: {e}"),
    }
}

// =============================================================================
// ACCOUNT ACTIONS
// =============================================================================

/// Password sign-in. The auth stream delivers the resulting `SignedIn`.
///
/// # Errors
///
/// Returns the auth service's rejection.
pub async fn sign_in(backend: &Backend, email: &str, password: &str) -> Result<Session, ServiceError> {
    let session = backend.auth().sign_in_with_password(email.trim(), password).await?;
    ensure_profile(backend, &session.user).await;
    Ok(session)
}

/// Rewrite known sign-up rejections into friendlier text.
pub fn friendly_signup_error(message: &str) -> String {
    const REWRITES: &[(&str, &str)] = &[
        (
            "Database error saving new user",
            "There was an issue creating your profile. Please try again or contact support.",
        ),
        ("User already registered", "An account with this email already exists. Please sign in instead."),
        ("Invalid email", "Please enter a valid email address."),
        ("Password should be at least", "Password must be at least 6 characters long."),
    ];
    REWRITES
        .iter()
        .find(|(needle, _)| message.contains(needle))
        .map_or_else(|| message.to_owned(), |(_, text)| (*text).to_owned())
}

/// Profile row written right after sign-up.
pub fn signup_profile(id: Uuid, email: &str, full_name: Option<&str>) -> NewProfile {
    let local = email.split('@').next().unwrap_or_default().to_owned();
    let full_name = full_name.map(str::trim).filter(|n| !n.is_empty());
    let username = full_name.map_or_else(
        || local.clone(),
        |name| name.to_lowercase().split_whitespace().collect::<Vec<_>>().join("_"),
    );
    NewProfile { id, username, full_name: full_name.map_or(local, str::to_owned), role: UserRole::User }
}

/// Register an account, then try to create its profile. A failed profile
/// insert does not fail the sign-up.
///
/// # Errors
///
/// [`ServiceError::Rejected`] carrying display text.
pub async fn sign_up(
    backend: &Backend,
    email: &str,
    password: &str,
    full_name: Option<&str>,
    redirect_to: &str,
) -> Result<SignUp, ServiceError> {
    let email = email.trim();
    let outcome = backend
        .auth()
        .sign_up(email, password, Some(redirect_to), serde_json::Map::new())
        .await
        .map_err(|e| {
            log::error!("session: sign-up failed: {e}");
            match e {
                BackendError::Auth { message, .. } => ServiceError::Rejected(friendly_signup_error(&message)),
                _ => ServiceError::Rejected(UNEXPECTED_SIGNUP_ERROR.to_owned()),
            }
        })?;

    let profile = signup_profile(outcome.user().id, email, full_name);
    let created = match Insert::new(schema::USER_PROFILES, &profile) {
        Ok(insert) => backend.execute(&insert).await,
        Err(e) => Err(e),
    };
    match created {
        Ok(()) => log::info!("session: profile created for {}", profile.id),
        Err(e) => log::warn!("session: failed to create profile after sign-up: {e}"),
    }
    Ok(outcome)
}

/// Clear local auth state at once, then end the backend session.
pub async fn sign_out(backend: &Backend, auth: &impl StateCell<AuthState>) {
    auth.modify(AuthState::clear_user);
    backend.auth().sign_out().await;
}
