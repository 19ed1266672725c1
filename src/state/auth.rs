//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Mirrors the backend auth stream. Route guards read it to decide between
//! a spinner, a redirect and the page; the layout reads the role to show
//! admin navigation.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use backend::schema::UserRole;
use backend::{AuthChange, AuthEvent, AuthUser, Session};
use uuid::Uuid;

/// Progress of the role lookup for the signed-in user.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RoleStatus {
    #[default]
    Unknown,
    Loading,
    Known(UserRole),
    Failed,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AuthState {
    pub user: Option<AuthUser>,
    pub session: Option<Session>,
    /// True until the first auth event (or the bootstrap timeout).
    pub loading: bool,
    pub initialized: bool,
    /// Set on sign-in while the profile/role round-trip is in flight.
    pub profile_loading: bool,
    pub role: RoleStatus,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            user: None,
            session: None,
            loading: true,
            initialized: false,
            profile_loading: false,
            role: RoleStatus::Unknown,
        }
    }
}

/// Work the app must start after applying an auth event.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FollowUp {
    /// Look up the role for this user.
    pub fetch_role: Option<Uuid>,
    /// Check or create this user's profile row.
    pub ensure_profile: Option<AuthUser>,
    /// The event was a fresh sign-in; clear `profile_loading` once the role
    /// lookup settles.
    pub signed_in: bool,
}

impl AuthState {
    /// Apply one auth event and report the follow-up work.
    pub fn apply(&mut self, change: &AuthChange) -> FollowUp {
        let mut follow_up = FollowUp::default();
        match change.event {
            AuthEvent::SignedOut => self.clear_user(),
            AuthEvent::InitialSession
            | AuthEvent::SignedIn
            | AuthEvent::TokenRefreshed
            | AuthEvent::UserUpdated => {
                self.session = change.session.clone();
                self.user = change.session.as_ref().map(|s| s.user.clone());
                if let Some(user) = &self.user {
                    follow_up.fetch_role = Some(user.id);
                    if !matches!(self.role, RoleStatus::Known(_)) {
                        self.role = RoleStatus::Loading;
                    }
                    if change.event == AuthEvent::SignedIn {
                        self.profile_loading = true;
                        follow_up.signed_in = true;
                        follow_up.ensure_profile = Some(user.clone());
                    }
                } else {
                    self.role = RoleStatus::Unknown;
                }
            }
        }
        self.loading = false;
        self.initialized = true;
        follow_up
    }

    /// Record the outcome of a role lookup. Results for a user who is no
    /// longer signed in are ignored.
    pub fn role_resolved(&mut self, user_id: Uuid, role: Option<UserRole>, signed_in: bool) {
        if self.user_id() != Some(user_id) {
            return;
        }
        self.role = role.map_or(RoleStatus::Failed, RoleStatus::Known);
        if signed_in {
            self.profile_loading = false;
        }
    }

    /// Bootstrap safety valve: stop waiting for the first event.
    pub fn force_loaded(&mut self) {
        self.loading = false;
        self.initialized = true;
    }

    /// Local sign-out, applied before the backend confirms.
    pub fn clear_user(&mut self) {
        self.session = None;
        self.user = None;
        self.role = RoleStatus::Unknown;
        self.profile_loading = false;
    }

    #[must_use]
    pub fn user_id(&self) -> Option<Uuid> {
        self.user.as_ref().map(|u| u.id)
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == RoleStatus::Known(UserRole::Admin)
    }
}
