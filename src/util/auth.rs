//! Route-guard decisions.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every route except `/auth` sits behind a guard. The guard component
//! owns the timer and the navigation; the decision itself is a pure
//! function of [`AuthState`] so the ordering of the checks is testable.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use backend::schema::UserRole;
use leptos::prelude::*;
use leptos_router::NavigateOptions;

use crate::state::auth::{AuthState, RoleStatus};

pub const AUTH_ROUTE: &str = "/auth";
pub const EXPLORE_ROUTE: &str = "/explore";
pub const ADMIN_HOME_ROUTE: &str = "/admin/dashboard";

/// What a guarded route should show right now.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardView {
    /// Show the page.
    Allow,
    /// Show a spinner with this caption.
    Wait(&'static str),
    /// Auth never settled within the guard timeout; offer a reload.
    Stalled,
    /// Replace the current route.
    Redirect(&'static str),
}

/// Checks shared by every guard: bootstrap, sign-in, profile setup.
///
/// `timed_out` is set once the guard timer fires. A profile that is still
/// being set up after that no longer blocks the page.
fn session_gate(state: &AuthState, timed_out: bool) -> Option<GuardView> {
    if state.loading {
        return Some(if timed_out { GuardView::Stalled } else { GuardView::Wait("Loading...") });
    }
    if state.user.is_none() {
        return Some(GuardView::Redirect(AUTH_ROUTE));
    }
    if state.profile_loading && !timed_out {
        return Some(GuardView::Wait("Setting up your profile..."));
    }
    None
}

/// Any signed-in user.
pub fn protected_view(state: &AuthState, timed_out: bool) -> GuardView {
    session_gate(state, timed_out).unwrap_or(GuardView::Allow)
}

/// Signed-in admins only; everyone else lands on explore.
pub fn admin_view(state: &AuthState, timed_out: bool) -> GuardView {
    if let Some(view) = session_gate(state, timed_out) {
        return view;
    }
    match state.role {
        RoleStatus::Unknown | RoleStatus::Loading => GuardView::Wait("Checking permissions..."),
        RoleStatus::Known(UserRole::Admin) => GuardView::Allow,
        RoleStatus::Known(UserRole::User) | RoleStatus::Failed => GuardView::Redirect(EXPLORE_ROUTE),
    }
}

/// The `/` route: send admins to the dashboard and everyone else to explore.
pub fn landing_view(state: &AuthState, timed_out: bool) -> GuardView {
    if let Some(view) = session_gate(state, timed_out) {
        return view;
    }
    match state.role {
        RoleStatus::Unknown | RoleStatus::Loading => GuardView::Wait("Loading..."),
        RoleStatus::Known(UserRole::Admin) => GuardView::Redirect(ADMIN_HOME_ROUTE),
        RoleStatus::Known(UserRole::User) | RoleStatus::Failed => GuardView::Redirect(EXPLORE_ROUTE),
    }
}

/// Send an already signed-in visitor away from `/auth`.
pub fn install_signed_in_redirect<F>(auth: RwSignal<AuthState>, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        let state = auth.get();
        if !state.loading && state.user.is_some() {
            navigate("/", NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });
}
