use backend::testing;

use super::*;

fn uid(n: u128) -> Uuid {
    Uuid::from_u128(n)
}

fn change(event: AuthEvent, user: Option<u128>) -> AuthChange {
    AuthChange { event, session: user.map(|n| testing::session(testing::user(uid(n), "ada@example.com"))) }
}

// =============================================================
// Defaults
// =============================================================

#[test]
fn default_state_is_loading_without_user() {
    let state = AuthState::default();
    assert!(state.loading);
    assert!(!state.initialized);
    assert!(state.user.is_none());
    assert_eq!(state.role, RoleStatus::Unknown);
}

// =============================================================
// Event reducer
// =============================================================

#[test]
fn initial_session_mirrors_user_and_requests_role() {
    let mut state = AuthState::default();
    let follow_up = state.apply(&change(AuthEvent::InitialSession, Some(1)));

    assert_eq!(state.user_id(), Some(uid(1)));
    assert!(state.session.is_some());
    assert!(!state.loading);
    assert!(state.initialized);
    assert!(!state.profile_loading);
    assert_eq!(state.role, RoleStatus::Loading);
    assert_eq!(follow_up.fetch_role, Some(uid(1)));
    assert!(follow_up.ensure_profile.is_none());
    assert!(!follow_up.signed_in);
}

#[test]
fn empty_initial_session_finishes_loading() {
    let mut state = AuthState::default();
    let follow_up = state.apply(&change(AuthEvent::InitialSession, None));
    assert!(state.user.is_none());
    assert!(!state.loading);
    assert_eq!(follow_up, FollowUp::default());
}

#[test]
fn signed_in_marks_profile_loading_and_ensures_profile() {
    let mut state = AuthState::default();
    let follow_up = state.apply(&change(AuthEvent::SignedIn, Some(2)));

    assert!(state.profile_loading);
    assert!(follow_up.signed_in);
    assert_eq!(follow_up.ensure_profile.map(|u| u.id), Some(uid(2)));
}

#[test]
fn signed_out_clears_everything() {
    let mut state = AuthState::default();
    state.apply(&change(AuthEvent::SignedIn, Some(3)));
    state.role_resolved(uid(3), Some(UserRole::Admin), false);

    let follow_up = state.apply(&change(AuthEvent::SignedOut, None));

    assert!(state.user.is_none());
    assert!(state.session.is_none());
    assert_eq!(state.role, RoleStatus::Unknown);
    assert!(!state.profile_loading);
    assert_eq!(follow_up, FollowUp::default());
}

#[test]
fn token_refresh_keeps_known_role() {
    let mut state = AuthState::default();
    state.apply(&change(AuthEvent::InitialSession, Some(4)));
    state.role_resolved(uid(4), Some(UserRole::Admin), false);

    state.apply(&change(AuthEvent::TokenRefreshed, Some(4)));
    assert!(state.is_admin());
}

// =============================================================
// Role resolution
// =============================================================

#[test]
fn role_resolution_clears_profile_loading_after_sign_in() {
    let mut state = AuthState::default();
    state.apply(&change(AuthEvent::SignedIn, Some(5)));
    state.role_resolved(uid(5), Some(UserRole::User), true);

    assert_eq!(state.role, RoleStatus::Known(UserRole::User));
    assert!(!state.profile_loading);
    assert!(!state.is_admin());
}

#[test]
fn failed_role_lookup_is_recorded() {
    let mut state = AuthState::default();
    state.apply(&change(AuthEvent::InitialSession, Some(6)));
    state.role_resolved(uid(6), None, false);
    assert_eq!(state.role, RoleStatus::Failed);
}

#[test]
fn stale_role_result_for_other_user_is_ignored() {
    let mut state = AuthState::default();
    state.apply(&change(AuthEvent::InitialSession, Some(7)));
    state.role_resolved(uid(8), Some(UserRole::Admin), false);
    assert_eq!(state.role, RoleStatus::Loading);
}

#[test]
fn force_loaded_stops_waiting() {
    let mut state = AuthState::default();
    state.force_loaded();
    assert!(!state.loading);
    assert!(state.initialized);
    assert!(state.user.is_none());
}
