use super::*;

fn balance(left: i32) -> UserCredits {
    UserCredits { credits_remaining: left, daily_quota: 10, credit_date: "2024-03-05".to_owned() }
}

#[test]
fn needs_fetch_until_loaded_then_after_stale_time() {
    let mut state = CreditsState::default();
    assert!(state.needs_fetch(0, 100));

    state.loaded(Some(balance(4)), 1_000);
    assert!(!state.needs_fetch(1_050, 100));
    assert!(state.needs_fetch(1_100, 100));
    assert_eq!(state.remaining(), 4);
}

#[test]
fn spend_unlocks_and_updates_balance() {
    let id = Uuid::from_u128(9);
    let mut state = CreditsState::default();
    state.loaded(Some(balance(4)), 0);

    state.spent(id, Some(3));

    assert!(state.is_unlocked(id));
    assert_eq!(state.remaining(), 3);
    assert!(state.needs_fetch(1, 1_000));
}

#[test]
fn missing_row_reads_as_zero_credits() {
    let mut state = CreditsState::default();
    state.loaded(None, 0);
    assert_eq!(state.remaining(), 0);
}

#[test]
fn reset_forgets_unlocks() {
    let mut state = CreditsState::default();
    state.spent(Uuid::from_u128(1), None);
    state.reset();
    assert!(state.unlocked.is_empty());
    assert!(state.credits.is_none());
}
