//! Daily credits: balance lookup and spending a credit to unlock a prompt.
//!
//! The spend itself is one remote procedure that checks and decrements the
//! balance atomically; the client only reacts to its `success` flag.

#[cfg(test)]
#[path = "credits_test.rs"]
mod credits_test;

use backend::clock;
use backend::rpc::{InitializeUserCredits, SpendPromptCredit};
use backend::schema::{self, UserCredits};
use backend::{Backend, BackendError, Select};
use uuid::Uuid;

use crate::config::CREDITS_STALE_MS;
use crate::error::ServiceError;
use crate::state::StateCell;
use crate::state::credits::CreditsState;

const CREDIT_COLUMNS: &str = "credits_remaining, daily_quota, credit_date";

/// Result of a spend attempt.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpendOutcome {
    pub success: bool,
    pub credits_left: Option<i32>,
}

fn todays_row(backend: &Backend, user_id: Uuid) -> Select {
    Select::new(schema::USER_CREDITS)
        .columns(CREDIT_COLUMNS)
        .eq("user_id", user_id)
        .eq("credit_date", clock::today_utc(backend.now_ms()))
}

async fn query_today(backend: &Backend, user_id: Uuid) -> Result<UserCredits, BackendError> {
    backend.fetch_one(&todays_row(backend, user_id)).await
}

/// Today's balance. A missing row is initialised server-side and read once
/// more; every failure degrades to `None`.
pub async fn fetch_credits(backend: &Backend, user_id: Uuid) -> Option<UserCredits> {
    match query_today(backend, user_id).await {
        Ok(row) => Some(row),
        Err(e) if e.is_no_rows() => {
            log::info!("credits: no row for today, initializing");
            if let Err(e) = backend.rpc(&InitializeUserCredits { target_user_id: user_id }).await {
                log::warn!("credits: initialize failed: {e}");
                return None;
            }
            query_today(backend, user_id)
                .await
                .inspect_err(|e| log::warn!("credits: retry query failed: {e}"))
                .ok()
        }
        Err(e) => {
            log::warn!("credits: query failed: {e}");
            None
        }
    }
}

/// Load the balance into `state` unless a fresh copy is already there.
pub async fn refresh_credits(backend: &Backend, state: &impl StateCell<CreditsState>, user_id: Uuid) {
    let now = backend.now_ms();
    let start = state
        .modify(|s| {
            let due = s.needs_fetch(now, CREDITS_STALE_MS);
            if due {
                s.loading = true;
            }
            due
        })
        .unwrap_or(false);
    if !start {
        return;
    }
    let credits = fetch_credits(backend, user_id).await;
    state.modify(|s| s.loaded(credits, backend.now_ms()));
}

/// Spend one credit on `prompt_id`.
///
/// # Errors
///
/// Returns the backend error when the procedure call itself fails.
pub async fn spend_prompt_credit(backend: &Backend, prompt_id: Uuid) -> Result<SpendOutcome, ServiceError> {
    log::debug!("credits: spending credit on {prompt_id}");
    let rows = backend.rpc(&SpendPromptCredit { in_prompt_id: prompt_id }).await.inspect_err(|e| {
        log::error!("credits: spend failed: {e}");
    })?;
    let outcome = rows
        .first()
        .map_or_else(SpendOutcome::default, |r| SpendOutcome { success: r.success, credits_left: r.credits_left });
    Ok(outcome)
}

/// Spend a credit and, on success, mark the prompt unlocked and the balance
/// stale.
///
/// # Errors
///
/// Returns the backend error when the procedure call fails.
pub async fn unlock_prompt(
    backend: &Backend,
    state: &impl StateCell<CreditsState>,
    prompt_id: Uuid,
) -> Result<SpendOutcome, ServiceError> {
    state.modify(|s| s.spending = true);
    let result = spend_prompt_credit(backend, prompt_id).await;
    state.modify(|s| {
        s.spending = false;
        if let Ok(outcome) = &result
            && outcome.success
        {
            s.spent(prompt_id, outcome.credits_left);
        }
    });
    result
}
