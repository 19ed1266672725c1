//! Daily credit balance and prompts unlocked this session.

#[cfg(test)]
#[path = "credits_test.rs"]
mod credits_test;

use std::collections::HashSet;

use backend::schema::UserCredits;
use uuid::Uuid;

#[derive(Clone, Debug, Default)]
pub struct CreditsState {
    pub credits: Option<UserCredits>,
    pub loading: bool,
    /// A spend RPC is in flight.
    pub spending: bool,
    pub unlocked: HashSet<Uuid>,
    /// When `credits` was last fetched; `None` forces a refetch.
    pub fetched_at: Option<i64>,
}

impl CreditsState {
    pub fn remaining(&self) -> i32 {
        self.credits.as_ref().map_or(0, |c| c.credits_remaining)
    }

    pub fn is_unlocked(&self, prompt_id: Uuid) -> bool {
        self.unlocked.contains(&prompt_id)
    }

    pub fn needs_fetch(&self, now_ms: i64, stale_ms: i64) -> bool {
        !self.loading && self.fetched_at.is_none_or(|at| now_ms - at >= stale_ms)
    }

    pub fn loaded(&mut self, credits: Option<UserCredits>, now_ms: i64) {
        self.credits = credits;
        self.loading = false;
        self.fetched_at = Some(now_ms);
    }

    pub fn invalidate(&mut self) {
        self.fetched_at = None;
    }

    /// Apply the balance reported by a successful spend.
    pub fn spent(&mut self, prompt_id: Uuid, credits_left: Option<i32>) {
        self.unlocked.insert(prompt_id);
        if let (Some(credits), Some(left)) = (self.credits.as_mut(), credits_left) {
            credits.credits_remaining = left;
        }
        self.invalidate();
    }

    /// Drop everything tied to the previous user.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
