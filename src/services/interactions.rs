//! View and copy tracking.
//!
//! Tracking is best effort: failures are logged and never reach the user.

#[cfg(test)]
#[path = "interactions_test.rs"]
mod interactions_test;

use backend::rpc::{IncrementCopyCount, IncrementViewCount};
use backend::schema::{self, InteractionType, NewInteraction};
use backend::{Backend, Insert};
use uuid::Uuid;

use crate::error::ServiceError;

const COPY_CONFLICT: &str = "user_id,prompt_id,interaction_type";

async fn insert_view(backend: &Backend, prompt_id: Uuid, user_id: Option<Uuid>) -> Result<(), ServiceError> {
    let row = NewInteraction { user_id, prompt_id, interaction_type: InteractionType::View };
    backend.execute(&Insert::new(schema::USER_INTERACTIONS, &row)?).await?;
    backend.rpc(&IncrementViewCount { prompt_id }).await?;
    Ok(())
}

/// Record a view and bump the prompt's view counter. Returns whether both
/// writes went through.
pub async fn record_view(backend: &Backend, prompt_id: Uuid, user_id: Option<Uuid>) -> bool {
    match insert_view(backend, prompt_id, user_id).await {
        Ok(()) => {
            log::debug!("interactions: view tracked for {prompt_id}");
            true
        }
        Err(e) => {
            log::warn!("interactions: failed to track view of {prompt_id}: {e}");
            false
        }
    }
}

/// Record a copy. Signed-in users get one copy interaction per prompt; the
/// copy counter is bumped regardless.
pub async fn record_copy(backend: &Backend, prompt_id: Uuid, user_id: Option<Uuid>) {
    if let Some(user_id) = user_id {
        let row = NewInteraction { user_id: Some(user_id), prompt_id, interaction_type: InteractionType::Copy };
        let tracked = match Insert::new(schema::USER_INTERACTIONS, &row) {
            Ok(insert) => backend.execute(&insert.upsert(COPY_CONFLICT, true)).await,
            Err(e) => Err(e),
        };
        if let Err(e) = tracked {
            log::warn!("interactions: copy tracking failed for {prompt_id}: {e}");
        }
    }
    if let Err(e) = backend.rpc(&IncrementCopyCount { prompt_id }).await {
        log::warn!("interactions: copy count increment failed for {prompt_id}: {e}");
    }
}
