//! Favorites list and the optimistic favorite toggle.
//!
//! DESIGN
//! ======
//! The toggle runs in three steps so each is testable on its own:
//!
//! 1. [`begin_toggle`] snapshots both cached list families and patches them
//!    as if the write already succeeded.
//! 2. [`persist_favorite`] deletes or inserts the favorite interaction.
//! 3. [`finish_toggle`] restores the snapshot on failure, or marks both
//!    list families stale on success, and returns the toast to show.
//!
//! [`toggle_favorite`] chains them for pages.

#[cfg(test)]
#[path = "favorites_test.rs"]
mod favorites_test;

use backend::schema::{self, FavoriteRow, InteractionType, NewInteraction};
use backend::{Backend, Delete, Insert, Select};
use uuid::Uuid;

use super::prompts::{PROMPTS_KEY, PromptCache, PromptCard};
use crate::error::ServiceError;
use crate::state::StateCell;
use crate::state::cache::{CacheSnapshot, QueryKey};
use crate::state::toast::Notice;

/// Cache key root for the favorites page.
pub const FAVORITES_KEY: &str = "favorite-prompts";

pub fn favorites_key(user_id: Uuid) -> QueryKey {
    vec![FAVORITES_KEY.to_owned(), user_id.to_string()]
}

/// A cached list is reused while fresh; missing, stale and invalidated
/// lists are fetched again.
#[must_use]
pub fn needs_fetch(cache: &PromptCache, key: &[String], now_ms: i64) -> bool {
    !cache.is_fresh(key, now_ms)
}

/// The user's favorited prompts, all flagged as favorites. Favorites whose
/// prompt was deleted are skipped.
///
/// # Errors
///
/// Returns the backend error.
pub async fn fetch_favorite_prompts(backend: &Backend, user_id: Uuid) -> Result<Vec<PromptCard>, ServiceError> {
    let select = Select::new(schema::USER_INTERACTIONS)
        .columns("prompts(*, categories(id, name, slug))")
        .eq("user_id", user_id)
        .eq("interaction_type", InteractionType::Favorite);
    let rows: Vec<FavoriteRow> = backend.fetch(&select).await?;
    Ok(rows
        .into_iter()
        .filter_map(|row| row.prompts)
        .map(|prompt| PromptCard { is_favorited: true, ..PromptCard::from(prompt) })
        .collect())
}

/// Cache contents captured before an optimistic toggle.
#[derive(Clone, Debug)]
pub struct ToggleSnapshot {
    prompt_id: Uuid,
    was_favorited: bool,
    prompts: CacheSnapshot<Vec<PromptCard>>,
    favorites: CacheSnapshot<Vec<PromptCard>>,
}

/// Snapshot, then flip `prompt_id` in every cached list. Un-favoriting also
/// drops it from the favorites lists.
pub fn begin_toggle(cache: &mut PromptCache, prompt_id: Uuid, was_favorited: bool) -> ToggleSnapshot {
    let prompts_prefix = [PROMPTS_KEY.to_owned()];
    let favorites_prefix = [FAVORITES_KEY.to_owned()];
    let snapshot = ToggleSnapshot {
        prompt_id,
        was_favorited,
        prompts: cache.snapshot_prefix(&prompts_prefix),
        favorites: cache.snapshot_prefix(&favorites_prefix),
    };

    cache.patch_prefix(&prompts_prefix, |_, cards| {
        for card in cards.iter_mut().filter(|c| c.id() == prompt_id) {
            card.is_favorited = !was_favorited;
        }
    });
    if was_favorited {
        cache.patch_prefix(&favorites_prefix, |_, cards| cards.retain(|c| c.id() != prompt_id));
    }
    snapshot
}

/// Write the new favorite state.
///
/// # Errors
///
/// Returns the backend error.
pub async fn persist_favorite(
    backend: &Backend,
    user_id: Uuid,
    prompt_id: Uuid,
    was_favorited: bool,
) -> Result<(), ServiceError> {
    if was_favorited {
        log::debug!("favorites: removing {prompt_id}");
        let delete = Delete::new(schema::USER_INTERACTIONS)
            .eq("user_id", user_id)
            .eq("prompt_id", prompt_id)
            .eq("interaction_type", InteractionType::Favorite);
        backend.execute(&delete).await?;
    } else {
        log::debug!("favorites: adding {prompt_id}");
        let row = NewInteraction {
            user_id: Some(user_id),
            prompt_id,
            interaction_type: InteractionType::Favorite,
        };
        backend.execute(&Insert::new(schema::USER_INTERACTIONS, &row)?).await?;
    }
    Ok(())
}

/// Settle the cache after the write and pick the toast.
pub fn finish_toggle(cache: &mut PromptCache, snapshot: ToggleSnapshot, result: &Result<(), ServiceError>) -> Notice {
    if let Err(e) = result {
        log::error!("favorites: toggle of {} failed: {e}", snapshot.prompt_id);
        cache.restore(snapshot.prompts);
        cache.restore(snapshot.favorites);
        return Notice::error("Error", "Failed to update favorite status.");
    }
    cache.invalidate_prefix(&[PROMPTS_KEY.to_owned()]);
    cache.invalidate_prefix(&[FAVORITES_KEY.to_owned()]);
    if snapshot.was_favorited {
        Notice::info("Removed from favorites", "Prompt has been removed from your favorites.")
    } else {
        Notice::info("Added to favorites", "Prompt has been added to your favorites.")
    }
}

/// Optimistically toggle a favorite and return the toast to show.
pub async fn toggle_favorite(
    backend: &Backend,
    cache: &impl StateCell<PromptCache>,
    user_id: Uuid,
    prompt_id: Uuid,
    was_favorited: bool,
) -> Notice {
    let Some(snapshot) = cache.modify(|c| begin_toggle(c, prompt_id, was_favorited)) else {
        return Notice::error("Error", "Failed to update favorite status.");
    };
    let result = persist_favorite(backend, user_id, prompt_id, was_favorited).await;
    cache
        .modify(|c| finish_toggle(c, snapshot, &result))
        .unwrap_or_else(|| Notice::error("Error", "Failed to update favorite status."))
}
