//! Prompt reads for browsing and prompt writes for administrators.
//!
//! DESIGN
//! ======
//! Browse lists are offset-paginated selects ordered newest first. Favorite
//! status is not a prompt column: after each page loads, one `in` query over
//! the page's ids marks which prompts the signed-in user has favorited.
//! Loaded lists live in a [`PromptCache`] so the optimistic favorite toggle
//! can patch every visible copy of a prompt at once.

#[cfg(test)]
#[path = "prompts_test.rs"]
mod prompts_test;

use std::collections::HashSet;

use backend::clock;
use backend::schema::{
    self, CategoryRef, DifficultyLevel, InteractionType, MediaType, NewPrompt, Prompt, PromptIdRow, PromptSummary,
    PromptWithCategory,
};
use backend::{Backend, Delete, Direction, Insert, Select};
use uuid::Uuid;

use crate::error::ServiceError;
use crate::state::browse::ExploreFilters;
use crate::state::cache::{QueryCache, QueryKey};

/// Cache key root for browse lists.
pub const PROMPTS_KEY: &str = "prompts";

const LIST_COLUMNS: &str = "*, categories(id, name, slug)";
const DETAIL_COLUMNS: &str = "*, categories(id, name, slug, description)";
const CONTENT_COLUMNS: &str = "id,title,primary_image_url,created_at";

/// A prompt as shown in grids, with its category and favorite flag.
#[derive(Clone, Debug, PartialEq)]
pub struct PromptCard {
    pub prompt: Prompt,
    pub category: Option<CategoryRef>,
    pub is_favorited: bool,
}

impl From<PromptWithCategory> for PromptCard {
    fn from(row: PromptWithCategory) -> Self {
        Self { prompt: row.prompt, category: row.category, is_favorited: false }
    }
}

impl PromptCard {
    pub fn id(&self) -> Uuid {
        self.prompt.id
    }
}

/// Browse lists and the favorites list, keyed by query.
pub type PromptCache = QueryCache<Vec<PromptCard>>;

/// Cache key for the explore list under `filters` for `user`.
pub fn list_key(filters: &ExploreFilters, user: Option<Uuid>) -> QueryKey {
    vec![
        PROMPTS_KEY.to_owned(),
        filters.category.map(|c| c.to_string()).unwrap_or_default(),
        filters.media_type.map(|m| m.as_str().to_owned()).unwrap_or_default(),
        filters.difficulty.map(|d| d.as_str().to_owned()).unwrap_or_default(),
        filters.search.trim().to_owned(),
        user.map(|u| u.to_string()).unwrap_or_default(),
    ]
}

// =============================================================================
// BROWSING
// =============================================================================

fn list_select(filters: &ExploreFilters) -> Select {
    let mut select = Select::new(schema::PROMPTS).columns(LIST_COLUMNS).order("created_at", Direction::Desc);
    if let Some(category) = filters.category {
        select = select.eq("category_id", category);
    }
    if let Some(media) = filters.media_type {
        select = select.eq("media_type", media);
    }
    if let Some(difficulty) = filters.difficulty {
        select = select.eq("difficulty_level", difficulty);
    }
    select.or_ilike_any(&["title", "prompt_text"], &filters.search)
}

/// Rows `from..=to` of the filtered list, newest first, with favorite
/// flags for `user`.
///
/// # Errors
///
/// Returns the backend error for the list query. A failed favorites lookup
/// only loses the flags.
pub async fn fetch_prompt_range(
    backend: &Backend,
    filters: &ExploreFilters,
    from: usize,
    to: usize,
    user: Option<Uuid>,
) -> Result<Vec<PromptCard>, ServiceError> {
    let rows: Vec<PromptWithCategory> = backend.fetch(&list_select(filters).range(from, to)).await?;
    let mut cards: Vec<PromptCard> = rows.into_iter().map(PromptCard::from).collect();

    if let Some(user_id) = user
        && !cards.is_empty()
    {
        let ids: Vec<Uuid> = cards.iter().map(PromptCard::id).collect();
        match favorite_ids(backend, user_id, &ids).await {
            Ok(favorites) => {
                for card in &mut cards {
                    card.is_favorited = favorites.contains(&card.id());
                }
            }
            Err(e) => log::warn!("prompts: favorite lookup failed: {e}"),
        }
    }
    Ok(cards)
}

/// One page of the explore list.
///
/// # Errors
///
/// See [`fetch_prompt_range`].
pub async fn fetch_prompt_page(
    backend: &Backend,
    filters: &ExploreFilters,
    page: usize,
    page_size: usize,
    user: Option<Uuid>,
) -> Result<Vec<PromptCard>, ServiceError> {
    let from = page * page_size;
    fetch_prompt_range(backend, filters, from, from + page_size.max(1) - 1, user).await
}

/// Which of `prompt_ids` `user_id` has favorited.
///
/// # Errors
///
/// Returns the backend error.
pub async fn favorite_ids(backend: &Backend, user_id: Uuid, prompt_ids: &[Uuid]) -> Result<HashSet<Uuid>, ServiceError> {
    let select = Select::new(schema::USER_INTERACTIONS)
        .columns("prompt_id")
        .eq("user_id", user_id)
        .eq("interaction_type", InteractionType::Favorite)
        .in_list("prompt_id", prompt_ids);
    let rows: Vec<PromptIdRow> = backend.fetch(&select).await?;
    Ok(rows.into_iter().filter_map(|r| r.prompt_id).collect())
}

/// A single prompt with its full category.
///
/// # Errors
///
/// No-rows when the id does not exist; otherwise the backend error.
pub async fn fetch_prompt(backend: &Backend, id: Uuid) -> Result<PromptWithCategory, ServiceError> {
    let select = Select::new(schema::PROMPTS).columns(DETAIL_COLUMNS).eq("id", id);
    Ok(backend.fetch_one(&select).await?)
}

// =============================================================================
// ADMIN CONTENT
// =============================================================================

/// Recency filter on the admin content grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TimeFilter {
    #[default]
    All,
    Day,
    Week,
    Month,
}

impl TimeFilter {
    pub const ALL: &'static [Self] = &[Self::All, Self::Day, Self::Week, Self::Month];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Day => "24h",
            Self::Week => "7d",
            Self::Month => "30d",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.as_str() == raw)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All time",
            Self::Day => "Last 24 hours",
            Self::Week => "Last 7 days",
            Self::Month => "Last 30 days",
        }
    }

    /// Earliest `created_at` included, in ms.
    pub fn since(self, now_ms: i64) -> Option<i64> {
        const DAY_MS: i64 = 24 * 60 * 60 * 1000;
        match self {
            Self::All => None,
            Self::Day => Some(now_ms - DAY_MS),
            Self::Week => Some(now_ms - 7 * DAY_MS),
            Self::Month => Some(now_ms - 30 * DAY_MS),
        }
    }
}

/// One page of the admin content grid.
///
/// # Errors
///
/// Returns the backend error.
pub async fn fetch_content_page(
    backend: &Backend,
    filter: TimeFilter,
    page: usize,
    page_size: usize,
) -> Result<Vec<PromptSummary>, ServiceError> {
    let from = page * page_size;
    let mut select = Select::new(schema::PROMPTS)
        .columns(CONTENT_COLUMNS)
        .order("created_at", Direction::Desc)
        .range(from, from + page_size.max(1) - 1);
    if let Some(since) = filter.since(backend.now_ms()) {
        select = select.gte("created_at", clock::iso_utc(since));
    }
    Ok(backend.fetch(&select).await?)
}

/// Upload form contents.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PromptDraft {
    pub title: String,
    pub prompt_text: String,
    pub category_id: Option<Uuid>,
    pub media_type: MediaType,
    pub difficulty: Option<DifficultyLevel>,
    pub style_tags: Vec<String>,
    pub industry_tags: Vec<String>,
    pub image_url: Option<String>,
}

impl PromptDraft {
    /// Blank form: image prompt for beginners.
    pub fn new() -> Self {
        Self { difficulty: Some(DifficultyLevel::Beginner), ..Self::default() }
    }

    /// Check required fields.
    ///
    /// # Errors
    ///
    /// [`ServiceError::Validation`] naming the first missing field.
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.title.trim().is_empty() {
            return Err(ServiceError::Validation("Title is required.".to_owned()));
        }
        if self.prompt_text.trim().is_empty() {
            return Err(ServiceError::Validation("Prompt text is required.".to_owned()));
        }
        if self.image_url.as_deref().is_none_or(|u| u.trim().is_empty()) {
            return Err(ServiceError::Validation("Please upload an image first.".to_owned()));
        }
        Ok(())
    }

    fn into_row(self, created_by: Uuid) -> NewPrompt {
        NewPrompt {
            title: self.title.trim().to_owned(),
            prompt_text: self.prompt_text.trim().to_owned(),
            category_id: self.category_id,
            media_type: self.media_type,
            difficulty_level: self.difficulty,
            style_tags: self.style_tags,
            industry_tags: self.industry_tags,
            primary_image_url: self.image_url.filter(|u| !u.trim().is_empty()),
            created_by: Some(created_by),
        }
    }
}

/// Insert a prompt authored by `created_by`.
///
/// # Errors
///
/// Validation errors before any request; then the backend error.
pub async fn create_prompt(backend: &Backend, draft: PromptDraft, created_by: Uuid) -> Result<(), ServiceError> {
    draft.validate()?;
    let row = draft.into_row(created_by);
    log::info!("prompts: creating {:?}", row.title);
    backend.execute(&Insert::new(schema::PROMPTS, &row)?).await?;
    Ok(())
}

/// Delete a prompt by id.
///
/// # Errors
///
/// Returns the backend error.
pub async fn delete_prompt(backend: &Backend, id: Uuid) -> Result<(), ServiceError> {
    log::info!("prompts: deleting {id}");
    backend.execute(&Delete::new(schema::PROMPTS).eq("id", id)).await?;
    Ok(())
}

// =============================================================================
// TAGS
// =============================================================================

/// Split comma-separated tags, trimming blanks and repeats.
pub fn parse_tags(raw: &str) -> Vec<String> {
    let mut tags = Vec::new();
    for tag in raw.split(',') {
        add_tag(&mut tags, tag);
    }
    tags
}

/// Append `raw` when it is non-blank and new. Returns whether it was added.
pub fn add_tag(tags: &mut Vec<String>, raw: &str) -> bool {
    let tag = raw.trim();
    if tag.is_empty() || tags.iter().any(|t| t == tag) {
        return false;
    }
    tags.push(tag.to_owned());
    true
}
