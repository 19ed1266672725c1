//! Explore page: filter bar, featured collections and the infinite prompt
//! grid.
//!
//! SYSTEM CONTEXT
//! ==============
//! The grid renders whatever the [`PromptCache`] holds under the current
//! list key. Page loads go through a [`Pager`] and publish the accumulated
//! rows into the cache, so an optimistic favorite toggle (which patches
//! the cache) shows up at once, and the invalidation that follows a
//! successful toggle triggers a one-shot reload of every loaded row.

use backend::Backend;
use backend::schema::{Category, DifficultyLevel, FeaturedCollection, MediaType};
use leptos::prelude::*;
use leptos_router::hooks::use_query_map;
use uuid::Uuid;

use crate::components::prompt_card::{PromptCard, copy_prompt, toggle_favorite};
use crate::components::toaster::notify;
use crate::config::AppConfig;
use crate::services::prompts::{self, PromptCache, PromptCard as CardData, list_key};
use crate::state::auth::AuthState;
use crate::state::browse::{ExploreFilters, Pager};
use crate::state::cache::QueryKey;
use crate::state::toast::{Notice, ToastState};
use crate::util::scroll::install_near_bottom_listener;
use crate::util::ui_persistence::{EXPLORE_FILTERS_KEY, load_json, save_json};

/// Signals the page's loaders share.
#[derive(Clone, Copy)]
struct Browse {
    backend: StoredValue<Backend>,
    filters: RwSignal<ExploreFilters>,
    pager: RwSignal<Pager<CardData>>,
    cache: RwSignal<PromptCache>,
    auth: RwSignal<AuthState>,
    toasts: RwSignal<ToastState>,
}

impl Browse {
    fn user(self) -> Option<Uuid> {
        self.auth.with_untracked(AuthState::user_id)
    }

    /// Load the next page if the pager allows one.
    fn load_next(self) {
        let Some(Some(ticket)) = self.pager.try_update(Pager::begin_next) else {
            return;
        };
        let page_size = self.pager.with_untracked(|p| p.page_size);
        let filters = self.filters.get_untracked();
        let user = self.user();
        let backend = self.backend.get_value();
        leptos::task::spawn_local(async move {
            match prompts::fetch_prompt_page(&backend, &filters, ticket.page, page_size, user).await {
                Ok(rows) => {
                    if self.pager.try_update(|p| p.apply_page(ticket, rows)) == Some(true) {
                        self.publish(list_key(&filters, user), backend.now_ms());
                    }
                }
                Err(e) => {
                    log::error!("explore: page {} failed: {e}", ticket.page);
                    self.pager.try_update(|p| p.fail(ticket));
                    notify(self.toasts, Notice::error("Error", "Failed to load prompts."));
                }
            }
        });
    }

    /// Reload every loaded row after the cached list was invalidated.
    fn refresh(self) {
        let Some(Some(ticket)) = self.pager.try_update(Pager::begin_refresh) else {
            return;
        };
        let (from, to) = ticket.range();
        let filters = self.filters.get_untracked();
        let user = self.user();
        let backend = self.backend.get_value();
        leptos::task::spawn_local(async move {
            match prompts::fetch_prompt_range(&backend, &filters, from, to, user).await {
                Ok(rows) => {
                    if self.pager.try_update(|p| p.apply_refresh(ticket, rows)) == Some(true) {
                        self.publish(list_key(&filters, user), backend.now_ms());
                    }
                }
                Err(e) => {
                    log::warn!("explore: refresh failed: {e}");
                    self.pager.try_update(|p| p.fail_refresh(ticket));
                }
            }
        });
    }

    fn publish(self, key: QueryKey, now_ms: i64) {
        let Some(items) = self.pager.try_with_untracked(|p| p.items.clone()) else {
            return;
        };
        self.cache.try_update(|c| c.insert(key, items, now_ms));
    }
}

#[component]
pub fn ExplorePage() -> impl IntoView {
    let backend = expect_context::<Backend>();
    let config = expect_context::<AppConfig>();
    let auth = expect_context::<RwSignal<AuthState>>();
    let toasts = expect_context::<RwSignal<ToastState>>();
    let cache = expect_context::<RwSignal<PromptCache>>();
    let query = use_query_map();

    let mut initial = load_json::<ExploreFilters>(EXPLORE_FILTERS_KEY).unwrap_or_default();
    if let Some(category) = query.with_untracked(|q| q.get("category")).and_then(|raw| Uuid::parse_str(&raw).ok()) {
        initial.category = Some(category);
    }

    let browse = Browse {
        backend: StoredValue::new(backend.clone()),
        filters: RwSignal::new(initial),
        pager: RwSignal::new(Pager::new(config.page_size)),
        cache,
        auth,
        toasts,
    };
    let filters = browse.filters;
    let categories = RwSignal::new(Vec::<Category>::new());
    let featured = RwSignal::new(Vec::<FeaturedCollection>::new());

    {
        let backend = backend.clone();
        leptos::task::spawn_local(async move {
            let (category_rows, featured_rows) = futures::join!(
                crate::services::categories::list_categories(&backend),
                crate::services::featured::list_active_featured(&backend),
            );
            match category_rows {
                Ok(rows) => categories.set(rows),
                Err(e) => log::warn!("explore: categories failed: {e}"),
            }
            match featured_rows {
                Ok(rows) => featured.set(rows),
                Err(e) => log::warn!("explore: featured collections failed: {e}"),
            }
        });
    }

    Effect::new(move || filters.with(|f| save_json(EXPLORE_FILTERS_KEY, f)));

    let key = Memo::new(move |_| list_key(&filters.get(), auth.with(AuthState::user_id)));

    Effect::new(move || {
        key.track();
        browse.pager.update(Pager::reset);
        browse.load_next();
    });

    Effect::new(move || {
        let current = key.get();
        if cache.with(|c| c.is_invalidated(&current)) {
            browse.refresh();
        }
    });

    install_near_bottom_listener(move || browse.load_next());

    let cards = move || cache.with(|c| c.get(&key.get()).cloned().unwrap_or_default());
    let loading = move || browse.pager.with(|p| p.loading);

    let on_copy = Callback::new({
        let backend = backend.clone();
        move |card: CardData| copy_prompt(backend.clone(), toasts, &card, auth.with_untracked(AuthState::user_id))
    });
    let on_favorite = Callback::new(move |(id, was): (Uuid, bool)| {
        toggle_favorite(browse.backend.get_value(), cache, toasts, auth.with_untracked(AuthState::user_id), id, was);
    });

    view! {
        <div class="explore-page">
            <FeaturedStrip featured=featured filters=filters/>
            <FilterBar filters=filters categories=categories/>
            {move || {
                let items = cards();
                if items.is_empty() && loading() {
                    view! {
                        <div class="page-state">
                            <div class="spinner" aria-hidden="true"></div>
                            <p>"Loading prompts..."</p>
                        </div>
                    }
                    .into_any()
                } else if items.is_empty() {
                    let hint = if filters.with(ExploreFilters::is_filtered) {
                        "Try adjusting your search or filters."
                    } else {
                        "Check back soon for new prompts."
                    };
                    view! {
                        <div class="page-state">
                            <p>"No prompts found"</p>
                            <p class="muted">{hint}</p>
                        </div>
                    }
                    .into_any()
                } else {
                    view! {
                        <div class="prompt-grid">
                            <For
                                each=move || cards()
                                key=|card| (card.id(), card.is_favorited)
                                children=move |card| {
                                    view! { <PromptCard card=card on_copy=on_copy on_favorite=on_favorite/> }
                                }
                            />
                        </div>
                    }
                    .into_any()
                }
            }}
            <Show when=move || loading() && !cards().is_empty()>
                <p class="muted explore-page__more">"Loading more..."</p>
            </Show>
        </div>
    }
}

#[component]
fn FilterBar(filters: RwSignal<ExploreFilters>, categories: RwSignal<Vec<Category>>) -> impl IntoView {
    view! {
        <div class="filter-bar">
            <input
                class="filter-bar__search"
                type="search"
                placeholder="Search AI prompts..."
                prop:value=move || filters.with(|f| f.search.clone())
                on:input=move |ev| filters.update(|f| f.search = event_target_value(&ev))
            />
            <select
                prop:value=move || filters.with(|f| f.category.map(|c| c.to_string()).unwrap_or_default())
                on:change=move |ev| filters.update(|f| f.category = Uuid::parse_str(&event_target_value(&ev)).ok())
            >
                <option value="">"All Categories"</option>
                <For
                    each=move || categories.get()
                    key=|category| category.id
                    children=move |category| {
                        view! { <option value=category.id.to_string()>{category.name}</option> }
                    }
                />
            </select>
            <select
                prop:value=move || filters.with(|f| f.media_type.map(MediaType::as_str).unwrap_or_default())
                on:change=move |ev| filters.update(|f| f.media_type = MediaType::parse(&event_target_value(&ev)))
            >
                <option value="">"All Types"</option>
                {MediaType::ALL
                    .iter()
                    .map(|m| view! { <option value=m.as_str()>{m.as_str()}</option> })
                    .collect_view()}
            </select>
            <select
                prop:value=move || filters.with(|f| f.difficulty.map(DifficultyLevel::as_str).unwrap_or_default())
                on:change=move |ev| {
                    filters.update(|f| f.difficulty = DifficultyLevel::parse(&event_target_value(&ev)));
                }
            >
                <option value="">"All Levels"</option>
                {DifficultyLevel::ALL
                    .iter()
                    .map(|d| view! { <option value=d.as_str()>{d.as_str()}</option> })
                    .collect_view()}
            </select>
            <Show when=move || filters.with(ExploreFilters::is_filtered)>
                <button class="button button--ghost" on:click=move |_| filters.set(ExploreFilters::default())>
                    "Clear filters"
                </button>
            </Show>
        </div>
    }
}

/// Active featured collections; picking one filters by its category.
#[component]
fn FeaturedStrip(featured: RwSignal<Vec<FeaturedCollection>>, filters: RwSignal<ExploreFilters>) -> impl IntoView {
    view! {
        <Show when=move || featured.with(|f| !f.is_empty())>
            <section class="featured-strip">
                <For
                    each=move || featured.get()
                    key=|collection| collection.id
                    children=move |collection| {
                        let target = collection.redirect_category_id;
                        view! {
                            <button
                                class="featured-card"
                                on:click=move |_| {
                                    if let Some(category) = target {
                                        filters.update(|f| f.category = Some(category));
                                    }
                                }
                            >
                                <img src=collection.image_url alt=collection.title.clone()/>
                                <span class=format!("badge badge--{}", collection.badge_color)>
                                    {collection.badge_text}
                                </span>
                                <strong>{collection.title}</strong>
                                {collection.description.map(|d| view! { <p>{d}</p> })}
                            </button>
                        }
                    }
                />
            </section>
        </Show>
    }
}
