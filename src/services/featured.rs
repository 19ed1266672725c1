//! Featured collections: curated banners that link to a category.

#[cfg(test)]
#[path = "featured_test.rs"]
mod featured_test;

use backend::schema::{self, FeaturedCollection, FeaturedCollectionInput};
use backend::{Backend, Delete, Direction, Insert, Select, Update};
use serde::Serialize;
use uuid::Uuid;

use crate::error::ServiceError;

/// Badge colours the admin form offers.
pub const BADGE_COLORS: &[&str] = &["purple", "blue", "green", "red", "yellow", "orange"];

const LIST_COLUMNS: &str = "*, categories:categories!featured_collections_redirect_category_id_fkey(name)";

/// Every collection, ordered for display, with its redirect category name.
///
/// # Errors
///
/// Returns the backend error.
pub async fn list_featured(backend: &Backend) -> Result<Vec<FeaturedCollection>, ServiceError> {
    let select = Select::new(schema::FEATURED_COLLECTIONS).columns(LIST_COLUMNS).order("display_order", Direction::Asc);
    Ok(backend.fetch(&select).await?)
}

/// Active collections only, for the explore banner.
///
/// # Errors
///
/// Returns the backend error.
pub async fn list_active_featured(backend: &Backend) -> Result<Vec<FeaturedCollection>, ServiceError> {
    let select = Select::new(schema::FEATURED_COLLECTIONS)
        .columns(LIST_COLUMNS)
        .eq("is_active", true)
        .order("display_order", Direction::Asc);
    Ok(backend.fetch(&select).await?)
}

/// Form contents prefilled from an existing collection.
pub fn form_from(collection: &FeaturedCollection) -> FeaturedCollectionInput {
    FeaturedCollectionInput {
        title: collection.title.clone(),
        description: collection.description.clone(),
        image_url: collection.image_url.clone(),
        redirect_category_id: collection.redirect_category_id,
        display_order: collection.display_order,
        is_active: collection.is_active,
        badge_text: collection.badge_text.clone(),
        badge_color: collection.badge_color.clone(),
    }
}

/// Check required fields and normalise blanks to null.
///
/// # Errors
///
/// [`ServiceError::Validation`] for a missing title or image URL.
pub fn prepare(input: &FeaturedCollectionInput) -> Result<FeaturedCollectionInput, ServiceError> {
    if input.title.trim().is_empty() {
        return Err(ServiceError::Validation("Title is required.".to_owned()));
    }
    if input.image_url.trim().is_empty() {
        return Err(ServiceError::Validation("Image URL is required.".to_owned()));
    }
    let mut row = input.clone();
    row.title = row.title.trim().to_owned();
    row.image_url = row.image_url.trim().to_owned();
    row.description = row.description.map(|d| d.trim().to_owned()).filter(|d| !d.is_empty());
    Ok(row)
}

/// # Errors
///
/// Validation errors, then the backend error.
pub async fn create_featured(backend: &Backend, input: &FeaturedCollectionInput) -> Result<(), ServiceError> {
    let row = prepare(input)?;
    log::info!("featured: creating {:?}", row.title);
    backend.execute(&Insert::new(schema::FEATURED_COLLECTIONS, &[row])?).await?;
    Ok(())
}

/// Update and return the stored row.
///
/// # Errors
///
/// Validation errors, then the backend error. No matching row is reported
/// as [`ServiceError::Rejected`].
pub async fn update_featured(
    backend: &Backend,
    id: Uuid,
    input: &FeaturedCollectionInput,
) -> Result<FeaturedCollection, ServiceError> {
    let row = prepare(input)?;
    log::info!("featured: updating {id}");
    let update = Update::new(schema::FEATURED_COLLECTIONS, &row)?.eq("id", id).returning();
    let rows: Vec<FeaturedCollection> = backend.execute_returning(&update).await?;
    rows.into_iter().next().ok_or_else(|| ServiceError::Rejected("Featured collection not found.".to_owned()))
}

/// # Errors
///
/// Returns the backend error.
pub async fn delete_featured(backend: &Backend, id: Uuid) -> Result<(), ServiceError> {
    log::info!("featured: deleting {id}");
    backend.execute(&Delete::new(schema::FEATURED_COLLECTIONS).eq("id", id)).await?;
    Ok(())
}

#[derive(Serialize)]
struct ActivePatch {
    is_active: bool,
}

/// Show or hide a collection.
///
/// # Errors
///
/// Returns the backend error.
pub async fn set_active(backend: &Backend, id: Uuid, is_active: bool) -> Result<(), ServiceError> {
    let update = Update::new(schema::FEATURED_COLLECTIONS, &ActivePatch { is_active })?.eq("id", id);
    backend.execute(&update).await?;
    Ok(())
}
