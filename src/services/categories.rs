//! Category reads and admin category management.

#[cfg(test)]
#[path = "categories_test.rs"]
mod categories_test;

use backend::schema::{self, Category, NewCategory};
use backend::{Backend, Delete, Direction, Insert, Select, Update};
use serde::Serialize;
use uuid::Uuid;

use crate::error::ServiceError;

/// A category with the number of prompts filed under it.
#[derive(Clone, Debug, PartialEq)]
pub struct CategoryWithCount {
    pub category: Category,
    pub prompt_count: u64,
}

/// All categories ordered by name.
///
/// # Errors
///
/// Returns the backend error.
pub async fn list_categories(backend: &Backend) -> Result<Vec<Category>, ServiceError> {
    let select = Select::new(schema::CATEGORIES).order("name", Direction::Asc);
    Ok(backend.fetch(&select).await?)
}

/// Categories with exact prompt counts, one count query per category run
/// concurrently.
///
/// # Errors
///
/// Returns the first backend error.
pub async fn list_categories_with_counts(backend: &Backend) -> Result<Vec<CategoryWithCount>, ServiceError> {
    let categories = list_categories(backend).await?;
    let counts = futures::future::try_join_all(categories.iter().map(|c| {
        let select = Select::new(schema::PROMPTS).eq("category_id", c.id);
        async move { backend.count(&select).await }
    }))
    .await?;
    Ok(categories
        .into_iter()
        .zip(counts)
        .map(|(category, prompt_count)| CategoryWithCount { category, prompt_count })
        .collect())
}

/// URL slug: lower-case, runs of anything but `a-z0-9` become one `-`,
/// no leading or trailing `-`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for ch in name.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Category form contents.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CategoryForm {
    pub name: String,
    pub slug: String,
    pub description: String,
}

impl CategoryForm {
    pub fn from_category(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            slug: category.slug.clone(),
            description: category.description.clone().unwrap_or_default(),
        }
    }

    /// Set the name and derive the slug from it.
    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_owned();
        self.slug = slugify(name);
    }

    fn validate(&self) -> Result<(), ServiceError> {
        if self.name.trim().is_empty() {
            return Err(ServiceError::Validation("Name is required.".to_owned()));
        }
        if self.slug.trim().is_empty() {
            return Err(ServiceError::Validation("Slug is required.".to_owned()));
        }
        Ok(())
    }

    fn description(&self) -> Option<String> {
        Some(self.description.trim().to_owned()).filter(|d| !d.is_empty())
    }
}

/// Patch body; an empty description clears the column.
#[derive(Serialize)]
struct CategoryPatch<'a> {
    name: &'a str,
    slug: &'a str,
    description: Option<String>,
}

/// # Errors
///
/// Validation errors, then the backend error (for example a duplicate slug).
pub async fn create_category(backend: &Backend, form: &CategoryForm) -> Result<(), ServiceError> {
    form.validate()?;
    let row = NewCategory {
        name: form.name.trim().to_owned(),
        slug: form.slug.trim().to_owned(),
        description: form.description(),
        cover_image_url: None,
    };
    log::info!("categories: creating {:?}", row.slug);
    backend.execute(&Insert::new(schema::CATEGORIES, &row)?).await?;
    Ok(())
}

/// # Errors
///
/// Validation errors, then the backend error.
pub async fn update_category(backend: &Backend, id: Uuid, form: &CategoryForm) -> Result<(), ServiceError> {
    form.validate()?;
    let patch = CategoryPatch { name: form.name.trim(), slug: form.slug.trim(), description: form.description() };
    log::info!("categories: updating {id}");
    backend.execute(&Update::new(schema::CATEGORIES, &patch)?.eq("id", id)).await?;
    Ok(())
}

/// Delete a category; its prompts become uncategorized server-side.
///
/// # Errors
///
/// Returns the backend error.
pub async fn delete_category(backend: &Backend, id: Uuid) -> Result<(), ServiceError> {
    log::info!("categories: deleting {id}");
    backend.execute(&Delete::new(schema::CATEGORIES).eq("id", id)).await?;
    Ok(())
}
