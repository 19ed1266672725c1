//! Row types for the hosted tables.
//!
//! DESIGN
//! ======
//! These types mirror the backend's generated schema. Reads deserialize into
//! the `*Row`-shaped structs; writes use the dedicated insert/patch structs so
//! optional columns are simply omitted and left to server defaults.

#[cfg(test)]
#[path = "schema_test.rs"]
mod schema_test;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const PROMPTS: &str = "prompts";
pub const CATEGORIES: &str = "categories";
pub const USER_PROFILES: &str = "user_profiles";
pub const USER_INTERACTIONS: &str = "user_interactions";
pub const USER_CREDITS: &str = "user_credits";
pub const FEATURED_COLLECTIONS: &str = "featured_collections";

// =============================================================================
// ENUMS
// =============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    Image,
    Video,
    Audio,
    Text,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionType {
    View,
    Copy,
    Favorite,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

macro_rules! str_enum {
    ($ty:ty { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $ty {
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }

            /// Parse the lower-case wire name.
            #[must_use]
            pub fn parse(raw: &str) -> Option<Self> {
                match raw {
                    $($text => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(MediaType { Image => "image", Video => "video", Audio => "audio", Text => "text" });
str_enum!(DifficultyLevel { Beginner => "beginner", Intermediate => "intermediate", Advanced => "advanced" });
str_enum!(InteractionType { View => "view", Copy => "copy", Favorite => "favorite" });
str_enum!(UserRole { User => "user", Admin => "admin" });

// =============================================================================
// CATEGORIES
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cover_image_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Category columns embedded in prompt reads.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct NewCategory {
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image_url: Option<String>,
}

// =============================================================================
// PROMPTS
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
    pub id: Uuid,
    pub title: String,
    pub prompt_text: String,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    pub media_type: MediaType,
    #[serde(default)]
    pub difficulty_level: Option<DifficultyLevel>,
    #[serde(default)]
    pub style_tags: Option<Vec<String>>,
    #[serde(default)]
    pub industry_tags: Option<Vec<String>>,
    #[serde(default)]
    pub primary_image_url: Option<String>,
    #[serde(default)]
    pub before_image_url: Option<String>,
    #[serde(default)]
    pub after_image_url: Option<String>,
    #[serde(default)]
    pub view_count: Option<i64>,
    #[serde(default)]
    pub copy_count: Option<i64>,
    #[serde(default)]
    pub popularity_score: Option<f64>,
    #[serde(default)]
    pub created_by: Option<Uuid>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A prompt row read with its category embedded (`*,categories(...)`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PromptWithCategory {
    #[serde(flatten)]
    pub prompt: Prompt,
    #[serde(default, rename = "categories")]
    pub category: Option<CategoryRef>,
}

/// Compact prompt columns used by the admin content grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PromptSummary {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub primary_image_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct NewPrompt {
    pub title: String,
    pub prompt_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    pub media_type: MediaType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty_level: Option<DifficultyLevel>,
    pub style_tags: Vec<String>,
    pub industry_tags: Vec<String>,
    pub primary_image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Uuid>,
}

// =============================================================================
// USERS
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub role: Option<UserRole>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewProfile {
    pub id: Uuid,
    pub username: String,
    pub full_name: String,
    pub role: UserRole,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct RoleRow {
    #[serde(default)]
    pub role: Option<UserRole>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct IdRow {
    pub id: Uuid,
}

// =============================================================================
// INTERACTIONS
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserInteraction {
    pub id: Uuid,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub prompt_id: Option<Uuid>,
    pub interaction_type: InteractionType,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewInteraction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    pub prompt_id: Uuid,
    pub interaction_type: InteractionType,
}

// =============================================================================
// CREDITS
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCredits {
    pub credits_remaining: i32,
    pub daily_quota: i32,
    /// Calendar date the balance applies to (`YYYY-MM-DD`).
    pub credit_date: String,
}

// =============================================================================
// FEATURED COLLECTIONS
// =============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeaturedCollection {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub image_url: String,
    #[serde(default)]
    pub redirect_category_id: Option<Uuid>,
    pub display_order: i32,
    pub is_active: bool,
    pub badge_text: String,
    pub badge_color: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Redirect category name when read with `categories(name)` embedded.
    #[serde(default, rename = "categories", skip_serializing)]
    pub redirect_category: Option<NameRef>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRef {
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FeaturedCollectionInput {
    pub title: String,
    pub description: Option<String>,
    pub image_url: String,
    pub redirect_category_id: Option<Uuid>,
    pub display_order: i32,
    pub is_active: bool,
    pub badge_text: String,
    pub badge_color: String,
}

impl Default for FeaturedCollectionInput {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: None,
            image_url: String::new(),
            redirect_category_id: None,
            display_order: 0,
            is_active: true,
            badge_text: "Featured".to_owned(),
            badge_color: "purple".to_owned(),
        }
    }
}

// =============================================================================
// EMBEDDED READS
// =============================================================================

/// A favorite interaction read as `prompts(*,categories(...))`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct FavoriteRow {
    #[serde(default)]
    pub prompts: Option<PromptWithCategory>,
}

/// `user_interactions.prompt_id` alone, for favorite membership checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct PromptIdRow {
    #[serde(default)]
    pub prompt_id: Option<Uuid>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TitleRef {
    pub title: String,
}

/// Prompt columns for ranked and recent lists, with `categories(name)`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RankedPrompt {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub view_count: Option<i64>,
    #[serde(default)]
    pub copy_count: Option<i64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, rename = "categories")]
    pub category: Option<NameRef>,
}

/// An interaction with `prompts(title)` embedded.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ActivityRow {
    pub id: Uuid,
    pub interaction_type: InteractionType,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, rename = "prompts")]
    pub prompt: Option<TitleRef>,
}
