//! The signed-in user's profile row.

#[cfg(test)]
#[path = "profile_test.rs"]
mod profile_test;

use backend::schema::{self, ProfilePatch, RoleRow, UserProfile, UserRole};
use backend::{Backend, Select, Update};
use uuid::Uuid;

use crate::error::ServiceError;

/// Settings form contents. Blank fields are sent as empty strings so a
/// user can clear them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub full_name: String,
    pub avatar_url: String,
}

impl ProfileForm {
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            full_name: profile.full_name.clone().unwrap_or_default(),
            avatar_url: profile.avatar_url.clone().unwrap_or_default(),
        }
    }

    fn to_patch(&self) -> ProfilePatch {
        ProfilePatch {
            full_name: Some(self.full_name.trim().to_owned()),
            avatar_url: Some(self.avatar_url.trim().to_owned()),
        }
    }
}

/// # Errors
///
/// Returns the backend error, including no-rows when the profile is missing.
pub async fn fetch_profile(backend: &Backend, user_id: Uuid) -> Result<UserProfile, ServiceError> {
    let select = Select::new(schema::USER_PROFILES).eq("id", user_id);
    Ok(backend.fetch_one(&select).await?)
}

/// # Errors
///
/// Returns the backend error.
pub async fn update_profile(backend: &Backend, user_id: Uuid, form: &ProfileForm) -> Result<(), ServiceError> {
    let update = Update::new(schema::USER_PROFILES, &form.to_patch())?.eq("id", user_id);
    backend.execute(&update).await?;
    log::info!("profile: updated {user_id}");
    Ok(())
}

/// Role stored on the user's profile; an unset role is a plain user.
///
/// # Errors
///
/// Returns the backend error, including no-rows when the profile is missing.
pub async fn fetch_role(backend: &Backend, user_id: Uuid) -> Result<UserRole, ServiceError> {
    let select = Select::new(schema::USER_PROFILES).columns("role").eq("id", user_id);
    let row: RoleRow = backend.fetch_one(&select).await?;
    Ok(row.role.unwrap_or_default())
}

/// Single letter for the avatar fallback.
pub fn initial(profile: Option<&UserProfile>, email: Option<&str>) -> char {
    profile
        .and_then(|p| p.full_name.as_deref())
        .and_then(|name| name.chars().next())
        .or_else(|| email.and_then(|e| e.chars().next()))
        .map_or('U', |c| c.to_ascii_uppercase())
}
