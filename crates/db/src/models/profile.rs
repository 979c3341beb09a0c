//! Profile entity model and DTOs.

use conference_core::profile::TeeShirtSize;
use conference_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `profiles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub user_id: String,
    pub display_name: String,
    pub main_email: String,
    pub tee_shirt_size: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Profile {
    /// Stored size token, falling back to `NOT_SPECIFIED` for unknown text.
    pub fn tee_shirt_size(&self) -> TeeShirtSize {
        self.tee_shirt_size.parse().unwrap_or_default()
    }
}

/// A profile together with its registrations and wishlist.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDetail {
    pub user_id: String,
    pub display_name: String,
    pub main_email: String,
    pub tee_shirt_size: TeeShirtSize,
    pub conference_keys_to_attend: Vec<DbId>,
    pub session_keys_wishlist: Vec<DbId>,
}

impl ProfileDetail {
    pub fn new(profile: Profile, attending: Vec<DbId>, wishlist: Vec<DbId>) -> Self {
        let tee_shirt_size = profile.tee_shirt_size();
        Self {
            user_id: profile.user_id,
            display_name: profile.display_name,
            main_email: profile.main_email,
            tee_shirt_size,
            conference_keys_to_attend: attending,
            session_keys_wishlist: wishlist,
        }
    }
}

/// DTO for creating a profile on first authenticated access.
#[derive(Debug, Clone)]
pub struct CreateProfile {
    pub user_id: String,
    pub display_name: String,
    pub main_email: String,
}

/// DTO for `saveProfile`. Blank or absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfile {
    pub display_name: Option<String>,
    pub tee_shirt_size: Option<TeeShirtSize>,
}
