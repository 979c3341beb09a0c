//! Repository for the `profiles` table.

use conference_core::types::DbId;
use sqlx::PgPool;

use crate::models::profile::{CreateProfile, Profile, UpdateProfile};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "user_id, display_name, main_email, tee_shirt_size, created_at, updated_at";

/// Provides lookup, lazy creation and updates for profiles.
pub struct ProfileRepo;

impl ProfileRepo {
    /// Return the profile for `input.user_id`, inserting it first if absent.
    ///
    /// An existing profile is returned unchanged.
    pub async fn find_or_create(pool: &PgPool, input: &CreateProfile) -> Result<Profile, sqlx::Error> {
        sqlx::query(
            "INSERT INTO profiles (user_id, display_name, main_email) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (user_id) DO NOTHING",
        )
        .bind(&input.user_id)
        .bind(&input.display_name)
        .bind(&input.main_email)
        .execute(pool)
        .await?;

        Self::find_by_id(pool, &input.user_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_by_id(pool: &PgPool, user_id: &str) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE user_id = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Apply non-blank fields of `input`.
    ///
    /// Returns `None` if no profile with the given id exists.
    pub async fn update(
        pool: &PgPool,
        user_id: &str,
        input: &UpdateProfile,
    ) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!(
            "UPDATE profiles SET \
                display_name = COALESCE(NULLIF(BTRIM($2), ''), display_name), \
                tee_shirt_size = COALESCE($3, tee_shirt_size) \
             WHERE user_id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(user_id)
            .bind(&input.display_name)
            .bind(input.tee_shirt_size.map(|size| size.as_str()))
            .fetch_optional(pool)
            .await
    }

    /// Conference ids the user is registered for, oldest registration first.
    pub async fn attending_ids(pool: &PgPool, user_id: &str) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT conference_id FROM registrations \
             WHERE user_id = $1 \
             ORDER BY created_at, conference_id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Session ids in the user's wishlist, oldest entry first.
    pub async fn wishlist_ids(pool: &PgPool, user_id: &str) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT session_id FROM wishlist_entries \
             WHERE user_id = $1 \
             ORDER BY created_at, session_id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
