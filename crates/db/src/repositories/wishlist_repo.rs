//! Repository for the `wishlist_entries` table.

use conference_core::error::CoreError;
use conference_core::registration::WishlistOutcome;
use conference_core::types::DbId;
use sqlx::PgPool;

use crate::models::session::Session;
use crate::repositories::MutationError;

/// Provides wishlist toggles and listing.
pub struct WishlistRepo;

impl WishlistRepo {
    /// Add a session to the user's wishlist. Adding twice is not an error.
    pub async fn add(
        pool: &PgPool,
        user_id: &str,
        session_id: DbId,
    ) -> Result<WishlistOutcome, MutationError> {
        Self::ensure_session_exists(pool, session_id).await?;

        let inserted = sqlx::query(
            "INSERT INTO wishlist_entries (user_id, session_id) VALUES ($1, $2) \
             ON CONFLICT (user_id, session_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(session_id)
        .execute(pool)
        .await?
        .rows_affected()
            > 0;

        Ok(WishlistOutcome::of_add(inserted))
    }

    /// Remove a session from the user's wishlist. Removing an absent entry
    /// is not an error.
    pub async fn remove(
        pool: &PgPool,
        user_id: &str,
        session_id: DbId,
    ) -> Result<WishlistOutcome, MutationError> {
        Self::ensure_session_exists(pool, session_id).await?;

        let deleted = sqlx::query("DELETE FROM wishlist_entries WHERE user_id = $1 AND session_id = $2")
            .bind(user_id)
            .bind(session_id)
            .execute(pool)
            .await?
            .rows_affected()
            > 0;

        Ok(WishlistOutcome::of_remove(deleted))
    }

    /// Wishlisted sessions, oldest entry first.
    pub async fn list_sessions(pool: &PgPool, user_id: &str) -> Result<Vec<Session>, sqlx::Error> {
        sqlx::query_as::<_, Session>(
            "SELECT s.id, s.conference_id, s.name, s.highlights, s.speaker, s.duration, \
                    s.type_of_session, s.date, s.start_time, s.created_at, s.updated_at \
             FROM wishlist_entries w \
             JOIN sessions s ON s.id = w.session_id \
             WHERE w.user_id = $1 \
             ORDER BY w.created_at, s.id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    async fn ensure_session_exists(pool: &PgPool, session_id: DbId) -> Result<(), MutationError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM sessions WHERE id = $1)")
            .bind(session_id)
            .fetch_one(pool)
            .await?;
        if exists {
            Ok(())
        } else {
            Err(CoreError::not_found("Session", session_id).into())
        }
    }
}
