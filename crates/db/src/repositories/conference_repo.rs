//! Repository for the `conferences` and `registrations` tables.

use conference_core::announcement::NEARLY_SOLD_OUT_SEATS;
use conference_core::error::CoreError;
use conference_core::filter::{ConferenceField, QueryPlan};
use conference_core::registration::{
    check_can_register, seats_after_register, seats_after_unregister,
};
use conference_core::types::DbId;
use sqlx::PgPool;

use crate::filter_sql::{bind_values, translate};
use crate::models::conference::{Conference, ConferenceWithOrganizer, NewConference};
use crate::repositories::MutationError;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, organizer_user_id, topics, city, \
    start_date, end_date, month, max_attendees, seats_available, created_at, updated_at";

/// Same columns qualified with the `c` alias, for joins.
const C_COLUMNS: &str = "c.id, c.name, c.description, c.organizer_user_id, c.topics, c.city, \
    c.start_date, c.end_date, c.month, c.max_attendees, c.seats_available, \
    c.created_at, c.updated_at";

/// Provides creation, lookup, filtered queries and seat bookkeeping for
/// conferences.
pub struct ConferenceRepo;

impl ConferenceRepo {
    /// Insert a new conference owned by `organizer_user_id`.
    ///
    /// Fails with a foreign-key violation when the organizer has no profile.
    pub async fn create(
        pool: &PgPool,
        organizer_user_id: &str,
        input: &NewConference,
    ) -> Result<Conference, sqlx::Error> {
        let query = format!(
            "INSERT INTO conferences \
                (name, description, organizer_user_id, topics, city, start_date, end_date, \
                 month, max_attendees, seats_available) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Conference>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(organizer_user_id)
            .bind(&input.topics)
            .bind(&input.city)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.month)
            .bind(input.max_attendees)
            .bind(input.seats_available)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Conference>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM conferences WHERE id = $1");
        sqlx::query_as::<_, Conference>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a conference along with its organizer's display name.
    pub async fn find_with_organizer(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ConferenceWithOrganizer>, sqlx::Error> {
        let query = format!(
            "SELECT {C_COLUMNS}, p.display_name AS organizer_display_name \
             FROM conferences c \
             JOIN profiles p ON p.user_id = c.organizer_user_id \
             WHERE c.id = $1"
        );
        sqlx::query_as::<_, ConferenceWithOrganizer>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Conferences created by `organizer_user_id`, ordered by name.
    pub async fn list_by_organizer(
        pool: &PgPool,
        organizer_user_id: &str,
    ) -> Result<Vec<ConferenceWithOrganizer>, sqlx::Error> {
        let query = format!(
            "SELECT {C_COLUMNS}, p.display_name AS organizer_display_name \
             FROM conferences c \
             JOIN profiles p ON p.user_id = c.organizer_user_id \
             WHERE c.organizer_user_id = $1 \
             ORDER BY c.name, c.id"
        );
        sqlx::query_as::<_, ConferenceWithOrganizer>(&query)
            .bind(organizer_user_id)
            .fetch_all(pool)
            .await
    }

    /// Conferences the user is registered for, in registration order.
    pub async fn list_attending(pool: &PgPool, user_id: &str) -> Result<Vec<Conference>, sqlx::Error> {
        let query = format!(
            "SELECT {C_COLUMNS} \
             FROM registrations r \
             JOIN conferences c ON c.id = r.conference_id \
             WHERE r.user_id = $1 \
             ORDER BY r.created_at, c.id"
        );
        sqlx::query_as::<_, Conference>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Run a validated filter plan.
    pub async fn query(
        pool: &PgPool,
        plan: &QueryPlan<ConferenceField>,
    ) -> Result<Vec<Conference>, sqlx::Error> {
        let sql = translate(plan, 1);
        let query = format!(
            "SELECT {COLUMNS} FROM conferences {} ORDER BY {}",
            sql.where_clause(),
            sql.order_by
        );
        bind_values(sqlx::query_as::<_, Conference>(&query), &sql.binds)
            .fetch_all(pool)
            .await
    }

    /// Names of conferences with a few seats left, ordered by name.
    pub async fn nearly_sold_out_names(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT name FROM conferences \
             WHERE seats_available > 0 AND seats_available <= $1 \
             ORDER BY name",
        )
        .bind(NEARLY_SOLD_OUT_SEATS)
        .fetch_all(pool)
        .await
    }

    /// Register `user_id` for a conference, taking one seat.
    ///
    /// The conference row is locked for the duration of the transaction so
    /// concurrent registrations for the last seat serialize.
    pub async fn register(
        pool: &PgPool,
        user_id: &str,
        conference_id: DbId,
    ) -> Result<Conference, MutationError> {
        let mut tx = pool.begin().await?;

        let seats: i32 =
            sqlx::query_scalar("SELECT seats_available FROM conferences WHERE id = $1 FOR UPDATE")
                .bind(conference_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| CoreError::not_found("Conference", conference_id))?;

        let already_registered: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM registrations WHERE user_id = $1 AND conference_id = $2)",
        )
        .bind(user_id)
        .bind(conference_id)
        .fetch_one(&mut *tx)
        .await?;

        if let Err(rejection) = check_can_register(already_registered, seats) {
            tracing::debug!(
                conference_id,
                user_id,
                seats_available = seats,
                already_registered,
                "Registration rejected"
            );
            return Err(rejection.into());
        }

        sqlx::query("INSERT INTO registrations (user_id, conference_id) VALUES ($1, $2)")
            .bind(user_id)
            .bind(conference_id)
            .execute(&mut *tx)
            .await?;

        let query =
            format!("UPDATE conferences SET seats_available = $2 WHERE id = $1 RETURNING {COLUMNS}");
        let conference = sqlx::query_as::<_, Conference>(&query)
            .bind(conference_id)
            .bind(seats_after_register(seats))
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(conference)
    }

    /// Remove the user's registration, giving one seat back.
    ///
    /// Returns `false` without touching the seat counter when the user was
    /// not registered.
    pub async fn unregister(
        pool: &PgPool,
        user_id: &str,
        conference_id: DbId,
    ) -> Result<bool, MutationError> {
        let mut tx = pool.begin().await?;

        let seats: i32 =
            sqlx::query_scalar("SELECT seats_available FROM conferences WHERE id = $1 FOR UPDATE")
                .bind(conference_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| CoreError::not_found("Conference", conference_id))?;

        let removed =
            sqlx::query("DELETE FROM registrations WHERE user_id = $1 AND conference_id = $2")
                .bind(user_id)
                .bind(conference_id)
                .execute(&mut *tx)
                .await?
                .rows_affected()
                > 0;

        if removed {
            sqlx::query("UPDATE conferences SET seats_available = $2 WHERE id = $1")
                .bind(conference_id)
                .bind(seats_after_unregister(seats))
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(removed)
    }
}
