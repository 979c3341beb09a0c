//! Repository for the `sessions` table.

use chrono::{NaiveDate, NaiveTime};
use conference_core::filter::{QueryPlan, SessionField};
use conference_core::types::DbId;
use sqlx::PgPool;

use crate::filter_sql::{bind_values, translate};
use crate::models::session::{NewSession, Session};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, conference_id, name, highlights, speaker, duration, \
    type_of_session, date, start_time, created_at, updated_at";

/// Provides creation and the fixed and filtered session queries.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a new session.
    ///
    /// Fails with a foreign-key violation when the conference does not exist.
    pub async fn create(pool: &PgPool, input: &NewSession) -> Result<Session, sqlx::Error> {
        let query = format!(
            "INSERT INTO sessions \
                (conference_id, name, highlights, speaker, duration, type_of_session, date, start_time) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(input.conference_id)
            .bind(&input.name)
            .bind(&input.highlights)
            .bind(&input.speaker)
            .bind(input.duration)
            .bind(&input.type_of_session)
            .bind(input.date)
            .bind(input.start_time)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Session>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sessions WHERE id = $1");
        sqlx::query_as::<_, Session>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All sessions of a conference in schedule order.
    pub async fn list_for_conference(
        pool: &PgPool,
        conference_id: DbId,
    ) -> Result<Vec<Session>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sessions \
             WHERE conference_id = $1 \
             ORDER BY date NULLS LAST, start_time NULLS LAST, name"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(conference_id)
            .fetch_all(pool)
            .await
    }

    /// Sessions of one type within a conference, ordered by name.
    pub async fn list_by_type(
        pool: &PgPool,
        conference_id: DbId,
        type_of_session: &str,
    ) -> Result<Vec<Session>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sessions \
             WHERE conference_id = $1 AND type_of_session = $2 \
             ORDER BY name"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(conference_id)
            .bind(type_of_session)
            .fetch_all(pool)
            .await
    }

    /// Sessions given by `speaker` across all conferences, ordered by name.
    pub async fn list_by_speaker(pool: &PgPool, speaker: &str) -> Result<Vec<Session>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sessions WHERE speaker = $1 ORDER BY name");
        sqlx::query_as::<_, Session>(&query)
            .bind(speaker)
            .fetch_all(pool)
            .await
    }

    /// Sessions given by `speaker` in one conference, in creation order.
    pub async fn list_by_speaker_in_conference(
        pool: &PgPool,
        conference_id: DbId,
        speaker: &str,
    ) -> Result<Vec<Session>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sessions \
             WHERE conference_id = $1 AND speaker = $2 \
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(conference_id)
            .bind(speaker)
            .fetch_all(pool)
            .await
    }

    pub async fn list_by_date(pool: &PgPool, date: NaiveDate) -> Result<Vec<Session>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sessions WHERE date = $1 ORDER BY name");
        sqlx::query_as::<_, Session>(&query)
            .bind(date)
            .fetch_all(pool)
            .await
    }

    pub async fn list_by_duration(pool: &PgPool, duration: i32) -> Result<Vec<Session>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sessions WHERE duration = $1 ORDER BY name");
        sqlx::query_as::<_, Session>(&query)
            .bind(duration)
            .fetch_all(pool)
            .await
    }

    /// Sessions whose type differs from `excluded_type` and that start
    /// before `before`. Sessions missing either field never match.
    pub async fn list_excluding_type_before(
        pool: &PgPool,
        excluded_type: &str,
        before: NaiveTime,
    ) -> Result<Vec<Session>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sessions \
             WHERE type_of_session != $1 AND start_time < $2 \
             ORDER BY start_time, name"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(excluded_type)
            .bind(before)
            .fetch_all(pool)
            .await
    }

    /// Run a validated filter plan, optionally scoped to one conference.
    pub async fn query(
        pool: &PgPool,
        conference_id: Option<DbId>,
        plan: &QueryPlan<SessionField>,
    ) -> Result<Vec<Session>, sqlx::Error> {
        let first_bind_idx = if conference_id.is_some() { 2 } else { 1 };
        let mut sql = translate(plan, first_bind_idx);
        if conference_id.is_some() {
            sql.conditions.insert(0, "conference_id = $1".to_string());
        }

        let query = format!(
            "SELECT {COLUMNS} FROM sessions {} ORDER BY {}",
            sql.where_clause(),
            sql.order_by
        );
        let mut q = sqlx::query_as::<_, Session>(&query);
        if let Some(id) = conference_id {
            q = q.bind(id);
        }
        bind_values(q, &sql.binds).fetch_all(pool).await
    }
}
