//! Liveness probe mounted at the root, outside `/api/v1`.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use conference_events::CacheKey;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// `ok`, or `degraded` when Postgres is unreachable.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Which precomputed notices the worker has stored so far.
    pub notices: NoticeStatus,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoticeStatus {
    pub announcement: bool,
    pub featured_speaker: bool,
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = conference_db::health_check(&state.pool).await.is_ok();
    if !db_healthy {
        tracing::warn!("Health check could not reach the database");
    }

    let notices = NoticeStatus {
        announcement: state.cache.get(CacheKey::Announcement).await.is_some(),
        featured_speaker: state.cache.get(CacheKey::FeaturedSpeaker).await.is_some(),
    };

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        notices,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
