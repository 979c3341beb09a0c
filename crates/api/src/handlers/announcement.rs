//! Handlers for the cached announcement and featured-speaker text.
//!
//! Both endpoints are public and return `""` when nothing is cached.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use conference_events::CacheKey;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/conference/announcement/get
pub async fn get_announcement(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let text = state.cache.get_or_empty(CacheKey::Announcement).await;
    Ok(Json(DataResponse { data: text }))
}

/// GET /api/v1/conference/featured_speaker
pub async fn get_featured_speaker(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let text = state.cache.get_or_empty(CacheKey::FeaturedSpeaker).await;
    Ok(Json(DataResponse { data: text }))
}
