//! Handlers for the caller's session wishlist.
//!
//! Add and remove are idempotent and answer with a status message.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use conference_db::models::session::WishlistRequest;
use conference_db::repositories::WishlistRepo;

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::handlers::ensure_profile;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/addWishlist
pub async fn add_to_wishlist(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<WishlistRequest>,
) -> AppResult<impl IntoResponse> {
    let profile = ensure_profile(&state, &auth).await?;
    let outcome = WishlistRepo::add(&state.pool, &profile.user_id, input.session_id).await?;

    if outcome.changed() {
        tracing::info!(session_id = input.session_id, user_id = %profile.user_id, "Session wishlisted");
    }

    Ok(Json(DataResponse {
        data: outcome.message(),
    }))
}

/// POST /api/v1/removeWishlist
pub async fn remove_from_wishlist(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<WishlistRequest>,
) -> AppResult<impl IntoResponse> {
    let profile = ensure_profile(&state, &auth).await?;
    let outcome = WishlistRepo::remove(&state.pool, &profile.user_id, input.session_id).await?;

    if outcome.changed() {
        tracing::info!(session_id = input.session_id, user_id = %profile.user_id, "Session removed from wishlist");
    }

    Ok(Json(DataResponse {
        data: outcome.message(),
    }))
}

/// GET /api/v1/wishlist
pub async fn get_wishlist(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let profile = ensure_profile(&state, &auth).await?;
    let sessions = WishlistRepo::list_sessions(&state.pool, &profile.user_id).await?;

    Ok(Json(DataResponse { data: sessions }))
}
