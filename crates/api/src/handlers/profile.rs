use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use conference_core::error::CoreError;
use conference_db::models::profile::{Profile, ProfileDetail, UpdateProfile};
use conference_db::repositories::ProfileRepo;

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::handlers::ensure_profile;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

async fn detail(state: &AppState, profile: Profile) -> AppResult<ProfileDetail> {
    let attending = ProfileRepo::attending_ids(&state.pool, &profile.user_id).await?;
    let wishlist = ProfileRepo::wishlist_ids(&state.pool, &profile.user_id).await?;
    Ok(ProfileDetail::new(profile, attending, wishlist))
}

/// GET /api/v1/profile
///
/// The caller's profile, created from the token claims on first access.
pub async fn get_profile(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let profile = ensure_profile(&state, &auth).await?;
    Ok(Json(DataResponse {
        data: detail(&state, profile).await?,
    }))
}

/// POST /api/v1/profile
///
/// Update display name and/or tee-shirt size. Blank fields are ignored.
pub async fn save_profile(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<UpdateProfile>,
) -> AppResult<impl IntoResponse> {
    let profile = ensure_profile(&state, &auth).await?;
    let profile = ProfileRepo::update(&state.pool, &profile.user_id, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("Profile", &auth.user_id))?;

    tracing::info!(user_id = %profile.user_id, "Profile saved");

    Ok(Json(DataResponse {
        data: detail(&state, profile).await?,
    }))
}
