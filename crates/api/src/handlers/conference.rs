//! Handlers for conferences and seat registration.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use conference_core::announcement::is_nearly_sold_out;
use conference_core::error::CoreError;
use conference_core::filter::{build_plan, ConferenceField};
use conference_core::types::DbId;
use conference_db::models::conference::{ConferenceQuery, CreateConference};
use conference_db::repositories::ConferenceRepo;
use conference_events::Task;

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::handlers::ensure_profile;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Conference CRUD
// ---------------------------------------------------------------------------

/// POST /api/v1/conference
///
/// Create a conference owned by the caller. A confirmation e-mail is sent
/// to the organizer in the background.
pub async fn create_conference(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateConference>,
) -> AppResult<impl IntoResponse> {
    let new_conference = input.validate()?;
    let profile = ensure_profile(&state, &auth).await?;

    let conference = ConferenceRepo::create(&state.pool, &profile.user_id, &new_conference).await?;

    tracing::info!(
        conference_id = conference.id,
        user_id = %auth.user_id,
        "Conference created"
    );

    state.tasks.enqueue(Task::SendConfirmationEmail {
        to: profile.main_email,
        conference: conference.clone(),
    });
    if is_nearly_sold_out(conference.seats_available) {
        state.tasks.enqueue(Task::RefreshAnnouncement);
    }

    Ok((StatusCode::CREATED, Json(DataResponse { data: conference })))
}

/// GET /api/v1/conference/{id}
pub async fn get_conference(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let conference = ConferenceRepo::find_with_organizer(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Conference", id))?;

    Ok(Json(DataResponse { data: conference }))
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// POST /api/v1/queryConferences
///
/// Run caller-supplied filters. An invalid filter rejects the whole batch.
pub async fn query_conferences(
    State(state): State<AppState>,
    AppJson(input): AppJson<ConferenceQuery>,
) -> AppResult<impl IntoResponse> {
    let plan = build_plan::<ConferenceField>(&input.filters).map_err(CoreError::from)?;
    let conferences = ConferenceRepo::query(&state.pool, &plan).await?;

    Ok(Json(DataResponse { data: conferences }))
}

/// POST /api/v1/getConferencesCreated
pub async fn list_created(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let profile = ensure_profile(&state, &auth).await?;
    let conferences = ConferenceRepo::list_by_organizer(&state.pool, &profile.user_id).await?;

    Ok(Json(DataResponse { data: conferences }))
}

/// GET /api/v1/conferences/attending
pub async fn list_attending(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let profile = ensure_profile(&state, &auth).await?;
    let conferences = ConferenceRepo::list_attending(&state.pool, &profile.user_id).await?;

    Ok(Json(DataResponse { data: conferences }))
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

/// POST /api/v1/conference/{id}
///
/// Take one seat. Fails with 409 when already registered or sold out.
pub async fn register(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let profile = ensure_profile(&state, &auth).await?;

    let conference = ConferenceRepo::register(&state.pool, &profile.user_id, id).await?;

    tracing::info!(
        conference_id = id,
        user_id = %profile.user_id,
        seats_available = conference.seats_available,
        "Registered for conference"
    );
    state.tasks.enqueue(Task::RefreshAnnouncement);

    Ok(Json(DataResponse { data: true }))
}

/// DELETE /api/v1/conference/{id}
///
/// Give the caller's seat back. Returns `false` when the caller was not
/// registered.
pub async fn unregister(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let profile = ensure_profile(&state, &auth).await?;

    let removed = ConferenceRepo::unregister(&state.pool, &profile.user_id, id).await?;

    if removed {
        tracing::info!(conference_id = id, user_id = %profile.user_id, "Unregistered from conference");
        state.tasks.enqueue(Task::RefreshAnnouncement);
    }

    Ok(Json(DataResponse { data: removed }))
}
