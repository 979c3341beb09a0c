//! Handlers for sessions: creation, per-conference listing, the fixed
//! queries and the generic filter query.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use conference_core::announcement::format_featured_speaker;
use conference_core::error::CoreError;
use conference_core::filter::{build_plan, SessionField};
use conference_core::types::DbId;
use conference_db::models::conference::Conference;
use conference_db::models::session::{
    CreateSession, SessionQuery, SessionsByDate, SessionsByDuration, SessionsBySpeaker,
    SessionsByType, SessionsByTypeTime,
};
use conference_db::repositories::{ConferenceRepo, SessionRepo};
use conference_events::Task;

use crate::error::AppResult;
use crate::extract::AppJson;
use crate::handlers::ensure_profile;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

async fn find_conference(state: &AppState, id: DbId) -> AppResult<Conference> {
    let conference = ConferenceRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Conference", id))?;
    Ok(conference)
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

/// POST /api/v1/session
///
/// Only the conference's organizer may add sessions; anyone else gets the
/// same 404 as for a missing conference. When the speaker now has more than
/// one session in the conference, the featured-speaker text is refreshed in
/// the background.
pub async fn create_session(
    auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateSession>,
) -> AppResult<impl IntoResponse> {
    let new_session = input.validate()?;
    let profile = ensure_profile(&state, &auth).await?;

    let conference = find_conference(&state, new_session.conference_id).await?;
    if conference.organizer_user_id != profile.user_id {
        tracing::debug!(
            conference_id = conference.id,
            user_id = %profile.user_id,
            "Session creation by non-organizer rejected"
        );
        return Err(CoreError::not_found("Conference", conference.id).into());
    }

    let session = SessionRepo::create(&state.pool, &new_session).await?;
    tracing::info!(
        session_id = session.id,
        conference_id = conference.id,
        "Session created"
    );

    if let Some(speaker) = session.speaker.as_deref().filter(|s| !s.is_empty()) {
        queue_featured_speaker(&state, conference.id, speaker).await;
    }

    Ok((StatusCode::CREATED, Json(DataResponse { data: session })))
}

/// Enqueue the featured-speaker text when `speaker` has two or more sessions
/// in the conference.
///
/// Runs after the session is stored, so a failed lookup is logged and the
/// refresh skipped rather than failing the request.
async fn queue_featured_speaker(state: &AppState, conference_id: DbId, speaker: &str) {
    let sessions =
        match SessionRepo::list_by_speaker_in_conference(&state.pool, conference_id, speaker).await
        {
            Ok(sessions) => sessions,
            Err(e) => {
                tracing::warn!(error = %e, conference_id, speaker, "Featured speaker lookup failed");
                return;
            }
        };

    let names: Vec<&str> = sessions.iter().map(|s| s.name.as_str()).collect();
    if let Some(text) = format_featured_speaker(speaker, &names) {
        state.tasks.enqueue(Task::SetFeaturedSpeaker { text });
    }
}

/// GET /api/v1/conference/{id}/sessions
pub async fn list_conference_sessions(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    find_conference(&state, id).await?;
    let sessions = SessionRepo::list_for_conference(&state.pool, id).await?;

    Ok(Json(DataResponse { data: sessions }))
}

// ---------------------------------------------------------------------------
// Fixed queries
// ---------------------------------------------------------------------------

/// POST /api/v1/querySessionsKind
pub async fn list_by_type(
    _auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<SessionsByType>,
) -> AppResult<impl IntoResponse> {
    find_conference(&state, input.conference_id).await?;
    let sessions =
        SessionRepo::list_by_type(&state.pool, input.conference_id, &input.type_of_session)
            .await?;

    Ok(Json(DataResponse { data: sessions }))
}

/// POST /api/v1/querySessionsSpeaker
pub async fn list_by_speaker(
    _auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<SessionsBySpeaker>,
) -> AppResult<impl IntoResponse> {
    let sessions = SessionRepo::list_by_speaker(&state.pool, &input.speaker).await?;
    Ok(Json(DataResponse { data: sessions }))
}

/// POST /api/v1/querySessionsDate
pub async fn list_by_date(
    _auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<SessionsByDate>,
) -> AppResult<impl IntoResponse> {
    let date = input.parse()?;
    let sessions = SessionRepo::list_by_date(&state.pool, date).await?;
    Ok(Json(DataResponse { data: sessions }))
}

/// POST /api/v1/querySessionsDuration
pub async fn list_by_duration(
    _auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<SessionsByDuration>,
) -> AppResult<impl IntoResponse> {
    let sessions = SessionRepo::list_by_duration(&state.pool, input.duration).await?;
    Ok(Json(DataResponse { data: sessions }))
}

/// POST /api/v1/querySessionsTypeTime
///
/// Sessions of any other type that start before the given time.
pub async fn list_by_type_and_time(
    _auth: AuthUser,
    State(state): State<AppState>,
    AppJson(input): AppJson<SessionsByTypeTime>,
) -> AppResult<impl IntoResponse> {
    let before = input.parse_start_time()?;
    let sessions =
        SessionRepo::list_excluding_type_before(&state.pool, &input.type_of_session, before)
            .await?;

    Ok(Json(DataResponse { data: sessions }))
}

// ---------------------------------------------------------------------------
// Generic query
// ---------------------------------------------------------------------------

/// POST /api/v1/querySessions
///
/// Same filter rules as `queryConferences`, optionally scoped to one
/// conference.
pub async fn query_sessions(
    State(state): State<AppState>,
    AppJson(input): AppJson<SessionQuery>,
) -> AppResult<impl IntoResponse> {
    let plan = build_plan::<SessionField>(&input.filters).map_err(CoreError::from)?;
    if let Some(id) = input.conference_id {
        find_conference(&state, id).await?;
    }

    let sessions = SessionRepo::query(&state.pool, input.conference_id, &plan).await?;
    Ok(Json(DataResponse { data: sessions }))
}
