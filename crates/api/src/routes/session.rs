//! Route definitions for sessions and the fixed session queries.

use axum::routing::post;
use axum::Router;

use crate::handlers::session;
use crate::state::AppState;

/// ```text
/// POST /session                 -> create_session
/// POST /querySessionsKind       -> list_by_type
/// POST /querySessionsSpeaker    -> list_by_speaker
/// POST /querySessionsDate       -> list_by_date
/// POST /querySessionsDuration   -> list_by_duration
/// POST /querySessionsTypeTime   -> list_by_type_and_time
/// POST /querySessions           -> query_sessions
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/session", post(session::create_session))
        .route("/querySessionsKind", post(session::list_by_type))
        .route("/querySessionsSpeaker", post(session::list_by_speaker))
        .route("/querySessionsDate", post(session::list_by_date))
        .route("/querySessionsDuration", post(session::list_by_duration))
        .route("/querySessionsTypeTime", post(session::list_by_type_and_time))
        .route("/querySessions", post(session::query_sessions))
}
