//! Route definitions for conferences and registration.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{conference, session};
use crate::state::AppState;

/// ```text
/// POST   /conference                 -> create_conference
/// GET    /conference/{id}            -> get_conference
/// POST   /conference/{id}            -> register
/// DELETE /conference/{id}            -> unregister
/// GET    /conference/{id}/sessions   -> list_conference_sessions
/// GET    /conferences/attending      -> list_attending
/// POST   /queryConferences           -> query_conferences
/// POST   /getConferencesCreated      -> list_created
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/conference", post(conference::create_conference))
        .route(
            "/conference/{id}",
            get(conference::get_conference)
                .post(conference::register)
                .delete(conference::unregister),
        )
        .route(
            "/conference/{id}/sessions",
            get(session::list_conference_sessions),
        )
        .route("/conferences/attending", get(conference::list_attending))
        .route("/queryConferences", post(conference::query_conferences))
        .route("/getConferencesCreated", post(conference::list_created))
}
