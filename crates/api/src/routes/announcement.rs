use axum::routing::get;
use axum::Router;

use crate::handlers::announcement;
use crate::state::AppState;

/// ```text
/// GET /conference/announcement/get   -> get_announcement
/// GET /conference/featured_speaker   -> get_featured_speaker
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/conference/announcement/get",
            get(announcement::get_announcement),
        )
        .route(
            "/conference/featured_speaker",
            get(announcement::get_featured_speaker),
        )
}
