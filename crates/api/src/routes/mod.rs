pub mod announcement;
pub mod conference;
pub mod health;
pub mod profile;
pub mod session;
pub mod wishlist;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /conference                                      create (POST)
/// /conference/{id}                                 get, register (POST), unregister (DELETE)
/// /conference/{id}/sessions                        sessions of one conference
/// /conference/announcement/get                     cached announcement
/// /conference/featured_speaker                     cached featured speaker
/// /conferences/attending                           caller's registrations
/// /queryConferences                                filtered conference query (POST)
/// /getConferencesCreated                           caller's conferences (POST)
///
/// /session                                         create (POST)
/// /querySessionsKind                               by conference and type (POST)
/// /querySessionsSpeaker                            by speaker (POST)
/// /querySessionsDate                               by date (POST)
/// /querySessionsDuration                           by duration (POST)
/// /querySessionsTypeTime                           other types before a time (POST)
/// /querySessions                                   filtered session query (POST)
///
/// /addWishlist                                     add session (POST)
/// /removeWishlist                                  remove session (POST)
/// /wishlist                                        caller's wishlist
///
/// /profile                                         get, save (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(conference::router())
        .merge(announcement::router())
        .merge(session::router())
        .merge(wishlist::router())
        .merge(profile::router())
}
