use axum::routing::{get, post};
use axum::Router;

use crate::handlers::wishlist;
use crate::state::AppState;

/// ```text
/// POST /addWishlist      -> add_to_wishlist
/// POST /removeWishlist   -> remove_from_wishlist
/// GET  /wishlist         -> get_wishlist
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/addWishlist", post(wishlist::add_to_wishlist))
        .route("/removeWishlist", post(wishlist::remove_from_wishlist))
        .route("/wishlist", get(wishlist::get_wishlist))
}
