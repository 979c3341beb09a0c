pub mod announcement;
pub mod conference;
pub mod profile;
pub mod session;
pub mod wishlist;

use conference_db::models::profile::Profile;
use conference_db::repositories::ProfileRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Load the caller's profile, creating it on first access.
pub(crate) async fn ensure_profile(state: &AppState, auth: &AuthUser) -> AppResult<Profile> {
    let profile = ProfileRepo::find_or_create(&state.pool, &auth.new_profile()).await?;
    Ok(profile)
}
