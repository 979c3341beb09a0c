//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod conference_repo;
pub mod profile_repo;
pub mod session_repo;
pub mod wishlist_repo;

pub use conference_repo::ConferenceRepo;
pub use profile_repo::ProfileRepo;
pub use session_repo::SessionRepo;
pub use wishlist_repo::WishlistRepo;

use conference_core::error::CoreError;

/// Failure of a guarded read-modify-write: either the domain rules refused
/// the change or the database failed.
#[derive(Debug, thiserror::Error)]
pub enum MutationError {
    #[error(transparent)]
    Rejected(#[from] CoreError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}
