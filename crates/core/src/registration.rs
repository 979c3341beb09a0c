//! Conference registration and session wishlist rules.
//!
//! The repository layer reads the current state inside a transaction, asks
//! these functions what to do, and persists the result.

use serde::Serialize;

use crate::error::CoreError;

pub const ALREADY_REGISTERED: &str = "You have already registered for this conference";
pub const NO_SEATS_AVAILABLE: &str = "There are no seats available.";

/// Registration precondition: not yet registered and at least one seat left.
pub fn check_can_register(already_registered: bool, seats_available: i32) -> Result<(), CoreError> {
    if already_registered {
        return Err(CoreError::Conflict(ALREADY_REGISTERED.into()));
    }
    if seats_available <= 0 {
        return Err(CoreError::Conflict(NO_SEATS_AVAILABLE.into()));
    }
    Ok(())
}

/// Seat counter after a successful registration.
pub fn seats_after_register(seats_available: i32) -> i32 {
    seats_available - 1
}

/// Seat counter after an unregistration. Not clamped to the capacity.
pub fn seats_after_unregister(seats_available: i32) -> i32 {
    seats_available + 1
}

// ---------------------------------------------------------------------------
// Wishlist
// ---------------------------------------------------------------------------

/// Result of a wishlist toggle. None of these are errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WishlistOutcome {
    Added,
    AlreadyPresent,
    Removed,
    NotInWishlist,
}

impl WishlistOutcome {
    /// Outcome of an add, given whether a new entry was stored.
    pub fn of_add(inserted: bool) -> Self {
        if inserted {
            Self::Added
        } else {
            Self::AlreadyPresent
        }
    }

    /// Outcome of a remove, given whether an entry was deleted.
    pub fn of_remove(deleted: bool) -> Self {
        if deleted {
            Self::Removed
        } else {
            Self::NotInWishlist
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Added => "Session added to wishlist.",
            Self::AlreadyPresent => "Session already in wishlist.",
            Self::Removed => "Session removed from wishlist.",
            Self::NotInWishlist => "Session not found in wishlist.",
        }
    }

    /// Whether the wishlist changed.
    pub fn changed(self) -> bool {
        matches!(self, Self::Added | Self::Removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn open_seat_allows_registration() {
        assert!(check_can_register(false, 3).is_ok());
        assert_eq!(seats_after_register(3), 2);
    }

    #[test]
    fn full_conference_is_conflict() {
        assert_matches!(
            check_can_register(false, 0),
            Err(CoreError::Conflict(msg)) if msg == NO_SEATS_AVAILABLE
        );
        assert_matches!(check_can_register(false, -1), Err(CoreError::Conflict(_)));
    }

    #[test]
    fn duplicate_registration_wins_over_capacity() {
        assert_matches!(
            check_can_register(true, 0),
            Err(CoreError::Conflict(msg)) if msg == ALREADY_REGISTERED
        );
    }

    #[test]
    fn unregister_is_not_clamped() {
        assert_eq!(seats_after_unregister(5), 6);
    }

    #[test]
    fn wishlist_outcomes_report_messages() {
        assert_eq!(WishlistOutcome::of_add(true).message(), "Session added to wishlist.");
        assert_eq!(
            WishlistOutcome::of_add(false).message(),
            "Session already in wishlist."
        );
        assert_eq!(
            WishlistOutcome::of_remove(true).message(),
            "Session removed from wishlist."
        );
        assert_eq!(
            WishlistOutcome::of_remove(false).message(),
            "Session not found in wishlist."
        );
        assert!(!WishlistOutcome::of_add(false).changed());
        assert!(WishlistOutcome::of_remove(true).changed());
    }
}
