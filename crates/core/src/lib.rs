//! Domain rules for the conference service: filter planning, registration
//! and wishlist decisions, creation defaults, and notice text.
//!
//! No I/O lives here; the db and api crates build on these types.

pub mod announcement;
pub mod conference;
pub mod datetime;
pub mod error;
pub mod filter;
pub mod profile;
pub mod registration;
pub mod types;
