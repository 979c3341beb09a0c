//! Row types and request DTOs, one module per table group.

pub mod conference;
pub mod profile;
pub mod session;
