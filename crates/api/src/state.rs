use std::sync::Arc;

use conference_events::{Cache, TaskQueue};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: conference_db::DbPool,
    /// Server configuration (JWT validation settings live here).
    pub config: Arc<ServerConfig>,
    /// Announcement and featured-speaker text.
    pub cache: Arc<Cache>,
    /// Deferred work: confirmation emails and cache refreshes.
    pub tasks: TaskQueue,
}
