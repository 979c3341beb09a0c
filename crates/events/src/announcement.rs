//! Nearly-sold-out announcement refresh.
//!
//! [`refresh_announcement`] recomputes the cached text from current seat
//! counts. [`AnnouncementScheduler`] enqueues that refresh on a fixed
//! interval until cancelled.

use std::time::Duration;

use conference_core::announcement::format_announcement;
use conference_db::repositories::ConferenceRepo;
use conference_db::DbPool;
use tokio_util::sync::CancellationToken;

use crate::cache::{Cache, CacheKey};
use crate::tasks::{Task, TaskQueue};

/// Write the announcement for conferences with a few seats left, or remove
/// it when there are none.
///
/// Returns the text now cached, if any.
pub async fn refresh_announcement(pool: &DbPool, cache: &Cache) -> Result<Option<String>, sqlx::Error> {
    let names = ConferenceRepo::nearly_sold_out_names(pool).await?;

    match format_announcement(&names) {
        Some(text) => {
            cache.set(CacheKey::Announcement, text.clone()).await;
            tracing::info!(conferences = names.len(), "Announcement refreshed");
            Ok(Some(text))
        }
        None => {
            cache.delete(CacheKey::Announcement).await;
            Ok(None)
        }
    }
}

// ---------------------------------------------------------------------------
// AnnouncementScheduler
// ---------------------------------------------------------------------------

/// Background service that periodically refreshes the announcement.
pub struct AnnouncementScheduler {
    queue: TaskQueue,
    interval: Duration,
}

impl AnnouncementScheduler {
    pub fn new(queue: TaskQueue, interval: Duration) -> Self {
        Self { queue, interval }
    }

    /// Run the scheduler loop.
    ///
    /// The first refresh is enqueued immediately. The loop exits when the
    /// provided [`CancellationToken`] is cancelled.
    pub async fn run(self, cancel: CancellationToken) {
        let mut interval = tokio::time::interval(self.interval);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Announcement scheduler cancelled");
                    break;
                }
                _ = interval.tick() => {
                    self.queue.enqueue(Task::RefreshAnnouncement);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn scheduler_enqueues_immediately_and_stops_on_cancel() {
        let (queue, mut receiver) = TaskQueue::new();
        let cancel = CancellationToken::new();
        let scheduler = AnnouncementScheduler::new(queue, Duration::from_secs(3600));

        let handle = tokio::spawn(scheduler.run(cancel.clone()));

        let first = receiver.recv().await;
        assert_matches!(first, Some(Task::RefreshAnnouncement));

        cancel.cancel();
        handle.await.unwrap();

        // The scheduler owned the only queue handle.
        assert!(receiver.recv().await.is_none());
    }
}
