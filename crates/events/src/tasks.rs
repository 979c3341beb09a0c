//! In-process deferred work.
//!
//! Request handlers push [`Task`]s onto a [`TaskQueue`] and return
//! immediately. A single [`TaskWorker`] drains the queue in the background,
//! retrying a failed task a bounded number of times before logging and
//! dropping it. Nothing is reported back to the request that enqueued it.

use std::sync::Arc;
use std::time::Duration;

use conference_db::models::conference::Conference;
use conference_db::DbPool;
use tokio::sync::mpsc;

use crate::announcement::refresh_announcement;
use crate::cache::{Cache, CacheKey};
use crate::delivery::email::{EmailError, Mailer, OutgoingEmail};

/// Attempts per task, including the first.
const MAX_ATTEMPTS: u32 = 3;

/// Base delay between attempts; multiplied by the attempt number.
const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

// ---------------------------------------------------------------------------
// Task
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum Task {
    /// Tell an organizer their conference was created.
    SendConfirmationEmail { to: String, conference: Conference },
    /// Store the featured-speaker notice.
    SetFeaturedSpeaker { text: String },
    /// Recompute the nearly-sold-out announcement.
    RefreshAnnouncement,
}

impl Task {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SendConfirmationEmail { .. } => "send_confirmation_email",
            Self::SetFeaturedSpeaker { .. } => "set_featured_speaker",
            Self::RefreshAnnouncement => "refresh_announcement",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error(transparent)]
    Email(#[from] EmailError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

// ---------------------------------------------------------------------------
// TaskQueue
// ---------------------------------------------------------------------------

/// Cloneable handle for enqueueing tasks.
#[derive(Debug, Clone)]
pub struct TaskQueue {
    sender: mpsc::UnboundedSender<Task>,
}

impl TaskQueue {
    /// Create a queue and the receiver to hand to [`TaskWorker::run`].
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Task>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    /// Enqueue a task. Dropped with a warning if the worker has stopped.
    pub fn enqueue(&self, task: Task) {
        let name = task.name();
        if self.sender.send(task).is_err() {
            tracing::warn!(task = name, "Task worker stopped, task dropped");
        } else {
            tracing::debug!(task = name, "Task enqueued");
        }
    }
}

// ---------------------------------------------------------------------------
// TaskWorker
// ---------------------------------------------------------------------------

/// Background consumer of the task queue.
pub struct TaskWorker {
    pool: DbPool,
    cache: Arc<Cache>,
    /// `None` when SMTP is not configured; confirmation e-mails are skipped.
    mailer: Option<Arc<dyn Mailer>>,
    retry_delay: Duration,
}

impl TaskWorker {
    pub fn new(pool: DbPool, cache: Arc<Cache>, mailer: Option<Arc<dyn Mailer>>) -> Self {
        Self {
            pool,
            cache,
            mailer,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Process tasks until every [`TaskQueue`] handle has been dropped.
    pub async fn run(self, mut receiver: mpsc::UnboundedReceiver<Task>) {
        while let Some(task) = receiver.recv().await {
            self.process(task).await;
        }
        tracing::info!("Task queue closed, worker shutting down");
    }

    /// Execute one task with bounded retries.
    async fn process(&self, task: Task) {
        for attempt in 1..=MAX_ATTEMPTS {
            match self.execute(&task).await {
                Ok(()) => return,
                Err(e) if attempt < MAX_ATTEMPTS => {
                    tracing::warn!(task = task.name(), attempt, error = %e, "Task failed, retrying");
                    tokio::time::sleep(self.retry_delay * attempt).await;
                }
                Err(e) => {
                    tracing::error!(
                        task = task.name(),
                        attempts = MAX_ATTEMPTS,
                        error = %e,
                        "Task failed, giving up"
                    );
                }
            }
        }
    }

    /// Execute one task once.
    pub async fn execute(&self, task: &Task) -> Result<(), TaskError> {
        match task {
            Task::SendConfirmationEmail { to, conference } => {
                let Some(mailer) = &self.mailer else {
                    tracing::info!(
                        to = %to,
                        conference_id = conference.id,
                        "SMTP not configured, skipping confirmation email"
                    );
                    return Ok(());
                };
                mailer
                    .send(&OutgoingEmail::conference_created(to.as_str(), conference))
                    .await?;
            }
            Task::SetFeaturedSpeaker { text } => {
                self.cache.set(CacheKey::FeaturedSpeaker, text.as_str()).await;
            }
            Task::RefreshAnnouncement => {
                refresh_announcement(&self.pool, &self.cache).await?;
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
