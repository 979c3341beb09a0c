//! Background machinery for the conference service.
//!
//! - [`Cache`]: named entries for the announcement and featured-speaker text.
//! - [`TaskQueue`] / [`TaskWorker`]: in-process deferred work with bounded
//!   retries (confirmation e-mails, cache refreshes).
//! - [`delivery`]: SMTP e-mail delivery behind the [`Mailer`] trait.
//! - [`AnnouncementScheduler`]: periodic announcement refresh.

pub mod announcement;
pub mod cache;
pub mod delivery;
pub mod tasks;

pub use announcement::{refresh_announcement, AnnouncementScheduler};
pub use cache::{Cache, CacheKey};
pub use delivery::email::{EmailConfig, EmailDelivery, EmailError, Mailer, OutgoingEmail};
pub use tasks::{Task, TaskError, TaskQueue, TaskWorker};
