//! Integration tests for the announcement refresh against a real database.

use std::sync::Arc;

use conference_db::models::conference::CreateConference;
use conference_db::models::profile::CreateProfile;
use conference_db::repositories::{ConferenceRepo, ProfileRepo};
use conference_events::{refresh_announcement, Cache, CacheKey, Task, TaskWorker};
use sqlx::PgPool;

async fn seed(pool: &PgPool, conferences: &[(&str, i32)]) {
    ProfileRepo::find_or_create(
        pool,
        &CreateProfile {
            user_id: "org".into(),
            display_name: "Org".into(),
            main_email: "org@example.com".into(),
        },
    )
    .await
    .unwrap();

    for (name, max) in conferences {
        let input = CreateConference {
            name: Some(name.to_string()),
            max_attendees: Some(*max),
            ..Default::default()
        }
        .validate()
        .unwrap();
        ConferenceRepo::create(pool, "org", &input).await.unwrap();
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_announcement_lists_nearly_sold_out(pool: PgPool) {
    seed(&pool, &[("Huge", 1000), ("Cozy", 4), ("Intimate", 2)]).await;
    let cache = Cache::new();

    let text = refresh_announcement(&pool, &cache).await.unwrap();

    let expected =
        "Last chance to attend! The following conferences are nearly sold out: Cozy, Intimate";
    assert_eq!(text.as_deref(), Some(expected));
    assert_eq!(cache.get_or_empty(CacheKey::Announcement).await, expected);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_announcement_removed_when_nothing_qualifies(pool: PgPool) {
    seed(&pool, &[("Huge", 1000), ("Unlimited", 0)]).await;
    let cache = Cache::new();
    cache.set(CacheKey::Announcement, "stale").await;

    let text = refresh_announcement(&pool, &cache).await.unwrap();

    assert_eq!(text, None);
    assert_eq!(cache.get(CacheKey::Announcement).await, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_worker_runs_refresh_task(pool: PgPool) {
    seed(&pool, &[("Cozy", 3)]).await;
    let cache = Arc::new(Cache::new());
    let worker = TaskWorker::new(pool.clone(), cache.clone(), None);

    worker.execute(&Task::RefreshAnnouncement).await.unwrap();

    assert!(cache
        .get_or_empty(CacheKey::Announcement)
        .await
        .ends_with("nearly sold out: Cozy"));
}
