//! Integration tests for conference registration and wishlists.

use assert_matches::assert_matches;
use conference_core::error::CoreError;
use conference_core::registration::{WishlistOutcome, ALREADY_REGISTERED, NO_SEATS_AVAILABLE};
use conference_db::models::conference::{Conference, CreateConference};
use conference_db::models::profile::CreateProfile;
use conference_db::models::session::CreateSession;
use conference_db::repositories::{
    ConferenceRepo, MutationError, ProfileRepo, SessionRepo, WishlistRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn profile(pool: &PgPool, user_id: &str) {
    ProfileRepo::find_or_create(
        pool,
        &CreateProfile {
            user_id: user_id.to_string(),
            display_name: user_id.to_string(),
            main_email: format!("{user_id}@example.com"),
        },
    )
    .await
    .unwrap();
}

async fn conference(pool: &PgPool, organizer: &str, max_attendees: i32) -> Conference {
    let input = CreateConference {
        name: Some("RustConf".into()),
        max_attendees: Some(max_attendees),
        ..Default::default()
    }
    .validate()
    .unwrap();
    ConferenceRepo::create(pool, organizer, &input).await.unwrap()
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_created_conference_has_all_seats(pool: PgPool) {
    profile(&pool, "org").await;

    let conf = conference(&pool, "org", 40).await;

    assert_eq!(conf.seats_available, 40);
    assert_eq!(conf.max_attendees, 40);
    assert_eq!(conf.city, "Default City");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_last_seat_goes_to_first_caller(pool: PgPool) {
    profile(&pool, "org").await;
    profile(&pool, "alice").await;
    profile(&pool, "bob").await;
    let conf = conference(&pool, "org", 1).await;

    let after = ConferenceRepo::register(&pool, "alice", conf.id).await.unwrap();
    assert_eq!(after.seats_available, 0);

    let result = ConferenceRepo::register(&pool, "bob", conf.id).await;
    assert_matches!(
        result,
        Err(MutationError::Rejected(CoreError::Conflict(msg))) if msg == NO_SEATS_AVAILABLE
    );
    assert!(ProfileRepo::attending_ids(&pool, "bob").await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_double_registration_decrements_once(pool: PgPool) {
    profile(&pool, "org").await;
    profile(&pool, "alice").await;
    let conf = conference(&pool, "org", 10).await;

    ConferenceRepo::register(&pool, "alice", conf.id).await.unwrap();
    let second = ConferenceRepo::register(&pool, "alice", conf.id).await;

    assert_matches!(
        second,
        Err(MutationError::Rejected(CoreError::Conflict(msg))) if msg == ALREADY_REGISTERED
    );
    let reloaded = ConferenceRepo::find_by_id(&pool, conf.id).await.unwrap().unwrap();
    assert_eq!(reloaded.seats_available, 9);
    assert_eq!(
        ProfileRepo::attending_ids(&pool, "alice").await.unwrap(),
        vec![conf.id]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_register_unknown_conference_is_not_found(pool: PgPool) {
    profile(&pool, "alice").await;

    let result = ConferenceRepo::register(&pool, "alice", 9999).await;

    assert_matches!(result, Err(MutationError::Rejected(CoreError::NotFound { .. })));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unregister_when_absent_is_noop(pool: PgPool) {
    profile(&pool, "org").await;
    profile(&pool, "alice").await;
    let conf = conference(&pool, "org", 3).await;

    let removed = ConferenceRepo::unregister(&pool, "alice", conf.id).await.unwrap();

    assert!(!removed);
    let reloaded = ConferenceRepo::find_by_id(&pool, conf.id).await.unwrap().unwrap();
    assert_eq!(reloaded.seats_available, 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unregister_returns_the_seat(pool: PgPool) {
    profile(&pool, "org").await;
    profile(&pool, "alice").await;
    let conf = conference(&pool, "org", 3).await;
    ConferenceRepo::register(&pool, "alice", conf.id).await.unwrap();

    let removed = ConferenceRepo::unregister(&pool, "alice", conf.id).await.unwrap();

    assert!(removed);
    let reloaded = ConferenceRepo::find_by_id(&pool, conf.id).await.unwrap().unwrap();
    assert_eq!(reloaded.seats_available, 3);
    assert!(ConferenceRepo::list_attending(&pool, "alice").await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_registrations_never_overbook(pool: PgPool) {
    profile(&pool, "org").await;
    let conf = conference(&pool, "org", 2).await;
    for i in 0..6 {
        profile(&pool, &format!("user{i}")).await;
    }

    let handles: Vec<_> = (0..6)
        .map(|i| {
            let pool = pool.clone();
            tokio::spawn(async move {
                ConferenceRepo::register(&pool, &format!("user{i}"), conf.id).await
            })
        })
        .collect();

    let mut successes = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            successes += 1;
        }
    }

    assert_eq!(successes, 2);
    let reloaded = ConferenceRepo::find_by_id(&pool, conf.id).await.unwrap().unwrap();
    assert_eq!(reloaded.seats_available, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_nearly_sold_out_names(pool: PgPool) {
    profile(&pool, "org").await;
    for (name, max) in [("Big", 100), ("Small", 5), ("Empty", 0), ("Tiny", 1)] {
        let input = CreateConference {
            name: Some(name.into()),
            max_attendees: Some(max),
            ..Default::default()
        }
        .validate()
        .unwrap();
        ConferenceRepo::create(&pool, "org", &input).await.unwrap();
    }

    let names = ConferenceRepo::nearly_sold_out_names(&pool).await.unwrap();

    assert_eq!(names, vec!["Small".to_string(), "Tiny".to_string()]);
}

// ---------------------------------------------------------------------------
// Wishlist
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_wishlist_toggles(pool: PgPool) {
    profile(&pool, "org").await;
    profile(&pool, "alice").await;
    let conf = conference(&pool, "org", 10).await;
    let session = SessionRepo::create(
        &pool,
        &CreateSession {
            conference_id: conf.id,
            name: Some("Keynote".into()),
            ..Default::default()
        }
        .validate()
        .unwrap(),
    )
    .await
    .unwrap();

    assert_eq!(
        WishlistRepo::add(&pool, "alice", session.id).await.unwrap(),
        WishlistOutcome::Added
    );
    assert_eq!(
        WishlistRepo::add(&pool, "alice", session.id).await.unwrap(),
        WishlistOutcome::AlreadyPresent
    );

    let listed = WishlistRepo::list_sessions(&pool, "alice").await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "Keynote");

    assert_eq!(
        WishlistRepo::remove(&pool, "alice", session.id).await.unwrap(),
        WishlistOutcome::Removed
    );
    assert_eq!(
        WishlistRepo::remove(&pool, "alice", session.id).await.unwrap(),
        WishlistOutcome::NotInWishlist
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_wishlist_unknown_session_is_not_found(pool: PgPool) {
    profile(&pool, "alice").await;

    let result = WishlistRepo::add(&pool, "alice", 424242).await;

    assert_matches!(result, Err(MutationError::Rejected(CoreError::NotFound { .. })));
}
