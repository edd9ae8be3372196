//! Store tests against a real Postgres.
//!
//! Skipped unless `DATABASE_URL` is set. The schema is created from the
//! migration on first use.

use diesel_async::SimpleAsyncConnection;
use tokio::sync::OnceCell;
use uuid::Uuid;

use backend::db::establish_connection_pool;
use backend::store::{
    AvailabilityStore, CandidateStore, NewSchedule, PgStore, ScheduleStore, StoreError, UserStore,
};
use shared::models::{Availability, AvailabilityKind, User};

const SCHEMA_SQL: &str =
    include_str!("../migrations/2024-01-01-000000_create_schedule_tables/up.sql");

static SCHEMA: OnceCell<()> = OnceCell::const_new();

async fn store() -> Option<PgStore> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping");
        return None;
    };
    let pool = establish_connection_pool(&url).expect("pool");
    SCHEMA
        .get_or_init(|| async {
            let mut conn = pool.get().await.expect("connection");
            conn.batch_execute(SCHEMA_SQL).await.expect("create schema");
        })
        .await;
    Some(PgStore::new(pool))
}

fn random_user_id() -> i64 {
    (Uuid::new_v4().as_u128() as i64) & i64::MAX
}

/// Owner row with an id no other run will pick.
async fn fresh_owner(store: &PgStore) -> User {
    let user = User {
        user_id: random_user_id(),
        username: "pg-test".to_string(),
    };
    store.upsert_user(&user).await.expect("upsert owner");
    user
}

fn new_schedule(owner: i64, candidate_names: Vec<String>) -> NewSchedule {
    NewSchedule {
        schedule_name: "pg schedule".to_string(),
        memo: "line 1\r\nline 2".to_string(),
        created_by: owner,
        candidate_names,
    }
}

#[tokio::test]
async fn failed_candidate_insert_rolls_back_schedule() {
    let Some(store) = store().await else { return };
    let owner = fresh_owner(&store).await;

    // The second label overflows VARCHAR(255) after the schedule row is written.
    let result = store
        .create_schedule(&new_schedule(
            owner.user_id,
            vec!["fits".to_string(), "x".repeat(300)],
        ))
        .await;

    assert!(matches!(result, Err(StoreError::Query { .. })));
    assert!(store
        .list_schedules_by_owner(owner.user_id)
        .await
        .expect("list")
        .is_empty());
}

#[tokio::test]
async fn unknown_owner_is_a_conflict() {
    let Some(store) = store().await else { return };
    let missing = random_user_id();

    let result = store
        .create_schedule(&new_schedule(missing, vec!["a".to_string()]))
        .await;

    assert!(matches!(result, Err(StoreError::Conflict { .. })));
    assert!(store
        .list_schedules_by_owner(missing)
        .await
        .expect("list")
        .is_empty());
}

#[tokio::test]
async fn created_schedule_reads_back_in_order() {
    let Some(store) = store().await else { return };
    let owner = fresh_owner(&store).await;

    let created = store
        .create_schedule(&new_schedule(
            owner.user_id,
            vec!["first".to_string(), "second".to_string(), "third".to_string()],
        ))
        .await
        .expect("create");
    let id = created.schedule.schedule_id;

    let schedule = store.find_schedule(id).await.expect("find").expect("exists");
    assert_eq!(schedule.memo, "line 1\r\nline 2");
    let names: Vec<String> = store
        .find_candidates(id)
        .await
        .expect("candidates")
        .into_iter()
        .map(|c| c.candidate_name)
        .collect();
    assert_eq!(names, vec!["first", "second", "third"]);

    assert!(store.delete_schedule_cascade(id).await.expect("cleanup"));
}

#[tokio::test]
async fn destroy_respects_references_and_cascade_removes_all() {
    let Some(store) = store().await else { return };
    let owner = fresh_owner(&store).await;
    let created = store
        .create_schedule(&new_schedule(
            owner.user_id,
            vec!["a".to_string(), "b".to_string()],
        ))
        .await
        .expect("create");
    let id = created.schedule.schedule_id;
    let candidate_id = created.candidates[0].candidate_id;

    store
        .upsert_availability(&Availability {
            candidate_id,
            user_id: owner.user_id,
            availability: AvailabilityKind::Available,
            schedule_id: id,
        })
        .await
        .expect("answer");

    assert!(matches!(
        store.destroy_schedule(id).await,
        Err(StoreError::Conflict { .. })
    ));
    assert!(matches!(
        store.destroy_candidate(candidate_id).await,
        Err(StoreError::Conflict { .. })
    ));

    assert!(store.delete_schedule_cascade(id).await.expect("cascade"));
    assert_eq!(store.find_schedule(id).await.expect("find"), None);
    assert!(store.find_candidates(id).await.expect("candidates").is_empty());
    assert!(store
        .find_availabilities(id)
        .await
        .expect("availabilities")
        .is_empty());
    assert!(!store.delete_schedule_cascade(id).await.expect("repeat"));
    assert!(!store.destroy_schedule(id).await.expect("repeat destroy"));
}
