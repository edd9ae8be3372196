//! In-memory store used by tests.
//!
//! Mirrors the Postgres foreign keys: writes that would leave dangling
//! references are rejected with [`StoreError::Conflict`].

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use shared::models::{Availability, AvailabilityEntry, Candidate, Schedule, User};

use super::{
    AvailabilityStore, CandidateStore, CreatedSchedule, NewSchedule, ScheduleStore, StoreError,
    StoreResult, UserStore,
};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    schedules: HashMap<Uuid, Schedule>,
    candidates: BTreeMap<i32, Candidate>,
    availabilities: BTreeMap<(i32, i64), Availability>,
    next_candidate_id: i32,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn schedule_count(&self) -> usize {
        self.tables.read().await.schedules.len()
    }

    pub async fn candidate_count(&self) -> usize {
        self.tables.read().await.candidates.len()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn upsert_user(&self, user: &User) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        tables.users.insert(user.user_id, user.clone());
        Ok(())
    }

    async fn find_user(&self, user_id: i64) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&user_id).cloned())
    }
}

#[async_trait]
impl ScheduleStore for MemoryStore {
    async fn create_schedule(&self, new: &NewSchedule) -> StoreResult<CreatedSchedule> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&new.created_by) {
            return Err(StoreError::conflict(format!(
                "schedules.created_by references missing user {}",
                new.created_by
            )));
        }

        let schedule = Schedule {
            schedule_id: Uuid::new_v4(),
            schedule_name: new.schedule_name.clone(),
            memo: new.memo.clone(),
            created_by: new.created_by,
            created_at: Utc::now(),
        };

        let mut candidates = Vec::with_capacity(new.candidate_names.len());
        for name in &new.candidate_names {
            tables.next_candidate_id += 1;
            let candidate = Candidate {
                candidate_id: tables.next_candidate_id,
                candidate_name: name.clone(),
                schedule_id: schedule.schedule_id,
            };
            tables
                .candidates
                .insert(candidate.candidate_id, candidate.clone());
            candidates.push(candidate);
        }
        tables
            .schedules
            .insert(schedule.schedule_id, schedule.clone());

        Ok(CreatedSchedule {
            schedule,
            candidates,
        })
    }

    async fn find_schedule(&self, schedule_id: Uuid) -> StoreResult<Option<Schedule>> {
        Ok(self.tables.read().await.schedules.get(&schedule_id).cloned())
    }

    async fn list_schedules_by_owner(&self, user_id: i64) -> StoreResult<Vec<Schedule>> {
        let tables = self.tables.read().await;
        let mut owned: Vec<Schedule> = tables
            .schedules
            .values()
            .filter(|s| s.created_by == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn destroy_schedule(&self, schedule_id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;

        let referenced = tables
            .candidates
            .values()
            .any(|c| c.schedule_id == schedule_id)
            || tables
                .availabilities
                .values()
                .any(|a| a.schedule_id == schedule_id);
        if referenced {
            return Err(StoreError::conflict(format!(
                "schedule {} is still referenced",
                schedule_id
            )));
        }

        Ok(tables.schedules.remove(&schedule_id).is_some())
    }

    async fn delete_schedule_cascade(&self, schedule_id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;

        tables
            .availabilities
            .retain(|_, a| a.schedule_id != schedule_id);
        tables.candidates.retain(|_, c| c.schedule_id != schedule_id);
        Ok(tables.schedules.remove(&schedule_id).is_some())
    }
}

#[async_trait]
impl CandidateStore for MemoryStore {
    async fn find_candidates(&self, schedule_id: Uuid) -> StoreResult<Vec<Candidate>> {
        let tables = self.tables.read().await;
        Ok(tables
            .candidates
            .values()
            .filter(|c| c.schedule_id == schedule_id)
            .cloned()
            .collect())
    }

    async fn destroy_candidate(&self, candidate_id: i32) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;

        if tables
            .availabilities
            .keys()
            .any(|(candidate, _)| *candidate == candidate_id)
        {
            return Err(StoreError::conflict(format!(
                "candidate {} is still referenced",
                candidate_id
            )));
        }

        Ok(tables.candidates.remove(&candidate_id).is_some())
    }
}

#[async_trait]
impl AvailabilityStore for MemoryStore {
    async fn upsert_availability(&self, availability: &Availability) -> StoreResult<()> {
        let mut tables = self.tables.write().await;

        let candidate_matches = tables
            .candidates
            .get(&availability.candidate_id)
            .is_some_and(|c| c.schedule_id == availability.schedule_id);
        if !candidate_matches || !tables.users.contains_key(&availability.user_id) {
            return Err(StoreError::conflict(
                "availability references missing candidate or user",
            ));
        }

        tables.availabilities.insert(
            (availability.candidate_id, availability.user_id),
            availability.clone(),
        );
        Ok(())
    }

    async fn find_availabilities(
        &self,
        schedule_id: Uuid,
    ) -> StoreResult<Vec<AvailabilityEntry>> {
        let tables = self.tables.read().await;

        let mut entries: Vec<AvailabilityEntry> = tables
            .availabilities
            .values()
            .filter(|a| a.schedule_id == schedule_id)
            .filter_map(|a| {
                tables.users.get(&a.user_id).map(|user| AvailabilityEntry {
                    candidate_id: a.candidate_id,
                    user: user.clone(),
                    availability: a.availability,
                })
            })
            .collect();
        entries.sort_by_key(|e| (e.user.user_id, e.candidate_id));
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::AvailabilityKind;

    fn test_user() -> User {
        User {
            user_id: 0,
            username: "testuser".to_string(),
        }
    }

    fn new_schedule(names: &[&str]) -> NewSchedule {
        NewSchedule {
            schedule_name: "テスト予定1".to_string(),
            memo: "テストメモ1\r\nテストメモ2".to_string(),
            created_by: 0,
            candidate_names: names.iter().map(|n| n.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn upsert_user_is_idempotent() {
        let store = MemoryStore::new();
        store.upsert_user(&test_user()).await.expect("first upsert");
        store.upsert_user(&test_user()).await.expect("second upsert");

        let renamed = User {
            user_id: 0,
            username: "renamed".to_string(),
        };
        store.upsert_user(&renamed).await.expect("rename upsert");

        assert_eq!(store.find_user(0).await.expect("find"), Some(renamed));
    }

    #[tokio::test]
    async fn create_keeps_candidate_order() {
        let store = MemoryStore::new();
        store.upsert_user(&test_user()).await.expect("upsert");

        let created = store
            .create_schedule(&new_schedule(&["c", "a", "b"]))
            .await
            .expect("create");
        let found = store
            .find_candidates(created.schedule.schedule_id)
            .await
            .expect("find");

        let names: Vec<_> = found.iter().map(|c| c.candidate_name.as_str()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
        assert_eq!(found, created.candidates);
    }

    #[tokio::test]
    async fn create_for_unknown_owner_persists_nothing() {
        let store = MemoryStore::new();

        let result = store.create_schedule(&new_schedule(&["a", "b"])).await;

        assert!(matches!(result, Err(StoreError::Conflict { .. })));
        assert_eq!(store.schedule_count().await, 0);
        assert_eq!(store.candidate_count().await, 0);
    }

    #[tokio::test]
    async fn destroy_schedule_rejects_remaining_candidates() {
        let store = MemoryStore::new();
        store.upsert_user(&test_user()).await.expect("upsert");
        let created = store
            .create_schedule(&new_schedule(&["a"]))
            .await
            .expect("create");
        let id = created.schedule.schedule_id;

        let result = store.destroy_schedule(id).await;
        assert!(matches!(result, Err(StoreError::Conflict { .. })));

        for candidate in created.candidates {
            assert!(store
                .destroy_candidate(candidate.candidate_id)
                .await
                .expect("destroy candidate"));
        }
        assert!(store.destroy_schedule(id).await.expect("destroy schedule"));
        assert!(!store.destroy_schedule(id).await.expect("repeat destroy"));
        assert_eq!(store.find_schedule(id).await.expect("find"), None);
    }

    #[tokio::test]
    async fn cascade_removes_children_first() {
        let store = MemoryStore::new();
        store.upsert_user(&test_user()).await.expect("upsert");
        let created = store
            .create_schedule(&new_schedule(&["a", "b"]))
            .await
            .expect("create");
        let id = created.schedule.schedule_id;
        store
            .upsert_availability(&Availability {
                candidate_id: created.candidates[0].candidate_id,
                user_id: 0,
                availability: AvailabilityKind::Available,
                schedule_id: id,
            })
            .await
            .expect("availability");

        assert!(store.delete_schedule_cascade(id).await.expect("cascade"));
        assert!(store.find_candidates(id).await.expect("find").is_empty());
        assert!(store.find_availabilities(id).await.expect("find").is_empty());
        assert!(!store.delete_schedule_cascade(id).await.expect("repeat"));
    }

    #[tokio::test]
    async fn availability_upsert_overwrites_previous_answer() {
        let store = MemoryStore::new();
        store.upsert_user(&test_user()).await.expect("upsert");
        let created = store
            .create_schedule(&new_schedule(&["a"]))
            .await
            .expect("create");
        let mut answer = Availability {
            candidate_id: created.candidates[0].candidate_id,
            user_id: 0,
            availability: AvailabilityKind::Undecided,
            schedule_id: created.schedule.schedule_id,
        };
        store.upsert_availability(&answer).await.expect("first");
        answer.availability = AvailabilityKind::Available;
        store.upsert_availability(&answer).await.expect("second");

        let entries = store
            .find_availabilities(created.schedule.schedule_id)
            .await
            .expect("find");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].availability, AvailabilityKind::Available);
        assert_eq!(entries[0].user, test_user());
    }
}
