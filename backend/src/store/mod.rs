//! Persistence ports for users, schedules, candidates and availabilities.
//!
//! Handlers only see these traits through [`Store`]; the Postgres adapter is
//! used in production and the in-memory adapter backs tests.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use shared::models::{Availability, AvailabilityEntry, Candidate, Schedule, User};

#[cfg(any(test, feature = "test-support"))]
pub mod memory;
pub mod postgres;

#[cfg(any(test, feature = "test-support"))]
pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Errors raised by store adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Connection could not be acquired from the pool.
    #[error("store connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("store query failed: {message}")]
    Query { message: String },
    /// Write rejected because it would break referential integrity.
    #[error("store conflict: {message}")]
    Conflict { message: String },
}

impl StoreError {
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Input for creating a schedule together with its candidates
#[derive(Debug, Clone)]
pub struct NewSchedule {
    pub schedule_name: String,
    pub memo: String,
    pub created_by: i64,
    pub candidate_names: Vec<String>,
}

/// A freshly persisted schedule and its candidates in submission order
#[derive(Debug, Clone)]
pub struct CreatedSchedule {
    pub schedule: Schedule,
    pub candidates: Vec<Candidate>,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert or update a user keyed by `user_id`.
    async fn upsert_user(&self, user: &User) -> StoreResult<()>;

    async fn find_user(&self, user_id: i64) -> StoreResult<Option<User>>;
}

#[async_trait]
pub trait ScheduleStore: Send + Sync {
    /// Persist a schedule and all of its candidates atomically.
    async fn create_schedule(&self, new: &NewSchedule) -> StoreResult<CreatedSchedule>;

    async fn find_schedule(&self, schedule_id: Uuid) -> StoreResult<Option<Schedule>>;

    /// Schedules owned by a user, newest first.
    async fn list_schedules_by_owner(&self, user_id: i64) -> StoreResult<Vec<Schedule>>;

    /// Delete a single schedule row.
    ///
    /// Returns `Ok(false)` when no such schedule exists and
    /// [`StoreError::Conflict`] while candidates still reference it.
    async fn destroy_schedule(&self, schedule_id: Uuid) -> StoreResult<bool>;

    /// Delete availabilities, candidates and finally the schedule in one
    /// transaction.
    async fn delete_schedule_cascade(&self, schedule_id: Uuid) -> StoreResult<bool>;
}

#[async_trait]
pub trait CandidateStore: Send + Sync {
    /// Candidates of a schedule in insertion order.
    async fn find_candidates(&self, schedule_id: Uuid) -> StoreResult<Vec<Candidate>>;

    /// Delete a single candidate row, `Ok(false)` if it is already gone.
    async fn destroy_candidate(&self, candidate_id: i32) -> StoreResult<bool>;
}

#[async_trait]
pub trait AvailabilityStore: Send + Sync {
    /// Insert or update the answer keyed by `(candidate_id, user_id)`.
    async fn upsert_availability(&self, availability: &Availability) -> StoreResult<()>;

    /// All answers of a schedule joined with the answering user.
    async fn find_availabilities(&self, schedule_id: Uuid)
        -> StoreResult<Vec<AvailabilityEntry>>;
}

/// Everything the HTTP layer needs from persistence.
pub trait Store: UserStore + ScheduleStore + CandidateStore + AvailabilityStore {}

impl<T> Store for T where T: UserStore + ScheduleStore + CandidateStore + AvailabilityStore {}
