// Database models for Diesel
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use shared::models::{Availability, AvailabilityKind, Candidate, Schedule, User};

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    pub user_id: i64,
    pub username: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            user_id: row.user_id,
            username: row.username,
        }
    }
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        UserRow {
            user_id: user.user_id,
            username: user.username.clone(),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::schema::schedules)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ScheduleRow {
    pub schedule_id: Uuid,
    pub schedule_name: String,
    pub memo: String,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
}

impl From<ScheduleRow> for Schedule {
    fn from(row: ScheduleRow) -> Self {
        Schedule {
            schedule_id: row.schedule_id,
            schedule_name: row.schedule_name,
            memo: row.memo,
            created_by: row.created_by,
            created_at: row.created_at,
        }
    }
}

/// Insertable struct for new schedules
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::schedules)]
pub struct NewScheduleRow<'a> {
    pub schedule_id: Uuid,
    pub schedule_name: &'a str,
    pub memo: &'a str,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = crate::schema::candidates)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CandidateRow {
    pub candidate_id: i32,
    pub candidate_name: String,
    pub schedule_id: Uuid,
}

impl From<CandidateRow> for Candidate {
    fn from(row: CandidateRow) -> Self {
        Candidate {
            candidate_id: row.candidate_id,
            candidate_name: row.candidate_name,
            schedule_id: row.schedule_id,
        }
    }
}

/// Insertable struct for new candidates
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::candidates)]
pub struct NewCandidateRow<'a> {
    pub candidate_name: &'a str,
    pub schedule_id: Uuid,
}

/// Database representation of availabilities.
/// The answer is stored as INT4, see `AvailabilityKind::as_i32`.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::availabilities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AvailabilityRow {
    pub candidate_id: i32,
    pub user_id: i64,
    pub availability: i32,
    pub schedule_id: Uuid,
}

impl From<&Availability> for AvailabilityRow {
    fn from(value: &Availability) -> Self {
        AvailabilityRow {
            candidate_id: value.candidate_id,
            user_id: value.user_id,
            availability: value.availability.as_i32(),
            schedule_id: value.schedule_id,
        }
    }
}

impl AvailabilityRow {
    /// Unknown column values read as the default answer.
    pub fn kind(&self) -> AvailabilityKind {
        AvailabilityKind::from_i32(self.availability).unwrap_or_default()
    }
}
