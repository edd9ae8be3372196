//! Diesel-async implementation of the store ports.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::{
    pooled_connection::deadpool::Object, scoped_futures::ScopedFutureExt, AsyncConnection,
    AsyncPgConnection, RunQueryDsl,
};
use tracing::{debug, error};
use uuid::Uuid;

use shared::models::{Availability, AvailabilityEntry, Candidate, Schedule, User};

use super::{
    AvailabilityStore, CandidateStore, CreatedSchedule, NewSchedule, ScheduleStore, StoreError,
    StoreResult, UserStore,
};
use crate::db::DbPool;
use crate::models::{
    AvailabilityRow, CandidateRow, NewCandidateRow, NewScheduleRow, ScheduleRow, UserRow,
};
use crate::schema::{availabilities, candidates, schedules, users};

/// Postgres-backed store sharing a deadpool of async connections
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn conn(&self) -> StoreResult<Object<AsyncPgConnection>> {
        self.pool.get().await.map_err(|e| {
            error!("Connection pool error: {:?}", e);
            StoreError::connection(e.to_string())
        })
    }
}

fn map_diesel_error(err: DieselError) -> StoreError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            StoreError::conflict(info.message().to_string())
        }
        other => {
            error!("Database error: {:?}", other);
            StoreError::query(other.to_string())
        }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn upsert_user(&self, user: &User) -> StoreResult<()> {
        let mut conn = self.conn().await?;
        let row = UserRow::from(user);

        diesel::insert_into(users::table)
            .values(&row)
            .on_conflict(users::user_id)
            .do_update()
            .set(users::username.eq(&row.username))
            .execute(&mut *conn)
            .await
            .map_err(map_diesel_error)?;

        debug!("Upserted user {}", user.user_id);
        Ok(())
    }

    async fn find_user(&self, user_id: i64) -> StoreResult<Option<User>> {
        let mut conn = self.conn().await?;

        let row = users::table
            .filter(users::user_id.eq(user_id))
            .select(UserRow::as_select())
            .first(&mut *conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(Into::into))
    }
}

#[async_trait]
impl ScheduleStore for PgStore {
    async fn create_schedule(&self, new: &NewSchedule) -> StoreResult<CreatedSchedule> {
        let mut conn = self.conn().await?;

        let (schedule, inserted) = conn
            .transaction::<_, DieselError, _>(|conn| {
                async move {
                    let schedule = diesel::insert_into(schedules::table)
                        .values(NewScheduleRow {
                            schedule_id: Uuid::new_v4(),
                            schedule_name: &new.schedule_name,
                            memo: &new.memo,
                            created_by: new.created_by,
                            created_at: Utc::now(),
                        })
                        .returning(ScheduleRow::as_returning())
                        .get_result(conn)
                        .await?;

                    let rows: Vec<NewCandidateRow<'_>> = new
                        .candidate_names
                        .iter()
                        .map(|name| NewCandidateRow {
                            candidate_name: name,
                            schedule_id: schedule.schedule_id,
                        })
                        .collect();

                    let inserted = if rows.is_empty() {
                        Vec::new()
                    } else {
                        diesel::insert_into(candidates::table)
                            .values(&rows)
                            .returning(CandidateRow::as_returning())
                            .get_results(conn)
                            .await?
                    };

                    Ok((schedule, inserted))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        let mut candidates: Vec<Candidate> = inserted.into_iter().map(Into::into).collect();
        candidates.sort_by_key(|c| c.candidate_id);

        Ok(CreatedSchedule {
            schedule: schedule.into(),
            candidates,
        })
    }

    async fn find_schedule(&self, schedule_id: Uuid) -> StoreResult<Option<Schedule>> {
        let mut conn = self.conn().await?;

        let row = schedules::table
            .filter(schedules::schedule_id.eq(schedule_id))
            .select(ScheduleRow::as_select())
            .first(&mut *conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(Into::into))
    }

    async fn list_schedules_by_owner(&self, user_id: i64) -> StoreResult<Vec<Schedule>> {
        let mut conn = self.conn().await?;

        let rows = schedules::table
            .filter(schedules::created_by.eq(user_id))
            .order_by(schedules::created_at.desc())
            .select(ScheduleRow::as_select())
            .load(&mut *conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn destroy_schedule(&self, schedule_id: Uuid) -> StoreResult<bool> {
        let mut conn = self.conn().await?;

        let deleted =
            diesel::delete(schedules::table.filter(schedules::schedule_id.eq(schedule_id)))
                .execute(&mut *conn)
                .await
                .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }

    async fn delete_schedule_cascade(&self, schedule_id: Uuid) -> StoreResult<bool> {
        let mut conn = self.conn().await?;

        let deleted = conn
            .transaction::<_, DieselError, _>(|conn| {
                async move {
                    diesel::delete(
                        availabilities::table.filter(availabilities::schedule_id.eq(schedule_id)),
                    )
                    .execute(conn)
                    .await?;

                    diesel::delete(
                        candidates::table.filter(candidates::schedule_id.eq(schedule_id)),
                    )
                    .execute(conn)
                    .await?;

                    diesel::delete(schedules::table.filter(schedules::schedule_id.eq(schedule_id)))
                        .execute(conn)
                        .await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }
}

#[async_trait]
impl CandidateStore for PgStore {
    async fn find_candidates(&self, schedule_id: Uuid) -> StoreResult<Vec<Candidate>> {
        let mut conn = self.conn().await?;

        let rows = candidates::table
            .filter(candidates::schedule_id.eq(schedule_id))
            .order_by(candidates::candidate_id.asc())
            .select(CandidateRow::as_select())
            .load(&mut *conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn destroy_candidate(&self, candidate_id: i32) -> StoreResult<bool> {
        let mut conn = self.conn().await?;

        let deleted =
            diesel::delete(candidates::table.filter(candidates::candidate_id.eq(candidate_id)))
                .execute(&mut *conn)
                .await
                .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }
}

#[async_trait]
impl AvailabilityStore for PgStore {
    async fn upsert_availability(&self, availability: &Availability) -> StoreResult<()> {
        let mut conn = self.conn().await?;
        let row = AvailabilityRow::from(availability);

        diesel::insert_into(availabilities::table)
            .values(&row)
            .on_conflict((availabilities::candidate_id, availabilities::user_id))
            .do_update()
            .set(availabilities::availability.eq(row.availability))
            .execute(&mut *conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(())
    }

    async fn find_availabilities(
        &self,
        schedule_id: Uuid,
    ) -> StoreResult<Vec<AvailabilityEntry>> {
        let mut conn = self.conn().await?;

        let rows = availabilities::table
            .inner_join(users::table)
            .filter(availabilities::schedule_id.eq(schedule_id))
            .order_by((users::user_id.asc(), availabilities::candidate_id.asc()))
            .select((AvailabilityRow::as_select(), UserRow::as_select()))
            .load::<(AvailabilityRow, UserRow)>(&mut *conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows
            .into_iter()
            .map(|(availability, user)| AvailabilityEntry {
                candidate_id: availability.candidate_id,
                availability: availability.kind(),
                user: user.into(),
            })
            .collect())
    }
}
