use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use uuid::Uuid;
use validator::Validate;

use shared::api::CreateScheduleForm;
use shared::models::User;

use crate::auth::{MaybeUser, RequireUser};
use crate::error::{ApiError, PageResult};
use crate::extract::JsonOrForm;
use crate::grid::AvailabilityGrid;
use crate::store::{
    AvailabilityStore, CandidateStore, NewSchedule, ScheduleStore, UserStore,
};
use crate::views;
use crate::AppState;

fn found(location: String) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

fn parse_schedule_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found("Schedule"))
}

pub async fn new_schedule_form(RequireUser(principal): RequireUser) -> Html<String> {
    Html(views::new_schedule_page(&principal))
}

/// Create a schedule and its candidates, then redirect to its page.
pub async fn create_schedule(
    State(state): State<AppState>,
    RequireUser(principal): RequireUser,
    JsonOrForm(form): JsonOrForm<CreateScheduleForm>,
) -> PageResult<Response> {
    form.validate()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let new = NewSchedule {
        schedule_name: form.display_name(),
        memo: form.memo.clone(),
        created_by: principal.id,
        candidate_names: form.candidate_names(),
    };

    let created = state.store.create_schedule(&new).await?;

    tracing::info!(
        "User {} created schedule {} with {} candidates",
        principal.id,
        created.schedule.schedule_id,
        created.candidates.len()
    );

    Ok(found(format!("/schedules/{}", created.schedule.schedule_id)))
}

/// Schedule page with memo, candidates and the availability grid.
pub async fn show_schedule(
    State(state): State<AppState>,
    MaybeUser(principal): MaybeUser,
    Path(raw_id): Path<String>,
) -> PageResult<Html<String>> {
    let schedule_id = parse_schedule_id(&raw_id)?;
    let schedule = state
        .store
        .find_schedule(schedule_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Schedule"))?;

    let owner = state.store.find_user(schedule.created_by).await?;
    let candidates = state.store.find_candidates(schedule_id).await?;
    let entries = state.store.find_availabilities(schedule_id).await?;

    let viewer = principal.as_ref().map(|p| User {
        user_id: p.id,
        username: p.username.clone(),
    });
    let grid = AvailabilityGrid::build(candidates, &entries, viewer.as_ref());

    Ok(Html(views::schedule_page(
        principal.as_ref(),
        &schedule,
        owner.as_ref(),
        &grid,
    )))
}

/// Delete a schedule with everything that references it. Owner only.
pub async fn delete_schedule(
    State(state): State<AppState>,
    RequireUser(principal): RequireUser,
    Path(raw_id): Path<String>,
) -> PageResult<Response> {
    let schedule_id = parse_schedule_id(&raw_id)?;
    let schedule = state
        .store
        .find_schedule(schedule_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Schedule"))?;

    if schedule.created_by != principal.id {
        tracing::warn!(
            "User {} tried to delete schedule {} owned by {}",
            principal.id,
            schedule_id,
            schedule.created_by
        );
        return Err(ApiError::Forbidden("Only the owner can delete a schedule".into()).into());
    }

    state.store.delete_schedule_cascade(schedule_id).await?;
    tracing::info!("User {} deleted schedule {}", principal.id, schedule_id);

    Ok(found("/".to_string()))
}
