use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use shared::api::{UpdateAvailabilityRequest, UpdateAvailabilityResponse};
use shared::models::{Availability, AvailabilityKind};

use crate::auth::MaybeUser;
use crate::error::{ApiError, ApiResult};
use crate::store::{AvailabilityStore, CandidateStore};
use crate::AppState;

/// Record the principal's answer for one candidate.
pub async fn update_availability(
    State(state): State<AppState>,
    MaybeUser(principal): MaybeUser,
    Path((schedule_id, user_id, candidate_id)): Path<(Uuid, i64, i32)>,
    Json(payload): Json<UpdateAvailabilityRequest>,
) -> ApiResult<Json<UpdateAvailabilityResponse>> {
    let principal =
        principal.ok_or_else(|| ApiError::Unauthorized("Login required".to_string()))?;
    if principal.id != user_id {
        return Err(ApiError::Forbidden(
            "Availability can only be changed by its owner".to_string(),
        ));
    }

    let availability = AvailabilityKind::from_i32(payload.availability).ok_or_else(|| {
        ApiError::bad_request(format!(
            "availability must be 0, 1 or 2, got {}",
            payload.availability
        ))
    })?;

    let candidates = state.store.find_candidates(schedule_id).await?;
    if !candidates.iter().any(|c| c.candidate_id == candidate_id) {
        return Err(ApiError::not_found("Candidate"));
    }

    state
        .store
        .upsert_availability(&Availability {
            candidate_id,
            user_id,
            availability,
            schedule_id,
        })
        .await?;

    tracing::debug!(
        "User {} answered {:?} for candidate {}",
        user_id,
        availability,
        candidate_id
    );

    Ok(Json(UpdateAvailabilityResponse {
        status: "OK".to_string(),
        availability: availability.as_i32(),
    }))
}
