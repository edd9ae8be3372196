use axum::{extract::State, http::StatusCode, response::Html};

use crate::auth::MaybeUser;
use crate::error::PageResult;
use crate::store::ScheduleStore;
use crate::views;
use crate::AppState;

pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Top page; lists the principal's own schedules when signed in.
pub async fn index(
    State(state): State<AppState>,
    MaybeUser(principal): MaybeUser,
) -> PageResult<Html<String>> {
    let schedules = match &principal {
        Some(p) => state.store.list_schedules_by_owner(p.id).await?,
        None => Vec::new(),
    };

    Ok(Html(views::index_page(principal.as_ref(), &schedules)))
}
