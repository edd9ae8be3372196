use axum::{
    routing::{get, post},
    Router,
};

use crate::auth;
use crate::handlers::{availabilities, home, schedules};
use crate::AppState;

pub fn app_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(home::health_check))
        .route("/", get(home::index))

        // Auth routes
        .route("/login", get(auth::login_page))
        .route("/logout", get(auth::logout))
        .route("/auth/github", get(auth::github_login))
        .route("/auth/github/callback", get(auth::github_callback))

        // Schedule routes
        .route("/schedules/new", get(schedules::new_schedule_form))
        .route("/schedules", post(schedules::create_schedule))
        .route("/schedules/:schedule_id", get(schedules::show_schedule))
        .route(
            "/schedules/:schedule_id/delete",
            post(schedules::delete_schedule),
        )

        // Availability routes
        .route(
            "/schedules/:schedule_id/users/:user_id/candidates/:candidate_id",
            post(availabilities::update_availability),
        )
}
