use axum::{Router, routing::get};

pub mod common;
pub mod credits;
pub mod projects;
pub mod system;
pub mod users;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .route("/stream", get(system::stream))
        .nest("/credits", credits::router())
        .nest("/projects", projects::router())
        .nest("/users", users::router())
}
