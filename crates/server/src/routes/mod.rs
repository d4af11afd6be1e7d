use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use shared::api::Object;

use crate::AppState;

mod exercises;
pub use exercises::*;

mod logs;
pub use logs::*;

mod users;
pub use users::*;

/// The JSON API surface. Static assets and middleware layers are attached
/// in main alongside this.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(Object::Users.path(), post(create_user).get(list_users))
        .route(Object::UserExercises.path(), post(create_exercise))
        .route(Object::UserLogs.path(), get(fetch_logs))
        .route(Object::Ping.path(), get(ping))
}

pub async fn ping() -> (StatusCode, Json<()>) {
    (StatusCode::OK, Json(()))
}
