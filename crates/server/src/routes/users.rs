use axum::{Form, Json};
use shared::{
    api::payloads::{CreateUserParams, UserSummary},
    model::{NewUser, User, ValidateModel},
};
use tracing::instrument;

use crate::{db::DatabaseConnection, ApiError};

#[instrument]
pub async fn create_user(
    DatabaseConnection(conn): DatabaseConnection,
    Form(params): Form<CreateUserParams>,
) -> Result<Json<UserSummary>, ApiError> {
    params.validate()?;
    let username = params.username.unwrap_or_default();

    let user = conn
        .interact(move |conn| User::create_or_get(conn, NewUser::new(username)))
        .await??;

    Ok(Json(UserSummary::from(&user)))
}

#[instrument]
pub async fn list_users(
    DatabaseConnection(conn): DatabaseConnection,
) -> Result<Json<Vec<UserSummary>>, ApiError> {
    let users = conn.interact(|conn| User::fetch_all(conn)).await??;

    Ok(Json(users.iter().map(UserSummary::from).collect()))
}
