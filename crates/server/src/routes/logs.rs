use axum::{
    extract::{Path, Query},
    Json,
};
use shared::{
    api::payloads::{LogQueryParams, LogView},
    model::{Exercise, StoreError, User},
    types::Uuid,
};
use tracing::instrument;

use crate::{db::DatabaseConnection, ApiError};

#[instrument]
pub async fn fetch_logs(
    DatabaseConnection(conn): DatabaseConnection,
    Path(id): Path<String>,
    Query(params): Query<LogQueryParams>,
) -> Result<Json<LogView>, ApiError> {
    let user_id = Uuid::parse(&id).map_err(|_| ApiError::unknown_user())?;
    let filter = params.filter();

    let (user, exercises) = conn
        .interact(move |conn| {
            let user = User::fetch_by_id(conn, &user_id)?;
            let exercises = Exercise::fetch_log(conn, &user.id, &filter)?;
            Ok::<_, StoreError>((user, exercises))
        })
        .await??;

    Ok(Json(LogView::new(&user, &exercises)))
}
