use axum::{extract::Path, Form, Json};
use shared::{
    api::payloads::{CreateExerciseParams, ExerciseView},
    model::{dates, Exercise, NewExercise, StoreError, User, ValidateModel},
    types::Uuid,
};
use tracing::instrument;

use crate::{db::DatabaseConnection, ApiError};

#[instrument]
pub async fn create_exercise(
    DatabaseConnection(conn): DatabaseConnection,
    Path(id): Path<String>,
    Form(params): Form<CreateExerciseParams>,
) -> Result<Json<ExerciseView>, ApiError> {
    params.validate()?;

    // A syntactically invalid id can't name a stored user
    let user_id = Uuid::parse(&id).map_err(|_| ApiError::unknown_user())?;

    let description = params.description.clone().unwrap_or_default();
    let duration = params.parsed_duration().unwrap_or_default();
    let date = dates::normalize_entry_date(params.date.as_deref());

    let (user, exercise) = conn
        .interact(move |conn| {
            // The user must exist before anything is written
            let user = User::fetch_by_id(conn, &user_id)?;
            let exercise =
                Exercise::create(conn, NewExercise::new(user_id, description, duration, date))?;
            Ok::<_, StoreError>((user, exercise))
        })
        .await??;

    Ok(Json(ExerciseView::from((&user, &exercise))))
}
