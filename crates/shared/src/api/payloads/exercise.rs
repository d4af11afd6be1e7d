use serde::{Deserialize, Serialize};

use crate::{
    api::error::ValidationError,
    model::{dates, Exercise, User, ValidateModel},
    types::Uuid,
};

/// Form body of a log-exercise request. Duration arrives as form text and
/// only validates as a whole number of minutes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateExerciseParams {
    pub description: Option<String>,
    pub duration: Option<String>,
    pub date: Option<String>,
}

impl CreateExerciseParams {
    pub fn parsed_duration(&self) -> Option<i64> {
        self.duration.as_deref().and_then(|d| d.trim().parse().ok())
    }
}

impl ValidateModel for CreateExerciseParams {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut error_messages = Vec::new();

        if self
            .description
            .as_deref()
            .map_or(true, |d| d.trim().is_empty())
        {
            error_messages.push("description is required".to_string());
        }

        match self.duration.as_deref().map(str::trim) {
            None | Some("") => error_messages.push("duration is required".to_string()),
            Some(_) if self.parsed_duration().is_none() => {
                error_messages.push("duration must be a whole number of minutes".to_string());
            },
            Some(_) => {},
        }

        if error_messages.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { error_messages })
        }
    }
}

/// What a successful append returns: the user's identity joined with the
/// new exercise, date rendered for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseView {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub username: String,
    pub description: String,
    pub duration: i64,
    pub date: String,
}

impl From<(&User, &Exercise)> for ExerciseView {
    fn from((user, exercise): (&User, &Exercise)) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            description: exercise.description.clone(),
            duration: exercise.duration,
            date: dates::format_display_date(exercise.date),
        }
    }
}
