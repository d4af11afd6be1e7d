use serde::{Deserialize, Serialize};

use crate::{
    api::error::ValidationError,
    model::{User, ValidateModel},
    types::Uuid,
};

/// Form body of a create-user request. The field stays optional so an
/// omitted value reaches validation instead of failing extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserParams {
    pub username: Option<String>,
}

impl ValidateModel for CreateUserParams {
    fn validate(&self) -> Result<(), ValidationError> {
        match self.username.as_deref().map(str::trim) {
            Some(username) if !username.is_empty() => Ok(()),
            _ => Err(ValidationError::new("username is required")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub username: String,
    #[serde(rename = "_id")]
    pub id: Uuid,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            id: user.id,
        }
    }
}
