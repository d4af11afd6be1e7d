use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
};
use deadpool_sqlite::{Object, Pool};
use tracing::error;

use crate::ApiError;

/// Pooled sqlite handle checked out per request; handlers run their
/// blocking work through `interact`
#[derive(Debug)]
pub struct DatabaseConnection(pub Object);

#[async_trait]
impl<S> FromRequestParts<S> for DatabaseConnection
where
    S: Send + Sync,
    Pool: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(_parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let pool = Pool::from_ref(state);

        let conn = pool.get().await.map_err(|e| {
            error!("failed to check out a database connection: {e}");
            ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
        })?;

        Ok(DatabaseConnection(conn))
    }
}
