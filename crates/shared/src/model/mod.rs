pub mod dates;

mod error;
pub use error::*;

mod exercise;
pub use exercise::*;

mod user;
pub use user::*;

use sea_query::Iden;

use crate::api::error::ValidationError;

pub trait ValidateModel {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// Sqlite's implicit rowid column; ordering on it reads rows back in
/// insertion order
#[derive(Iden)]
pub(crate) struct Rowid;
