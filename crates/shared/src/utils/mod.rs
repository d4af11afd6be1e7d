mod dotenv;
pub use dotenv::*;

mod tracing;
pub use tracing::*;
