mod exercise;
pub use exercise::*;

mod log;
pub use log::*;

mod user;
pub use user::*;
