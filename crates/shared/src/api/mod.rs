use const_format::concatcp;

pub mod error;
pub mod payloads;

pub const API_BASE_PATH: &str = "/api/";

/// Route table shared between the router and anything that needs to build
/// a request path
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Object {
    Users,
    UserExercises,
    UserLogs,
    Ping,
}

impl Object {
    pub const fn path(&self) -> &str {
        use Object::*;
        match self {
            Users => concatcp!(API_BASE_PATH, "users"),
            UserExercises => concatcp!(API_BASE_PATH, "users/:id/exercises"),
            UserLogs => concatcp!(API_BASE_PATH, "users/:id/logs"),
            Ping => concatcp!(API_BASE_PATH, "ping"),
        }
    }
}
