use serde::{Deserialize, Serialize};

use crate::{
    model::{dates, Exercise, LogFilter, User},
    types::Uuid,
};

/// Query string of a log request. All fields are lenient: bounds that fail
/// to parse impose no restriction and an unparseable limit is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogQueryParams {
    pub from: Option<String>,
    pub to: Option<String>,
    pub limit: Option<String>,
}

impl LogQueryParams {
    pub fn filter(&self) -> LogFilter {
        LogFilter {
            from: self.from.as_deref().and_then(dates::parse_filter_date),
            to: self.to.as_deref().and_then(dates::parse_filter_date),
            limit: self.limit.as_deref().and_then(|l| l.trim().parse().ok()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub description: String,
    pub duration: i64,
    pub date: String,
}

impl From<&Exercise> for LogEntry {
    fn from(exercise: &Exercise) -> Self {
        Self {
            description: exercise.description.clone(),
            duration: exercise.duration,
            date: dates::format_display_date(exercise.date),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogView {
    pub username: String,
    pub count: usize,
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub log: Vec<LogEntry>,
}

impl LogView {
    pub fn new(user: &User, exercises: &[Exercise]) -> Self {
        let log: Vec<LogEntry> = exercises.iter().map(LogEntry::from).collect();
        Self {
            username: user.username.clone(),
            count: log.len(),
            id: user.id,
            log,
        }
    }
}
