// Data models for VisitStore

use serde::{Deserialize, Serialize};

/// One museum visit entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitTask {
    /// Unique within the store for its whole lifetime; never reused after deletion
    pub id: u64,
    /// Museum name, never blank after trimming
    pub name: String,
    /// Planned visit date as ISO `YYYY-MM-DD`; shape-checked, not calendar-checked
    pub visit_date: String,
    /// Whether the visit already happened
    pub completed: bool,
    /// Creation timestamp (milliseconds since epoch), immutable
    pub created_at: i64,
}

/// Seed tuple consumed once at store initialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedVisit {
    pub name: String,
    pub date: String,
    pub completed: bool,
}

impl SeedVisit {
    pub fn new(name: &str, date: &str, completed: bool) -> Self {
        Self {
            name: name.to_string(),
            date: date.to_string(),
            completed,
        }
    }
}

/// Helper function to get current timestamp in milliseconds
pub fn now_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("System time before Unix epoch")
        .as_millis() as i64
}
