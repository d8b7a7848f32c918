use chrono::{DateTime, Utc};

use crate::scheduler::Issue;

/// Every external service client implements this trait.
/// Clients are stateless between calls -- credentials come from
/// the OS keyring, looked up by `name()`.
pub trait Integration: Send + Sync {
    /// Unique identifier (e.g. "github", "notes", "calendar").
    fn name(&self) -> &str;

    /// Human-readable display name.
    fn display_name(&self) -> &str;

    /// Whether credentials are present for this service.
    fn is_authenticated(&self) -> bool;

    /// Verify the stored credentials against the live service.
    fn authenticate(&mut self) -> Result<(), Box<dyn std::error::Error>>;

    /// Remove stored credentials.
    fn disconnect(&mut self) -> Result<(), Box<dyn std::error::Error>>;
}

/// Supplies the open, not-yet-scheduled issues the planner consumes.
pub trait IssueSource {
    fn open_unscheduled_issues(&self) -> Result<Vec<Issue>, Box<dyn std::error::Error>>;
}

/// Accepts one calendar event per schedule entry.
pub trait CalendarSink {
    /// Create an event and return the created-event identifier.
    fn create_event(
        &self,
        title: &str,
        description: &str,
        start: DateTime<Utc>,
        duration_minutes: u32,
    ) -> Result<String, Box<dyn std::error::Error>>;
}

/// Reads and writes markdown notes in the vault.
pub trait NoteStore {
    fn read_note(&self, path: &str) -> Result<String, Box<dyn std::error::Error>>;

    fn write_note(&self, path: &str, content: &str) -> Result<(), Box<dyn std::error::Error>>;
}
