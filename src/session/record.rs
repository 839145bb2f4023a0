// ABOUTME: Session record types: the captured workspace snapshot and its stored form.
// ABOUTME: Defines sentinel strings used when a data source could not be read.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Substituted for `git_status` when `git status` cannot be run or fails.
pub const NO_GIT_STATUS: &str = "No git status available";
/// Substituted for `recent_changes` when `git log` cannot be run or fails.
pub const NO_RECENT_CHANGES: &str = "No recent changes found";
/// There is no editor integration, so this is always stored.
pub const NO_CURSOR_POSITION: &str = "Position not available";
/// Stored for `active_terminal` when the terminal directory was never known.
pub const UNKNOWN_TERMINAL: &str = "Unknown";

/// Hard cap on the number of candidate open files in a record.
pub const MAX_OPEN_FILES: usize = 10;

/// One snapshot of workspace state. Every field is always present on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub timestamp: DateTime<Local>,
    #[serde(rename = "workspace", alias = "workspace_path")]
    pub workspace_path: String,
    pub open_files: Vec<String>,
    pub git_status: String,
    pub recent_changes: String,
    pub active_terminal: String,
    pub cursor_position: String,
}

/// A record as loaded back from the context directory.
///
/// Every field is optional so older or hand-edited files still load; the
/// prompt renderer decides what to show for missing values. A default
/// (all `None`) value means no record was found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoredSession {
    pub timestamp: Option<DateTime<Local>>,
    #[serde(rename = "workspace", alias = "workspace_path")]
    pub workspace_path: Option<String>,
    pub open_files: Option<Vec<String>>,
    pub git_status: Option<String>,
    pub recent_changes: Option<String>,
    pub active_terminal: Option<String>,
    pub cursor_position: Option<String>,
}

impl StoredSession {
    /// True when no field is set, i.e. nothing was loaded.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<SessionRecord> for StoredSession {
    fn from(record: SessionRecord) -> Self {
        Self {
            timestamp: Some(record.timestamp),
            workspace_path: Some(record.workspace_path),
            open_files: Some(record.open_files),
            git_status: Some(record.git_status),
            recent_changes: Some(record.recent_changes),
            active_terminal: Some(record.active_terminal),
            cursor_position: Some(record.cursor_position),
        }
    }
}
