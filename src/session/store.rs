// ABOUTME: Session store: writes each captured record to its own JSON file in the context dir.
// ABOUTME: Finds the most recently created record file and loads it back.

use std::fs::{self, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::Context;
use tracing::{debug, warn};

use super::record::{SessionRecord, StoredSession};

/// Default name of the context directory inside the workspace root.
pub const DEFAULT_CONTEXT_DIR: &str = "claude-context-fork";

/// Glob pattern matched against file names in the context directory.
const RECORD_PATTERN: &str = "session_*.json";

/// Flat directory of session record files. Records are never modified or removed.
#[derive(Debug, Clone)]
pub struct SessionStore {
    context_dir: PathBuf,
}

impl SessionStore {
    /// Store rooted at `<workspace>/<dir_name>`.
    pub fn for_workspace(workspace: &Path, dir_name: &str) -> Self {
        Self::new(workspace.join(dir_name))
    }

    /// Store rooted at an explicit directory.
    pub fn new(context_dir: impl Into<PathBuf>) -> Self {
        Self {
            context_dir: context_dir.into(),
        }
    }

    pub fn context_dir(&self) -> &Path {
        &self.context_dir
    }

    /// Write `record` to a new file and hand it back unchanged.
    pub fn persist(&self, record: SessionRecord) -> anyhow::Result<SessionRecord> {
        self.persist_with_path(record).map(|(record, _)| record)
    }

    /// Like [`persist`](Self::persist), also returning the file that was written.
    ///
    /// The file name is reserved with `create_new` before the content lands, so two
    /// records captured in the same instant get distinct files instead of one
    /// overwriting the other.
    pub fn persist_with_path(
        &self,
        record: SessionRecord,
    ) -> anyhow::Result<(SessionRecord, PathBuf)> {
        fs::create_dir_all(&self.context_dir).with_context(|| {
            format!(
                "failed to create context directory {}",
                self.context_dir.display()
            )
        })?;

        let content = serde_json::to_string_pretty(&record)?;
        let path = self.reserve_file(&record)?;

        if let Err(e) = write_via_tmp(&path, &content) {
            // An empty reserved file would shadow the last good record in `latest()`.
            if let Err(cleanup) = fs::remove_file(&path) {
                warn!(
                    path = %path.display(),
                    error = %cleanup,
                    "failed to remove reserved record file"
                );
            }
            return Err(e);
        }

        debug!(path = %path.display(), "persisted session record");
        Ok((record, path))
    }

    /// Claim an unused file name derived from the record's capture time.
    fn reserve_file(&self, record: &SessionRecord) -> anyhow::Result<PathBuf> {
        let stem = record_file_stem(record);
        let mut attempt = 0u32;
        loop {
            let name = if attempt == 0 {
                format!("{stem}.json")
            } else {
                format!("{stem}_{attempt}.json")
            };
            let path = self.context_dir.join(name);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(_) => return Ok(path),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => {
                    return Err(e).with_context(|| format!("failed to create {}", path.display()));
                }
            }
        }
    }

    /// All record files, oldest first.
    pub fn list(&self) -> anyhow::Result<Vec<PathBuf>> {
        let mut files: Vec<(SystemTime, PathBuf)> = self
            .record_files()?
            .into_iter()
            .map(|path| (created_at(&path), path))
            .collect();
        files.sort();
        Ok(files.into_iter().map(|(_, path)| path).collect())
    }

    /// Load the most recently created record, or an empty session if there is none.
    ///
    /// Recency comes from file metadata, not from the timestamp in the file name.
    /// Content that is not valid record JSON is an error.
    pub fn latest(&self) -> anyhow::Result<StoredSession> {
        let Some(path) = self.list()?.pop() else {
            debug!(dir = %self.context_dir.display(), "no session records found");
            return Ok(StoredSession::default());
        };

        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let session: StoredSession = serde_json::from_str(&content)
            .with_context(|| format!("malformed session record {}", path.display()))?;
        debug!(path = %path.display(), "loaded latest session record");
        Ok(session)
    }

    fn record_files(&self) -> anyhow::Result<Vec<PathBuf>> {
        if !self.context_dir.is_dir() {
            return Ok(Vec::new());
        }
        let escaped = glob::Pattern::escape(&self.context_dir.to_string_lossy());
        let pattern = format!("{escaped}/{RECORD_PATTERN}");
        let files = glob::glob(&pattern)?
            .filter_map(Result::ok)
            .filter(|path| path.is_file())
            .collect();
        Ok(files)
    }
}

/// `session_<YYYYMMDD_HHMMSS>_<microseconds>` for the record's capture time.
pub fn record_file_stem(record: &SessionRecord) -> String {
    record
        .timestamp
        .format("session_%Y%m%d_%H%M%S_%6f")
        .to_string()
}

fn write_via_tmp(path: &Path, content: &str) -> anyhow::Result<()> {
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, content)
        .with_context(|| format!("failed to write {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path)
        .with_context(|| format!("failed to move record into {}", path.display()))?;
    Ok(())
}

/// Creation time, falling back to modification time where birth time is unsupported.
/// Files whose metadata cannot be read sort as oldest.
fn created_at(path: &Path) -> SystemTime {
    fs::metadata(path)
        .and_then(|meta| meta.created().or_else(|_| meta.modified()))
        .unwrap_or_else(|e| {
            debug!(path = %path.display(), error = %e, "no timestamp for record file");
            SystemTime::UNIX_EPOCH
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::record::NO_CURSOR_POSITION;
    use chrono::{Local, TimeZone};

    fn sample_record() -> SessionRecord {
        SessionRecord {
            timestamp: Local.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap(),
            workspace_path: "/home/user/projects/myapp".to_string(),
            open_files: vec![
                "/home/user/projects/myapp/main.py".to_string(),
                "/home/user/projects/myapp/README.md".to_string(),
            ],
            git_status: "?? notes.md".to_string(),
            recent_changes: "abc1234 Add parser\ndef5678 Initial commit".to_string(),
            active_terminal: "/home/user".to_string(),
            cursor_position: NO_CURSOR_POSITION.to_string(),
        }
    }

    #[test]
    fn file_stem_encodes_capture_time() {
        assert_eq!(
            record_file_stem(&sample_record()),
            "session_20260314_092653_000000"
        );
    }

    #[test]
    fn persist_creates_context_dir_and_returns_record() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SessionStore::for_workspace(tmp.path(), DEFAULT_CONTEXT_DIR);
        assert!(!store.context_dir().exists());

        let record = sample_record();
        let (returned, path) = store.persist_with_path(record.clone()).unwrap();

        assert_eq!(returned, record);
        assert!(store.context_dir().is_dir());
        assert_eq!(
            path.file_name().unwrap().to_string_lossy(),
            "session_20260314_092653_000000.json"
        );
        assert!(
            !path.with_extension("json.tmp").exists(),
            "temporary file should be gone after persist"
        );
    }

    #[test]
    fn persist_then_latest_roundtrips_every_field() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SessionStore::new(tmp.path().join("ctx"));

        let record = store.persist(sample_record()).unwrap();
        let latest = store.latest().unwrap();

        assert_eq!(latest, StoredSession::from(record));
    }

    #[test]
    fn same_instant_captures_do_not_overwrite() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SessionStore::new(tmp.path().join("ctx"));

        let (_, first) = store.persist_with_path(sample_record()).unwrap();
        let mut second_record = sample_record();
        second_record.git_status = "changed".to_string();
        let (_, second) = store.persist_with_path(second_record).unwrap();

        assert_ne!(first, second);
        assert_eq!(
            second.file_name().unwrap().to_string_lossy(),
            "session_20260314_092653_000000_1.json"
        );
        assert_eq!(store.list().unwrap().len(), 2);

        let first_loaded: StoredSession =
            serde_json::from_str(&fs::read_to_string(&first).unwrap()).unwrap();
        assert_eq!(first_loaded.git_status.as_deref(), Some("?? notes.md"));
    }

    #[test]
    fn latest_on_missing_dir_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SessionStore::new(tmp.path().join("never_created"));
        assert!(store.latest().unwrap().is_empty());
    }

    #[test]
    fn latest_on_empty_dir_is_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SessionStore::new(tmp.path());
        fs::write(tmp.path().join("notes.txt"), "not a record").unwrap();
        assert!(store.latest().unwrap().is_empty());
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn latest_rejects_malformed_record() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SessionStore::new(tmp.path());
        fs::write(tmp.path().join("session_20260101_000000.json"), "{ not json").unwrap();

        let err = store.latest().unwrap_err();
        assert!(
            format!("{err:#}").contains("malformed session record"),
            "unexpected error: {err:#}"
        );
    }

    #[test]
    fn latest_loads_records_written_by_hand() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SessionStore::new(tmp.path());
        fs::write(
            tmp.path().join("session_20240101_120000.json"),
            r#"{"timestamp": "2024-01-01T12:00:00+00:00", "workspace": "/ws", "open_files": []}"#,
        )
        .unwrap();

        let latest = store.latest().unwrap();
        assert_eq!(latest.workspace_path.as_deref(), Some("/ws"));
        assert!(latest.git_status.is_none());
    }

    #[test]
    fn failed_write_keeps_previous_record_reachable() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SessionStore::new(tmp.path().join("ctx"));

        let mut earlier = sample_record();
        earlier.timestamp = Local.with_ymd_and_hms(2026, 3, 14, 9, 0, 0).unwrap();
        earlier.git_status = "good".to_string();
        store.persist(earlier).unwrap();

        // A directory where the temporary file should go makes the write fail.
        let blocked = store
            .context_dir()
            .join("session_20260314_092653_000000.json.tmp");
        fs::create_dir_all(&blocked).unwrap();

        assert!(store.persist(sample_record()).is_err());
        assert_eq!(store.list().unwrap().len(), 1);
        assert_eq!(store.latest().unwrap().git_status.as_deref(), Some("good"));
    }

    #[test]
    fn latest_picks_newest_created_not_newest_name() {
        let tmp = tempfile::tempdir().unwrap();
        let store = SessionStore::new(tmp.path());

        fs::write(
            tmp.path().join("session_20990101_000000.json"),
            r#"{"git_status": "created-first"}"#,
        )
        .unwrap();
        std::thread::sleep(std::time::Duration::from_millis(50));
        fs::write(
            tmp.path().join("session_20000101_000000.json"),
            r#"{"git_status": "created-second"}"#,
        )
        .unwrap();

        let latest = store.latest().unwrap();
        assert_eq!(latest.git_status.as_deref(), Some("created-second"));
        assert_eq!(
            store.list().unwrap().last().unwrap().file_name().unwrap(),
            "session_20000101_000000.json"
        );
    }
}
