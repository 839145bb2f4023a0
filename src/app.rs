// ABOUTME: App orchestrator: wires config, collector, session store, and prompt renderer.
// ABOUTME: Exposes capture, restoration prompt, and history for one workspace.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::capture::{CommandRunner, Collector, SystemRunner};
use crate::config::Config;
use crate::prompt;
use crate::session::{SessionRecord, SessionStore, StoredSession};

/// Capture and restore workflow bound to a single workspace.
pub struct App<R = SystemRunner> {
    workspace: PathBuf,
    collector: Collector<R>,
    store: SessionStore,
}

impl App<SystemRunner> {
    /// `terminal_dir` is reported as the active terminal in captured records.
    pub fn new(config: Config, workspace: PathBuf, terminal_dir: PathBuf) -> Self {
        Self::with_runner(config, workspace, terminal_dir, SystemRunner)
    }
}

impl<R: CommandRunner> App<R> {
    pub fn with_runner(
        config: Config,
        workspace: PathBuf,
        terminal_dir: PathBuf,
        runner: R,
    ) -> Self {
        let store = SessionStore::for_workspace(&workspace, &config.storage.dir_name);
        let collector = Collector::with_runner(workspace.clone(), config.capture, runner)
            .terminal_dir(terminal_dir);
        Self {
            workspace,
            collector,
            store,
        }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Snapshot the workspace and persist it. Returns the record as stored.
    pub fn capture_session(&self) -> anyhow::Result<SessionRecord> {
        self.capture_session_with_path().map(|(record, _)| record)
    }

    /// Like [`capture_session`](Self::capture_session), also returning the record file.
    pub fn capture_session_with_path(&self) -> anyhow::Result<(SessionRecord, PathBuf)> {
        let record = self.collector.capture();
        let (record, path) = self.store.persist_with_path(record)?;
        info!(path = %path.display(), "session state captured");
        Ok((record, path))
    }

    /// Render the restoration prompt for the most recent record.
    ///
    /// A record that cannot be parsed is logged and treated as missing, so the
    /// prompt still renders with placeholders.
    pub fn restoration_prompt(&self, conversation_id: Option<&str>) -> String {
        let latest = self.store.latest().unwrap_or_else(|e| {
            warn!("ignoring unreadable session record: {e:#}");
            StoredSession::default()
        });
        let workspace = self.workspace.to_string_lossy();
        prompt::render(&latest, &workspace, conversation_id)
    }

    /// Stored record files, oldest first.
    pub fn history(&self) -> anyhow::Result<Vec<PathBuf>> {
        self.store.list()
    }
}
