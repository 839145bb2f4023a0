// ABOUTME: State collector: gathers open files, git status/log, and terminal dir into a record.
// ABOUTME: Each step fails independently and falls back to its own sentinel value.

use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{debug, warn};

use super::runner::{CommandError, CommandRunner, SystemRunner};
use crate::config::CaptureConfig;
use crate::session::record::{
    MAX_OPEN_FILES, NO_CURSOR_POSITION, NO_GIT_STATUS, NO_RECENT_CHANGES, SessionRecord,
    UNKNOWN_TERMINAL,
};

/// Why a single collection step produced nothing.
#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error("invalid file search pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("workspace {0} is not a directory")]
    WorkspaceMissing(PathBuf),
}

/// Captures workspace state for one workspace root.
pub struct Collector<R = SystemRunner> {
    workspace: PathBuf,
    terminal_dir: Option<PathBuf>,
    config: CaptureConfig,
    runner: R,
}

impl<R: CommandRunner> Collector<R> {
    pub fn with_runner(workspace: impl Into<PathBuf>, config: CaptureConfig, runner: R) -> Self {
        Self {
            workspace: workspace.into(),
            terminal_dir: None,
            config,
            runner,
        }
    }

    /// Directory reported as the active terminal. Usually the process's cwd.
    pub fn terminal_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.terminal_dir = Some(dir.into());
        self
    }

    /// Snapshot the workspace. Never fails; unavailable data becomes a sentinel.
    pub fn capture(&self) -> SessionRecord {
        let open_files = self.open_files().unwrap_or_else(|e| {
            debug!(error = %e, "open file search failed");
            Vec::new()
        });

        let git_status = self.git_status().unwrap_or_else(|e| {
            warn!(error = %e, "git status unavailable");
            NO_GIT_STATUS.to_string()
        });

        let recent_changes = self.recent_changes().unwrap_or_else(|e| {
            warn!(error = %e, "git log unavailable");
            NO_RECENT_CHANGES.to_string()
        });

        let active_terminal = self.active_terminal();

        debug!(
            workspace = %self.workspace.display(),
            files = open_files.len(),
            "captured workspace state"
        );

        SessionRecord {
            timestamp: Local::now(),
            workspace_path: self.workspace.to_string_lossy().into_owned(),
            open_files,
            git_status,
            recent_changes,
            active_terminal,
            cursor_position: NO_CURSOR_POSITION.to_string(),
        }
    }

    /// Up to the configured cap of files with a recognized extension, in traversal order.
    /// Hidden files and directories are skipped.
    pub fn open_files(&self) -> Result<Vec<String>, CollectError> {
        if !self.workspace.is_dir() {
            return Err(CollectError::WorkspaceMissing(self.workspace.clone()));
        }

        let root = glob::Pattern::escape(&self.workspace.to_string_lossy());
        let pattern = format!("{}/**/*", root.trim_end_matches('/'));
        let limit = self.config.max_open_files.min(MAX_OPEN_FILES);

        let files = glob::glob(&pattern)?
            .filter_map(Result::ok)
            .filter(|path| !self.is_hidden(path))
            .filter(|path| path.is_file() && self.has_tracked_extension(path))
            .take(limit)
            .map(|path| path.to_string_lossy().into_owned())
            .collect();
        Ok(files)
    }

    fn is_hidden(&self, path: &Path) -> bool {
        path.strip_prefix(&self.workspace)
            .unwrap_or(path)
            .components()
            .any(|c| c.as_os_str().to_string_lossy().starts_with('.'))
    }

    fn has_tracked_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.config.extensions.iter().any(|e| e == ext))
    }

    /// `git status --porcelain` for the workspace, trimmed.
    pub fn git_status(&self) -> Result<String, CollectError> {
        self.git(&["status", "--porcelain"])
    }

    /// `git log --oneline -N` for the workspace, trimmed.
    pub fn recent_changes(&self) -> Result<String, CollectError> {
        let count = format!("-{}", self.config.recent_commits);
        self.git(&["log", "--oneline", &count])
    }

    fn git(&self, args: &[&str]) -> Result<String, CollectError> {
        let out = self.runner.run("git", args, &self.workspace)?;
        Ok(out.trim().to_string())
    }

    fn active_terminal(&self) -> String {
        match &self.terminal_dir {
            Some(dir) => dir.to_string_lossy().into_owned(),
            None => UNKNOWN_TERMINAL.to_string(),
        }
    }
}
