// ABOUTME: External command execution: runs a program in a directory and captures stdout.
// ABOUTME: The CommandRunner trait lets the collector be driven by a fake in tests.

use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

/// Why an external command produced no usable output.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The program could not be started (typically not installed).
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The program ran but exited unsuccessfully.
    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },
}

/// Runs a program synchronously and returns its stdout as text.
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> Result<String, CommandError>;
}

/// Runs real processes via `std::process::Command`. Blocks until the child exits.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> Result<String, CommandError> {
        let output = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| CommandError::Spawn {
                program: program.to_string(),
                source,
            })?;

        if !output.status.success() {
            return Err(CommandError::Failed {
                program: program.to_string(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_program_is_spawn_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = SystemRunner
            .run("ctxfork-definitely-not-a-real-binary", &[], tmp.path())
            .unwrap_err();
        assert!(matches!(err, CommandError::Spawn { .. }), "got {err:?}");
    }

    #[cfg(unix)]
    #[test]
    fn captures_stdout_on_success() {
        let tmp = tempfile::tempdir().unwrap();
        let out = SystemRunner
            .run("sh", &["-c", "echo hello"], tmp.path())
            .unwrap();
        assert_eq!(out, "hello\n");
    }

    #[cfg(unix)]
    #[test]
    fn nonzero_exit_is_failed_error() {
        let tmp = tempfile::tempdir().unwrap();
        let err = SystemRunner
            .run("sh", &["-c", "echo oops >&2; exit 3"], tmp.path())
            .unwrap_err();
        match err {
            CommandError::Failed { stderr, status, .. } => {
                assert_eq!(stderr, "oops");
                assert_eq!(status.code(), Some(3));
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }
}
