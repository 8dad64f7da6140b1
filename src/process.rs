//! External command execution
//!
//! Every registry and AppleScript call goes through a [`CommandRunner`]. The
//! default [`ProcessRunner`] spawns a real child process; tests swap in an
//! in-memory runner.

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;

#[cfg(target_os = "windows")]
const CREATE_NO_WINDOW: u32 = 0x08000000;

/// Errors reported by a [`CommandRunner`]
#[derive(Debug, Error)]
pub enum CommandError {
    /// The process could not be started at all
    #[error("Failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The process wrote to stderr. Treated as failure even when it exited 0.
    #[error("ChildProcess failed: {}", .output.trim())]
    ChildProcessFailed {
        output: String,
        exit_code: Option<i32>,
    },
}

impl CommandError {
    /// Exit code of a process that ran to completion, if any
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            CommandError::Spawn { .. } => None,
            CommandError::ChildProcessFailed { exit_code, .. } => *exit_code,
        }
    }
}

/// Result of a process that exited without writing to stderr
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stdout: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs one external command to completion.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput, CommandError>;
}

/// Create a Command that hides the console window on Windows.
#[cfg_attr(not(target_os = "windows"), allow(unused_mut))]
pub fn hidden_command(program: &str) -> Command {
    let mut cmd = Command::new(program);
    #[cfg(target_os = "windows")]
    {
        cmd.creation_flags(CREATE_NO_WINDOW);
    }
    cmd
}

/// [`CommandRunner`] backed by real child processes
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput, CommandError> {
        tracing::debug!("Running {} {:?}", program, args);

        let output = hidden_command(program)
            .args(args)
            .output()
            .await
            .map_err(|source| CommandError::Spawn {
                program: program.to_string(),
                source,
            })?;

        let exit_code = output.status.code();
        let stderr = String::from_utf8_lossy(&output.stderr);

        if !stderr.is_empty() {
            tracing::debug!("{} wrote to stderr (exit {:?}): {}", program, exit_code, stderr.trim());
            return Err(CommandError::ChildProcessFailed {
                output: stderr.into_owned(),
                exit_code,
            });
        }

        // Killed by a signal: no code to report, so surface it as a generic failure code
        let exit_code = exit_code.unwrap_or(-1);
        tracing::debug!("{} exited with {}", program, exit_code);

        Ok(CommandOutput {
            exit_code,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_reports_exit_code_and_stdout() {
        let out = ProcessRunner
            .run("sh", &args(&["-c", "echo hello; exit 3"]))
            .await
            .unwrap();
        assert_eq!(out.exit_code, 3);
        assert_eq!(out.stdout.trim(), "hello");
        assert!(!out.success());
    }

    #[tokio::test]
    async fn test_stderr_output_is_failure_even_on_zero_exit() {
        let err = ProcessRunner
            .run("sh", &args(&["-c", "echo oops >&2; exit 0"]))
            .await
            .unwrap_err();
        match err {
            CommandError::ChildProcessFailed { output, exit_code } => {
                assert_eq!(output.trim(), "oops");
                assert_eq!(exit_code, Some(0));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let err = ProcessRunner
            .run("autorun-definitely-not-a-program", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, CommandError::Spawn { .. }));
        assert_eq!(err.exit_code(), None);
    }
}
