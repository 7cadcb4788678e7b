//! Subprocess-backed command runner.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use super::CommandRunner;
use crate::domain::{CommandOutput, CommandSpec};
use crate::error::CommandExecutionError;

/// Runs commands as child processes, buffering stdout and stderr in full.
///
/// No timeout and no retry: a hung tool hangs the run, and timeouts are
/// left to the tools themselves.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    fn name(&self) -> &str {
        "process"
    }

    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, CommandExecutionError> {
        let command_line = spec.command_line();
        info!("Running command: {}", command_line);

        let mut command = Command::new(&spec.program);
        command
            .args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(ref cwd) = spec.cwd {
            command.current_dir(cwd);
        }

        let output = command
            .output()
            .await
            .map_err(|source| CommandExecutionError::Spawn {
                command: command_line.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        let exit_code = output.status.code();

        if !output.status.success() {
            debug!(command = %command_line, ?exit_code, %stderr, "Command failed");
            return Err(CommandExecutionError::NonZeroExit {
                command: command_line,
                code: exit_code,
                stderr,
            });
        }

        debug!("{}", stdout);

        Ok(CommandOutput {
            stdout,
            stderr,
            exit_code,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_runner_name() {
        assert_eq!(ProcessRunner::new().name(), "process");
    }

    #[tokio::test]
    async fn test_missing_executable_is_spawn_error() {
        let spec = CommandSpec::new("gke-ship-definitely-not-installed").arg("--version");
        let err = ProcessRunner::new().run(&spec).await.unwrap_err();

        assert!(matches!(err, CommandExecutionError::Spawn { .. }));
        assert_eq!(
            err.command(),
            "gke-ship-definitely-not-installed --version"
        );
    }

    // Real-process behavior is covered in tests/process_runner.rs
}
