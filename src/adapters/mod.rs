//! Adapter interfaces for external tools.
//!
//! Every stage talks to the outside world through a [`CommandRunner`]:
//! the package manager, test runner, container tool, cloud CLI and
//! cluster CLI are all plain processes.

pub mod process;

use async_trait::async_trait;

use crate::domain::{CommandOutput, CommandSpec};
use crate::error::CommandExecutionError;

// Re-export the process runner
pub use process::ProcessRunner;

/// Executes one external command to completion
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Human-readable runner name
    fn name(&self) -> &str;

    /// Run the command and wait for it to exit.
    ///
    /// Returns the buffered output on exit code zero; any other outcome
    /// is a [`CommandExecutionError`].
    async fn run(&self, command: &CommandSpec) -> Result<CommandOutput, CommandExecutionError>;
}
