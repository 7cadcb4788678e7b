//! Error types for pipeline execution.
//!
//! Every external command failure maps onto [`CommandExecutionError`].
//! Nothing is recovered locally: the first error aborts the run.

use thiserror::Error;

/// An invoked external command did not complete successfully
#[derive(Debug, Error)]
pub enum CommandExecutionError {
    /// The process ran and exited with a non-zero status
    #[error("command `{command}` failed with exit code {}: {}", display_code(.code), .stderr.trim())]
    NonZeroExit {
        /// Rendered command line
        command: String,
        /// Exit code, `None` when the process was killed by a signal
        code: Option<i32>,
        /// Captured standard error
        stderr: String,
    },

    /// The process could not be started or awaited
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

impl CommandExecutionError {
    /// Command line of the failing invocation
    pub fn command(&self) -> &str {
        match self {
            Self::NonZeroExit { command, .. } | Self::Spawn { command, .. } => command,
        }
    }

    /// Error text to surface to the user.
    ///
    /// For a non-zero exit this is the captured stderr; for a spawn
    /// failure it is the io error message.
    pub fn error_text(&self) -> String {
        match self {
            Self::NonZeroExit { stderr, .. } => stderr.trim().to_string(),
            Self::Spawn { source, .. } => source.to_string(),
        }
    }

    /// Exit code reported by the process, if any
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::NonZeroExit { code, .. } => *code,
            Self::Spawn { .. } => None,
        }
    }
}

fn display_code(code: &Option<i32>) -> String {
    code.map(|c| c.to_string())
        .unwrap_or_else(|| "none (terminated by signal)".to_string())
}

/// Invalid pipeline configuration, detected before any command runs
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("configuration value `{field}` cannot be empty")]
    Empty { field: &'static str },

    #[error("image name `{image}` must not contain a tag; pass the tag separately")]
    TaggedImageName { image: String },
}
