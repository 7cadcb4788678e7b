//! Domain types for the pipeline runner.
//!
//! This module contains the core data structures:
//! - Command: External-process invocations and their output
//! - Stage: The five ordered pipeline stages
//! - Run: Execution state and its transitions

pub mod command;
pub mod run;
pub mod stage;

// Re-export commonly used types
pub use command::{CommandOutput, CommandSpec};
pub use run::{InvalidTransition, Run, RunState};
pub use stage::StageKind;
