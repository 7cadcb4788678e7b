//! gke-ship - Fail-fast build, test and deploy pipeline for GKE
//!
//! Runs five stages strictly in order, each a short sequence of external
//! commands:
//!
//! 1. Environment setup: create the dependency environment if missing,
//!    upgrade its package manager, install the manifest
//! 2. Test execution: run the test suite inside the environment
//! 3. Image build: build and tag the container image
//! 4. Image push: authenticate with the registry and upload the image
//! 5. Deployment rollout: fetch cluster credentials, update the deployment
//!    image and wait for the rollout to finish
//!
//! The first command that exits non-zero aborts the run with exit code 1.
//!
//! # Modules
//!
//! - `adapters`: External process execution
//! - `core`: Stage planning and the pipeline runner
//! - `domain`: Data structures (CommandSpec, StageKind, Run)
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Run the pipeline
//! gke-ship --image gcr.io/acme/web --tag v1.4.0 --cluster prod --zone europe-west1-b
//!
//! # Show what would run
//! gke-ship plan --tag v1.4.0
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod error;
pub mod logging;

// Re-export main types at crate root for convenience
pub use adapters::{CommandRunner, ProcessRunner};
pub use config::PipelineConfig;
pub use core::{PipelineRunner, StagePlan};
pub use domain::{CommandOutput, CommandSpec, Run, RunState, StageKind};
pub use error::{CommandExecutionError, ConfigError};
