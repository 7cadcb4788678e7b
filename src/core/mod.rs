//! Core pipeline logic.
//!
//! This module contains:
//! - Plan: The exact commands each stage runs
//! - Runner: Sequential, fail-fast stage execution

pub mod plan;
pub mod runner;

// Re-export commonly used types
pub use plan::{plan_pipeline, plan_stage, StagePlan};
pub use runner::PipelineRunner;
