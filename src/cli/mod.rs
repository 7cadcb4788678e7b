//! Command-line interface for gke-ship.
//!
//! Provides commands for running the pipeline, previewing the commands it
//! would run, and showing the resolved configuration.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::config::PipelineConfig;
use crate::core::{PipelineRunner, StagePlan};
use crate::logging::LoggingConfig;

/// gke-ship - Test, build, push and roll out a container image to GKE
#[derive(Parser, Debug)]
#[command(name = "gke-ship")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Log captured command output (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored log output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(flatten)]
    pub config: PipelineConfig,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Run the full pipeline (default)
    Run,

    /// Print every command the pipeline would run, without running it
    Plan,

    /// Show resolved configuration
    Config,
}

impl Cli {
    /// Logging settings derived from the global flags
    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            verbose: self.verbose,
            ansi: !self.no_color,
        }
    }

    /// Execute the CLI command
    pub async fn execute(self) -> Result<ExitCode> {
        let config = resolve_config(self.config)?;

        match self.command.unwrap_or(Commands::Run) {
            Commands::Run => run_pipeline(config).await,
            Commands::Plan => {
                let runner = PipelineRunner::new(config);
                print!("{}", render_plan(&runner.plan()));
                Ok(ExitCode::SUCCESS)
            }
            Commands::Config => {
                let yaml = serde_yaml::to_string(&config).context("Failed to render configuration")?;
                print!("{}", yaml);
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

/// Validate the configuration and pin the working directory to an absolute path
fn resolve_config(mut config: PipelineConfig) -> Result<PipelineConfig> {
    config.workdir = std::fs::canonicalize(&config.workdir).with_context(|| {
        format!(
            "Working directory does not exist: {}",
            config.workdir.display()
        )
    })?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Run the pipeline and map its outcome to the process exit code
async fn run_pipeline(config: PipelineConfig) -> Result<ExitCode> {
    let runner = PipelineRunner::new(config);
    let run = runner.run().await?;
    Ok(ExitCode::from(run.exit_code() as u8))
}

/// Human-readable plan: one header per stage, one line per command
pub fn render_plan(plans: &[StagePlan]) -> String {
    let mut out = String::new();
    for (i, plan) in plans.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, plan.stage));
        for command in &plan.commands {
            out.push_str(&format!("   $ {}\n", command));
        }
    }
    out
}
