//! Pipeline runner.
//!
//! Executes the five stages strictly in order. The first failing command
//! aborts the run: no later command or stage is invoked, and nothing that
//! already ran is rolled back.

use anyhow::Result;
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::adapters::{CommandRunner, ProcessRunner};
use crate::config::PipelineConfig;
use crate::domain::{Run, StageKind};
use crate::error::CommandExecutionError;

use super::plan::{plan_pipeline, plan_stage, StagePlan};

/// Runs the build-test-deploy pipeline against a [`CommandRunner`]
pub struct PipelineRunner<R: CommandRunner = ProcessRunner> {
    config: PipelineConfig,
    runner: R,
}

impl PipelineRunner<ProcessRunner> {
    /// Create a runner that spawns real processes
    pub fn new(config: PipelineConfig) -> Self {
        Self::with_runner(config, ProcessRunner::new())
    }
}

impl<R: CommandRunner> PipelineRunner<R> {
    /// Create a runner with a custom command runner
    pub fn with_runner(config: PipelineConfig, runner: R) -> Self {
        Self { config, runner }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Every command the pipeline would run, without running anything
    pub fn plan(&self) -> Vec<StagePlan> {
        plan_pipeline(&self.config)
    }

    /// Execute the pipeline.
    ///
    /// A failing stage is not an `Err`: the returned [`Run`] carries the
    /// `Failed` state and the captured error text. `Err` is reserved for
    /// internal state-machine violations.
    #[instrument(skip(self), fields(run_id = tracing::field::Empty))]
    pub async fn run(&self) -> Result<Run> {
        let mut run = Run::new(Uuid::new_v4());
        tracing::Span::current().record("run_id", tracing::field::display(run.id));
        info!(
            image = %self.config.image_ref(),
            deployment = %self.config.deployment,
            "Starting pipeline"
        );

        for stage in StageKind::ALL {
            run.begin_stage(stage)?;
            info!(stage = %stage, "{}", stage.start_message());

            if let Err(e) = self.run_stage(stage).await {
                error!(
                    stage = %stage,
                    command = %e.command(),
                    exit_code = ?e.exit_code(),
                    "An error occurred: {}",
                    e.error_text()
                );
                run.fail(stage, e.command().to_string(), e.error_text());
                return Ok(run);
            }

            run.complete_stage(stage)?;
        }

        run.succeed()?;
        let elapsed_ms = run.duration().map(|d| d.num_milliseconds()).unwrap_or(0);
        info!(elapsed_ms, "CI/CD pipeline executed successfully.");

        Ok(run)
    }

    /// Run one stage's commands in order, stopping at the first failure
    async fn run_stage(&self, stage: StageKind) -> Result<(), CommandExecutionError> {
        let env_exists = if stage == StageKind::EnvironmentSetup {
            let env_path = self.config.env_path();
            let exists = env_path.exists();
            if exists {
                info!(path = %env_path.display(), "Dependency environment already exists");
            } else {
                info!(path = %env_path.display(), "Creating dependency environment...");
            }
            exists
        } else {
            true
        };

        let plan = plan_stage(stage, &self.config, env_exists);
        for command in &plan.commands {
            self.runner.run(command).await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::sync::Mutex;

    use crate::domain::{CommandOutput, CommandSpec, RunState};

    /// Records every program invoked; fails the first one named `fail_on`
    #[derive(Default)]
    struct StubRunner {
        fail_on: Option<&'static str>,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl CommandRunner for StubRunner {
        fn name(&self) -> &str {
            "stub"
        }

        async fn run(&self, command: &CommandSpec) -> Result<CommandOutput, CommandExecutionError> {
            self.calls.lock().unwrap().push(command.command_line());
            if self.fail_on == Some(command.program.as_str()) {
                return Err(CommandExecutionError::NonZeroExit {
                    command: command.command_line(),
                    code: Some(1),
                    stderr: "boom".to_string(),
                });
            }
            Ok(CommandOutput::success(""))
        }
    }

    fn config() -> PipelineConfig {
        PipelineConfig {
            workdir: PathBuf::from("/nonexistent/gke-ship-test"),
            ..Default::default()
        }
    }

    #[test]
    fn test_successful_run() {
        let runner = PipelineRunner::with_runner(config(), StubRunner::default());
        let run = tokio_test::block_on(runner.run()).unwrap();

        assert_eq!(run.state, RunState::Succeeded);
        assert_eq!(run.exit_code(), 0);
        // 3 setup + 1 test + 1 build + 2 push + 3 deploy
        assert_eq!(runner.runner().calls.lock().unwrap().len(), 10);
    }

    #[test]
    fn test_build_failure_stops_pipeline() {
        let stub = StubRunner {
            fail_on: Some("docker"),
            ..Default::default()
        };
        let runner = PipelineRunner::with_runner(config(), stub);
        let run = tokio_test::block_on(runner.run()).unwrap();

        assert_eq!(run.exit_code(), 1);
        match &run.state {
            RunState::Failed { stage, error, .. } => {
                assert_eq!(*stage, StageKind::ImageBuild);
                assert_eq!(error, "boom");
            }
            other => panic!("expected failed run, got {:?}", other),
        }

        let calls = runner.runner().calls.lock().unwrap();
        assert!(calls.last().unwrap().starts_with("docker build"));
        assert!(!calls.iter().any(|c| c.starts_with("gcloud")));
    }

    #[test]
    fn test_plan_matches_executed_commands() {
        let runner = PipelineRunner::with_runner(config(), StubRunner::default());
        let planned: Vec<String> = runner
            .plan()
            .iter()
            .flat_map(|p| p.commands.iter().map(CommandSpec::command_line))
            .collect();

        tokio_test::block_on(runner.run()).unwrap();
        assert_eq!(*runner.runner().calls.lock().unwrap(), planned);
    }
}
