//! Stage planning.
//!
//! Turns the configuration into the exact, ordered command list each
//! stage executes. Planning never touches the outside world except for
//! the environment-directory existence check, which the caller supplies.

use crate::config::PipelineConfig;
use crate::domain::{CommandSpec, StageKind};

/// The commands one stage will run, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagePlan {
    pub stage: StageKind,
    pub commands: Vec<CommandSpec>,
}

/// Plan a single stage.
///
/// `env_exists` only affects [`StageKind::EnvironmentSetup`]: an existing
/// environment directory is reused as-is, without checking that its
/// packages match the manifest.
pub fn plan_stage(stage: StageKind, config: &PipelineConfig, env_exists: bool) -> StagePlan {
    let workdir = &config.workdir;
    let cmd = |program: &str| CommandSpec::new(program).current_dir(workdir);
    let image_ref = config.image_ref();

    let commands = match stage {
        StageKind::EnvironmentSetup => {
            let pip = config.env_bin("pip").to_string_lossy().into_owned();
            let mut commands = Vec::with_capacity(3);
            if !env_exists {
                commands.push(cmd(&config.python).args([
                    "-m".to_string(),
                    "venv".to_string(),
                    config.env_dir.to_string_lossy().into_owned(),
                ]));
            }
            commands.push(cmd(&pip).args(["install", "--upgrade", "pip"]));
            commands.push(cmd(&pip).args([
                "install".to_string(),
                "-r".to_string(),
                config.manifest.to_string_lossy().into_owned(),
            ]));
            commands
        }

        StageKind::TestExecution => {
            let python = config.env_bin("python").to_string_lossy().into_owned();
            vec![cmd(&python)
                .args(["-m", config.test_module.as_str()])
                .args(config.test_args.iter().cloned())]
        }

        StageKind::ImageBuild => {
            vec![cmd("docker").args(["build", "-t", image_ref.as_str(), "."])]
        }

        StageKind::ImagePush => vec![
            cmd("gcloud").args(["auth", "configure-docker", "--quiet"]),
            cmd("docker").args(["push", image_ref.as_str()]),
        ],

        StageKind::DeploymentRollout => {
            let deployment = format!("deployment/{}", config.deployment);
            let container_image = format!("{}={}", config.container_name(), image_ref);
            vec![
                cmd("gcloud").args([
                    "container",
                    "clusters",
                    "get-credentials",
                    config.cluster.as_str(),
                    "--zone",
                    config.zone.as_str(),
                    "--project",
                    config.project.as_str(),
                ]),
                cmd("kubectl").args([
                    "set",
                    "image",
                    deployment.as_str(),
                    container_image.as_str(),
                    "-n",
                    config.namespace.as_str(),
                ]),
                cmd("kubectl").args([
                    "rollout",
                    "status",
                    deployment.as_str(),
                    "-n",
                    config.namespace.as_str(),
                ]),
            ]
        }
    };

    StagePlan { stage, commands }
}

/// Plan every stage, checking the environment directory now
pub fn plan_pipeline(config: &PipelineConfig) -> Vec<StagePlan> {
    let env_exists = config.env_path().exists();
    StageKind::ALL
        .iter()
        .map(|stage| plan_stage(*stage, config, env_exists))
        .collect()
}
