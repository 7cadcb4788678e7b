//! The fixed, ordered set of pipeline stages.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::run::RunState;

/// One discrete step of the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StageKind {
    /// Create (if missing) the dependency environment and install the manifest
    EnvironmentSetup,

    /// Run the test suite inside the environment
    TestExecution,

    /// Build the container image from the working directory
    ImageBuild,

    /// Authenticate with the registry and upload the image
    ImagePush,

    /// Point the deployment at the new image and wait for the rollout
    DeploymentRollout,
}

impl StageKind {
    /// All stages in execution order
    pub const ALL: [StageKind; 5] = [
        StageKind::EnvironmentSetup,
        StageKind::TestExecution,
        StageKind::ImageBuild,
        StageKind::ImagePush,
        StageKind::DeploymentRollout,
    ];

    /// Stable identifier used in logs and plan output
    pub fn name(&self) -> &'static str {
        match self {
            Self::EnvironmentSetup => "environment-setup",
            Self::TestExecution => "test-execution",
            Self::ImageBuild => "image-build",
            Self::ImagePush => "image-push",
            Self::DeploymentRollout => "deployment-rollout",
        }
    }

    /// Informational line logged when the stage starts
    pub fn start_message(&self) -> &'static str {
        match self {
            Self::EnvironmentSetup => "Setting up dependency environment...",
            Self::TestExecution => "Running tests...",
            Self::ImageBuild => "Building container image...",
            Self::ImagePush => "Pushing container image to registry...",
            Self::DeploymentRollout => "Deploying to cluster...",
        }
    }

    /// Run state while this stage executes
    pub fn running_state(&self) -> RunState {
        match self {
            Self::EnvironmentSetup => RunState::SettingUpEnv,
            Self::TestExecution => RunState::Testing,
            Self::ImageBuild => RunState::Building,
            Self::ImagePush => RunState::Pushing,
            Self::DeploymentRollout => RunState::Deploying,
        }
    }

    /// Position in [`StageKind::ALL`]
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
