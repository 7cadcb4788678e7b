//! Pipeline configuration.
//!
//! Configuration sources (highest priority first):
//! 1. Command-line flags
//! 2. Environment variables (GKE_SHIP_*)
//! 3. Defaults
//!
//! The resolved configuration is immutable for the duration of a run and
//! is passed explicitly to the pipeline runner.

use std::path::{Path, PathBuf};

use clap::Args;
use serde::Serialize;

use crate::error::ConfigError;

pub const DEFAULT_ENV_DIR: &str = "venv";
pub const DEFAULT_MANIFEST: &str = "requirements.txt";
pub const DEFAULT_PYTHON: &str = "python3";
pub const DEFAULT_TEST_MODULE: &str = "pytest";
pub const DEFAULT_IMAGE: &str = "gcr.io/your-project-id/your-app-name";
pub const DEFAULT_TAG: &str = "latest";
pub const DEFAULT_PROJECT: &str = "your-project-id";
pub const DEFAULT_CLUSTER: &str = "your-gke-cluster";
pub const DEFAULT_ZONE: &str = "your-gke-zone";
pub const DEFAULT_NAMESPACE: &str = "default";
pub const DEFAULT_DEPLOYMENT: &str = "your-deployment";

/// Every identifier the pipeline needs, resolved once at startup
#[derive(Debug, Clone, PartialEq, Eq, Args, Serialize)]
pub struct PipelineConfig {
    /// Working directory: build context and cwd for every command
    #[arg(long, env = "GKE_SHIP_WORKDIR", default_value = ".", global = true)]
    pub workdir: PathBuf,

    /// Dependency environment directory (relative to the working directory)
    #[arg(long, env = "GKE_SHIP_ENV_DIR", default_value = DEFAULT_ENV_DIR, global = true)]
    pub env_dir: PathBuf,

    /// Dependency manifest installed into the environment
    #[arg(long, env = "GKE_SHIP_MANIFEST", default_value = DEFAULT_MANIFEST, global = true)]
    pub manifest: PathBuf,

    /// Interpreter used to create the environment
    #[arg(long, env = "GKE_SHIP_PYTHON", default_value = DEFAULT_PYTHON, global = true)]
    pub python: String,

    /// Test runner module executed with `python -m`
    #[arg(long, env = "GKE_SHIP_TEST_MODULE", default_value = DEFAULT_TEST_MODULE, global = true)]
    pub test_module: String,

    /// Extra arguments passed to the test runner
    #[arg(long = "test-arg", value_name = "ARG", allow_hyphen_values = true, global = true)]
    pub test_args: Vec<String>,

    /// Image repository (without tag)
    #[arg(long, env = "GKE_SHIP_IMAGE", default_value = DEFAULT_IMAGE, global = true)]
    pub image: String,

    /// Image tag
    #[arg(long, env = "GKE_SHIP_TAG", default_value = DEFAULT_TAG, global = true)]
    pub tag: String,

    /// Cloud project owning the cluster
    #[arg(long, env = "GKE_SHIP_PROJECT", default_value = DEFAULT_PROJECT, global = true)]
    pub project: String,

    /// Cluster name
    #[arg(long, env = "GKE_SHIP_CLUSTER", default_value = DEFAULT_CLUSTER, global = true)]
    pub cluster: String,

    /// Cluster zone
    #[arg(long, env = "GKE_SHIP_ZONE", default_value = DEFAULT_ZONE, global = true)]
    pub zone: String,

    /// Kubernetes namespace of the deployment
    #[arg(long, env = "GKE_SHIP_NAMESPACE", default_value = DEFAULT_NAMESPACE, global = true)]
    pub namespace: String,

    /// Deployment to roll out
    #[arg(long, env = "GKE_SHIP_DEPLOYMENT", default_value = DEFAULT_DEPLOYMENT, global = true)]
    pub deployment: String,

    /// Container inside the deployment (defaults to the deployment name)
    #[arg(long, env = "GKE_SHIP_CONTAINER", global = true)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            workdir: PathBuf::from("."),
            env_dir: PathBuf::from(DEFAULT_ENV_DIR),
            manifest: PathBuf::from(DEFAULT_MANIFEST),
            python: DEFAULT_PYTHON.to_string(),
            test_module: DEFAULT_TEST_MODULE.to_string(),
            test_args: Vec::new(),
            image: DEFAULT_IMAGE.to_string(),
            tag: DEFAULT_TAG.to_string(),
            project: DEFAULT_PROJECT.to_string(),
            cluster: DEFAULT_CLUSTER.to_string(),
            zone: DEFAULT_ZONE.to_string(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            deployment: DEFAULT_DEPLOYMENT.to_string(),
            container: None,
        }
    }
}

impl PipelineConfig {
    /// Full image reference, `name:tag`
    pub fn image_ref(&self) -> String {
        format!("{}:{}", self.image, self.tag)
    }

    /// Container name used in `kubectl set image`
    pub fn container_name(&self) -> &str {
        self.container.as_deref().unwrap_or(&self.deployment)
    }

    /// Environment directory resolved against the working directory
    pub fn env_path(&self) -> PathBuf {
        resolve_path(&self.workdir, &self.env_dir)
    }

    /// Path to a tool installed inside the environment
    pub fn env_bin(&self, tool: &str) -> PathBuf {
        if cfg!(windows) {
            self.env_path().join("Scripts").join(format!("{}.exe", tool))
        } else {
            self.env_path().join("bin").join(tool)
        }
    }

    /// Reject configurations that cannot produce a meaningful run
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required: [(&'static str, &str); 9] = [
            ("python", &self.python),
            ("test_module", &self.test_module),
            ("image", &self.image),
            ("tag", &self.tag),
            ("project", &self.project),
            ("cluster", &self.cluster),
            ("zone", &self.zone),
            ("namespace", &self.namespace),
            ("deployment", &self.deployment),
        ];

        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Empty { field });
            }
        }

        if self.env_dir.as_os_str().is_empty() {
            return Err(ConfigError::Empty { field: "env_dir" });
        }
        if self.manifest.as_os_str().is_empty() {
            return Err(ConfigError::Empty { field: "manifest" });
        }
        if matches!(self.container.as_deref(), Some(c) if c.trim().is_empty()) {
            return Err(ConfigError::Empty { field: "container" });
        }

        // A registry host may carry a port ("host:5000/app"), so only the
        // last path segment is checked for a tag separator.
        let last_segment = self.image.rsplit('/').next().unwrap_or(&self.image);
        if last_segment.contains(':') || last_segment.contains('@') {
            return Err(ConfigError::TaggedImageName {
                image: self.image.clone(),
            });
        }

        Ok(())
    }
}

/// Resolve a path that may be relative to a base directory
fn resolve_path(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
