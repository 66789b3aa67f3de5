use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{self, Config, StorageEngineConnectionConfig};
use crate::docker::{CONTAINER_LABEL, ContainerStatus};
use crate::error::LaunchError;
use crate::health::HealthPolicy;

/// Subdirectory of the data root bind-mounted into the container, and the
/// path it is mounted at inside the container.
pub const ENGINE_DATA_SUBDIR: &str = "dgraph";

/// Everything one pipeline run needs to know, resolved up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchContext {
    pub runtime: String,
    pub label: String,
    pub image: String,
    pub image_version: String,
    pub container_name: String,
    pub data_root: PathBuf,
    pub connection: StorageEngineConnectionConfig,
    pub health: HealthPolicy,
}

impl LaunchContext {
    /// Build a context from config, resolving the platform data root when the
    /// config does not override it.
    pub fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        let data_root = config::resolve_data_root(cfg)?;
        Ok(Self::with_data_root(cfg, data_root))
    }

    pub fn with_data_root(cfg: &Config, data_root: PathBuf) -> Self {
        Self {
            runtime: cfg.runtime.clone(),
            label: CONTAINER_LABEL.to_string(),
            image: cfg.image.clone(),
            image_version: cfg.image_version.clone(),
            container_name: cfg.container_name.clone(),
            data_root,
            connection: cfg.storage.clone(),
            health: HealthPolicy::fixed(Duration::from_secs(cfg.health_check_delay_secs)),
        }
    }

    /// Host directory holding the engine's data.
    pub fn data_dir(&self) -> PathBuf {
        self.data_root.join(ENGINE_DATA_SUBDIR)
    }

    /// Tagged image reference used when creating a container.
    pub fn image_ref(&self) -> String {
        format!("{}:{}", self.image, self.image_version)
    }
}

/// Result of one pipeline step.
#[derive(Debug)]
pub enum Step<T> {
    /// The step produced a value and the pipeline moves on.
    Continue(T),
    /// The step had nothing to do or absorbed a recoverable failure.
    Skip(SkipReason),
    /// The run ends here.
    Abort(LaunchError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NotFound(ContainerStatus),
    DiscoveryFailed(ContainerStatus),
    PullFailed,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotFound(status) => write!(f, "no {status} container"),
            SkipReason::DiscoveryFailed(status) => {
                write!(f, "{status} container lookup failed, treating as absent")
            }
            SkipReason::PullFailed => f.write_str("image pull failed, continuing"),
        }
    }
}

/// States of the lifecycle controller, in the order a full run visits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchState {
    Init,
    DiscoveringRunning,
    DiscoveringExited,
    Provisioning,
    StartingOrCreating,
    AwaitingHealth,
    Succeeded,
    Failed,
}

impl LaunchState {
    pub fn is_terminal(self) -> bool {
        matches!(self, LaunchState::Succeeded | LaunchState::Failed)
    }
}

/// How the instance that passed (or failed) health verification came to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerSource {
    Reused(String),
    Restarted(String),
    Created,
}

/// Terminal result of one run.
#[derive(Debug)]
pub enum ProvisioningOutcome {
    Success {
        endpoint: String,
        source: ContainerSource,
    },
    DockerMissing(LaunchError),
    DirectoryCreationFailed(LaunchError),
    /// Container creation failed after the image pull had already failed.
    PullFailed(LaunchError),
    StartFailed(LaunchError),
    HealthCheckFailed(LaunchError),
}

impl ProvisioningOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ProvisioningOutcome::Success { .. })
    }

    pub fn error(&self) -> Option<&LaunchError> {
        match self {
            ProvisioningOutcome::Success { .. } => None,
            ProvisioningOutcome::DockerMissing(err)
            | ProvisioningOutcome::DirectoryCreationFailed(err)
            | ProvisioningOutcome::PullFailed(err)
            | ProvisioningOutcome::StartFailed(err)
            | ProvisioningOutcome::HealthCheckFailed(err) => Some(err),
        }
    }

    pub fn into_result(self) -> Result<(String, ContainerSource), LaunchError> {
        match self {
            ProvisioningOutcome::Success { endpoint, source } => Ok((endpoint, source)),
            ProvisioningOutcome::DockerMissing(err)
            | ProvisioningOutcome::DirectoryCreationFailed(err)
            | ProvisioningOutcome::PullFailed(err)
            | ProvisioningOutcome::StartFailed(err)
            | ProvisioningOutcome::HealthCheckFailed(err) => Err(err),
        }
    }

    pub fn exit_code(&self) -> i32 {
        if self.is_success() { 0 } else { 1 }
    }
}

impl From<LaunchError> for ProvisioningOutcome {
    fn from(err: LaunchError) -> Self {
        match err {
            LaunchError::RuntimeMissing { .. } => ProvisioningOutcome::DockerMissing(err),
            LaunchError::DirectoryCreationFailed { .. } => {
                ProvisioningOutcome::DirectoryCreationFailed(err)
            }
            LaunchError::PullFailed { .. }
            | LaunchError::CreateFailed {
                prior_pull_failure: Some(_),
                ..
            } => ProvisioningOutcome::PullFailed(err),
            // Discovery failures are absorbed by the controller; if a caller
            // escalates one, nothing could be started.
            LaunchError::DiscoveryFailed { .. }
            | LaunchError::StartFailed { .. }
            | LaunchError::CreateFailed { .. } => ProvisioningOutcome::StartFailed(err),
            LaunchError::HealthCheckFailed { .. } => ProvisioningOutcome::HealthCheckFailed(err),
        }
    }
}

/// What a pipeline run did and how it ended.
#[derive(Debug)]
pub struct LaunchReport {
    pub outcome: ProvisioningOutcome,
    pub transitions: Vec<LaunchState>,
    /// Recoverable errors absorbed along the way, in order.
    pub absorbed: Vec<LaunchError>,
}
