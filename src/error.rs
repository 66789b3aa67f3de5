//! Error types for the launch pipeline.
//!
//! Library code returns these typed errors; the binary wraps them in
//! `anyhow` at the edge.

use std::path::PathBuf;

use thiserror::Error;

use crate::docker::ContainerStatus;

/// Where users are pointed when the container runtime is missing.
pub const RUNTIME_INSTALL_URL: &str = "https://docs.docker.com/get-docker/";

/// Failure of a single external command.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("could not parse command line `{command}`: {source}")]
    Parse {
        command: String,
        #[source]
        source: shell_words::ParseError,
    },

    #[error("empty command line")]
    Empty,

    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {}: {}", exit_label(.code), .output.trim())]
    Exit {
        command: String,
        code: Option<i32>,
        output: String,
    },
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}

impl ProcessError {
    /// The command line that failed, when one was given.
    pub fn command(&self) -> Option<&str> {
        match self {
            Self::Parse { command, .. } | Self::Spawn { command, .. } | Self::Exit { command, .. } => {
                Some(command)
            }
            Self::Empty => None,
        }
    }
}

/// Failure raised by a storage engine's health probe (as opposed to the
/// probe answering "not healthy").
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("health request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected health payload from {url}: {source}")]
    Payload {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// The two ways a health verification can fail.
#[derive(Error, Debug)]
pub enum HealthCheckFailure {
    #[error("{engine} not running at {endpoint}")]
    NotRunning { engine: String, endpoint: String },

    #[error("failed running health check against {endpoint}: {source}")]
    ProbeFailed {
        endpoint: String,
        #[source]
        source: ProbeError,
    },
}

/// Every failure the launch pipeline can produce, fatal or absorbed.
#[derive(Error, Debug)]
pub enum LaunchError {
    #[error(
        "it appears `{runtime}` is not installed, please install it at: {}",
        RUNTIME_INSTALL_URL
    )]
    RuntimeMissing {
        runtime: String,
        #[source]
        source: ProcessError,
    },

    #[error("failed looking up {status} containers: {source}")]
    DiscoveryFailed {
        status: ContainerStatus,
        #[source]
        source: ProcessError,
    },

    #[error("failed pulling image {image}, please check your docker installation: {source}")]
    PullFailed {
        image: String,
        #[source]
        source: ProcessError,
    },

    #[error("failed creating data directory {}: {source}", .path.display())]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{engine} was unable to start: failed starting stopped instance {id}: {source}")]
    StartFailed {
        engine: String,
        id: String,
        #[source]
        source: ProcessError,
    },

    #[error(
        "{engine} was unable to start: failed creating new instance{}: {source}",
        pull_hint(.prior_pull_failure.as_deref())
    )]
    CreateFailed {
        engine: String,
        prior_pull_failure: Option<String>,
        #[source]
        source: ProcessError,
    },

    #[error("{engine} was unable to start: {failure}")]
    HealthCheckFailed {
        engine: String,
        #[source]
        failure: HealthCheckFailure,
    },
}

fn pull_hint(prior: Option<&str>) -> String {
    match prior {
        Some(image) => format!(" (image {image} could not be pulled earlier, it is probably not available locally)"),
        None => String::new(),
    }
}

impl LaunchError {
    /// Whether this error terminates the run. Discovery and pull failures are
    /// absorbed at their step boundary.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::DiscoveryFailed { .. } | Self::PullFailed { .. })
    }
}

/// Result type alias for launch operations.
pub type Result<T> = std::result::Result<T, LaunchError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn exit_error(command: &str) -> ProcessError {
        ProcessError::Exit {
            command: command.into(),
            code: Some(125),
            output: "Unable to find image\n".into(),
        }
    }

    #[test]
    fn exit_error_display_trims_output() {
        let err = exit_error("docker run dgraph/standalone");
        assert_eq!(
            err.to_string(),
            "`docker run dgraph/standalone` exited with status 125: Unable to find image"
        );
    }

    #[test]
    fn signal_exit_is_labelled() {
        let err = ProcessError::Exit {
            command: "docker pull x".into(),
            code: None,
            output: String::new(),
        };
        assert!(err.to_string().contains("exited with a signal"));
    }

    #[test]
    fn runtime_missing_points_at_install_docs() {
        let err = LaunchError::RuntimeMissing {
            runtime: "docker".into(),
            source: exit_error("docker -v"),
        };
        assert!(err.to_string().contains(RUNTIME_INSTALL_URL));
        assert!(err.is_fatal());
    }

    #[test]
    fn create_failure_mentions_prior_pull_failure() {
        let err = LaunchError::CreateFailed {
            engine: "Dgraph".into(),
            prior_pull_failure: Some("dgraph/standalone".into()),
            source: exit_error("docker run"),
        };
        let msg = err.to_string();
        assert!(msg.contains("failed creating new instance"));
        assert!(msg.contains("could not be pulled earlier"));

        let err = LaunchError::CreateFailed {
            engine: "Dgraph".into(),
            prior_pull_failure: None,
            source: exit_error("docker run"),
        };
        assert!(!err.to_string().contains("pulled earlier"));
    }

    #[test]
    fn start_failure_is_distinct_from_create_failure() {
        let err = LaunchError::StartFailed {
            engine: "Dgraph".into(),
            id: "abc123".into(),
            source: exit_error("docker container start abc123"),
        };
        assert!(err.to_string().contains("failed starting stopped instance abc123"));
    }

    #[test]
    fn recoverable_errors_are_not_fatal() {
        let discovery = LaunchError::DiscoveryFailed {
            status: ContainerStatus::Running,
            source: exit_error("docker ps"),
        };
        let pull = LaunchError::PullFailed {
            image: "dgraph/standalone".into(),
            source: exit_error("docker pull dgraph/standalone"),
        };
        assert!(!discovery.is_fatal());
        assert!(!pull.is_fatal());
    }

    #[test]
    fn health_sub_kinds_render_differently() {
        let not_running = LaunchError::HealthCheckFailed {
            engine: "Dgraph".into(),
            failure: HealthCheckFailure::NotRunning {
                engine: "Dgraph".into(),
                endpoint: "http://localhost:8997".into(),
            },
        };
        assert_eq!(
            not_running.to_string(),
            "Dgraph was unable to start: Dgraph not running at http://localhost:8997"
        );

        let payload = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let raised = LaunchError::HealthCheckFailed {
            engine: "Dgraph".into(),
            failure: HealthCheckFailure::ProbeFailed {
                endpoint: "http://localhost:8997".into(),
                source: ProbeError::Payload {
                    url: "http://localhost:8997/health".into(),
                    source: payload,
                },
            },
        };
        assert!(raised.to_string().contains("failed running health check"));
    }
}
