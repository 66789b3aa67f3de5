use std::fmt;

use crate::error::{LaunchError, Result};

use super::ProcessRunner;

/// Label attached to every container this tool creates. Kept identical to the
/// label earlier releases applied so their containers are still found.
pub const CONTAINER_LABEL: &str = "cloudgraph-cli-dgraph-standalone";

/// The lifecycle statuses discovery asks the runtime about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerStatus {
    Running,
    Exited,
}

impl ContainerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerStatus::Running => "running",
            ContainerStatus::Exited => "exited",
        }
    }
}

impl fmt::Display for ContainerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A labelled container seen during one discovery call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerRecord {
    pub id: String,
    pub status: ContainerStatus,
}

/// `<runtime> ps --filter label=<label> --filter status=<status> --quiet`
pub fn discovery_command(runtime: &str, label: &str, status: ContainerStatus) -> String {
    format!(
        "{} ps --filter label={} --filter status={status} --quiet",
        shell_words::quote(runtime),
        shell_words::quote(label),
    )
}

/// Look for a labelled container in the given status.
///
/// Returns the first id the runtime lists. Duplicates are not reconciled.
pub fn find_container(
    runner: &dyn ProcessRunner,
    runtime: &str,
    label: &str,
    status: ContainerStatus,
) -> Result<Option<ContainerRecord>> {
    let output = runner
        .run(&discovery_command(runtime, label, status))
        .map_err(|source| LaunchError::DiscoveryFailed { status, source })?;

    Ok(first_id(&output).map(|id| ContainerRecord {
        id: id.to_string(),
        status,
    }))
}

/// First whitespace-separated token of the query output.
///
/// The runner hands back stderr when stdout is empty, so a runtime warning on
/// an otherwise empty listing is read as an id. Starting that id then fails
/// and the run reports `StartFailed`.
fn first_id(output: &str) -> Option<&str> {
    output.split_whitespace().next()
}
