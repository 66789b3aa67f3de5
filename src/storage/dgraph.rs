use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::StorageEngineConnectionConfig;
use crate::error::ProbeError;

use super::StorageEngine;

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Docs link printed after a successful launch.
pub const DGRAPH_DOCS_URL: &str = "https://dgraph.io/docs/graphql/";

/// One entry of Dgraph's `/health` response.
#[derive(Debug, Deserialize)]
struct InstanceHealth {
    #[serde(default)]
    instance: Option<String>,
    status: String,
}

/// Dgraph reached over its HTTP API.
#[derive(Debug, Clone)]
pub struct DgraphEngine {
    connection: StorageEngineConnectionConfig,
}

impl DgraphEngine {
    pub fn new(connection: StorageEngineConnectionConfig) -> Self {
        Self { connection }
    }

    pub fn health_url(&self) -> String {
        format!("{}/health", self.connection.endpoint())
    }
}

impl StorageEngine for DgraphEngine {
    fn name(&self) -> &str {
        "Dgraph"
    }

    fn connection_config(&self) -> &StorageEngineConnectionConfig {
        &self.connection
    }

    fn health_check(&self, verbose: bool) -> Result<bool, ProbeError> {
        let url = self.health_url();
        if verbose {
            info!(%url, "running dgraph health check");
        } else {
            debug!(%url, "running dgraph health check");
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(PROBE_TIMEOUT)
            .no_proxy()
            .build()
            .map_err(ProbeError::Client)?;
        let response = client
            .get(&url)
            .send()
            .map_err(|source| ProbeError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, %status, "dgraph health endpoint returned an error status");
            return Ok(false);
        }

        let body = response.text().map_err(|source| ProbeError::Transport {
            url: url.clone(),
            source,
        })?;
        debug!(%url, body = %body.trim(), "health response");
        parse_health(&body).map_err(|source| ProbeError::Payload { url, source })
    }
}

/// Healthy when the response lists at least one instance and all of them
/// report `healthy`.
pub fn parse_health(body: &str) -> Result<bool, serde_json::Error> {
    let instances: Vec<InstanceHealth> = serde_json::from_str(body)?;
    for entry in &instances {
        if entry.status != "healthy" {
            debug!(instance = ?entry.instance, status = %entry.status, "instance not healthy");
        }
    }
    Ok(!instances.is_empty() && instances.iter().all(|i| i.status == "healthy"))
}
