use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Connection settings for the storage engine.
///
/// Only `port` influences provisioning (it becomes the published query port);
/// the rest is used to build the endpoint the health probe talks to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageEngineConnectionConfig {
    pub scheme: String,
    pub host: String,
    pub port: u16,
}

impl StorageEngineConnectionConfig {
    /// `scheme://host:port`, the address users connect to.
    pub fn endpoint(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }
}

impl Default for StorageEngineConnectionConfig {
    fn default() -> Self {
        Self {
            scheme: "http".to_string(),
            host: "localhost".to_string(),
            port: 8997,
        }
    }
}

impl fmt::Display for StorageEngineConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.endpoint())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub runtime: String,
    pub image: String,
    pub image_version: String,
    pub container_name: String,
    /// Overrides the platform data directory used as the bind-mount root.
    pub data_dir: Option<PathBuf>,
    pub health_check_delay_secs: u64,
    pub storage: StorageEngineConnectionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            runtime: "docker".to_string(),
            image: "dgraph/standalone".to_string(),
            image_version: "v21.03.1".to_string(),
            container_name: "dgraph".to_string(),
            data_dir: None,
            health_check_delay_secs: 10,
            storage: StorageEngineConnectionConfig::default(),
        }
    }
}
