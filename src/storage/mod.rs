//! Storage engine adapters.
//!
//! The launch pipeline needs two things from an engine: where it listens and
//! whether it is answering. Everything else about the engine lives elsewhere.

pub mod dgraph;

pub use dgraph::DgraphEngine;

use crate::config::StorageEngineConnectionConfig;
use crate::error::ProbeError;

pub trait StorageEngine {
    /// Human-readable engine name used in messages, e.g. `Dgraph`.
    fn name(&self) -> &str;

    fn connection_config(&self) -> &StorageEngineConnectionConfig;

    /// Externally reachable address of the engine.
    fn endpoint(&self) -> String {
        self.connection_config().endpoint()
    }

    /// Probe the engine once.
    ///
    /// `Ok(false)` means the engine answered but is not healthy; `Err` means
    /// the probe itself could not be carried out.
    fn health_check(&self, verbose: bool) -> Result<bool, ProbeError>;
}

impl<E: StorageEngine + ?Sized> StorageEngine for &E {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn connection_config(&self) -> &StorageEngineConnectionConfig {
        (**self).connection_config()
    }

    fn endpoint(&self) -> String {
        (**self).endpoint()
    }

    fn health_check(&self, verbose: bool) -> Result<bool, ProbeError> {
        (**self).health_check(verbose)
    }
}
