//! Provision a local Dgraph instance through the Docker CLI.
//!
//! The [`pipeline::Launcher`] discovers a labelled container, reuses or
//! restarts it when possible, otherwise pulls the image and creates one, and
//! finally waits for the engine to pass a health check.

pub mod cli;
pub mod config;
pub mod docker;
pub mod error;
pub mod health;
pub mod logging;
pub mod pipeline;
pub mod storage;

pub use error::{HealthCheckFailure, LaunchError, ProbeError, ProcessError};
pub use pipeline::{LaunchContext, LaunchReport, Launcher, ProvisioningOutcome};
