pub mod commands;
pub mod orchestrator;
mod types;

pub use orchestrator::Launcher;
pub use types::{
    ContainerSource, ENGINE_DATA_SUBDIR, LaunchContext, LaunchReport, LaunchState,
    ProvisioningOutcome, SkipReason, Step,
};
