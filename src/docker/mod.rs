// Container runtime access: process runner, discovery, provisioning.

pub mod discovery;
pub mod provision;
pub mod runner;

pub use discovery::{
    CONTAINER_LABEL, ContainerRecord, ContainerStatus, discovery_command, find_container,
};
pub use provision::{ImageProvisioner, pull_command, version_command};
pub use runner::{ProcessRunner, ShellRunner};
