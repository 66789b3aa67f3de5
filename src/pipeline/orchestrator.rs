use tracing::{debug, error, info, warn};

use crate::docker::{ContainerRecord, ContainerStatus, ImageProvisioner, ProcessRunner, find_container};
use crate::error::{LaunchError, Result};
use crate::health::{Clock, HealthMonitor};
use crate::storage::StorageEngine;

use super::commands::{create_command, start_command};
use super::types::{
    ContainerSource, LaunchContext, LaunchReport, LaunchState, ProvisioningOutcome, SkipReason,
    Step,
};

/// Drives one run: runtime check, discovery, optional provisioning, start or
/// create, health verification.
///
/// Priority: a running container is reused as is, an exited one is started,
/// and only when neither exists is the image pulled and a container created.
pub struct Launcher<'a> {
    ctx: &'a LaunchContext,
    runner: &'a dyn ProcessRunner,
    engine: &'a dyn StorageEngine,
    clock: &'a dyn Clock,
    transitions: Vec<LaunchState>,
    absorbed: Vec<LaunchError>,
}

impl<'a> Launcher<'a> {
    pub fn new(
        ctx: &'a LaunchContext,
        runner: &'a dyn ProcessRunner,
        engine: &'a dyn StorageEngine,
        clock: &'a dyn Clock,
    ) -> Self {
        Self {
            ctx,
            runner,
            engine,
            clock,
            transitions: Vec::new(),
            absorbed: Vec::new(),
        }
    }

    /// Run the pipeline to a terminal state.
    pub fn run(mut self) -> LaunchReport {
        self.enter(LaunchState::Init);

        let outcome = match self.drive() {
            Ok((endpoint, source)) => {
                self.enter(LaunchState::Succeeded);
                ProvisioningOutcome::Success { endpoint, source }
            }
            Err(err) => {
                error!(error = %err, "launch failed");
                self.enter(LaunchState::Failed);
                ProvisioningOutcome::from(err)
            }
        };

        LaunchReport {
            outcome,
            transitions: self.transitions,
            absorbed: self.absorbed,
        }
    }

    fn drive(&mut self) -> Result<(String, ContainerSource)> {
        self.check_runtime()?;

        info!("checking for an existing {} instance", self.engine.name());
        self.enter(LaunchState::DiscoveringRunning);
        let source = match self.discover(ContainerStatus::Running) {
            Step::Continue(running) => {
                info!(id = %running.id, "reusable container found");
                ContainerSource::Reused(running.id)
            }
            Step::Abort(err) => return Err(err),
            Step::Skip(_) => {
                self.enter(LaunchState::DiscoveringExited);
                match self.discover(ContainerStatus::Exited) {
                    Step::Continue(exited) => {
                        info!(id = %exited.id, "reusable container found");
                        self.enter(LaunchState::StartingOrCreating);
                        self.start_existing(&exited.id)?;
                        ContainerSource::Restarted(exited.id)
                    }
                    Step::Abort(err) => return Err(err),
                    Step::Skip(_) => {
                        info!("no reusable instances found");
                        self.enter(LaunchState::Provisioning);
                        let pull_failed = match self.provision() {
                            Step::Abort(err) => return Err(err),
                            Step::Skip(reason) => reason == SkipReason::PullFailed,
                            Step::Continue(()) => false,
                        };
                        self.enter(LaunchState::StartingOrCreating);
                        self.create_new(pull_failed)?;
                        ContainerSource::Created
                    }
                }
            }
        };

        self.enter(LaunchState::AwaitingHealth);
        let endpoint = self.await_health()?;
        Ok((endpoint, source))
    }

    fn check_runtime(&self) -> Result<()> {
        info!(runtime = %self.ctx.runtime, "checking for container runtime");
        let version = self.provisioner().check_runtime_installed()?;
        info!(%version, "{} found", self.ctx.runtime);
        Ok(())
    }

    /// Discovery never aborts: a failed query is logged and treated as
    /// "nothing found".
    fn discover(&mut self, status: ContainerStatus) -> Step<ContainerRecord> {
        match find_container(self.runner, &self.ctx.runtime, &self.ctx.label, status) {
            Ok(Some(record)) => Step::Continue(record),
            Ok(None) => {
                debug!(%status, "no labelled container");
                Step::Skip(SkipReason::NotFound(status))
            }
            Err(err) => {
                warn!(error = %err, "container discovery failed, treating as absent");
                self.absorbed.push(err);
                Step::Skip(SkipReason::DiscoveryFailed(status))
            }
        }
    }

    /// Data directory then image pull. A failed pull does not stop the run.
    fn provision(&mut self) -> Step<()> {
        let provisioner = self.provisioner();
        if let Err(err) = provisioner.ensure_data_directory(&self.ctx.data_dir()) {
            return Step::Abort(err);
        }

        info!(image = %self.ctx.image, "pulling {} image", self.engine.name());
        match provisioner.pull_image(&self.ctx.image) {
            Ok(()) => {
                info!(image = %self.ctx.image, "pulled image");
                Step::Continue(())
            }
            Err(err) => {
                warn!(error = %err, "image pull failed, attempting to start anyway");
                self.absorbed.push(err);
                Step::Skip(SkipReason::PullFailed)
            }
        }
    }

    fn start_existing(&self, id: &str) -> Result<()> {
        info!(%id, "spinning up existing {} instance", self.engine.name());
        self.runner
            .run(&start_command(self.ctx, id))
            .map_err(|source| LaunchError::StartFailed {
                engine: self.engine.name().to_string(),
                id: id.to_string(),
                source,
            })?;
        info!("{} instance running", self.engine.name());
        Ok(())
    }

    fn create_new(&self, pull_failed: bool) -> Result<()> {
        info!(name = %self.ctx.container_name, "spinning up new {} instance", self.engine.name());
        let id = self
            .runner
            .run(&create_command(self.ctx))
            .map_err(|source| LaunchError::CreateFailed {
                engine: self.engine.name().to_string(),
                prior_pull_failure: pull_failed.then(|| self.ctx.image.clone()),
                source,
            })?;
        info!(id = %id.trim(), "{} instance running", self.engine.name());
        Ok(())
    }

    fn await_health(&self) -> Result<String> {
        info!("running health check on {}", self.engine.name());
        HealthMonitor::new(self.engine, self.clock, self.ctx.health).verify()
    }

    fn provisioner(&self) -> ImageProvisioner<'a> {
        ImageProvisioner::new(self.runner, &self.ctx.runtime)
    }

    fn enter(&mut self, state: LaunchState) {
        debug!(from = ?self.transitions.last(), to = ?state, "state transition");
        self.transitions.push(state);
    }
}
