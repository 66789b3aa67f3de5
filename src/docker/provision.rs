use std::path::Path;

use tracing::{debug, info};

use crate::error::{LaunchError, Result};

use super::ProcessRunner;

/// `<runtime> -v`
pub fn version_command(runtime: &str) -> String {
    format!("{} -v", shell_words::quote(runtime))
}

/// `<runtime> pull <image>`
pub fn pull_command(runtime: &str, image: &str) -> String {
    format!("{} pull {}", shell_words::quote(runtime), shell_words::quote(image))
}

/// Prerequisites for creating a fresh container: the runtime itself, the
/// bind-mounted data directory, and the engine image.
pub struct ImageProvisioner<'a> {
    runner: &'a dyn ProcessRunner,
    runtime: &'a str,
}

impl<'a> ImageProvisioner<'a> {
    pub fn new(runner: &'a dyn ProcessRunner, runtime: &'a str) -> Self {
        Self { runner, runtime }
    }

    /// Verify the container runtime answers a version probe.
    pub fn check_runtime_installed(&self) -> Result<String> {
        let version = self
            .runner
            .run(&version_command(self.runtime))
            .map_err(|source| LaunchError::RuntimeMissing {
                runtime: self.runtime.to_string(),
                source,
            })?;
        let version = version.trim().to_string();
        debug!(runtime = self.runtime, %version, "runtime found");
        Ok(version)
    }

    /// Create the data directory if it does not exist yet. Never removes
    /// anything.
    pub fn ensure_data_directory(&self, path: &Path) -> Result<()> {
        if path.is_dir() {
            debug!(path = %path.display(), "data directory already present");
            return Ok(());
        }
        std::fs::create_dir_all(path).map_err(|source| LaunchError::DirectoryCreationFailed {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "created data directory");
        Ok(())
    }

    /// Pull the engine image. Callers decide whether a failure matters.
    pub fn pull_image(&self, image: &str) -> Result<()> {
        let output = self
            .runner
            .run(&pull_command(self.runtime, image))
            .map_err(|source| LaunchError::PullFailed {
                image: image.to_string(),
                source,
            })?;
        debug!(%image, output = %output.trim(), "pull finished");
        Ok(())
    }
}
