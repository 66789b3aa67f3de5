//! Post-start health verification.
//!
//! The engine needs time to boot inside its container, so verification waits
//! once for a fixed delay and then probes exactly once. There is no retry.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::{HealthCheckFailure, LaunchError, Result};
use crate::storage::StorageEngine;

/// Default wait before the single health probe.
pub const DEFAULT_HEALTH_DELAY: Duration = Duration::from_secs(10);

/// Source of delays, swappable in tests.
pub trait Clock {
    fn sleep(&self, duration: Duration);
}

impl<C: Clock + ?Sized> Clock for &C {
    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// How long to wait before probing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthPolicy {
    pub delay: Duration,
}

impl HealthPolicy {
    pub fn fixed(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn immediate() -> Self {
        Self::fixed(Duration::ZERO)
    }
}

impl Default for HealthPolicy {
    fn default() -> Self {
        Self::fixed(DEFAULT_HEALTH_DELAY)
    }
}

pub struct HealthMonitor<'a> {
    engine: &'a dyn StorageEngine,
    clock: &'a dyn Clock,
    policy: HealthPolicy,
}

impl<'a> HealthMonitor<'a> {
    pub fn new(engine: &'a dyn StorageEngine, clock: &'a dyn Clock, policy: HealthPolicy) -> Self {
        Self {
            engine,
            clock,
            policy,
        }
    }

    /// Wait, probe once, and return the engine's endpoint when it is healthy.
    pub fn verify(&self) -> Result<String> {
        let engine = self.engine.name().to_string();
        let endpoint = self.engine.endpoint();

        debug!(delay = ?self.policy.delay, "waiting before health check");
        self.clock.sleep(self.policy.delay);

        match self.engine.health_check(false) {
            Ok(true) => {
                info!(%endpoint, "{engine} health check passed");
                Ok(endpoint)
            }
            Ok(false) => {
                warn!(%endpoint, "{engine} reported not running");
                Err(LaunchError::HealthCheckFailed {
                    failure: HealthCheckFailure::NotRunning {
                        engine: engine.clone(),
                        endpoint,
                    },
                    engine,
                })
            }
            Err(source) => {
                warn!(%endpoint, error = %source, "{engine} health probe raised");
                Err(LaunchError::HealthCheckFailed {
                    engine,
                    failure: HealthCheckFailure::ProbeFailed { endpoint, source },
                })
            }
        }
    }
}
