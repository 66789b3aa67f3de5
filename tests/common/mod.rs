//! Fakes shared by the integration tests: a scripted container runtime, a
//! storage engine with a canned health answer, and a clock that only records.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use cglaunch::config::{Config, StorageEngineConnectionConfig};
use cglaunch::docker::ProcessRunner;
use cglaunch::health::Clock;
use cglaunch::storage::StorageEngine;
use cglaunch::{LaunchContext, ProbeError, ProcessError};

/// `Ok(stdout)` or `Err(output of a non-zero exit)`.
pub type Reply = Result<&'static str, &'static str>;

pub struct FakeRuntime {
    pub calls: RefCell<Vec<String>>,
    pub version: Reply,
    pub running: Reply,
    pub exited: Reply,
    pub pull: Reply,
    pub start: Reply,
    pub create: Reply,
}

impl Default for FakeRuntime {
    fn default() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            version: Ok("Docker version 27.3.1, build ce12230\n"),
            running: Ok(""),
            exited: Ok(""),
            pull: Ok("Status: Downloaded newer image for dgraph/standalone:latest\n"),
            start: Ok("3f2a9c1b\n"),
            create: Ok("9b8e7d6c5a4f\n"),
        }
    }
}

impl FakeRuntime {
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    pub fn discovery_calls(&self) -> usize {
        self.count("docker ps")
    }
}

impl ProcessRunner for FakeRuntime {
    fn run(&self, command_line: &str) -> Result<String, ProcessError> {
        self.calls.borrow_mut().push(command_line.to_string());

        let reply = if command_line == "docker -v" {
            self.version
        } else if command_line.starts_with("docker ps") && command_line.contains("status=running") {
            self.running
        } else if command_line.starts_with("docker ps") && command_line.contains("status=exited") {
            self.exited
        } else if command_line.starts_with("docker pull ") {
            self.pull
        } else if command_line.starts_with("docker container start ") {
            self.start
        } else if command_line.starts_with("docker run ") {
            self.create
        } else {
            Err("unexpected command")
        };

        reply.map(str::to_string).map_err(|output| ProcessError::Exit {
            command: command_line.to_string(),
            code: Some(1),
            output: output.to_string(),
        })
    }
}

/// What the clock and the engine did, in the order they did it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Sleep(Duration),
    Probe,
}

/// One log shared between a `RecordingClock` and a `FakeEngine`.
pub type EventLog = Rc<RefCell<Vec<Event>>>;

#[derive(Clone, Copy)]
pub enum Health {
    Healthy,
    NotRunning,
    Raises,
}

pub struct FakeEngine {
    pub connection: StorageEngineConnectionConfig,
    pub health: Health,
    pub probes: Cell<usize>,
    pub events: EventLog,
}

impl FakeEngine {
    pub fn new(health: Health) -> Self {
        Self::with_connection(health, StorageEngineConnectionConfig::default())
    }

    pub fn with_connection(health: Health, connection: StorageEngineConnectionConfig) -> Self {
        Self {
            connection,
            health,
            probes: Cell::new(0),
            events: EventLog::default(),
        }
    }

    /// Record probes into `events` alongside another fake.
    pub fn sharing(mut self, events: &EventLog) -> Self {
        self.events = Rc::clone(events);
        self
    }
}

impl StorageEngine for FakeEngine {
    fn name(&self) -> &str {
        "Dgraph"
    }

    fn connection_config(&self) -> &StorageEngineConnectionConfig {
        &self.connection
    }

    fn health_check(&self, _verbose: bool) -> Result<bool, ProbeError> {
        self.probes.set(self.probes.get() + 1);
        self.events.borrow_mut().push(Event::Probe);
        match self.health {
            Health::Healthy => Ok(true),
            Health::NotRunning => Ok(false),
            Health::Raises => Err(ProbeError::Payload {
                url: format!("{}/health", self.connection.endpoint()),
                source: serde_json::from_str::<serde_json::Value>("<html>").unwrap_err(),
            }),
        }
    }
}

#[derive(Default)]
pub struct RecordingClock {
    pub sleeps: RefCell<Vec<Duration>>,
    pub events: EventLog,
}

impl RecordingClock {
    pub fn sharing(events: &EventLog) -> Self {
        Self {
            sleeps: RefCell::default(),
            events: Rc::clone(events),
        }
    }
}

impl Clock for RecordingClock {
    fn sleep(&self, duration: Duration) {
        self.sleeps.borrow_mut().push(duration);
        self.events.borrow_mut().push(Event::Sleep(duration));
    }
}

pub fn context(data_root: &Path) -> LaunchContext {
    LaunchContext::with_data_root(&Config::default(), data_root.to_path_buf())
}
