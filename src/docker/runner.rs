use std::process::{Command, Output, Stdio};

use tracing::debug;

use crate::error::ProcessError;

/// Runs one external command line and returns what it printed.
///
/// Implementations keep no state between calls; the pipeline only ever
/// talks to the container runtime through this seam.
pub trait ProcessRunner {
    fn run(&self, command_line: &str) -> Result<String, ProcessError>;
}

impl<R: ProcessRunner + ?Sized> ProcessRunner for &R {
    fn run(&self, command_line: &str) -> Result<String, ProcessError> {
        (**self).run(command_line)
    }
}

/// Spawns real child processes. The command line is split with shell quoting
/// rules but never handed to a shell.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellRunner;

impl ProcessRunner for ShellRunner {
    fn run(&self, command_line: &str) -> Result<String, ProcessError> {
        let argv = shell_words::split(command_line).map_err(|source| ProcessError::Parse {
            command: command_line.to_string(),
            source,
        })?;
        let (program, args) = argv.split_first().ok_or(ProcessError::Empty)?;

        debug!(command = command_line, "spawning");
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|source| ProcessError::Spawn {
                command: command_line.to_string(),
                source,
            })?;

        collect(command_line, output)
    }
}

/// Turn a finished process into the runner's result: stdout when it printed
/// anything, stderr otherwise. Image pulls sometimes report progress on
/// stderr only.
fn collect(command_line: &str, output: Output) -> Result<String, ProcessError> {
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
        let mut combined = stdout;
        if !stderr.is_empty() {
            if !combined.is_empty() && !combined.ends_with('\n') {
                combined.push('\n');
            }
            combined.push_str(&stderr);
        }
        return Err(ProcessError::Exit {
            command: command_line.to_string(),
            code: output.status.code(),
            output: combined,
        });
    }

    debug!(command = command_line, stdout = %stdout.trim(), stderr = %stderr.trim(), "finished");
    if stdout.is_empty() { Ok(stderr) } else { Ok(stdout) }
}
