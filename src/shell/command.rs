//! Shell command execution.

use crate::error::{InstallerError, Result};
use std::collections::HashMap;
use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// How often a running child is polled for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Result of executing a shell command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }

    /// Stdout and stderr joined, for diagnostics.
    pub fn combined_output(&self) -> String {
        match (self.stdout.trim(), self.stderr.trim()) {
            ("", err) => err.to_string(),
            (out, "") => out.to_string(),
            (out, err) => format!("{}\n{}", out, err),
        }
    }
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Environment variables (merged with system env).
    pub env: HashMap<String, String>,

    /// Kill the command once this much time has passed (None = no timeout).
    pub timeout: Option<Duration>,
}

impl CommandOptions {
    /// Options with only a timeout set.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            ..Default::default()
        }
    }

    /// Add an environment variable.
    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }
}

/// Capability for running external commands.
///
/// The resolution engine only talks to the outside world through this
/// trait, so tests substitute a scripted runner.
pub trait CommandRunner {
    /// Run a shell command line, capturing its output.
    ///
    /// A non-zero exit is an `Ok` result with `success == false`; `Err` is
    /// reserved for spawn failures and timeouts.
    fn run(&self, command: &str, options: &CommandOptions) -> Result<CommandResult>;
}

/// Runs commands through `/bin/sh -c`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    fn run(&self, command: &str, options: &CommandOptions) -> Result<CommandResult> {
        execute(command, options)
    }
}

/// Execute a shell command, capturing stdout and stderr.
pub fn execute(command: &str, options: &CommandOptions) -> Result<CommandResult> {
    let start = Instant::now();

    let mut cmd = Command::new(detect_shell());
    cmd.arg("-c");
    cmd.arg(command);

    for (key, value) in &options.env {
        cmd.env(key, value);
    }

    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    tracing::debug!("Executing: {}", command);

    let mut child = cmd.spawn().map_err(|_| InstallerError::CommandFailed {
        command: command.to_string(),
        code: None,
    })?;

    // Drain both pipes on their own threads so a chatty child can't block
    // on a full pipe while we poll for exit.
    let stdout_handle = drain(child.stdout.take());
    let stderr_handle = drain(child.stderr.take());

    let status = match wait_with_deadline(&mut child, options.timeout, start) {
        Ok(Some(status)) => status,
        Ok(None) => {
            let _ = child.kill();
            let _ = child.wait();
            let after = options.timeout.unwrap_or_default();
            tracing::debug!("Timed out after {:?}: {}", after, command);
            return Err(InstallerError::Timeout {
                command: command.to_string(),
                after,
            });
        }
        Err(_) => {
            let _ = child.kill();
            return Err(InstallerError::CommandFailed {
                command: command.to_string(),
                code: None,
            });
        }
    };

    let stdout = stdout_handle.join().unwrap_or_default();
    let stderr = stderr_handle.join().unwrap_or_default();
    let duration = start.elapsed();

    if status.success() {
        Ok(CommandResult::success(stdout, stderr, duration))
    } else {
        Ok(CommandResult::failure(status.code(), stdout, stderr, duration))
    }
}

/// Poll the child until it exits. `Ok(None)` means the deadline passed.
fn wait_with_deadline(
    child: &mut Child,
    timeout: Option<Duration>,
    start: Instant,
) -> std::io::Result<Option<std::process::ExitStatus>> {
    let Some(timeout) = timeout else {
        return child.wait().map(Some);
    };

    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if start.elapsed() >= timeout {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        String::from_utf8_lossy(&buf).to_string()
    })
}

/// Shell used to interpret command lines.
fn detect_shell() -> &'static str {
    "/bin/sh"
}
