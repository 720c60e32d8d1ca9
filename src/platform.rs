//! Platform - command execution and file transfer on the debug target.
//!
//! Module discovery only ever talks to the target machine through this
//! interface: running a shell command with a bounded timeout and copying a
//! remote file to a local path. Remote platform connections (gdb-remote and
//! friends) live in the host debugger; this crate ships the host-local
//! implementation used when debugging processes on the same machine.

use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use thiserror::Error;

/// Platform operation errors
#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("`{command}` timed out after {timeout:?}")]
    Timeout { command: String, timeout: Duration },

    #[error("file transfer {remote} -> {local} failed: {reason}")]
    Transfer {
        remote: String,
        local: String,
        reason: String,
    },
}

/// Captured result of a shell command on the target.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Process exit status (-1 when killed by a signal).
    pub status: i32,
    /// Terminating signal, if any.
    pub signal: Option<i32>,
    /// Captured standard output.
    pub stdout: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

/// Access to the machine the target process runs on.
pub trait Platform {
    /// Short platform name, used as a component of the module cache path.
    fn name(&self) -> &str;

    /// True when the target runs on the debugger's own machine. Host targets
    /// never need remote materialization.
    fn is_host(&self) -> bool;

    /// Run a shell command on the target, blocking until it exits or the
    /// timeout elapses.
    fn run_shell_command(
        &self,
        command: &str,
        cwd: Option<&Path>,
        timeout: Duration,
    ) -> Result<CommandOutput, PlatformError>;

    /// Copy a file from the target to a local path.
    fn get_file(&self, remote: &Path, local: &Path) -> Result<(), PlatformError>;
}

/// The local machine as a debug platform.
pub struct HostPlatform;

impl HostPlatform {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HostPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for HostPlatform {
    fn name(&self) -> &str {
        "host"
    }

    fn is_host(&self) -> bool {
        true
    }

    fn run_shell_command(
        &self,
        command: &str,
        cwd: Option<&Path>,
        timeout: Duration,
    ) -> Result<CommandOutput, PlatformError> {
        let mut cmd = Command::new("/bin/sh");
        cmd.arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null());
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }

        let mut child = cmd.spawn().map_err(|source| PlatformError::Spawn {
            command: command.to_string(),
            source,
        })?;

        // Drain stdout on a helper thread so the child never blocks on a
        // full pipe while we poll for exit.
        let mut stdout_pipe = child.stdout.take();
        let reader = std::thread::spawn(move || {
            let mut buf = String::new();
            if let Some(out) = stdout_pipe.as_mut() {
                let _ = out.read_to_string(&mut buf);
            }
            buf
        });

        let deadline = Instant::now() + timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {
                    if Instant::now() >= deadline {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(PlatformError::Timeout {
                            command: command.to_string(),
                            timeout,
                        });
                    }
                    std::thread::sleep(Duration::from_millis(10));
                }
                Err(source) => {
                    return Err(PlatformError::Spawn {
                        command: command.to_string(),
                        source,
                    })
                }
            }
        };

        let stdout = reader.join().unwrap_or_default();

        #[cfg(unix)]
        let signal = {
            use std::os::unix::process::ExitStatusExt;
            status.signal()
        };
        #[cfg(not(unix))]
        let signal = None;

        Ok(CommandOutput {
            status: status.code().unwrap_or(-1),
            signal,
            stdout,
        })
    }

    fn get_file(&self, remote: &Path, local: &Path) -> Result<(), PlatformError> {
        std::fs::copy(remote, local)
            .map(|_| ())
            .map_err(|e| PlatformError::Transfer {
                remote: remote.display().to_string(),
                local: local.display().to_string(),
                reason: e.to_string(),
            })
    }
}

/// Check whether a pid names a live process on the local machine.
#[cfg(target_os = "linux")]
pub fn pid_alive(pid: u32) -> bool {
    use nix::sys::signal;
    use nix::unistd::Pid;

    signal::kill(Pid::from_raw(pid as i32), None).is_ok()
}

#[cfg(not(target_os = "linux"))]
pub fn pid_alive(_pid: u32) -> bool {
    false
}
