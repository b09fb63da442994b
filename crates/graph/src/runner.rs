//! Execution of compiled command lines

use crate::config::FfmpegConfig;
use std::io;
use std::process::Command;
use tracing::debug;

/// Captured result of one external process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    /// Exit code, `None` when the process was killed by a signal
    pub code: Option<i32>,
    pub success: bool,
}

impl ProcessOutput {
    /// Standard output followed by standard error.
    ///
    /// The streams are captured separately, so lines are not interleaved in the
    /// order the process wrote them; all of stdout comes first.
    #[must_use]
    pub fn combined(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.stdout.len() + self.stderr.len());
        bytes.extend_from_slice(&self.stdout);
        bytes.extend_from_slice(&self.stderr);
        bytes
    }

    #[must_use]
    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    #[must_use]
    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

/// Runs a complete command line and blocks until it exits
pub trait ProcessRunner {
    fn execute(&self, command: &str) -> io::Result<ProcessOutput>;
}

/// Hands the command line to a shell (`sh -c <command>`)
#[derive(Debug, Clone)]
pub struct ShellRunner {
    shell: String,
}

impl ShellRunner {
    pub fn new(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new("sh")
    }
}

impl From<&FfmpegConfig> for ShellRunner {
    fn from(config: &FfmpegConfig) -> Self {
        Self::new(config.shell.clone())
    }
}

impl ProcessRunner for ShellRunner {
    fn execute(&self, command: &str) -> io::Result<ProcessOutput> {
        debug!("Executing via {}: {}", self.shell, command);

        let output = Command::new(&self.shell).arg("-c").arg(command).output()?;

        Ok(ProcessOutput {
            stdout: output.stdout,
            stderr: output.stderr,
            code: output.status.code(),
            success: output.status.success(),
        })
    }
}
