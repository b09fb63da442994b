//! Runner configuration

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable overriding [`FfmpegConfig::program`]
pub const PROGRAM_ENV: &str = "FFCHAIN_FFMPEG";
/// Environment variable overriding [`FfmpegConfig::shell`]
pub const SHELL_ENV: &str = "FFCHAIN_SHELL";

/// How compiled graphs are executed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FfmpegConfig {
    /// Program name placed at the front of every command (e.g. "ffmpeg", "/usr/local/bin/ffmpeg")
    pub program: String,
    /// Shell used to run the command line
    pub shell: String,
}

impl Default for FfmpegConfig {
    fn default() -> Self {
        Self {
            program: "ffmpeg".to_string(),
            shell: "sh".to_string(),
        }
    }
}

impl FfmpegConfig {
    /// Parse a YAML document; missing keys keep their defaults
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Defaults, overridden by `FFCHAIN_FFMPEG` / `FFCHAIN_SHELL` when set
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(program) = lookup(PROGRAM_ENV).filter(|v| !v.is_empty()) {
            self.program = program;
        }
        if let Some(shell) = lookup(SHELL_ENV).filter(|v| !v.is_empty()) {
            self.shell = shell;
        }
        self
    }
}
