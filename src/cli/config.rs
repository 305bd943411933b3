//! Console configuration
//!
//! Settings come from three layers: command-line flags (and their env vars),
//! an optional TOML file, and built-in defaults, in that order of precedence.
//!
//! ```toml
//! [backend]
//! program = "hive-backend"
//! args = ["--profile", "paper"]
//! timeout_secs = 30
//!
//! [ui]
//! bar_width = 40
//! spinner = true
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::bridge::ProcessBridge;
use crate::report::DEFAULT_BAR_WIDTH;
use crate::utils::logging::app_dir;

use super::args::Cli;

pub const DEFAULT_PROGRAM: &str = "hive-backend";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Contents of the TOML config file. Every key is optional.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub backend: BackendSection,
    pub ui: UiSection,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct BackendSection {
    pub program: Option<PathBuf>,
    pub args: Option<Vec<String>>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct UiSection {
    pub bar_width: Option<usize>,
    pub spinner: Option<bool>,
}

impl FileConfig {
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config file: {}", path.display()))
    }
}

/// Default config file location, `<config dir>/hivectl/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    app_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

/// Resolved settings for one console run
#[derive(Debug, Clone, PartialEq)]
pub struct ConsoleConfig {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub timeout: Duration,
    pub bar_width: usize,
    pub spinner: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_PROGRAM),
            args: Vec::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            bar_width: DEFAULT_BAR_WIDTH,
            spinner: true,
        }
    }
}

impl ConsoleConfig {
    /// Resolve settings from the command line and the config file.
    ///
    /// An explicit `--config` path must exist; the default location is read
    /// only when a file is present there.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => match default_config_path() {
                Some(path) if path.is_file() => FileConfig::load(&path)?,
                _ => FileConfig::default(),
            },
        };
        Self::merge(cli, file)
    }

    /// Layer CLI values over file values over defaults, then validate
    pub fn merge(cli: &Cli, file: FileConfig) -> Result<Self> {
        let defaults = Self::default();

        let program = cli
            .backend
            .clone()
            .or(file.backend.program)
            .unwrap_or(defaults.program);
        let args = if cli.backend_args.is_empty() {
            file.backend.args.unwrap_or(defaults.args)
        } else {
            cli.backend_args.clone()
        };
        let timeout_secs = cli
            .timeout
            .or(file.backend.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let bar_width = cli
            .bar_width
            .or(file.ui.bar_width)
            .unwrap_or(defaults.bar_width);
        let spinner = !cli.no_spinner && file.ui.spinner.unwrap_or(defaults.spinner);

        if program.as_os_str().is_empty() {
            bail!("Backend program must not be empty");
        }
        if !(1..=3600).contains(&timeout_secs) {
            bail!(
                "Backend timeout must be between 1 and 3600 seconds, got {}",
                timeout_secs
            );
        }
        if !(10..=120).contains(&bar_width) {
            bail!("Bar width must be between 10 and 120, got {}", bar_width);
        }

        Ok(Self {
            program,
            args,
            timeout: Duration::from_secs(timeout_secs),
            bar_width,
            spinner,
        })
    }

    /// Bridge client for the configured backend
    pub fn bridge(&self) -> ProcessBridge {
        ProcessBridge::new(self.program.clone())
            .with_args(self.args.clone())
            .with_timeout(self.timeout)
            .with_spinner(self.spinner)
    }
}
