//! # tpmprobe Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module loads the probe defaults (target host and port, timeouts, wire
//! format, request echo) from TOML files. Command-line flags are applied on
//! top of the result by the `probe` command.
//!
//! Configuration sources (in order of precedence):
//! 1. Project-specific `.tpmprobe.toml` in the current directory or ancestors
//! 2. User-specific `<config dir>/tpmprobe/config.toml`
//! 3. Default values defined in the code
//!
//! An explicit `--config <FILE>` replaces sources 1 and 2.
//!
//! ## Examples
//!
//! ```toml
//! [target]
//! host = "10.0.0.12"
//! port = 8000
//!
//! [probe]
//! timeout_ms = 8000
//! wire_format = "minimal"
//! show_request = true
//! ```
//!
use crate::common::network::request::WireFormat;
use crate::core::error::{ProbeError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const PROJECT_CONFIG_FILENAME: &str = ".tpmprobe.toml";

/// The effective configuration after all layers are applied.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Config {
    pub target: TargetConfig,
    pub probe: ProbeConfig,
}

/// The backend the probe connects to.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetConfig {
    pub host: String,
    pub port: u16,
}

/// How a probe run behaves.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeConfig {
    /// Wall-clock budget for sending the request and reading the response.
    pub timeout_ms: u64,
    /// Upper bound on opening the TCP connection.
    pub connect_timeout_ms: u64,
    pub wire_format: WireFormat,
    /// Echo the exact request bytes above the response.
    pub show_request: bool,
}

/// One configuration file as written. Keys the file leaves out stay `None`
/// so a lower layer (or the built-in default) can fill them.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub target: TargetFile,
    #[serde(default)]
    pub probe: ProbeFile,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TargetFile {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ProbeFile {
    pub timeout_ms: Option<u64>,
    pub connect_timeout_ms: Option<u64>,
    pub wire_format: Option<WireFormat>,
    pub show_request: Option<bool>,
}

impl ConfigFile {
    /// Layers `self` over `lower`: every key set here wins.
    pub fn over(self, lower: ConfigFile) -> ConfigFile {
        ConfigFile {
            target: TargetFile {
                host: self.target.host.or(lower.target.host),
                port: self.target.port.or(lower.target.port),
            },
            probe: ProbeFile {
                timeout_ms: self.probe.timeout_ms.or(lower.probe.timeout_ms),
                connect_timeout_ms: self
                    .probe
                    .connect_timeout_ms
                    .or(lower.probe.connect_timeout_ms),
                wire_format: self.probe.wire_format.or(lower.probe.wire_format),
                show_request: self.probe.show_request.or(lower.probe.show_request),
            },
        }
    }

    /// Fills every unset key from the built-in defaults.
    pub fn resolve(self) -> Config {
        let defaults = Config::default();
        Config {
            target: TargetConfig {
                host: self.target.host.unwrap_or(defaults.target.host),
                port: self.target.port.unwrap_or(defaults.target.port),
            },
            probe: ProbeConfig {
                timeout_ms: self.probe.timeout_ms.unwrap_or(defaults.probe.timeout_ms),
                connect_timeout_ms: self
                    .probe
                    .connect_timeout_ms
                    .unwrap_or(defaults.probe.connect_timeout_ms),
                wire_format: self.probe.wire_format.unwrap_or(defaults.probe.wire_format),
                show_request: self
                    .probe
                    .show_request
                    .unwrap_or(defaults.probe.show_request),
            },
        }
    }
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            wire_format: WireFormat::default(),
            show_request: false,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    8000
}
fn default_timeout_ms() -> u64 {
    5000
}
fn default_connect_timeout_ms() -> u64 {
    3000
}

/// Loads the effective file configuration.
///
/// With `explicit` set, only that file is read (and it must exist). Otherwise
/// the user and project files are merged, project values winning.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let config = match explicit {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            load_config_from_path(path)?.resolve()
        }
        None => {
            let user_config = load_user_config()?;
            let current_dir =
                std::env::current_dir().context("Failed to get current directory")?;
            let project_config = load_project_config(&current_dir)?;
            merge_configs(user_config, project_config)
        }
    };
    validate_config(&config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", config);
    Ok(config)
}

fn load_user_config() -> Result<Option<ConfigFile>> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "tpmprobe") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config(start: &Path) -> Result<Option<ConfigFile>> {
    if let Some(project_config_path) = find_project_config_path(start) {
        info!(
            "Loading project configuration from: {}",
            project_config_path.display()
        );
        load_config_from_path(&project_config_path).map(Some)
    } else {
        debug!("No project configuration file (.tpmprobe.toml) found in current directory or ancestors.");
        Ok(None)
    }
}

/// Walks from `start` towards the filesystem root, stopping at a `.git` directory.
fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

/// Project keys win over user keys; anything neither file sets is a default.
fn merge_configs(user: Option<ConfigFile>, project: Option<ConfigFile>) -> Config {
    let user = user.unwrap_or_default();
    match project {
        Some(project) => project.over(user),
        None => user,
    }
    .resolve()
}

/// Rejects settings that would make a probe meaningless.
pub fn validate_config(config: &Config) -> Result<()> {
    if config.target.host.trim().is_empty() {
        return Err(anyhow!(ProbeError::Config(
            "Target host must not be empty.".to_string()
        )));
    }
    if config.target.port == 0 {
        return Err(anyhow!(ProbeError::Config(
            "Target port must be between 1 and 65535.".to_string()
        )));
    }
    if config.probe.timeout_ms == 0 {
        return Err(anyhow!(ProbeError::Config(
            "timeout_ms must be greater than zero.".to_string()
        )));
    }
    if config.probe.connect_timeout_ms == 0 {
        return Err(anyhow!(ProbeError::Config(
            "connect_timeout_ms must be greater than zero.".to_string()
        )));
    }
    Ok(())
}
