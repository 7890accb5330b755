//! Configuration file parsing and structures.
//!
//! Every section has defaults, so an empty file describes a dimmable light on
//! endpoint 1 with no LED attached and its state kept under `./state`.

use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::filter::Targets;

use crate::data_model::DeviceKind;
use crate::data_model::EndpointId;
use crate::driver::Actuator;
use crate::driver::ActuatorError;
use crate::driver::StubActuator;
use crate::driver::SysfsLed;
use crate::storage::DEFAULT_NAMESPACE;

/// Top-level configuration structure
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub actuator: ActuatorConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Verbosity of a log target. `off` silences it entirely.
#[derive(Debug, Default, Deserialize, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// `[logging]`: a default level plus per-module levels keyed by target path.
#[derive(Debug, Default, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: LogLevel,

    /// e.g. `"app_driver::storage" = "debug"`
    #[serde(default)]
    pub overrides: HashMap<String, LogLevel>,
}

impl LoggingConfig {
    /// Filter layer for the subscriber installed by the binary.
    pub fn filter(&self) -> Targets {
        let mut targets = Targets::new().with_default(self.level);
        for (target, level) in &self.overrides {
            targets = targets.with_target(target.as_str(), *level);
        }
        targets
    }
}

/// Which device this node exposes
#[derive(Debug, Deserialize)]
pub struct DeviceConfig {
    #[serde(default)]
    pub kind: DeviceKind,

    #[serde(default = "default_endpoint_id")]
    pub endpoint_id: EndpointId,
}

fn default_endpoint_id() -> EndpointId {
    1
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            kind: DeviceKind::default(),
            endpoint_id: default_endpoint_id(),
        }
    }
}

#[derive(Debug, Default, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActuatorKind {
    /// No LED, requests are only logged
    #[default]
    Stub,
    /// Linux LED class device
    Sysfs,
}

#[derive(Debug, Default, Deserialize)]
pub struct ActuatorConfig {
    #[serde(default)]
    pub kind: ActuatorKind,

    /// LED directory, e.g. `/sys/class/leds/led0`. Required for `sysfs`.
    #[serde(default)]
    pub led: Option<PathBuf>,
}

impl ActuatorConfig {
    pub fn build(&self) -> Result<Box<dyn Actuator>, ActuatorError> {
        match (self.kind, &self.led) {
            (ActuatorKind::Sysfs, Some(led)) => Ok(Box::new(SysfsLed::open(led)?)),
            (ActuatorKind::Sysfs, None) => Err(ActuatorError::Rejected(
                "sysfs actuator needs an LED path".to_string(),
            )),
            (ActuatorKind::Stub, _) => Ok(Box::new(StubActuator)),
        }
    }
}

#[derive(Debug, Default, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One JSON document per namespace under `path`
    #[default]
    File,
    /// Forgotten on exit
    Memory,
}

#[derive(Debug, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    #[serde(default = "default_storage_path")]
    pub path: PathBuf,

    #[serde(default = "default_namespace")]
    pub namespace: String,
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("state")
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_storage_path(),
            namespace: default_namespace(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(path.as_ref().to_path_buf(), e))?;

        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.actuator.kind == ActuatorKind::Sysfs && self.actuator.led.is_none() {
            return Err(ConfigError::Invalid(
                "actuator.led is required when actuator.kind = \"sysfs\"".to_string(),
            ));
        }
        if self.storage.namespace.is_empty() {
            return Err(ConfigError::Invalid("storage.namespace must not be empty".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
