//! Configuration system for Beacon.
//!
//! Resolution order: environment variables → config file → defaults.
//!
//! Config file location:
//!   1. $BEACON_CONFIG (explicit override)
//!   2. $XDG_CONFIG_HOME/beacon/config.toml
//!   3. ~/.config/beacon/config.toml

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BeaconConfig {
    pub network: NetworkConfig,
    pub registry: RegistryConfig,
    pub limits: Limits,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Address the HTTP API listens on.
    pub listen_addr: String,
    /// TCP port the HTTP API listens on.
    pub listen_port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Seconds without a refresh before an entry is considered stale.
    /// The sweep runs at half this interval.
    pub stale_threshold_secs: u64,
    /// Seconds to wait for a probe acknowledgement.
    pub probe_timeout_secs: u64,
    /// Re-verify reachability on every refresh, not just first contact.
    pub reprobe_on_update: bool,
}

/// Validation bounds for registration payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Valid advertised port range, inclusive.
    pub port_min: u16,
    pub port_max: u16,
    /// Valid server name byte length after trimming, inclusive.
    pub name_min: usize,
    pub name_max: usize,
}

// ── Defaults ──────────────────────────────────────────────────────────────────

impl Default for BeaconConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            registry: RegistryConfig::default(),
            limits: Limits::default(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0".to_string(),
            listen_port: 8080,
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            stale_threshold_secs: 30,
            probe_timeout_secs: 3,
            reprobe_on_update: false,
        }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            port_min: 1024,
            port_max: 65535,
            name_min: 3,
            name_max: 32,
        }
    }
}

impl RegistryConfig {
    pub fn stale_threshold(&self) -> Duration {
        Duration::from_secs(self.stale_threshold_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}

// ── Path helpers ──────────────────────────────────────────────────────────────

fn config_dir() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs_or_home().join(".config"))
        .join("beacon")
}

fn dirs_or_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {0}: {1}")]
    ReadFailed(PathBuf, std::io::Error),
    #[error("failed to parse {0}: {1}")]
    ParseFailed(PathBuf, toml::de::Error),
    #[error("failed to write {0}: {1}")]
    WriteFailed(PathBuf, std::io::Error),
    #[error("failed to serialize: {0}")]
    SerializeFailed(toml::ser::Error),
}

// ── Loading ───────────────────────────────────────────────────────────────────

impl BeaconConfig {
    /// Load config: env vars → file → defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::file_path();
        let mut config = if path.exists() {
            let text = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadFailed(path.clone(), e))?;
            toml::from_str(&text).map_err(|e| ConfigError::ParseFailed(path.clone(), e))?
        } else {
            BeaconConfig::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Config file path.
    pub fn file_path() -> PathBuf {
        std::env::var("BEACON_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| config_dir().join("config.toml"))
    }

    /// Write default config if none exists. Returns the path.
    pub fn write_default_if_missing() -> Result<PathBuf, ConfigError> {
        let path = Self::file_path();
        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| ConfigError::WriteFailed(path.clone(), e))?;
            }
            let text = toml::to_string_pretty(&BeaconConfig::default())
                .map_err(ConfigError::SerializeFailed)?;
            std::fs::write(&path, text)
                .map_err(|e| ConfigError::WriteFailed(path.clone(), e))?;
        }
        Ok(path)
    }

    /// Apply BEACON_* env var overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("BEACON_NETWORK__LISTEN_ADDR") {
            self.network.listen_addr = v;
        }
        if let Ok(v) = std::env::var("BEACON_NETWORK__LISTEN_PORT") {
            if let Ok(p) = v.parse() {
                self.network.listen_port = p;
            }
        }
        if let Ok(v) = std::env::var("BEACON_REGISTRY__STALE_THRESHOLD_SECS") {
            if let Ok(s) = v.parse() {
                self.registry.stale_threshold_secs = s;
            }
        }
        if let Ok(v) = std::env::var("BEACON_REGISTRY__PROBE_TIMEOUT_SECS") {
            if let Ok(s) = v.parse() {
                self.registry.probe_timeout_secs = s;
            }
        }
        if let Ok(v) = std::env::var("BEACON_REGISTRY__REPROBE_ON_UPDATE") {
            self.registry.reprobe_on_update = v == "true" || v == "1";
        }
    }
}
