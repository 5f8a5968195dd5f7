// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Web UI configuration.
//!
//! Loaded from a TOML file; every field has a default.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tabula_catalog::HostPort;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// A statically configured master.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterConfig {
    /// Permanent uuid; omit if unknown.
    #[serde(default)]
    pub uuid: Option<String>,
    /// RPC address (`host:port`).
    pub rpc_address: String,
    /// HTTP address (`host:port`), if the master serves pages.
    #[serde(default)]
    pub http_address: Option<String>,
}

/// A tablet server seeded into the liveness tracker at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabletServerConfig {
    pub uuid: String,
    #[serde(default)]
    pub rpc_addresses: Vec<String>,
    #[serde(default)]
    pub http_addresses: Vec<String>,
}

/// Master web UI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebUiConfig {
    /// HTTP bind address.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// HTTP port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Permanent uuid of this master.
    #[serde(default = "default_instance_uuid")]
    pub instance_uuid: String,

    /// Local RPC socket address; may be a wildcard.
    #[serde(default = "default_rpc_address")]
    pub rpc_address: String,

    /// All master RPC addresses (`host:port`). More than one means distributed.
    #[serde(default)]
    pub master_addresses: Vec<String>,

    /// SQLite file holding the persisted catalog log.
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,

    /// Load the catalog and act as leader at startup.
    #[serde(default = "default_true")]
    pub assume_leadership: bool,

    /// Bounded wait for the catalog leader lock (milliseconds).
    #[serde(default = "default_leader_lock_wait_ms")]
    pub leader_lock_wait_ms: u64,

    /// Log level.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Peer masters.
    #[serde(default)]
    pub masters: Vec<MasterConfig>,

    /// Tablet servers known at startup.
    #[serde(default)]
    pub tablet_servers: Vec<TabletServerConfig>,
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8051
}

fn default_instance_uuid() -> String {
    "master-1".to_string()
}

fn default_rpc_address() -> String {
    "0.0.0.0:7051".to_string()
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("sys_catalog.db")
}

fn default_true() -> bool {
    true
}

fn default_leader_lock_wait_ms() -> u64 {
    500
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for WebUiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            instance_uuid: default_instance_uuid(),
            rpc_address: default_rpc_address(),
            master_addresses: Vec::new(),
            catalog_path: default_catalog_path(),
            assume_leadership: true,
            leader_lock_wait_ms: default_leader_lock_wait_ms(),
            log_level: default_log_level(),
            masters: Vec::new(),
            tablet_servers: Vec::new(),
        }
    }
}

impl WebUiConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::Invalid("HTTP port must not be 0".into()));
        }
        if self.instance_uuid.trim().is_empty() {
            return Err(ConfigError::Invalid("instance_uuid is empty".into()));
        }
        if self.leader_lock_wait_ms == 0 {
            return Err(ConfigError::Invalid(
                "leader_lock_wait_ms must be greater than 0".into(),
            ));
        }
        self.rpc_socket_addr()?;
        self.master_host_ports()?;

        for (i, master) in self.masters.iter().enumerate() {
            parse_host_port(&master.rpc_address)
                .map_err(|e| ConfigError::Invalid(format!("Master {}: {}", i, e)))?;
            if let Some(http) = &master.http_address {
                parse_host_port(http)
                    .map_err(|e| ConfigError::Invalid(format!("Master {}: {}", i, e)))?;
            }
        }

        for ts in &self.tablet_servers {
            if ts.uuid.trim().is_empty() {
                return Err(ConfigError::Invalid("Tablet server with empty uuid".into()));
            }
            for addr in ts.rpc_addresses.iter().chain(&ts.http_addresses) {
                parse_host_port(addr).map_err(|e| {
                    ConfigError::Invalid(format!("Tablet server {}: {}", ts.uuid, e))
                })?;
            }
        }
        Ok(())
    }

    pub fn leader_lock_wait(&self) -> Duration {
        Duration::from_millis(self.leader_lock_wait_ms)
    }

    pub fn rpc_socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.rpc_address.parse().map_err(|_| {
            ConfigError::Invalid(format!("Invalid rpc_address '{}'", self.rpc_address))
        })
    }

    pub fn master_host_ports(&self) -> Result<Vec<HostPort>, ConfigError> {
        self.master_addresses
            .iter()
            .map(|addr| {
                if addr.trim().is_empty() {
                    return Err(ConfigError::Invalid("Empty entry in master_addresses".into()));
                }
                parse_host_port(addr)
            })
            .collect()
    }

    /// Example configuration written by `gen-config`.
    pub fn example() -> Self {
        Self {
            instance_uuid: "4f3c9a8e2b1d4e6f".into(),
            master_addresses: vec![
                "master-1.example.com:7051".into(),
                "master-2.example.com:7051".into(),
                "master-3.example.com:7051".into(),
            ],
            masters: vec![
                MasterConfig {
                    uuid: Some("9b7d2c4a1e0f3b5d".into()),
                    rpc_address: "master-2.example.com:7051".into(),
                    http_address: Some("master-2.example.com:8051".into()),
                },
                MasterConfig {
                    uuid: None,
                    rpc_address: "master-3.example.com:7051".into(),
                    http_address: None,
                },
            ],
            tablet_servers: vec![TabletServerConfig {
                uuid: "ts-0001".into(),
                rpc_addresses: vec!["tserver-1.example.com:7050".into()],
                http_addresses: vec!["tserver-1.example.com:8050".into()],
            }],
            ..Default::default()
        }
    }
}

pub(crate) fn parse_host_port(addr: &str) -> Result<HostPort, ConfigError> {
    HostPort::parse(addr).map_err(|e| ConfigError::Invalid(e.to_string()))
}
