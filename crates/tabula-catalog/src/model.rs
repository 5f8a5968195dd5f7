// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Catalog entries as they are persisted in the catalog log.
//!
//! These are the internal representation of tables and tablets. Their serde
//! names are a storage detail and may evolve; the external export format lives
//! in the web UI crate and is mapped field by field.

use crate::error::CatalogError;
use crate::partition::{PartitionDescriptor, PartitionSchemaDescriptor};
use crate::schema::SchemaDescriptor;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Network endpoint advertised by a server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HostPort {
    pub host: String,
    pub port: u16,
}

impl HostPort {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Parse a `host:port` string.
    pub fn parse(s: &str) -> Result<Self, CatalogError> {
        let (host, port) = s
            .rsplit_once(':')
            .ok_or_else(|| CatalogError::Decode(format!("missing port in address '{}'", s)))?;
        if host.is_empty() {
            return Err(CatalogError::Decode(format!(
                "missing host in address '{}'",
                s
            )));
        }
        let port = port
            .parse::<u16>()
            .map_err(|e| CatalogError::Decode(format!("invalid port in address '{}': {}", s, e)))?;
        Ok(Self::new(host, port))
    }
}

impl fmt::Display for HostPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Addresses a server registers with the master.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerRegistration {
    #[serde(default)]
    pub rpc_addresses: Vec<HostPort>,
    #[serde(default)]
    pub http_addresses: Vec<HostPort>,
}

impl ServerRegistration {
    /// First advertised HTTP endpoint, used to link to the server's own pages.
    pub fn first_http_address(&self) -> Option<&HostPort> {
        self.http_addresses.first()
    }

    /// Compact single-line description of the registration.
    pub fn debug_string(&self) -> String {
        let mut parts = Vec::new();
        for hp in &self.rpc_addresses {
            parts.push(format!("rpc_addresses {{ host: \"{}\" port: {} }}", hp.host, hp.port));
        }
        for hp in &self.http_addresses {
            parts.push(format!("http_addresses {{ host: \"{}\" port: {} }}", hp.host, hp.port));
        }
        parts.join(" ")
    }
}

/// Table lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableState {
    Preparing,
    Running,
    Altering,
    Deleting,
    Deleted,
}

impl TableState {
    /// Upper-case state name (`RUNNING`).
    pub fn name(self) -> &'static str {
        match self {
            Self::Preparing => "PREPARING",
            Self::Running => "RUNNING",
            Self::Altering => "ALTERING",
            Self::Deleting => "DELETING",
            Self::Deleted => "DELETED",
        }
    }

    /// Capitalized state name for display (`Running`).
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Preparing => "Preparing",
            Self::Running => "Running",
            Self::Altering => "Altering",
            Self::Deleting => "Deleting",
            Self::Deleted => "Deleted",
        }
    }
}

/// Tablet lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TabletState {
    Preparing,
    Creating,
    Running,
    Replaced,
    Deleted,
}

impl TabletState {
    pub fn name(self) -> &'static str {
        match self {
            Self::Preparing => "PREPARING",
            Self::Creating => "CREATING",
            Self::Running => "RUNNING",
            Self::Replaced => "REPLACED",
            Self::Deleted => "DELETED",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Preparing => "Preparing",
            Self::Creating => "Creating",
            Self::Running => "Running",
            Self::Replaced => "Replaced",
            Self::Deleted => "Deleted",
        }
    }
}

/// Membership type of a replica within its replication group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberType {
    Voter,
    NonVoter,
}

impl MemberType {
    pub fn name(self) -> &'static str {
        match self {
            Self::Voter => "VOTER",
            Self::NonVoter => "NON_VOTER",
        }
    }
}

/// One member of a tablet's replication group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicaDescriptor {
    pub permanent_uuid: String,
    pub last_known_addr: HostPort,
    pub member_type: MemberType,
}

/// Last committed replication configuration of a tablet.
///
/// Roles are never stored on replicas; they are derived from `leader_uuid`
/// and the member type (see [`crate::consensus_role`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommittedConfig {
    #[serde(default)]
    pub peers: Vec<ReplicaDescriptor>,
    #[serde(default)]
    pub leader_uuid: Option<String>,
}

impl CommittedConfig {
    /// Look up a peer by its permanent uuid.
    pub fn peer(&self, uuid: &str) -> Option<&ReplicaDescriptor> {
        self.peers.iter().find(|p| p.permanent_uuid == uuid)
    }
}

/// Persisted metadata of a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMetadata {
    pub name: String,
    pub state: TableState,
    #[serde(default)]
    pub state_msg: String,
    #[serde(default)]
    pub version: u32,
    pub schema: SchemaDescriptor,
    #[serde(default)]
    pub partition_schema: PartitionSchemaDescriptor,
}

impl TableMetadata {
    pub fn is_running(&self) -> bool {
        self.state == TableState::Running
    }
}

/// Persisted metadata of a tablet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabletMetadata {
    pub table_id: String,
    #[serde(default)]
    pub partition: PartitionDescriptor,
    pub state: TabletState,
    #[serde(default)]
    pub state_msg: String,
    #[serde(default)]
    pub committed_config: Option<CommittedConfig>,
}

impl TabletMetadata {
    pub fn is_running(&self) -> bool {
        self.state == TabletState::Running
    }
}
