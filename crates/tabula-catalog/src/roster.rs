// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Metadata-service roster: the masters of the cluster and their roles.

use crate::consensus::Role;
use crate::error::CatalogError;
use crate::manager::{CatalogManager, LeaderStatus};
use crate::model::{HostPort, ServerRegistration};
use std::net::SocketAddr;
use std::sync::Arc;

/// One master as reported by the roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasterRosterEntry {
    pub permanent_uuid: String,
    pub registration: ServerRegistration,
    /// Consensus role, if known.
    pub role: Option<Role>,
    /// Set when the master could not be reached.
    pub error: Option<String>,
}

/// Endpoints clients should use to reach the masters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterEndpoints {
    /// Multi-master deployment: all configured master addresses.
    Distributed(Vec<HostPort>),
    /// Single master: its bound RPC address, possibly a wildcard.
    Standalone(SocketAddr),
}

/// Access to the masters of the cluster.
pub trait MasterRoster: Send + Sync {
    fn list_masters(&self) -> Result<Vec<MasterRosterEntry>, CatalogError>;

    /// Uuid of the master serving this process.
    fn local_uuid(&self) -> &str;

    fn advertised_endpoints(&self) -> ClusterEndpoints;
}

/// Statically configured peer master.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MasterPeer {
    /// Uuid, when known. Peers without one are listed as unreachable.
    pub permanent_uuid: Option<String>,
    pub rpc_address: HostPort,
    pub http_address: Option<HostPort>,
}

/// Roster built from configuration. The local role comes from the catalog
/// manager's leadership state; peer roles are not tracked.
pub struct StaticMasterRoster {
    local_uuid: String,
    local_registration: ServerRegistration,
    rpc_address: SocketAddr,
    master_addresses: Vec<HostPort>,
    peers: Vec<MasterPeer>,
    catalog: Arc<CatalogManager>,
}

impl StaticMasterRoster {
    pub fn new(
        local_uuid: impl Into<String>,
        local_registration: ServerRegistration,
        rpc_address: SocketAddr,
        master_addresses: Vec<HostPort>,
        catalog: Arc<CatalogManager>,
    ) -> Self {
        Self {
            local_uuid: local_uuid.into(),
            local_registration,
            rpc_address,
            master_addresses,
            peers: Vec::new(),
            catalog,
        }
    }

    pub fn with_peers(mut self, peers: Vec<MasterPeer>) -> Self {
        self.peers = peers;
        self
    }

    fn local_role(&self) -> Option<Role> {
        match self.catalog.leader_status() {
            LeaderStatus::Leader => Some(Role::Leader),
            LeaderStatus::NotLeader => Some(Role::Follower),
            LeaderStatus::Loading => None,
        }
    }
}

impl MasterRoster for StaticMasterRoster {
    fn list_masters(&self) -> Result<Vec<MasterRosterEntry>, CatalogError> {
        let mut entries = vec![MasterRosterEntry {
            permanent_uuid: self.local_uuid.clone(),
            registration: self.local_registration.clone(),
            role: self.local_role(),
            error: None,
        }];

        for peer in &self.peers {
            let registration = ServerRegistration {
                rpc_addresses: vec![peer.rpc_address.clone()],
                http_addresses: peer.http_address.iter().cloned().collect(),
            };
            let entry = match &peer.permanent_uuid {
                Some(uuid) => MasterRosterEntry {
                    permanent_uuid: uuid.clone(),
                    registration,
                    role: None,
                    error: None,
                },
                None => MasterRosterEntry {
                    permanent_uuid: String::new(),
                    registration,
                    role: None,
                    error: Some(format!(
                        "Unable to determine instance id of master at {}",
                        peer.rpc_address
                    )),
                },
            };
            entries.push(entry);
        }
        Ok(entries)
    }

    fn local_uuid(&self) -> &str {
        &self.local_uuid
    }

    fn advertised_endpoints(&self) -> ClusterEndpoints {
        if self.master_addresses.len() > 1 {
            ClusterEndpoints::Distributed(self.master_addresses.clone())
        } else {
            ClusterEndpoints::Standalone(self.rpc_address)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sys_catalog::SqliteSysCatalog;

    fn roster(catalog: Arc<CatalogManager>, masters: Vec<HostPort>) -> StaticMasterRoster {
        StaticMasterRoster::new(
            "m-local",
            ServerRegistration {
                rpc_addresses: vec![HostPort::new("m1", 7051)],
                http_addresses: vec![HostPort::new("m1", 8051)],
            },
            "0.0.0.0:7051".parse().unwrap(),
            masters,
            catalog,
        )
    }

    #[test]
    fn test_local_role_follows_leadership() {
        let catalog = Arc::new(CatalogManager::new());
        let roster = roster(Arc::clone(&catalog), Vec::new());
        assert_eq!(roster.list_masters().unwrap()[0].role, Some(Role::Follower));

        catalog
            .become_leader(&SqliteSysCatalog::new_in_memory().unwrap())
            .unwrap();
        let masters = roster.list_masters().unwrap();
        assert_eq!(masters[0].permanent_uuid, "m-local");
        assert_eq!(masters[0].role, Some(Role::Leader));
    }

    #[test]
    fn test_peers_without_uuid_report_error() {
        let roster = roster(Arc::new(CatalogManager::new()), Vec::new()).with_peers(vec![
            MasterPeer {
                permanent_uuid: Some("m-2".into()),
                rpc_address: HostPort::new("m2", 7051),
                http_address: Some(HostPort::new("m2", 8051)),
            },
            MasterPeer {
                permanent_uuid: None,
                rpc_address: HostPort::new("m3", 7051),
                http_address: None,
            },
        ]);
        let masters = roster.list_masters().unwrap();
        assert_eq!(masters.len(), 3);
        assert_eq!(masters[1].role, None);
        assert!(masters[1].error.is_none());
        assert!(masters[2].error.as_deref().unwrap().contains("m3:7051"));
    }

    #[test]
    fn test_advertised_endpoints() {
        let standalone = roster(Arc::new(CatalogManager::new()), vec![HostPort::new("m1", 7051)]);
        assert_eq!(
            standalone.advertised_endpoints(),
            ClusterEndpoints::Standalone("0.0.0.0:7051".parse().unwrap())
        );

        let addrs = vec![HostPort::new("m1", 7051), HostPort::new("m2", 7051)];
        let distributed = roster(Arc::new(CatalogManager::new()), addrs.clone());
        assert_eq!(
            distributed.advertised_endpoints(),
            ClusterEndpoints::Distributed(addrs)
        );
    }
}
