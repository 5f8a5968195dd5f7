// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Tabula Catalog
//!
//! The catalog side of a tabula master: what the status pages and the entity
//! export observe.
//!
//! # Architecture
//!
//! ```text
//! CatalogManager      (authoritative in-memory catalog, leader only)
//! +-- TableInfo       (per-table metadata lock, tablets, tasks)
//!     +-- TabletInfo  (per-tablet metadata lock)
//! SysCatalog          (persisted catalog log, readable on any master)
//! TsManager           (tablet server liveness)
//! MasterRoster        (masters and their roles)
//! ```
//!
//! Replica roles are derived from a tablet's committed configuration with
//! [`consensus_role`]; they are never stored.

pub mod consensus;
pub mod error;
pub mod manager;
pub mod model;
pub mod partition;
pub mod roster;
pub mod schema;
pub mod sys_catalog;
pub mod ts_manager;

pub use consensus::{consensus_role, Role};
pub use error::CatalogError;
pub use manager::{
    CatalogManager, LeaderSharedLock, LeaderStatus, MonitoredTask, TableInfo, TabletInfo, TaskState,
};
pub use model::{
    CommittedConfig, HostPort, MemberType, ReplicaDescriptor, ServerRegistration, TableMetadata,
    TableState, TabletMetadata, TabletState,
};
pub use partition::{
    HashDimensionDescriptor, Partition, PartitionDescriptor, PartitionSchema,
    PartitionSchemaDescriptor,
};
pub use roster::{ClusterEndpoints, MasterPeer, MasterRoster, MasterRosterEntry, StaticMasterRoster};
pub use schema::{ColumnSchema, DataType, Schema, SchemaDescriptor};
pub use sys_catalog::{SqliteSysCatalog, SysCatalog};
pub use ts_manager::{TsDescriptor, TsManager};
