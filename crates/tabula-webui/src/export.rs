// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Stable JSON export of catalog entities.
//!
//! The document is consumed by external monitoring agents to track tables and
//! tablets as time-series entities. Its shape is a frozen protocol:
//!
//! ```json
//! {"tables":[{"table_id":"..","table_name":"..","state":"RUNNING"}],
//!  "tablets":[{"table_id":"..","tablet_id":"..","state":"RUNNING",
//!              "replicas":[{"type":"VOTER","server_uuid":"..","addr":"host:port"}],
//!              "leader":".."}]}
//! ```
//!
//! The export DTOs below are written out field by field and never derived
//! from the persisted metadata types, so those can change freely. Do not
//! rename, remove or restructure fields.
//!
//! The export reads the persisted catalog log directly (raw mode). It works on
//! any master, takes no catalog lock and may trail the leader slightly.

use crate::snapshot::{SnapshotReader, TableSnapshot, TabletSnapshot};
use serde::Serialize;
use std::sync::Arc;
use tabula_catalog::CatalogError;
use tracing::warn;

#[derive(Debug, Serialize)]
struct TableEntity {
    table_id: String,
    table_name: String,
    state: &'static str,
}

#[derive(Debug, Serialize)]
struct ReplicaEntity {
    #[serde(rename = "type")]
    member_type: &'static str,
    server_uuid: String,
    addr: String,
}

#[derive(Debug, Serialize)]
struct TabletEntity {
    table_id: String,
    tablet_id: String,
    state: &'static str,
    /// Absent when the tablet has no committed config.
    #[serde(skip_serializing_if = "Option::is_none")]
    replicas: Option<Vec<ReplicaEntity>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    leader: Option<String>,
}

#[derive(Debug, Default, Serialize)]
struct EntityDump {
    tables: Vec<TableEntity>,
    tablets: Vec<TabletEntity>,
}

impl From<TableSnapshot> for TableEntity {
    fn from(table: TableSnapshot) -> Self {
        Self {
            table_id: table.table_id,
            table_name: table.name,
            state: table.state.name(),
        }
    }
}

impl From<TabletSnapshot> for TabletEntity {
    fn from(tablet: TabletSnapshot) -> Self {
        let (replicas, leader) = match tablet.committed_config {
            Some(config) => {
                let replicas = config
                    .peers
                    .into_iter()
                    .map(|peer| ReplicaEntity {
                        member_type: peer.member_type.name(),
                        server_uuid: peer.permanent_uuid,
                        addr: peer.last_known_addr.to_string(),
                    })
                    .collect();
                (Some(replicas), config.leader_uuid)
            }
            None => (None, None),
        };
        Self {
            table_id: tablet.table_id,
            tablet_id: tablet.tablet_id,
            state: tablet.state.name(),
            replicas,
            leader,
        }
    }
}

/// Produces the `/dump-entities` document.
pub struct EntityExporter {
    reader: Arc<dyn SnapshotReader>,
}

impl EntityExporter {
    pub fn new(reader: Arc<dyn SnapshotReader>) -> Self {
        Self { reader }
    }

    /// Export running tables and tablets in log order.
    ///
    /// On a scan failure the whole document is `{"error":"<message>"}`.
    pub fn dump_entities(&self) -> String {
        let dump = match self.collect() {
            Ok(dump) => dump,
            Err(e) => {
                warn!("Entity dump failed: {}", e);
                return error_document(&e.to_string());
            }
        };
        serde_json::to_string(&dump).unwrap_or_else(|e| error_document(&e.to_string()))
    }

    fn collect(&self) -> Result<EntityDump, CatalogError> {
        let mut dump = EntityDump::default();
        self.reader.scan_raw(
            &mut |table| {
                if table.is_running() {
                    dump.tables.push(TableEntity::from(table));
                }
            },
            &mut |tablet| {
                if tablet.is_running() {
                    dump.tablets.push(TabletEntity::from(tablet));
                }
            },
        )?;
        Ok(dump)
    }
}

fn error_document(message: &str) -> String {
    serde_json::json!({ "error": message }).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{CatalogSnapshotReader, TableDetail};
    use serde_json::{json, Value};
    use std::sync::{mpsc, Mutex};
    use std::thread;
    use std::time::{Duration, Instant};
    use tabula_catalog::{
        CatalogManager, ColumnSchema, CommittedConfig, DataType, HostPort, MemberType,
        PartitionDescriptor, PartitionSchemaDescriptor, ReplicaDescriptor, SchemaDescriptor,
        SqliteSysCatalog, SysCatalog, TableMetadata, TableState, TabletMetadata, TabletState,
    };

    fn exporter(log: Arc<SqliteSysCatalog>) -> EntityExporter {
        // Not leader: the export must not depend on the authoritative catalog.
        let reader = CatalogSnapshotReader::new(
            Arc::new(CatalogManager::new()),
            log,
            Duration::from_millis(10),
        );
        EntityExporter::new(Arc::new(reader))
    }

    fn table(name: &str, state: TableState) -> TableMetadata {
        TableMetadata {
            name: name.to_string(),
            state,
            state_msg: "internal detail".into(),
            version: 2,
            schema: SchemaDescriptor {
                columns: vec![ColumnSchema::new(0, "id", DataType::Int64).key()],
            },
            partition_schema: PartitionSchemaDescriptor::default(),
        }
    }

    fn tablet(table_id: &str, state: TabletState, config: Option<CommittedConfig>) -> TabletMetadata {
        TabletMetadata {
            table_id: table_id.to_string(),
            partition: PartitionDescriptor::default(),
            state,
            state_msg: String::new(),
            committed_config: config,
        }
    }

    fn replica(uuid: &str, host: &str, member_type: MemberType) -> ReplicaDescriptor {
        ReplicaDescriptor {
            permanent_uuid: uuid.to_string(),
            last_known_addr: HostPort::new(host, 7050),
            member_type,
        }
    }

    #[test]
    fn test_empty_catalog() {
        let log = Arc::new(SqliteSysCatalog::new_in_memory().unwrap());
        assert_eq!(exporter(log).dump_entities(), r#"{"tables":[],"tablets":[]}"#);
    }

    #[test]
    fn test_running_entities_in_log_order() {
        let log = Arc::new(SqliteSysCatalog::new_in_memory().unwrap());
        log.upsert_table("t-z", &table("zeta", TableState::Running)).unwrap();
        log.upsert_table("t-a", &table("alpha", TableState::Running)).unwrap();
        log.upsert_table("t-d", &table("gone", TableState::Deleting)).unwrap();
        let config = CommittedConfig {
            peers: vec![
                replica("ts-1", "h1", MemberType::Voter),
                replica("ts-2", "h2", MemberType::NonVoter),
            ],
            leader_uuid: Some("ts-1".into()),
        };
        log.upsert_tablet("tb-1", &tablet("t-z", TabletState::Running, Some(config)))
            .unwrap();
        log.upsert_tablet("tb-2", &tablet("t-a", TabletState::Creating, None))
            .unwrap();
        log.upsert_tablet("tb-3", &tablet("t-a", TabletState::Running, None))
            .unwrap();

        let doc: Value = serde_json::from_str(&exporter(log).dump_entities()).unwrap();
        assert_eq!(
            doc,
            json!({
                "tables": [
                    {"table_id": "t-z", "table_name": "zeta", "state": "RUNNING"},
                    {"table_id": "t-a", "table_name": "alpha", "state": "RUNNING"}
                ],
                "tablets": [
                    {
                        "table_id": "t-z",
                        "tablet_id": "tb-1",
                        "state": "RUNNING",
                        "replicas": [
                            {"type": "VOTER", "server_uuid": "ts-1", "addr": "h1:7050"},
                            {"type": "NON_VOTER", "server_uuid": "ts-2", "addr": "h2:7050"}
                        ],
                        "leader": "ts-1"
                    },
                    {"table_id": "t-a", "tablet_id": "tb-3", "state": "RUNNING"}
                ]
            })
        );
    }

    #[test]
    fn test_leader_omitted_when_unknown() {
        let log = Arc::new(SqliteSysCatalog::new_in_memory().unwrap());
        let config = CommittedConfig {
            peers: vec![replica("ts-1", "h1", MemberType::Voter)],
            leader_uuid: None,
        };
        log.upsert_tablet("tb-1", &tablet("t1", TabletState::Running, Some(config)))
            .unwrap();

        let out = exporter(log).dump_entities();
        assert_eq!(
            out,
            r#"{"tables":[],"tablets":[{"table_id":"t1","tablet_id":"tb-1","state":"RUNNING","replicas":[{"type":"VOTER","server_uuid":"ts-1","addr":"h1:7050"}]}]}"#
        );
    }

    struct FailingReader;

    impl SnapshotReader for FailingReader {
        fn running_tables(&self) -> Result<Vec<TableSnapshot>, CatalogError> {
            Ok(Vec::new())
        }

        fn table_detail(&self, table_id: &str) -> Result<TableDetail, CatalogError> {
            Err(CatalogError::NotFound(table_id.to_string()))
        }

        fn scan_raw(
            &self,
            on_table: &mut dyn FnMut(TableSnapshot),
            _on_tablet: &mut dyn FnMut(TabletSnapshot),
        ) -> Result<(), CatalogError> {
            on_table(TableSnapshot::new("t1", table("partial", TableState::Running)));
            Err(CatalogError::Storage("disk read failed".into()))
        }
    }

    #[test]
    fn test_scan_failure_replaces_document() {
        let out = EntityExporter::new(Arc::new(FailingReader)).dump_entities();
        assert_eq!(out, r#"{"error":"IO error: disk read failed"}"#);
    }

    /// Catalog log whose scan blocks until released.
    struct BlockingSysCatalog {
        entered: mpsc::SyncSender<()>,
        release: Mutex<mpsc::Receiver<()>>,
    }

    impl SysCatalog for BlockingSysCatalog {
        fn scan(
            &self,
            _on_table: &mut dyn FnMut(&str, TableMetadata),
            _on_tablet: &mut dyn FnMut(&str, TabletMetadata),
        ) -> Result<(), CatalogError> {
            self.entered.send(()).ok();
            self.release.lock().unwrap().recv().ok();
            Ok(())
        }
    }

    #[test]
    fn test_export_does_not_wait_for_leader_lock() {
        let log = Arc::new(SqliteSysCatalog::new_in_memory().unwrap());
        log.upsert_table("t1", &table("events", TableState::Running)).unwrap();

        let (entered_tx, entered_rx) = mpsc::sync_channel(1);
        let (release_tx, release_rx) = mpsc::channel();
        let blocking = BlockingSysCatalog {
            entered: entered_tx,
            release: Mutex::new(release_rx),
        };
        let catalog = Arc::new(CatalogManager::new());
        let loader = {
            let catalog = Arc::clone(&catalog);
            thread::spawn(move || catalog.become_leader(&blocking))
        };
        entered_rx.recv().unwrap();

        // The leader lock is now held exclusively for the load.
        let lock_wait = Duration::from_secs(2);
        let reader = Arc::new(CatalogSnapshotReader::new(
            Arc::clone(&catalog),
            log,
            lock_wait,
        ));
        let exporter = EntityExporter::new(reader.clone() as Arc<dyn SnapshotReader>);

        let start = Instant::now();
        let out = exporter.dump_entities();
        assert!(start.elapsed() < lock_wait / 2);
        assert_eq!(
            out,
            r#"{"tables":[{"table_id":"t1","table_name":"events","state":"RUNNING"}],"tablets":[]}"#
        );
        assert!(matches!(
            reader.running_tables(),
            Err(CatalogError::NotReady(_))
        ));

        release_tx.send(()).unwrap();
        loader.join().unwrap().unwrap();
    }
}
