// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Point-in-time catalog snapshots for rendering.
//!
//! Two access modes:
//!
//! - **Authoritative**: reads the leader's in-memory catalog under the shared
//!   leader lock. Fails fast with `NotReady` on a non-leader or while loading.
//!   Each entity's metadata lock is taken on its own and released as soon as
//!   its fields are copied.
//! - **Raw**: scans the persisted catalog log. Takes no catalog lock and works
//!   on any master; it may trail the authoritative state slightly.
//!
//! Snapshots are owned copies, built per request and dropped after rendering.

use std::sync::Arc;
use std::time::Duration;
use tabula_catalog::{
    CatalogError, CatalogManager, CommittedConfig, MonitoredTask, PartitionDescriptor,
    PartitionSchemaDescriptor, SchemaDescriptor, SysCatalog, TableMetadata, TableState,
    TabletMetadata, TabletState, TaskState,
};
use tracing::debug;

/// Owned copy of a table's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSnapshot {
    pub table_id: String,
    pub name: String,
    pub state: TableState,
    pub state_msg: String,
    pub version: u32,
    pub schema: SchemaDescriptor,
    pub partition_schema: PartitionSchemaDescriptor,
}

impl TableSnapshot {
    pub fn new(table_id: &str, metadata: TableMetadata) -> Self {
        Self {
            table_id: table_id.to_string(),
            name: metadata.name,
            state: metadata.state,
            state_msg: metadata.state_msg,
            version: metadata.version,
            schema: metadata.schema,
            partition_schema: metadata.partition_schema,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == TableState::Running
    }
}

/// Owned copy of a tablet's state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabletSnapshot {
    pub tablet_id: String,
    pub table_id: String,
    pub partition: PartitionDescriptor,
    pub state: TabletState,
    pub state_msg: String,
    pub committed_config: Option<CommittedConfig>,
}

impl TabletSnapshot {
    pub fn new(tablet_id: &str, metadata: TabletMetadata) -> Self {
        Self {
            tablet_id: tablet_id.to_string(),
            table_id: metadata.table_id,
            partition: metadata.partition,
            state: metadata.state,
            state_msg: metadata.state_msg,
            committed_config: metadata.committed_config,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == TabletState::Running
    }
}

/// Owned copy of a monitored task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSnapshot {
    pub task_type: String,
    pub state: TaskState,
    pub elapsed: Duration,
    pub description: String,
}

impl From<&MonitoredTask> for TaskSnapshot {
    fn from(task: &MonitoredTask) -> Self {
        Self {
            task_type: task.task_type.clone(),
            state: task.state,
            elapsed: task.elapsed(),
            description: task.description.clone(),
        }
    }
}

/// Everything the table detail page shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDetail {
    pub table: TableSnapshot,
    pub tablets: Vec<TabletSnapshot>,
    pub tasks: Vec<TaskSnapshot>,
}

/// Read access to the catalog for rendering.
pub trait SnapshotReader: Send + Sync {
    /// Authoritative: tables in the running state, unordered.
    fn running_tables(&self) -> Result<Vec<TableSnapshot>, CatalogError>;

    /// Authoritative: one table by id, in any state.
    fn table_detail(&self, table_id: &str) -> Result<TableDetail, CatalogError>;

    /// Raw: scan the persisted catalog in log order.
    fn scan_raw(
        &self,
        on_table: &mut dyn FnMut(TableSnapshot),
        on_tablet: &mut dyn FnMut(TabletSnapshot),
    ) -> Result<(), CatalogError>;
}

/// [`SnapshotReader`] over the catalog manager and the persisted catalog log.
pub struct CatalogSnapshotReader {
    catalog: Arc<CatalogManager>,
    sys_catalog: Arc<dyn SysCatalog>,
    lock_wait: Duration,
}

impl CatalogSnapshotReader {
    pub fn new(
        catalog: Arc<CatalogManager>,
        sys_catalog: Arc<dyn SysCatalog>,
        lock_wait: Duration,
    ) -> Self {
        Self {
            catalog,
            sys_catalog,
            lock_wait,
        }
    }
}

impl SnapshotReader for CatalogSnapshotReader {
    fn running_tables(&self) -> Result<Vec<TableSnapshot>, CatalogError> {
        let lock = self.catalog.leader_shared_lock(self.lock_wait).map_err(|e| {
            debug!("Authoritative table listing unavailable: {}", e);
            e
        })?;

        let mut tables = Vec::new();
        for table in lock.all_tables() {
            let metadata = table.metadata();
            if !metadata.is_running() {
                continue;
            }
            tables.push(TableSnapshot::new(table.id(), metadata.clone()));
        }
        Ok(tables)
    }

    fn table_detail(&self, table_id: &str) -> Result<TableDetail, CatalogError> {
        let lock = self.catalog.leader_shared_lock(self.lock_wait).map_err(|e| {
            debug!("Authoritative table detail unavailable: {}", e);
            e
        })?;

        let table = lock
            .table_info(table_id)
            .ok_or_else(|| CatalogError::NotFound(format!("table {}", table_id)))?;

        let snapshot = {
            let metadata = table.metadata();
            TableSnapshot::new(table.id(), metadata.clone())
        };

        let tablets = table
            .tablets()
            .iter()
            .map(|tablet| {
                let metadata = tablet.metadata();
                TabletSnapshot::new(tablet.id(), metadata.clone())
            })
            .collect();

        let tasks = table.tasks().iter().map(TaskSnapshot::from).collect();

        Ok(TableDetail {
            table: snapshot,
            tablets,
            tasks,
        })
    }

    fn scan_raw(
        &self,
        on_table: &mut dyn FnMut(TableSnapshot),
        on_tablet: &mut dyn FnMut(TabletSnapshot),
    ) -> Result<(), CatalogError> {
        self.sys_catalog.scan(
            &mut |table_id, metadata| on_table(TableSnapshot::new(table_id, metadata)),
            &mut |tablet_id, metadata| on_tablet(TabletSnapshot::new(tablet_id, metadata)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_catalog::{ColumnSchema, DataType, SqliteSysCatalog};

    const WAIT: Duration = Duration::from_millis(50);

    fn table(name: &str, state: TableState) -> TableMetadata {
        TableMetadata {
            name: name.to_string(),
            state,
            state_msg: String::new(),
            version: 3,
            schema: SchemaDescriptor {
                columns: vec![ColumnSchema::new(0, "id", DataType::Int64).key()],
            },
            partition_schema: PartitionSchemaDescriptor::default(),
        }
    }

    fn tablet(table_id: &str, state: TabletState) -> TabletMetadata {
        TabletMetadata {
            table_id: table_id.to_string(),
            partition: PartitionDescriptor::default(),
            state,
            state_msg: String::new(),
            committed_config: None,
        }
    }

    fn leader_reader() -> (Arc<CatalogManager>, Arc<SqliteSysCatalog>, CatalogSnapshotReader) {
        let log = Arc::new(SqliteSysCatalog::new_in_memory().unwrap());
        let catalog = Arc::new(CatalogManager::new());
        catalog.become_leader(log.as_ref()).unwrap();
        let reader = CatalogSnapshotReader::new(Arc::clone(&catalog), log.clone(), WAIT);
        (catalog, log, reader)
    }

    #[test]
    fn test_running_tables_excludes_other_states() {
        let (catalog, _log, reader) = leader_reader();
        catalog.upsert_table("t1", table("alpha", TableState::Running));
        catalog.upsert_table("t2", table("gone", TableState::Deleting));
        catalog.upsert_table("t3", table("new", TableState::Preparing));

        let tables = reader.running_tables().unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].table_id, "t1");
        assert_eq!(tables[0].version, 3);
    }

    #[test]
    fn test_table_detail_fetches_any_state() {
        let (catalog, _log, reader) = leader_reader();
        catalog.upsert_table("t2", table("gone", TableState::Deleting));
        catalog.upsert_tablet("tb1", tablet("t2", TabletState::Running)).unwrap();
        catalog
            .add_task("t2", MonitoredTask::new("DeleteTable", "dropping gone"))
            .unwrap();

        let detail = reader.table_detail("t2").unwrap();
        assert_eq!(detail.table.name, "gone");
        assert_eq!(detail.tablets.len(), 1);
        assert_eq!(detail.tablets[0].tablet_id, "tb1");
        assert_eq!(detail.tasks[0].task_type, "DeleteTable");
    }

    #[test]
    fn test_table_detail_not_found() {
        let (_catalog, _log, reader) = leader_reader();
        assert!(matches!(
            reader.table_detail("missing"),
            Err(CatalogError::NotFound(_))
        ));
    }

    #[test]
    fn test_authoritative_reads_fail_on_non_leader() {
        let log = Arc::new(SqliteSysCatalog::new_in_memory().unwrap());
        let reader = CatalogSnapshotReader::new(Arc::new(CatalogManager::new()), log, WAIT);
        assert!(matches!(reader.running_tables(), Err(CatalogError::NotReady(_))));
        assert!(matches!(reader.table_detail("t1"), Err(CatalogError::NotReady(_))));
    }

    #[test]
    fn test_raw_scan_works_without_leadership() {
        let log = Arc::new(SqliteSysCatalog::new_in_memory().unwrap());
        log.upsert_table("t1", &table("alpha", TableState::Running)).unwrap();
        log.upsert_tablet("tb1", &tablet("t1", TabletState::Creating)).unwrap();
        let reader = CatalogSnapshotReader::new(Arc::new(CatalogManager::new()), log, WAIT);

        let mut tables = Vec::new();
        let mut tablets = Vec::new();
        reader
            .scan_raw(&mut |t| tables.push(t), &mut |t| tablets.push(t))
            .unwrap();
        assert_eq!(tables[0].name, "alpha");
        assert_eq!(tablets[0].table_id, "t1");
        assert_eq!(tablets[0].state, TabletState::Creating);
    }
}
