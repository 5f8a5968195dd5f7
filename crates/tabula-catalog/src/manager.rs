// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! In-memory authoritative catalog.
//!
//! Only the elected leader serves the authoritative catalog. Readers take the
//! catalog-wide leader lock in shared mode via [`CatalogManager::leader_shared_lock`],
//! which waits a bounded time and then checks leadership. Each table and
//! tablet carries its own metadata lock, taken one entity at a time.

use crate::error::CatalogError;
use crate::model::{TableMetadata, TabletMetadata};
use crate::sys_catalog::SysCatalog;
use parking_lot::{RwLock, RwLockReadGuard};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Upper bound on [`CatalogManager::leader_status`] blocking.
pub const STATUS_WAIT: Duration = Duration::from_millis(20);

/// Leadership state of this master's catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaderStatus {
    NotLeader,
    Loading,
    Leader,
}

/// State of a monitored background task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Preparing,
    Running,
    Complete,
    Failed,
    Aborted,
}

impl TaskState {
    pub fn name(self) -> &'static str {
        match self {
            Self::Preparing => "Preparing",
            Self::Running => "Running",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
            Self::Aborted => "Aborted",
        }
    }
}

/// Background task attached to a table (alter, create replicas, ...).
#[derive(Debug, Clone)]
pub struct MonitoredTask {
    pub task_type: String,
    pub description: String,
    pub state: TaskState,
    pub start_time: Instant,
    pub completion_time: Option<Instant>,
}

impl MonitoredTask {
    pub fn new(task_type: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            task_type: task_type.into(),
            description: description.into(),
            state: TaskState::Running,
            start_time: Instant::now(),
            completion_time: None,
        }
    }

    /// Time spent so far, or total time if finished.
    pub fn elapsed(&self) -> Duration {
        match self.completion_time {
            Some(done) => done.saturating_duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    pub fn finish(&mut self, state: TaskState) {
        self.state = state;
        self.completion_time = Some(Instant::now());
    }
}

/// A tablet and its metadata lock.
#[derive(Debug)]
pub struct TabletInfo {
    tablet_id: String,
    metadata: RwLock<TabletMetadata>,
}

impl TabletInfo {
    fn new(tablet_id: String, metadata: TabletMetadata) -> Self {
        Self {
            tablet_id,
            metadata: RwLock::new(metadata),
        }
    }

    pub fn id(&self) -> &str {
        &self.tablet_id
    }

    /// Shared lock on this tablet's metadata. Release it promptly.
    pub fn metadata(&self) -> RwLockReadGuard<'_, TabletMetadata> {
        self.metadata.read()
    }
}

/// A table, its metadata lock, its tablets and its tasks.
#[derive(Debug)]
pub struct TableInfo {
    table_id: String,
    metadata: RwLock<TableMetadata>,
    tablets: RwLock<Vec<Arc<TabletInfo>>>,
    tasks: RwLock<Vec<MonitoredTask>>,
}

impl TableInfo {
    fn new(table_id: String, metadata: TableMetadata) -> Self {
        Self {
            table_id,
            metadata: RwLock::new(metadata),
            tablets: RwLock::new(Vec::new()),
            tasks: RwLock::new(Vec::new()),
        }
    }

    pub fn id(&self) -> &str {
        &self.table_id
    }

    /// Shared lock on this table's metadata. Release it promptly.
    pub fn metadata(&self) -> RwLockReadGuard<'_, TableMetadata> {
        self.metadata.read()
    }

    /// All tablets of this table, in creation order.
    pub fn tablets(&self) -> Vec<Arc<TabletInfo>> {
        self.tablets.read().clone()
    }

    pub fn tasks(&self) -> Vec<MonitoredTask> {
        self.tasks.read().clone()
    }

    fn upsert_tablet(&self, tablet_id: &str, metadata: TabletMetadata) {
        let mut tablets = self.tablets.write();
        if let Some(existing) = tablets.iter().find(|t| t.id() == tablet_id) {
            *existing.metadata.write() = metadata;
        } else {
            tablets.push(Arc::new(TabletInfo::new(tablet_id.to_string(), metadata)));
        }
    }
}

/// Shared hold on the catalog leader lock.
///
/// While held, leadership cannot change. Dropping it releases the lock.
pub struct LeaderSharedLock<'a> {
    manager: &'a CatalogManager,
    _guard: RwLockReadGuard<'a, LeaderStatus>,
}

impl<'a> LeaderSharedLock<'a> {
    /// All tables, in no particular order.
    pub fn all_tables(&self) -> Vec<Arc<TableInfo>> {
        self.manager.tables.read().values().cloned().collect()
    }

    pub fn table_info(&self, table_id: &str) -> Option<Arc<TableInfo>> {
        self.manager.tables.read().get(table_id).cloned()
    }
}

/// Authoritative in-memory catalog.
#[derive(Debug)]
pub struct CatalogManager {
    leader_lock: RwLock<LeaderStatus>,
    tables: RwLock<HashMap<String, Arc<TableInfo>>>,
}

impl Default for CatalogManager {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogManager {
    /// Create a catalog that is not (yet) leader.
    pub fn new() -> Self {
        Self {
            leader_lock: RwLock::new(LeaderStatus::NotLeader),
            tables: RwLock::new(HashMap::new()),
        }
    }

    /// Acquire the leader lock in shared mode, waiting at most `wait`.
    ///
    /// Fails with [`CatalogError::NotReady`] if the lock is not acquired in
    /// time (typically because leadership is changing) or if this master is
    /// not the leader.
    pub fn leader_shared_lock(&self, wait: Duration) -> Result<LeaderSharedLock<'_>, CatalogError> {
        let guard = self.leader_lock.try_read_for(wait).ok_or_else(|| {
            CatalogError::NotReady(format!(
                "catalog leader lock not acquired within {}ms",
                wait.as_millis()
            ))
        })?;

        match *guard {
            LeaderStatus::Leader => Ok(LeaderSharedLock {
                manager: self,
                _guard: guard,
            }),
            LeaderStatus::Loading => Err(CatalogError::NotReady(
                "catalog is still loading".into(),
            )),
            LeaderStatus::NotLeader => Err(CatalogError::NotReady(
                "this master is not the leader".into(),
            )),
        }
    }

    /// Current leadership state, waiting at most [`STATUS_WAIT`].
    ///
    /// A writer that is only queued delays the read instead of failing it.
    /// Reports `Loading` while a leadership transition holds the lock longer.
    pub fn leader_status(&self) -> LeaderStatus {
        self.leader_status_within(STATUS_WAIT)
    }

    fn leader_status_within(&self, wait: Duration) -> LeaderStatus {
        self.leader_lock
            .try_read_for(wait)
            .map(|status| *status)
            .unwrap_or(LeaderStatus::Loading)
    }

    /// Take over leadership, loading the catalog from its persisted log.
    ///
    /// The leader lock is held exclusively for the whole load.
    pub fn become_leader(&self, sys_catalog: &dyn SysCatalog) -> Result<(), CatalogError> {
        let mut status = self.leader_lock.write();
        *status = LeaderStatus::Loading;
        info!("Loading catalog from persisted log");

        let mut tables: HashMap<String, Arc<TableInfo>> = HashMap::new();
        let mut tablets: Vec<(String, TabletMetadata)> = Vec::new();
        let scanned = sys_catalog.scan(
            &mut |table_id, metadata| {
                tables.insert(
                    table_id.to_string(),
                    Arc::new(TableInfo::new(table_id.to_string(), metadata)),
                );
            },
            &mut |tablet_id, metadata| tablets.push((tablet_id.to_string(), metadata)),
        );

        if let Err(e) = scanned {
            warn!("Failed to load catalog: {}", e);
            *status = LeaderStatus::NotLeader;
            return Err(e);
        }

        let mut orphaned = 0usize;
        for (tablet_id, metadata) in tablets {
            match tables.get(&metadata.table_id) {
                Some(table) => table.upsert_tablet(&tablet_id, metadata),
                None => orphaned += 1,
            }
        }
        if orphaned > 0 {
            warn!("{} tablet entries reference unknown tables", orphaned);
        }

        let table_count = tables.len();
        *self.tables.write() = tables;
        *status = LeaderStatus::Leader;
        info!("Catalog loaded: {} tables, now leader", table_count);
        Ok(())
    }

    /// Give up leadership. The in-memory catalog is dropped.
    pub fn step_down(&self) {
        let mut status = self.leader_lock.write();
        *status = LeaderStatus::NotLeader;
        self.tables.write().clear();
        info!("Stepped down, catalog no longer authoritative");
    }

    /// Insert or replace a table.
    pub fn upsert_table(&self, table_id: &str, metadata: TableMetadata) -> Arc<TableInfo> {
        let mut tables = self.tables.write();
        if let Some(existing) = tables.get(table_id) {
            *existing.metadata.write() = metadata;
            return Arc::clone(existing);
        }
        let info = Arc::new(TableInfo::new(table_id.to_string(), metadata));
        tables.insert(table_id.to_string(), Arc::clone(&info));
        info
    }

    /// Insert or replace a tablet of an existing table.
    pub fn upsert_tablet(&self, tablet_id: &str, metadata: TabletMetadata) -> Result<(), CatalogError> {
        let table = self
            .tables
            .read()
            .get(&metadata.table_id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("table {}", metadata.table_id)))?;
        table.upsert_tablet(tablet_id, metadata);
        Ok(())
    }

    /// Attach a monitored task to a table.
    pub fn add_task(&self, table_id: &str, task: MonitoredTask) -> Result<(), CatalogError> {
        let table = self
            .tables
            .read()
            .get(table_id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("table {}", table_id)))?;
        table.tasks.write().push(task);
        Ok(())
    }
}
