// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Persisted catalog log.
//!
//! The catalog engine writes one entry per table and tablet. Readers scan the
//! log directly, without any in-memory catalog lock, so a scan works on any
//! master regardless of leadership and reflects whatever was last durably
//! written.

use crate::error::CatalogError;
use crate::model::{TableMetadata, TabletMetadata};
use parking_lot::Mutex;
use rusqlite::{params, Connection};
use std::path::Path;

const TABLE_ENTRY: i64 = 1;
const TABLET_ENTRY: i64 = 2;

/// Forward scan over the persisted catalog.
///
/// Entries are delivered in log order: `on_table(table_id, metadata)` for
/// table entries and `on_tablet(tablet_id, metadata)` for tablet entries.
/// The scan stops at the first storage or decode failure and returns it.
pub trait SysCatalog: Send + Sync {
    fn scan(
        &self,
        on_table: &mut dyn FnMut(&str, TableMetadata),
        on_tablet: &mut dyn FnMut(&str, TabletMetadata),
    ) -> Result<(), CatalogError>;
}

/// SQLite-backed catalog log.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE sys_catalog (
///     seq INTEGER PRIMARY KEY AUTOINCREMENT,
///     entry_type INTEGER NOT NULL,
///     entry_id TEXT NOT NULL UNIQUE,
///     metadata TEXT NOT NULL
/// );
/// ```
///
/// Upserts keep the original `seq`, so scan order is first-write order.
pub struct SqliteSysCatalog {
    conn: Mutex<Connection>,
}

impl SqliteSysCatalog {
    /// Open (or create) a file-based catalog.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|e| {
            CatalogError::Storage(format!(
                "failed to open catalog at {}: {}",
                path.display(),
                e
            ))
        })?;
        let catalog = Self {
            conn: Mutex::new(conn),
        };
        catalog.init_schema()?;
        Ok(catalog)
    }

    /// Create an in-memory catalog (for testing).
    pub fn new_in_memory() -> Result<Self, CatalogError> {
        let catalog = Self {
            conn: Mutex::new(Connection::open_in_memory()?),
        };
        catalog.init_schema()?;
        Ok(catalog)
    }

    fn init_schema(&self) -> Result<(), CatalogError> {
        let conn = self.conn.lock();
        conn.execute(
            "CREATE TABLE IF NOT EXISTS sys_catalog (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                entry_type INTEGER NOT NULL,
                entry_id TEXT NOT NULL UNIQUE,
                metadata TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    fn upsert(&self, entry_type: i64, entry_id: &str, metadata: String) -> Result<(), CatalogError> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO sys_catalog (entry_type, entry_id, metadata)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(entry_id) DO UPDATE SET
                entry_type = excluded.entry_type,
                metadata = excluded.metadata",
            params![entry_type, entry_id, metadata],
        )?;
        Ok(())
    }

    /// Write or replace a table entry.
    pub fn upsert_table(&self, table_id: &str, metadata: &TableMetadata) -> Result<(), CatalogError> {
        self.upsert(TABLE_ENTRY, table_id, serde_json::to_string(metadata)?)
    }

    /// Write or replace a tablet entry.
    pub fn upsert_tablet(
        &self,
        tablet_id: &str,
        metadata: &TabletMetadata,
    ) -> Result<(), CatalogError> {
        self.upsert(TABLET_ENTRY, tablet_id, serde_json::to_string(metadata)?)
    }

    /// Remove an entry. Returns whether it existed.
    pub fn delete_entry(&self, entry_id: &str) -> Result<bool, CatalogError> {
        let conn = self.conn.lock();
        let removed = conn.execute("DELETE FROM sys_catalog WHERE entry_id = ?1", [entry_id])?;
        Ok(removed > 0)
    }

    /// Total number of entries.
    pub fn count(&self) -> Result<usize, CatalogError> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM sys_catalog", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    #[cfg(test)]
    fn write_raw(&self, entry_type: i64, entry_id: &str, metadata: &str) -> Result<(), CatalogError> {
        self.upsert(entry_type, entry_id, metadata.to_string())
    }
}

impl SysCatalog for SqliteSysCatalog {
    fn scan(
        &self,
        on_table: &mut dyn FnMut(&str, TableMetadata),
        on_tablet: &mut dyn FnMut(&str, TabletMetadata),
    ) -> Result<(), CatalogError> {
        let conn = self.conn.lock();
        let mut stmt =
            conn.prepare("SELECT entry_type, entry_id, metadata FROM sys_catalog ORDER BY seq ASC")?;
        let mut rows = stmt.query([])?;

        while let Some(row) = rows.next()? {
            let entry_type: i64 = row.get(0)?;
            let entry_id: String = row.get(1)?;
            let metadata: String = row.get(2)?;

            match entry_type {
                TABLE_ENTRY => {
                    let table: TableMetadata = serde_json::from_str(&metadata).map_err(|e| {
                        CatalogError::Decode(format!("table entry {}: {}", entry_id, e))
                    })?;
                    on_table(&entry_id, table);
                }
                TABLET_ENTRY => {
                    let tablet: TabletMetadata = serde_json::from_str(&metadata).map_err(|e| {
                        CatalogError::Decode(format!("tablet entry {}: {}", entry_id, e))
                    })?;
                    on_tablet(&entry_id, tablet);
                }
                other => {
                    return Err(CatalogError::Decode(format!(
                        "unknown entry type {} for entry {}",
                        other, entry_id
                    )));
                }
            }
        }
        Ok(())
    }
}
