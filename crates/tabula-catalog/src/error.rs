// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Catalog error type.

use thiserror::Error;

/// Errors surfaced while observing the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The authoritative catalog cannot be read: this master is not the leader,
    /// is still loading, or the leader lock was not acquired in time.
    #[error("Service unavailable: {0}")]
    NotReady(String),

    /// Unknown table, tablet or server.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed persisted encoding (schema, partition or catalog row).
    #[error("Corruption: {0}")]
    Decode(String),

    /// The persisted catalog log could not be read.
    #[error("IO error: {0}")]
    Storage(String),
}

impl From<rusqlite::Error> for CatalogError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
