// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Route definitions for the master web UI.

use crate::handlers;
use crate::page::{DUMP_ENTITIES_PATH, MASTERS_PATH, TABLES_PATH, TABLET_SERVERS_PATH, TABLE_PATH};
use crate::server::AppState;
use axum::{routing::get, Router};
use std::sync::Arc;

/// Styled status pages.
pub fn page_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::index))
        .route(TABLET_SERVERS_PATH, get(handlers::tablet_servers))
        .route(TABLES_PATH, get(handlers::tables))
        .route(TABLE_PATH, get(handlers::table))
        .route(MASTERS_PATH, get(handlers::masters))
}

/// Machine-readable export.
pub fn export_routes() -> Router<Arc<AppState>> {
    Router::new().route(DUMP_ENTITIES_PATH, get(handlers::dump_entities))
}
