// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Tabula Master Web UI
//!
//! Read-only operational views of a tabula master's catalog.
//!
//! # Endpoints
//!
//! - `GET /tablet-servers` - Tablet server roster
//! - `GET /tables` - Running tables, sorted by name
//! - `GET /table?id=<table_id>` - Table detail with replica placement
//! - `GET /masters` - Master roster and roles
//! - `GET /dump-entities` - Stable JSON export for monitoring agents
//!
//! # Consistency
//!
//! ```text
//! HTML pages:     SnapshotReader (authoritative) -> CatalogRenderer -> styled HTML
//! /dump-entities: SnapshotReader (raw)           -> EntityExporter  -> JSON
//! ```
//!
//! HTML pages read the leader's in-memory catalog and report "not ready" on
//! other masters. The export scans the persisted catalog log so it stays
//! available on every master, at the cost of slight staleness.
//!
//! # Example
//!
//! ```ignore
//! use tabula_webui::{Collaborators, MasterWebUi, WebUiConfig, WebUiOptions};
//!
//! let config = WebUiConfig::from_file("tabula.toml")?;
//! let ui = MasterWebUi::new(Collaborators::from_config(&config)?, (&config).into());
//! let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
//! ui.serve(listener, async { tokio::signal::ctrl_c().await.ok(); }).await?;
//! ```

mod addr;
pub mod config;
pub mod export;
mod handlers;
pub mod html;
pub mod page;
pub mod render;
pub mod replicas;
mod routes;
pub mod server;
pub mod snapshot;

pub use config::{ConfigError, MasterConfig, TabletServerConfig, WebUiConfig};
pub use export::EntityExporter;
pub use html::{escape_html, Html, ToHtml};
pub use render::CatalogRenderer;
pub use replicas::order_replicas;
pub use server::{Collaborators, MasterWebUi, ServerError, WebUiOptions};
pub use snapshot::{
    CatalogSnapshotReader, SnapshotReader, TableDetail, TableSnapshot, TabletSnapshot,
    TaskSnapshot,
};
