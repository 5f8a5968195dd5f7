// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Master web UI service: composition and lifecycle.

use crate::addr::{advertised_host, replace_wildcard};
use crate::config::{parse_host_port, ConfigError, WebUiConfig};
use crate::export::EntityExporter;
use crate::render::CatalogRenderer;
use crate::routes;
use crate::snapshot::{CatalogSnapshotReader, SnapshotReader};
use axum::Router;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tabula_catalog::{
    CatalogError, CatalogManager, HostPort, MasterPeer, MasterRoster, ServerRegistration,
    SqliteSysCatalog, StaticMasterRoster, SysCatalog, TsManager,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Service errors.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// What the web UI observes. Owned by the composing master process.
#[derive(Clone)]
pub struct Collaborators {
    pub catalog: Arc<CatalogManager>,
    pub sys_catalog: Arc<dyn SysCatalog>,
    pub ts_manager: Arc<TsManager>,
    pub roster: Arc<dyn MasterRoster>,
}

impl Collaborators {
    /// Build the collaborators a standalone process needs from configuration:
    /// open the persisted catalog, optionally load it as leader, seed the
    /// liveness tracker and build the static roster.
    pub fn from_config(config: &WebUiConfig) -> Result<Self, ServerError> {
        config.validate()?;

        let sys_catalog = Arc::new(SqliteSysCatalog::new(&config.catalog_path)?);
        info!(
            "Opened catalog {} ({} entries)",
            config.catalog_path.display(),
            sys_catalog.count()?
        );

        let catalog = Arc::new(CatalogManager::new());
        if config.assume_leadership {
            catalog.become_leader(sys_catalog.as_ref())?;
        } else {
            info!("Not assuming leadership; authoritative pages will report not ready");
        }

        let ts_manager = Arc::new(TsManager::new());
        for ts in &config.tablet_servers {
            let registration = ServerRegistration {
                rpc_addresses: parse_all(&ts.rpc_addresses)?,
                http_addresses: parse_all(&ts.http_addresses)?,
            };
            ts_manager.register(&ts.uuid, registration);
        }

        let rpc_address = config.rpc_socket_addr()?;
        let advertised_rpc = replace_wildcard(rpc_address);
        let local_registration = ServerRegistration {
            rpc_addresses: vec![HostPort::new(
                advertised_rpc.ip().to_string(),
                advertised_rpc.port(),
            )],
            http_addresses: vec![HostPort::new(
                advertised_host(&config.bind_address),
                config.port,
            )],
        };
        let peers = config
            .masters
            .iter()
            .map(|m| {
                Ok(MasterPeer {
                    permanent_uuid: m.uuid.clone(),
                    rpc_address: parse_host_port(&m.rpc_address)?,
                    http_address: m.http_address.as_deref().map(parse_host_port).transpose()?,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;
        let roster = StaticMasterRoster::new(
            config.instance_uuid.clone(),
            local_registration,
            rpc_address,
            config.master_host_ports()?,
            Arc::clone(&catalog),
        )
        .with_peers(peers);

        Ok(Self {
            catalog,
            sys_catalog,
            ts_manager,
            roster: Arc::new(roster),
        })
    }
}

fn parse_all(addrs: &[String]) -> Result<Vec<HostPort>, ConfigError> {
    addrs.iter().map(|a| parse_host_port(a)).collect()
}

/// Web UI options.
#[derive(Debug, Clone)]
pub struct WebUiOptions {
    /// Bounded wait for the catalog leader lock.
    pub leader_lock_wait: Duration,
}

impl Default for WebUiOptions {
    fn default() -> Self {
        Self {
            leader_lock_wait: Duration::from_millis(500),
        }
    }
}

impl From<&WebUiConfig> for WebUiOptions {
    fn from(config: &WebUiConfig) -> Self {
        Self {
            leader_lock_wait: config.leader_lock_wait(),
        }
    }
}

/// Shared handler state.
pub(crate) struct AppState {
    pub(crate) renderer: CatalogRenderer,
    pub(crate) exporter: EntityExporter,
}

/// The master web UI.
pub struct MasterWebUi {
    state: Arc<AppState>,
}

impl MasterWebUi {
    pub fn new(collaborators: Collaborators, options: WebUiOptions) -> Self {
        let reader: Arc<dyn SnapshotReader> = Arc::new(CatalogSnapshotReader::new(
            collaborators.catalog,
            collaborators.sys_catalog,
            options.leader_lock_wait,
        ));
        let renderer = CatalogRenderer::new(
            Arc::clone(&reader),
            collaborators.ts_manager,
            collaborators.roster,
        );
        let exporter = EntityExporter::new(reader);
        Self {
            state: Arc::new(AppState { renderer, exporter }),
        }
    }

    /// All web UI routes with request tracing.
    pub fn router(&self) -> Router {
        Router::new()
            .merge(routes::page_routes())
            .merge(routes::export_routes())
            .layer(TraceLayer::new_for_http())
            .with_state(Arc::clone(&self.state))
    }

    /// Serve on `listener` until `shutdown` resolves.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        info!("Web UI listening on http://{}", addr);
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;
        info!("Web UI on {} stopped", addr);
        Ok(())
    }
}
