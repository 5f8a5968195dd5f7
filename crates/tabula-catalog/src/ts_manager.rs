// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Tablet server liveness tracking.

use crate::error::CatalogError;
use crate::model::ServerRegistration;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A tablet server known to the master.
#[derive(Debug)]
pub struct TsDescriptor {
    permanent_uuid: String,
    registration: RwLock<ServerRegistration>,
    last_heartbeat: RwLock<Instant>,
}

impl TsDescriptor {
    fn new(permanent_uuid: String, registration: ServerRegistration) -> Self {
        Self {
            permanent_uuid,
            registration: RwLock::new(registration),
            last_heartbeat: RwLock::new(Instant::now()),
        }
    }

    pub fn permanent_uuid(&self) -> &str {
        &self.permanent_uuid
    }

    /// Copy of the current registration.
    pub fn registration(&self) -> ServerRegistration {
        self.registration.read().clone()
    }

    pub fn time_since_heartbeat(&self) -> Duration {
        self.last_heartbeat.read().elapsed()
    }

    fn touch(&self) {
        *self.last_heartbeat.write() = Instant::now();
    }
}

/// Registry of tablet servers, keyed by uuid.
#[derive(Debug, Default)]
pub struct TsManager {
    servers: RwLock<BTreeMap<String, Arc<TsDescriptor>>>,
}

impl TsManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a server, or refresh the registration of a known one.
    pub fn register(&self, uuid: &str, registration: ServerRegistration) -> Arc<TsDescriptor> {
        let mut servers = self.servers.write();
        if let Some(existing) = servers.get(uuid) {
            *existing.registration.write() = registration;
            existing.touch();
            return Arc::clone(existing);
        }
        let desc = Arc::new(TsDescriptor::new(uuid.to_string(), registration));
        servers.insert(uuid.to_string(), Arc::clone(&desc));
        desc
    }

    /// Record a heartbeat from a registered server.
    pub fn heartbeat(&self, uuid: &str) -> Result<(), CatalogError> {
        let desc = self
            .lookup_by_uuid(uuid)
            .ok_or_else(|| CatalogError::NotFound(format!("tablet server {}", uuid)))?;
        desc.touch();
        Ok(())
    }

    /// All servers, ordered by uuid.
    pub fn all_descriptors(&self) -> Vec<Arc<TsDescriptor>> {
        self.servers.read().values().cloned().collect()
    }

    pub fn lookup_by_uuid(&self, uuid: &str) -> Option<Arc<TsDescriptor>> {
        self.servers.read().get(uuid).cloned()
    }

    pub fn len(&self) -> usize {
        self.servers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
