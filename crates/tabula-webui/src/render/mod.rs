// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! HTML views of the catalog.
//!
//! Every view renders into an [`Html`] body. Failures (not ready, not found,
//! decode errors) are rendered inline; a view never fails as a whole.

mod servers;
mod table_detail;
mod tables;

use crate::html::{html, Html};
use crate::snapshot::SnapshotReader;
use std::sync::Arc;
use tabula_catalog::{MasterRoster, ServerRegistration, TsDescriptor, TsManager};

/// Renders the styled master pages.
///
/// Collaborators are injected at construction; the renderer holds no
/// catalog state between requests.
pub struct CatalogRenderer {
    reader: Arc<dyn SnapshotReader>,
    ts_manager: Arc<TsManager>,
    roster: Arc<dyn MasterRoster>,
}

impl CatalogRenderer {
    pub fn new(
        reader: Arc<dyn SnapshotReader>,
        ts_manager: Arc<TsManager>,
        roster: Arc<dyn MasterRoster>,
    ) -> Self {
        Self {
            reader,
            ts_manager,
            roster,
        }
    }
}

/// `link_text` linked to the server's own status pages, if it has an HTTP address.
fn registration_to_html(registration: &ServerRegistration, link_text: &str) -> Html {
    match registration.first_http_address() {
        Some(hp) => html!("<a href=\"http://{}:{}/\">{}</a>", hp.host, hp.port, link_text),
        None => Html::escape(link_text),
    }
}

/// Link to a tablet's page on a tablet server, or its uuid if unreachable.
fn ts_descriptor_to_html(desc: &TsDescriptor, tablet_id: &str) -> Html {
    let registration = desc.registration();
    match registration.first_http_address() {
        Some(hp) => html!(
            "<a href=\"http://{0}:{1}/tablet?id={2}\">{0}:{1}</a>",
            hp.host,
            hp.port,
            urlencoding::encode(tablet_id).into_owned()
        ),
        None => Html::escape(desc.permanent_uuid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_catalog::HostPort;

    fn registration(http: bool) -> ServerRegistration {
        ServerRegistration {
            rpc_addresses: vec![HostPort::new("ts-1", 7050)],
            http_addresses: if http {
                vec![HostPort::new("ts-1", 8050)]
            } else {
                Vec::new()
            },
        }
    }

    #[test]
    fn test_registration_link() {
        assert_eq!(
            registration_to_html(&registration(true), "uuid<1>").as_str(),
            "<a href=\"http://ts-1:8050/\">uuid&lt;1&gt;</a>"
        );
        assert_eq!(
            registration_to_html(&registration(false), "uuid<1>").as_str(),
            "uuid&lt;1&gt;"
        );
    }

    #[test]
    fn test_ts_descriptor_link() {
        let manager = TsManager::new();
        let with_http = manager.register("ts-a", registration(true));
        assert_eq!(
            ts_descriptor_to_html(&with_http, "tb&1").as_str(),
            "<a href=\"http://ts-1:8050/tablet?id=tb%261\">ts-1:8050</a>"
        );

        assert_eq!(
            ts_descriptor_to_html(&with_http, "tb 1#x").as_str(),
            "<a href=\"http://ts-1:8050/tablet?id=tb%201%23x\">ts-1:8050</a>"
        );

        let without_http = manager.register("ts-b", registration(false));
        assert_eq!(ts_descriptor_to_html(&without_http, "tb1").as_str(), "ts-b");
    }
}
