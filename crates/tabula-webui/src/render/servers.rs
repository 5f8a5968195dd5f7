// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Tablet server and master rosters.

use super::{registration_to_html, CatalogRenderer};
use crate::html::{html, Html};
use tracing::warn;

impl CatalogRenderer {
    /// `/tablet-servers`: one row per registered tablet server.
    pub fn tablet_servers(&self) -> Html {
        let mut out = html!("<h1>Tablet Servers</h1>\n");
        out.push(&html!(
            "<table class=\"table table-striped\">\n  \
             <tr><th>UUID</th><th>Time since heartbeat</th><th>Registration</th></tr>\n"
        ));

        for desc in self.ts_manager.all_descriptors() {
            let registration = desc.registration();
            let since_heartbeat = format!("{:.1}s", desc.time_since_heartbeat().as_secs_f64());
            out.push(&html!(
                "<tr><th>{}</th><td>{}</td><td><code>{}</code></td></tr>\n",
                registration_to_html(&registration, desc.permanent_uuid()),
                since_heartbeat,
                registration.debug_string()
            ));
        }
        out.push(&html!("</table>\n"));
        out
    }

    /// `/masters`: the metadata-service roster and each master's role.
    pub fn masters(&self) -> Html {
        let masters = match self.roster.list_masters() {
            Ok(masters) => masters,
            Err(e) => {
                let message = format!("Unable to list Masters: {}", e);
                warn!("{}", message);
                return html!("<h1>{}</h1>\n", message);
            }
        };

        let mut out = html!("<h1>Masters</h1>\n");
        out.push(&html!(
            "<table class=\"table table-striped\">\n  <tr><th>Registration</th><th>Role</th></tr>\n"
        ));

        let local_uuid = self.roster.local_uuid();
        for master in &masters {
            if let Some(error) = &master.error {
                out.push(&html!(
                    "  <tr class=\"error\"><td colspan=\"2\"><b>{}</b></td></tr>\n",
                    error
                ));
                continue;
            }

            let mut registration =
                registration_to_html(&master.registration, &master.permanent_uuid);
            if master.permanent_uuid == local_uuid {
                registration = html!("<b>{}</b>", registration);
            }
            let role = master.role.map(|r| r.name()).unwrap_or("N/A");
            out.push(&html!("  <tr><td>{}</td><td>{}</td></tr>\n", registration, role));
        }
        out.push(&html!("</table>\n"));
        out
    }
}
