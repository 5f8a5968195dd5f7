// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Single table detail page.

use super::{ts_descriptor_to_html, CatalogRenderer};
use crate::addr::replace_wildcard;
use crate::html::{html, Html};
use crate::page::error_message;
use crate::replicas::order_replicas;
use crate::snapshot::{TabletSnapshot, TaskSnapshot};
use tabula_catalog::{
    consensus_role, CatalogError, ClusterEndpoints, PartitionSchema, Role, Schema,
};
use tracing::debug;

impl CatalogRenderer {
    /// `/table?id=<table_id>`: one table in any state, with its tablets,
    /// replica placement, partitioning and tasks.
    pub fn table(&self, table_id: &str) -> Html {
        let detail = match self.reader.table_detail(table_id) {
            Ok(detail) => detail,
            Err(CatalogError::NotFound(_)) => return html!("Table not found"),
            Err(e) => return html!("Master is not ready: {}", e.to_string()),
        };
        let table = &detail.table;

        let mut out = html!("<h1>Table: {} ({})</h1>\n", table.name, table.table_id);
        out.push(&html!(
            "<table class=\"table table-striped\">\n  \
             <tr><td>Version:</td><td>{}</td></tr>\n  \
             <tr><td>State:</td><td>{} {}</td></tr>\n</table>\n",
            table.version,
            table.state.display_name(),
            table.state_msg
        ));

        // Decoded once, reused for every tablet.
        let decoded = Schema::decode(&table.schema).and_then(|schema| {
            let partition_schema = PartitionSchema::decode(&table.partition_schema, &schema)?;
            Ok((schema, partition_schema))
        });

        match &decoded {
            Ok((schema, _)) => out.push(&schema_table(schema)),
            Err(e) => {
                debug!("Table {} has an undecodable schema: {}", table.table_id, e);
                out.push(&error_message(&format!("Unable to decode schema: {}", e)));
            }
        }

        out.push(&html!(
            "<table class=\"table table-striped\">\n  \
             <tr><th>Tablet ID</th><th>Partition</th><th>State</th>\
             <th>Message</th><th>RaftConfig</th></tr>\n"
        ));
        for tablet in &detail.tablets {
            let partition = match &decoded {
                Ok((schema, partition_schema)) => {
                    match partition_schema.decode_partition(&tablet.partition, schema) {
                        Ok(p) => Html::escape(&partition_schema.partition_debug_string(&p, schema)),
                        Err(e) => error_message(&format!("Unable to decode partition: {}", e)),
                    }
                }
                // The schema error is reported once above the table.
                Err(_) => html!("<i>schema unavailable</i>"),
            };
            out.push(&html!(
                "<tr><th>{}</th><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                tablet.tablet_id,
                partition,
                tablet.state.display_name(),
                tablet.state_msg,
                self.raft_config_html(tablet)
            ));
        }
        out.push(&html!("</table>\n"));

        out.push(&html!("<h2>Partition schema</h2>\n"));
        match &decoded {
            Ok((schema, partition_schema)) => {
                out.push(&html!("<pre>{}</pre>\n", partition_schema.display_string(schema)))
            }
            Err(e) => out.push(&error_message(&format!(
                "Unable to decode partition schema: {}",
                e
            ))),
        }

        out.push(&html!("<h2>External table definition</h2>\n"));
        match &decoded {
            Ok((schema, _)) => {
                let addresses = master_addresses(&self.roster.advertised_endpoints());
                out.push(&html!(
                    "<pre><code>{}</code></pre>\n",
                    external_table_statement(&table.name, schema, &addresses)
                ));
            }
            Err(e) => out.push(&error_message(&format!("Unable to decode schema: {}", e))),
        }

        out.push(&task_list(&detail.tasks));
        out
    }

    /// Replica list of one tablet, leader first.
    fn raft_config_html(&self, tablet: &TabletSnapshot) -> Html {
        let mut replicas = Vec::new();
        if let Some(config) = &tablet.committed_config {
            for peer in &config.peers {
                let role = consensus_role(&peer.permanent_uuid, config);
                let location = match self.ts_manager.lookup_by_uuid(&peer.permanent_uuid) {
                    Some(desc) => ts_descriptor_to_html(&desc, &tablet.tablet_id),
                    None => Html::escape(&peer.permanent_uuid),
                };
                let item = if role == Role::Leader {
                    html!("  <li><b>LEADER: {}</b></li>\n", location)
                } else {
                    html!("  <li>{}: {}</li>\n", role.name(), location)
                };
                replicas.push((item, role));
            }
        }

        let mut out = html!("<ul>\n");
        for item in order_replicas(replicas) {
            out.push(&item);
        }
        out.push(&html!("</ul>\n"));
        out
    }
}

fn schema_table(schema: &Schema) -> Html {
    let mut out = html!(
        "<table class=\"table table-striped\">\n  \
         <tr><th>Column</th><th>ID</th><th>Type</th><th>Key</th></tr>\n"
    );
    for column in schema.columns() {
        out.push(&html!(
            "<tr><th>{}</th><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            column.name,
            column.id,
            column.type_string(),
            if column.is_key { "true" } else { "false" }
        ));
    }
    out.push(&html!("</table>\n"));
    out
}

fn task_list(tasks: &[TaskSnapshot]) -> Html {
    let mut out = html!("<h2>Tasks</h2>\n");
    if tasks.is_empty() {
        out.push(&html!("<p>No tasks</p>\n"));
        return out;
    }
    out.push(&html!(
        "<table class=\"table table-striped\">\n  \
         <tr><th>Task Name</th><th>State</th><th>Time</th><th>Description</th></tr>\n"
    ));
    for task in tasks {
        out.push(&html!(
            "<tr><th>{}</th><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            task.task_type,
            task.state.name(),
            format!("{:.1}s", task.elapsed.as_secs_f64()),
            task.description
        ));
    }
    out.push(&html!("</table>\n"));
    out
}

/// Comma-separated master addresses clients should connect to.
///
/// A standalone master bound to a wildcard address advertises the local
/// host's IP instead, or the raw bound address if that cannot be resolved.
fn master_addresses(endpoints: &ClusterEndpoints) -> String {
    match endpoints {
        ClusterEndpoints::Distributed(addrs) => addrs
            .iter()
            .map(|hp| hp.to_string())
            .collect::<Vec<_>>()
            .join(","),
        ClusterEndpoints::Standalone(addr) => replace_wildcard(*addr).to_string(),
    }
}

fn external_table_statement(table_name: &str, schema: &Schema, master_addresses: &str) -> String {
    let columns: Vec<String> = schema
        .columns()
        .iter()
        .map(|c| format!("  `{}` {}", c.name, c.data_type.sql_name()))
        .collect();
    let key_columns: Vec<&str> = schema.key_columns().map(|c| c.name.as_str()).collect();

    format!(
        "CREATE EXTERNAL TABLE `{name}` (\n{columns}\n)\nTBLPROPERTIES(\n  \
         'tabula.table_name' = '{name}',\n  \
         'tabula.master_addresses' = '{masters}',\n  \
         'tabula.key_columns' = '{keys}'\n);",
        name = table_name,
        columns = columns.join(",\n"),
        masters = master_addresses,
        keys = key_columns.join(", ")
    )
}
