// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Running tables list.

use super::CatalogRenderer;
use crate::html::{html, Html};
use crate::page::TABLE_PATH;

impl CatalogRenderer {
    /// `/tables`: running tables sorted by name.
    pub fn tables(&self) -> Html {
        let mut tables = match self.reader.running_tables() {
            Ok(tables) => tables,
            Err(e) => return html!("Master is not ready: {}", e.to_string()),
        };
        tables.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.table_id.cmp(&b.table_id)));

        let mut out = html!("<h1>Tables</h1>\n");
        out.push(&html!(
            "<table class=\"table table-striped\">\n  \
             <tr><th>Table Name</th><th>Table Id</th><th>State</th></tr>\n"
        ));
        for table in &tables {
            out.push(&html!(
                "<tr><th>{0}</th><td><a href=\"{1}?id={2}\">{3}</a></td><td>{4} {5}</td></tr>\n",
                table.name,
                TABLE_PATH,
                urlencoding::encode(&table.table_id).into_owned(),
                table.table_id,
                table.state.display_name(),
                table.state_msg
            ));
        }
        out.push(&html!("</table>\n"));
        out
    }
}

#[cfg(test)]
mod tests {
    use crate::render::CatalogRenderer;
    use crate::snapshot::CatalogSnapshotReader;
    use std::sync::Arc;
    use std::time::Duration;
    use tabula_catalog::{
        CatalogManager, ColumnSchema, DataType, HostPort, PartitionSchemaDescriptor,
        SchemaDescriptor, ServerRegistration, SqliteSysCatalog, StaticMasterRoster, TableMetadata,
        TableState, TsManager,
    };

    fn table(name: &str, state: TableState) -> TableMetadata {
        TableMetadata {
            name: name.to_string(),
            state,
            state_msg: String::new(),
            version: 1,
            schema: SchemaDescriptor {
                columns: vec![ColumnSchema::new(0, "id", DataType::Int64).key()],
            },
            partition_schema: PartitionSchemaDescriptor::default(),
        }
    }

    fn renderer(catalog: Arc<CatalogManager>) -> CatalogRenderer {
        let log = Arc::new(SqliteSysCatalog::new_in_memory().unwrap());
        let reader = Arc::new(CatalogSnapshotReader::new(
            Arc::clone(&catalog),
            log,
            Duration::from_millis(10),
        ));
        let roster = StaticMasterRoster::new(
            "m-1",
            ServerRegistration::default(),
            "127.0.0.1:7051".parse().unwrap(),
            vec![HostPort::new("127.0.0.1", 7051)],
            catalog,
        );
        CatalogRenderer::new(reader, Arc::new(TsManager::new()), Arc::new(roster))
    }

    fn leader() -> Arc<CatalogManager> {
        let catalog = Arc::new(CatalogManager::new());
        catalog
            .become_leader(&SqliteSysCatalog::new_in_memory().unwrap())
            .unwrap();
        catalog
    }

    #[test]
    fn test_tables_sorted_by_name_running_only() {
        let catalog = leader();
        catalog.upsert_table("id-1", table("zeta", TableState::Running));
        catalog.upsert_table("id-2", table("alpha", TableState::Running));
        catalog.upsert_table("id-3", table("beta", TableState::Running));
        catalog.upsert_table("id-4", table("dropped", TableState::Deleting));

        let out = renderer(catalog).tables().into_string();
        let alpha = out.find("<th>alpha</th>").unwrap();
        let beta = out.find("<th>beta</th>").unwrap();
        let zeta = out.find("<th>zeta</th>").unwrap();
        assert!(alpha < beta && beta < zeta);
        assert!(!out.contains("dropped"));
        assert!(out.contains("<a href=\"/table?id=id-2\">id-2</a></td><td>Running </td>"));
    }

    #[test]
    fn test_table_names_are_escaped() {
        let catalog = leader();
        let mut meta = table("<script>", TableState::Running);
        meta.state_msg = "<b>ok</b>".into();
        catalog.upsert_table("t&1", meta);

        let out = renderer(catalog).tables().into_string();
        assert!(out.contains("<th>&lt;script&gt;</th>"));
        assert!(out.contains("<a href=\"/table?id=t%261\">t&amp;1</a>"));
        assert!(out.contains("Running &lt;b&gt;ok&lt;/b&gt;"));
        assert!(!out.contains("<script>"));
    }

    #[test]
    fn test_table_links_are_url_encoded() {
        let catalog = leader();
        catalog.upsert_table("a b+c#d", table("odd", TableState::Running));

        let out = renderer(catalog).tables().into_string();
        assert!(out.contains("<a href=\"/table?id=a%20b%2Bc%23d\">a b+c#d</a>"));
    }

    #[test]
    fn test_tables_not_ready_on_follower() {
        let out = renderer(Arc::new(CatalogManager::new())).tables().into_string();
        assert_eq!(
            out,
            "Master is not ready: Service unavailable: this master is not the leader"
        );
    }
}
