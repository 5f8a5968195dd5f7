// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! End-to-end tests: the real router on a loopback socket, queried over HTTP.

use reqwest::header::CONTENT_TYPE;
use std::net::SocketAddr;
use std::sync::{mpsc, Arc, Mutex};
use std::time::{Duration, Instant};
use tabula_catalog::{
    CatalogError, CatalogManager, ColumnSchema, CommittedConfig, DataType, HostPort, MemberType,
    PartitionDescriptor, PartitionSchemaDescriptor, ReplicaDescriptor, SchemaDescriptor,
    ServerRegistration, SqliteSysCatalog, StaticMasterRoster, SysCatalog, TableMetadata,
    TableState, TabletMetadata, TabletState, TsManager,
};
use tabula_webui::{Collaborators, MasterWebUi, WebUiOptions};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

struct TestServer {
    addr: SocketAddr,
    _shutdown: oneshot::Sender<()>,
}

impl TestServer {
    async fn start(collaborators: Collaborators) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel::<()>();
        let ui = MasterWebUi::new(
            collaborators,
            WebUiOptions {
                leader_lock_wait: Duration::from_millis(50),
            },
        );
        tokio::spawn(ui.serve(listener, async {
            rx.await.ok();
        }));
        Self {
            addr,
            _shutdown: tx,
        }
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        reqwest::get(format!("http://{}{}", self.addr, path))
            .await
            .unwrap()
    }

    async fn get_text(&self, path: &str) -> String {
        self.get(path).await.text().await.unwrap()
    }
}

fn collaborators(
    catalog: Arc<CatalogManager>,
    sys_catalog: Arc<dyn SysCatalog>,
    ts_manager: Arc<TsManager>,
) -> Collaborators {
    let roster = StaticMasterRoster::new(
        "m-local",
        ServerRegistration {
            rpc_addresses: vec![HostPort::new("127.0.0.1", 7051)],
            http_addresses: vec![HostPort::new("127.0.0.1", 8051)],
        },
        "127.0.0.1:7051".parse().unwrap(),
        vec![HostPort::new("127.0.0.1", 7051)],
        Arc::clone(&catalog),
    );
    Collaborators {
        catalog,
        sys_catalog,
        ts_manager,
        roster: Arc::new(roster),
    }
}

fn table(name: &str, state: TableState) -> TableMetadata {
    TableMetadata {
        name: name.to_string(),
        state,
        state_msg: String::new(),
        version: 1,
        schema: SchemaDescriptor {
            columns: vec![
                ColumnSchema::new(0, "id", DataType::Int64).key(),
                ColumnSchema::new(1, "payload", DataType::String).nullable(),
            ],
        },
        partition_schema: PartitionSchemaDescriptor::default(),
    }
}

fn tablet(table_id: &str, config: Option<CommittedConfig>) -> TabletMetadata {
    TabletMetadata {
        table_id: table_id.to_string(),
        partition: PartitionDescriptor::default(),
        state: TabletState::Running,
        state_msg: String::new(),
        committed_config: config,
    }
}

/// Leader with the given tables persisted and loaded.
fn leader_with(tables: &[(&str, TableMetadata)]) -> Collaborators {
    let log = Arc::new(SqliteSysCatalog::new_in_memory().unwrap());
    for (id, meta) in tables {
        log.upsert_table(id, meta).unwrap();
    }
    let catalog = Arc::new(CatalogManager::new());
    catalog.become_leader(log.as_ref()).unwrap();
    collaborators(catalog, log, Arc::new(TsManager::new()))
}

struct FailingSysCatalog;

impl SysCatalog for FailingSysCatalog {
    fn scan(
        &self,
        on_table: &mut dyn FnMut(&str, TableMetadata),
        _on_tablet: &mut dyn FnMut(&str, TabletMetadata),
    ) -> Result<(), CatalogError> {
        on_table("t1", table("half-read", TableState::Running));
        Err(CatalogError::Storage("read failed at entry 2".into()))
    }
}

/// Catalog log whose scan blocks until released.
struct BlockingSysCatalog {
    entered: mpsc::SyncSender<()>,
    release: Mutex<mpsc::Receiver<()>>,
}

impl SysCatalog for BlockingSysCatalog {
    fn scan(
        &self,
        _on_table: &mut dyn FnMut(&str, TableMetadata),
        _on_tablet: &mut dyn FnMut(&str, TabletMetadata),
    ) -> Result<(), CatalogError> {
        self.entered.send(()).ok();
        self.release.lock().unwrap().recv().ok();
        Ok(())
    }
}

#[tokio::test]
async fn test_dump_entities_empty_catalog() {
    let server = TestServer::start(collaborators(
        Arc::new(CatalogManager::new()),
        Arc::new(SqliteSysCatalog::new_in_memory().unwrap()),
        Arc::new(TsManager::new()),
    ))
    .await;

    let resp = server.get("/dump-entities").await;
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.headers()[CONTENT_TYPE], "application/json");
    assert_eq!(resp.text().await.unwrap(), r#"{"tables":[],"tablets":[]}"#);
}

#[tokio::test]
async fn test_dump_entities_scan_failure() {
    let server = TestServer::start(collaborators(
        Arc::new(CatalogManager::new()),
        Arc::new(FailingSysCatalog),
        Arc::new(TsManager::new()),
    ))
    .await;

    let body = server.get_text("/dump-entities").await;
    assert_eq!(body, r#"{"error":"IO error: read failed at entry 2"}"#);
}

#[tokio::test]
async fn test_dump_entities_served_by_non_leader() {
    let log = Arc::new(SqliteSysCatalog::new_in_memory().unwrap());
    log.upsert_table("t1", &table("events", TableState::Running))
        .unwrap();
    let config = CommittedConfig {
        peers: vec![ReplicaDescriptor {
            permanent_uuid: "ts-1".into(),
            last_known_addr: HostPort::new("ts1", 7050),
            member_type: MemberType::Voter,
        }],
        leader_uuid: Some("ts-1".into()),
    };
    log.upsert_tablet("tb1", &tablet("t1", Some(config))).unwrap();

    let server = TestServer::start(collaborators(
        Arc::new(CatalogManager::new()),
        log,
        Arc::new(TsManager::new()),
    ))
    .await;

    let doc: serde_json::Value = server.get("/dump-entities").await.json().await.unwrap();
    assert_eq!(doc["tables"][0]["table_name"], "events");
    assert_eq!(doc["tablets"][0]["leader"], "ts-1");
    assert_eq!(doc["tablets"][0]["replicas"][0]["addr"], "ts1:7050");

    // The authoritative pages on the same master are not ready.
    let tables = server.get_text("/tables").await;
    assert!(tables.contains("Master is not ready: Service unavailable"));
}

#[tokio::test]
async fn test_dump_entities_while_catalog_loads() {
    let log = Arc::new(SqliteSysCatalog::new_in_memory().unwrap());
    log.upsert_table("t1", &table("events", TableState::Running))
        .unwrap();
    log.upsert_tablet("tb1", &tablet("t1", None)).unwrap();

    let (entered_tx, entered_rx) = mpsc::sync_channel(1);
    let (release_tx, release_rx) = mpsc::channel();
    let blocking = BlockingSysCatalog {
        entered: entered_tx,
        release: Mutex::new(release_rx),
    };
    let catalog = Arc::new(CatalogManager::new());
    let loader = {
        let catalog = Arc::clone(&catalog);
        std::thread::spawn(move || catalog.become_leader(&blocking))
    };
    entered_rx.recv().unwrap();

    let server = TestServer::start(collaborators(
        Arc::clone(&catalog),
        log,
        Arc::new(TsManager::new()),
    ))
    .await;

    let doc: serde_json::Value = server.get("/dump-entities").await.json().await.unwrap();
    assert_eq!(doc["tables"][0]["table_id"], "t1");
    assert_eq!(doc["tablets"][0]["tablet_id"], "tb1");

    let start = Instant::now();
    let tables = server.get_text("/tables").await;
    assert!(tables.contains("Master is not ready: Service unavailable: catalog leader lock not acquired within 50ms"));
    let detail = server.get_text("/table?id=t1").await;
    assert!(detail.contains("Master is not ready: Service unavailable: catalog leader lock not acquired"));
    assert!(start.elapsed() < Duration::from_secs(5));

    release_tx.send(()).unwrap();
    loader.join().unwrap().unwrap();
    assert!(server.get_text("/tables").await.contains("<h1>Tables</h1>"));
}

#[tokio::test]
async fn test_tables_sorted_and_filtered() {
    let server = TestServer::start(leader_with(&[
        ("id-1", table("zeta", TableState::Running)),
        ("id-2", table("alpha", TableState::Running)),
        ("id-3", table("beta", TableState::Running)),
        ("id-4", table("purged", TableState::Deleting)),
    ]))
    .await;

    let resp = server.get("/tables").await;
    assert_eq!(resp.status(), 200);
    assert!(resp.headers()[CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/html"));
    let body = resp.text().await.unwrap();

    let alpha = body.find("<th>alpha</th>").unwrap();
    let beta = body.find("<th>beta</th>").unwrap();
    let zeta = body.find("<th>zeta</th>").unwrap();
    assert!(alpha < beta && beta < zeta);
    assert!(!body.contains("purged"));
    assert!(body.contains("<a href=\"/tablet-servers\">Tablet Servers</a>"));
}

#[tokio::test]
async fn test_table_names_escaped() {
    let server = TestServer::start(leader_with(&[(
        "t1",
        table("<script>alert(1)</script>", TableState::Running),
    )]))
    .await;

    let list = server.get_text("/tables").await;
    assert!(list.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(!list.contains("<script>"));

    let detail = server.get_text("/table?id=t1").await;
    assert!(detail.contains("<h1>Table: &lt;script&gt;alert(1)&lt;/script&gt; (t1)</h1>"));
    assert!(!detail.contains("<script>"));
}

#[tokio::test]
async fn test_table_detail_on_non_leader_is_bounded() {
    let server = TestServer::start(collaborators(
        Arc::new(CatalogManager::new()),
        Arc::new(SqliteSysCatalog::new_in_memory().unwrap()),
        Arc::new(TsManager::new()),
    ))
    .await;

    let start = Instant::now();
    let resp = server.get("/table?id=t1").await;
    assert_eq!(resp.status(), 200);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Master is not ready: Service unavailable: this master is not the leader"));
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_table_missing_id() {
    let server = TestServer::start(leader_with(&[])).await;

    let resp = server.get("/table").await;
    assert_eq!(resp.status(), 200);
    assert!(resp.headers()[CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/plain"));
    assert_eq!(resp.text().await.unwrap(), "Missing 'id' argument");
}

#[tokio::test]
async fn test_table_detail_replicas() {
    let log = Arc::new(SqliteSysCatalog::new_in_memory().unwrap());
    log.upsert_table("t1", &table("events", TableState::Running))
        .unwrap();
    let replica = |uuid: &str, member_type| ReplicaDescriptor {
        permanent_uuid: uuid.to_string(),
        last_known_addr: HostPort::new(uuid, 7050),
        member_type,
    };
    let config = CommittedConfig {
        peers: vec![
            replica("ts-b", MemberType::Voter),
            replica("ts-a", MemberType::Voter),
        ],
        leader_uuid: Some("ts-a".into()),
    };
    log.upsert_tablet("tb1", &tablet("t1", Some(config))).unwrap();

    let catalog = Arc::new(CatalogManager::new());
    catalog.become_leader(log.as_ref()).unwrap();
    let ts_manager = Arc::new(TsManager::new());
    ts_manager.register(
        "ts-a",
        ServerRegistration {
            rpc_addresses: vec![HostPort::new("host-a", 7050)],
            http_addresses: vec![HostPort::new("host-a", 8050)],
        },
    );
    let server = TestServer::start(collaborators(catalog, log, ts_manager)).await;

    let body = server.get_text("/table?id=t1").await;
    let leader = body
        .find("<li><b>LEADER: <a href=\"http://host-a:8050/tablet?id=tb1\">host-a:8050</a></b></li>")
        .unwrap();
    let follower = body.find("<li>FOLLOWER: ts-b</li>").unwrap();
    assert!(leader < follower);
    assert!(body.contains("CREATE EXTERNAL TABLE `events`"));

    let missing = server.get_text("/table?id=nope").await;
    assert!(missing.contains("Table not found"));
}

#[tokio::test]
async fn test_tablet_servers_and_masters() {
    let collaborators = leader_with(&[]);
    collaborators.ts_manager.register(
        "ts-1",
        ServerRegistration {
            rpc_addresses: vec![HostPort::new("ts1", 7050)],
            http_addresses: vec![HostPort::new("ts1", 8050)],
        },
    );
    let server = TestServer::start(collaborators).await;

    let servers = server.get_text("/tablet-servers").await;
    assert!(servers.contains("<a href=\"http://ts1:8050/\">ts-1</a>"));
    assert!(servers.contains("Time since heartbeat"));

    let masters = server.get_text("/masters").await;
    assert!(masters.contains("<b><a href=\"http://127.0.0.1:8051/\">m-local</a></b>"));
    assert!(masters.contains("<td>LEADER</td>"));

    let index = server.get_text("/").await;
    assert!(index.contains("<a href=\"/masters\">Masters</a>"));
}
