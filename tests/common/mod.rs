use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use axum::{Router, http::StatusCode, routing::post};
use surrealdb::{
    RecordId, Surreal,
    engine::any::{self, Any},
};

use echolog::{
    models::account::Account,
    pipeline::{AssetStore, PipelineGateway},
    services::bootstrap,
};

/// Fresh in-memory database per test.
pub async fn test_db() -> Surreal<Any> {
    let sdb = any::connect("mem://").await.unwrap();
    sdb.use_ns("test").use_db("test").await.unwrap();
    sdb
}

/// Signs an account up the way the auth route does: account, default
/// workspace and owner membership in one go.
pub async fn signup(sdb: &Surreal<Any>, email: &str, name: &str) -> Account {
    bootstrap::create_account_with_workspace(
        sdb,
        email.to_string(),
        Some(name.to_string()),
        "test-hash".to_string(),
    )
    .await
    .unwrap()
}

/// The default workspace's id is derivable from the account id by the
/// key-equality invariant.
pub fn workspace_of(account: &Account) -> RecordId {
    let id = account.id.to_string();
    let (_, key) = id.split_once(':').unwrap();
    RecordId::from_table_key("workspaces", key)
}

/// A gateway pointed at a port nothing listens on; every dispatch fails the
/// way a network outage does.
pub fn dead_pipeline() -> PipelineGateway {
    PipelineGateway::new("http://127.0.0.1:9")
}

pub fn dead_asset_store() -> AssetStore {
    AssetStore::new("http://127.0.0.1:9")
}

/// Minimal stand-in for the external pipeline: acknowledges dispatches with
/// 200 and counts them.
pub async fn spawn_pipeline_stub() -> (PipelineGateway, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    let app = Router::new().route(
        "/process",
        post(move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                StatusCode::OK
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (PipelineGateway::new(&format!("http://{addr}")), hits)
}
