use std::env;

/// Runtime configuration, read once at startup. Every value has a local-dev
/// default so `cargo run` works against a local SurrealDB with no setup.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub db_url: String,
    pub db_user: String,
    pub db_pass: String,
    pub db_ns: String,
    pub db_name: String,
    pub pipeline_url: String,
    pub pipeline_token: String,
    pub asset_store_url: String,
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            bind_addr: var_or("ECHOLOG_BIND", "127.0.0.1:3587"),
            db_url: var_or("ECHOLOG_DB_URL", "ws://localhost:8050"),
            db_user: var_or("ECHOLOG_DB_USER", "root"),
            db_pass: var_or("ECHOLOG_DB_PASS", "secret"),
            db_ns: var_or("ECHOLOG_DB_NS", "echolog"),
            db_name: var_or("ECHOLOG_DB_NAME", "echolog"),
            pipeline_url: var_or("ECHOLOG_PIPELINE_URL", "http://localhost:9090"),
            pipeline_token: var_or("ECHOLOG_PIPELINE_TOKEN", "pipeline-secret"),
            asset_store_url: var_or("ECHOLOG_ASSET_STORE_URL", "http://localhost:9091"),
        }
    }
}
