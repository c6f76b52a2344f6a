use surrealdb::{
    Surreal,
    engine::any::{self, Any},
    opt::auth::Root,
};

use crate::{
    config::Config,
    errors::Result,
    pipeline::{AssetStore, PipelineGateway},
};

#[derive(Debug, Clone)]
pub struct AppState {
    pub sdb: Surreal<Any>,
    pub pipeline: PipelineGateway,
    pub assets: AssetStore,
    pub pipeline_token: String,
}

impl AppState {
    pub async fn init(config: &Config) -> Result<Self> {
        let sdb = any::connect(&config.db_url).await?;
        // The embedded engines (mem://, used by tests) have no root user.
        if !config.db_url.starts_with("mem:") {
            sdb.signin(Root {
                username: &config.db_user,
                password: &config.db_pass,
            })
            .await?;
        }
        sdb.use_ns(&config.db_ns).use_db(&config.db_name).await?;

        Ok(Self {
            sdb,
            pipeline: PipelineGateway::new(&config.pipeline_url),
            assets: AssetStore::new(&config.asset_store_url),
            pipeline_token: config.pipeline_token.clone(),
        })
    }
}
