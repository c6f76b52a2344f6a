use tracing::info;
use tracing_subscriber::FmtSubscriber;

use echolog::{
    config::Config, errors::Result, routes::app_router, services::templates, state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    tracing::subscriber::set_global_default(FmtSubscriber::default()).unwrap();

    let config = Config::from_env();
    let state = AppState::init(&config).await?;
    templates::seed_std_templates(&state.sdb).await?;

    info!("Starting server");

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Serving echolog at http://{}", listener.local_addr()?);
    axum::serve(listener, app_router(state)).await?;

    Ok(())
}
