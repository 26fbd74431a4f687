use tracing::info;
use tracing_subscriber::EnvFilter;

use store_return_export::config::ExportConfig;
use store_return_export::{initialize, io};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ExportConfig::from_env();
    let bind_addr = config.bind_addr.clone();

    let state = initialize(config)?;
    let app = io::router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
