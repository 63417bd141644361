use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use writur::config::Config;
use writur::services::file_service::FileService;
use writur::storage::factory::{create_storage_backend, storage_config_from_env};
use writur::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "writur=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    info!("Upload mode: {}", config.upload_mode);

    let storage_config = storage_config_from_env(&config)?;
    let backend = create_storage_backend(storage_config).await?;
    let file_service = Arc::new(FileService::new(backend));

    let state = Arc::new(AppState {
        config: config.clone(),
        file_service,
    });

    let app = create_router(state)?;

    let listener = TcpListener::bind(&config.server_address).await?;
    info!("Server listening on {}", config.server_address);

    axum::serve(listener, app).await?;

    Ok(())
}
