pub mod error;
pub mod models;
pub mod modules;
pub mod proxy; // Branch proxy service
pub mod utils;

use tracing::{info, warn};

use models::AppConfig;
use proxy::{AppState, AxumServer};

pub use error::{AppError, AppResult};

/// Start the proxy service and serve until Ctrl+C
pub async fn run(config: AppConfig) -> AppResult<()> {
    let proxy_config = config.proxy;
    let state = AppState::from_config(&proxy_config)?;

    if state.token.is_none() {
        warn!(
            "{} is not set; every branch request will fail with 500",
            proxy_config.github.token_env
        );
    }
    info!("Upstream GitHub API: {}", proxy_config.github.api_base_url);

    let (server, handle) = AxumServer::start(
        proxy_config.get_bind_address(),
        proxy_config.port,
        state,
    )
    .await?;

    tokio::signal::ctrl_c().await?;
    info!("Shutdown requested");

    server.stop();
    // Wait for server task to complete
    handle.await.ok();

    Ok(())
}
