use crate::error::{AppError, AppResult};
use crate::proxy::config::{AccessToken, ProxyConfig};
use crate::proxy::error::{ApiError, ApiResult};
use crate::proxy::upstream::{GitHubApi, GitHubConnector, UpstreamConnector};
use axum::{
    routing::{delete, get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::oneshot;
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

/// Axum application state
#[derive(Clone)]
pub struct AppState {
    /// Resolved once at startup; None means every branch request fails with 500
    pub token: Option<AccessToken>,
    /// Name of the variable the token is read from, for diagnostics
    pub token_env: Arc<str>,
    pub connector: Arc<dyn UpstreamConnector>,
}

impl AppState {
    pub fn new(
        token: Option<AccessToken>,
        token_env: impl Into<Arc<str>>,
        connector: Arc<dyn UpstreamConnector>,
    ) -> Self {
        Self {
            token,
            token_env: token_env.into(),
            connector,
        }
    }

    /// Production state: token from the environment, GitHub REST connector
    pub fn from_config(config: &ProxyConfig) -> AppResult<Self> {
        let connector = GitHubConnector::new(config)?;
        Ok(Self::new(
            config.github.resolve_token(),
            config.github.token_env.as_str(),
            Arc::new(connector),
        ))
    }

    /// Build an authenticated upstream client for one request
    pub fn github(&self) -> ApiResult<Arc<dyn GitHubApi>> {
        let token = self
            .token
            .as_ref()
            .ok_or_else(|| ApiError::missing_token(&self.token_env))?;

        self.connector.connect(token).map_err(|e| {
            ApiError::Configuration(format!("Failed to create GitHub client: {}", e))
        })
    }
}

/// Build the full route table
pub fn build_router(state: AppState) -> Router {
    use crate::proxy::handlers;

    let repo_routes = Router::new()
        .route("/branches", get(handlers::branches::list_branches))
        .route("/branches/:branch", get(handlers::branches::get_branch))
        .route("/git/refs", post(handlers::branches::create_branch))
        .route(
            "/git/refs/heads/:ref",
            delete(handlers::branches::delete_branch),
        );

    Router::new()
        .nest("/repos/:owner/:repo", repo_routes)
        .route("/openapi.json", get(handlers::docs::openapi_spec))
        .route("/healthz", get(handlers::docs::health_check))
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(
            crate::proxy::middleware::logging_middleware,
        ))
        .layer(crate::proxy::middleware::cors_layer())
        .with_state(state)
}

/// Axum server instance
pub struct AxumServer {
    shutdown_tx: Option<oneshot::Sender<()>>,
    local_addr: SocketAddr,
}

impl AxumServer {
    /// Start Axum server
    pub async fn start(
        host: &str,
        port: u16,
        state: AppState,
    ) -> AppResult<(Self, tokio::task::JoinHandle<()>)> {
        let app = build_router(state);

        // Bind address
        let addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| AppError::Server(format!("Failed to bind address {}: {}", addr, e)))?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Branch proxy server started at http://{}", local_addr);

        // Create shutdown channel
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        // Start server in new task
        let handle = tokio::spawn(async move {
            use hyper::server::conn::http1;
            use hyper_util::rt::TokioIo;
            use hyper_util::service::TowerToHyperService;

            loop {
                tokio::select! {
                    res = listener.accept() => {
                        match res {
                            Ok((stream, _)) => {
                                let io = TokioIo::new(stream);
                                let service = TowerToHyperService::new(app.clone());

                                tokio::task::spawn(async move {
                                    if let Err(err) = http1::Builder::new()
                                        .serve_connection(io, service)
                                        .await
                                    {
                                        debug!("Connection handling finished or errored: {:?}", err);
                                    }
                                });
                            }
                            Err(e) => {
                                error!("Failed to accept connection: {:?}", e);
                            }
                        }
                    }
                    _ = &mut shutdown_rx => {
                        tracing::info!("Branch proxy server stopped listening");
                        break;
                    }
                }
            }
        });

        let server_instance = Self {
            shutdown_tx: Some(shutdown_tx),
            local_addr,
        };

        Ok((server_instance, handle))
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop server
    pub fn stop(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
