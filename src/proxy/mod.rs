// proxy module - branch management proxy service

pub mod config;
pub mod error;
pub mod server;

pub mod handlers; // API endpoint handlers
pub mod middleware; // Axum middleware
pub mod upstream; // GitHub upstream client

pub use config::ProxyConfig;
pub use error::{ApiError, ApiResult};
pub use server::{build_router, AppState, AxumServer};
