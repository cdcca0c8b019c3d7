// CORS middleware
use tower_http::cors::{Any, CorsLayer};

/// Permissive CORS so browser clients on other origins can call the proxy
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
