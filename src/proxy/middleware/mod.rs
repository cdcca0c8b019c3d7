// Middleware module - Axum middleware

pub mod cors;
pub mod logging;

pub use cors::cors_layer;
pub use logging::{logging_middleware, REQUEST_ID_HEADER};
