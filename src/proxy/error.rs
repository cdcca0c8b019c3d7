// Local error kinds and their fixed HTTP mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;

use crate::models::Detail;
use crate::proxy::upstream::UpstreamError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Credential missing or unusable; raised before any upstream call
    #[error("{0}")]
    Configuration(String),

    #[error("Error retrieving branches: {0}")]
    Upstream(UpstreamError),

    /// Any upstream failure on get/delete, whatever the cause
    #[error("Branch not found: {0}")]
    NotFound(UpstreamError),

    /// Any upstream failure on create, whatever the cause
    #[error("Error creating branch: {0}")]
    Validation(UpstreamError),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

impl ApiError {
    pub fn missing_token(token_env: &str) -> Self {
        ApiError::Configuration(format!(
            "GitHub Personal Access Token ({}) not configured.",
            token_env
        ))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Configuration(_) | ApiError::Upstream(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) | ApiError::InvalidBody(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::InvalidPath(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let detail = self.to_string();

        if status.is_server_error() {
            tracing::error!("{}", detail);
        } else {
            tracing::warn!("{}", detail);
        }

        (status, Json(Detail::new(detail))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn upstream_404() -> UpstreamError {
        UpstreamError::Status {
            status: 404,
            message: "Not Found".to_string(),
        }
    }

    #[test]
    fn test_status_table() {
        assert_eq!(
            ApiError::missing_token("GH_PAT").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Upstream(upstream_404()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::NotFound(UpstreamError::Transport("timed out".into())).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Validation(upstream_404()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::InvalidBody("missing field `sha`".into()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::InvalidPath("Invalid UTF-8 in `branch`".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_detail_embeds_upstream_message() {
        assert_eq!(
            ApiError::missing_token("GH_PAT").to_string(),
            "GitHub Personal Access Token (GH_PAT) not configured."
        );
        assert_eq!(
            ApiError::NotFound(upstream_404()).to_string(),
            "Branch not found: 404 Not Found"
        );
        assert_eq!(
            ApiError::Upstream(UpstreamError::Transport("connection refused".into())).to_string(),
            "Error retrieving branches: HTTP request failed: connection refused"
        );
    }

    #[tokio::test]
    async fn test_into_response_body() {
        let response = ApiError::Validation(upstream_404()).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let detail: Detail = serde_json::from_slice(&body).unwrap();
        assert_eq!(detail.detail, "Error creating branch: 404 Not Found");
    }
}
