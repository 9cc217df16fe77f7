//! Application error types and handling

use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::files::fetch::NetworkError;
use crate::files::validation::ValidationError;

pub type Result<T> = std::result::Result<T, DepotError>;

#[derive(Error, Debug)]
pub enum DepotError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Failed to {op} {}: {source}", .path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to copy {} to {}: {source}", .from.display(), .to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DepotError {
    pub(crate) fn io(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DepotError::Io {
            op,
            path: path.into(),
            source,
        }
    }

    /// True when the error is an I/O failure caused by a missing file.
    pub fn is_not_found(&self) -> bool {
        match self {
            DepotError::Io { source, .. } | DepotError::Copy { source, .. } => {
                source.kind() == std::io::ErrorKind::NotFound
            }
            _ => false,
        }
    }
}

impl IntoResponse for DepotError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            DepotError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            DepotError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            _ if self.is_not_found() => (StatusCode::NOT_FOUND, "File not found".to_string()),
            DepotError::Network(err) => {
                tracing::error!("Network error: {}", err);
                (StatusCode::BAD_GATEWAY, "Upstream fetch failed".to_string())
            }
            DepotError::Io { .. } | DepotError::Copy { .. } => {
                tracing::error!("IO error: {}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            DepotError::Config(err) => {
                tracing::error!("Configuration error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            DepotError::Other(err) => {
                tracing::error!("Unexpected error: {:?}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_error_names_both_paths() {
        let err = DepotError::Copy {
            from: PathBuf::from("/tmp/a.txt"),
            to: PathBuf::from("/srv/b.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };

        let message = err.to_string();
        assert!(message.contains("/tmp/a.txt"));
        assert!(message.contains("/srv/b.txt"));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err = DepotError::from(ValidationError::MissingName);
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_network_maps_to_bad_gateway() {
        let err = DepotError::from(NetworkError::Status {
            url: "http://example.com/a.txt".to_string(),
            status: 503,
        });
        assert!(!err.is_not_found());
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }
}
