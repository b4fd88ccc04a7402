//! Error types and rejection handling for the StatsGateway

use serde::Serialize;
use stats_engine::StatsError;
use std::convert::Infallible;
use thiserror::Error;
use tracing::{error, warn};
use warp::http::StatusCode;
use warp::{Rejection, Reply};

/// Errors that can occur while running the StatsGateway
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to bind server: {0}")]
    Bind(String),
}

/// Error response
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
    pub timestamp: String,
}

/// Error detail
#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: &str, message: impl Into<String>, details: Option<serde_json::Value>) -> Self {
        Self {
            error: ErrorDetail { code: code.to_string(), message: message.into(), details },
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Rejection carrying a ready-made error response
#[derive(Debug)]
pub struct ApiRejection {
    pub status: StatusCode,
    pub body: ErrorResponse,
}

impl warp::reject::Reject for ApiRejection {}

impl ApiRejection {
    pub fn new(status: StatusCode, code: &str, message: impl Into<String>) -> Self {
        Self { status, body: ErrorResponse::new(code, message, None) }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.body.error.details = Some(details);
        self
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }
}

impl From<StatsError> for ApiRejection {
    fn from(err: StatsError) -> Self {
        match err {
            StatsError::NotFound(message) => Self::not_found(message),
            StatsError::Validation(message) => Self::validation(message),
            StatsError::DataSource(source) => {
                error!("Data source failure: {}", source);
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATA_SOURCE_ERROR",
                    format!("Failed to load data: {}", source),
                )
            }
            StatsError::Frame(source) => {
                error!("Frame operation failed: {}", source);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", "Internal server error")
            }
        }
    }
}

/// Turn any rejection into the JSON error shape
pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, body) = if let Some(api) = err.find::<ApiRejection>() {
        (api.status, api.body.clone())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            ErrorResponse::new("METHOD_NOT_ALLOWED", "Method not allowed", None),
        )
    } else if let Some(invalid) = err.find::<warp::reject::InvalidQuery>() {
        (StatusCode::BAD_REQUEST, ErrorResponse::new("VALIDATION_ERROR", invalid.to_string(), None))
    } else if err.is_not_found() {
        (StatusCode::NOT_FOUND, ErrorResponse::new("NOT_FOUND", "Route not found", None))
    } else {
        warn!("Unhandled rejection: {:?}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorResponse::new("INTERNAL_ERROR", "Internal server error", None),
        )
    };

    Ok(warp::reply::with_status(warp::reply::json(&body), status))
}
