//! Error handling

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use tracing::{error, info};

use crate::constants::MAX_DIMENSION;

/// Failures of the placeholder pipeline, split by who is at fault.
#[derive(Debug)]
pub enum PlaceholderError {
    /// The `prompt` query parameter was absent or empty
    MissingPrompt,
    /// The query string itself could not be decoded
    MalformedQuery(String),
    /// A query parameter could not be parsed, carries the parameter name
    InvalidParameter(&'static str),
    /// Width or height above the maximum
    DimensionsTooLarge,
    /// Width or height below one pixel
    DimensionsTooSmall,
    /// JPEG encoding failed
    Encode(image::ImageError),
    /// When an internal server error occurs
    InternalServerError(String),
}

impl PlaceholderError {
    /// HTTP status the error maps to
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingPrompt
            | Self::MalformedQuery(_)
            | Self::InvalidParameter(_)
            | Self::DimensionsTooLarge
            | Self::DimensionsTooSmall => StatusCode::BAD_REQUEST,
            Self::Encode(_) | Self::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for PlaceholderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingPrompt => write!(f, "Missing 'prompt' query parameter"),
            Self::MalformedQuery(reason) => write!(f, "Malformed query string: {reason}"),
            Self::InvalidParameter(name) => write!(f, "Invalid '{name}' query parameter"),
            Self::DimensionsTooLarge => {
                write!(f, "Maximum dimensions are {MAX_DIMENSION}x{MAX_DIMENSION}")
            }
            Self::DimensionsTooSmall => write!(f, "Minimum dimensions are 1x1"),
            Self::Encode(err) => write!(f, "Failed to encode image: {err}"),
            Self::InternalServerError(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for PlaceholderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Encode(err) => Some(err),
            _ => None,
        }
    }
}

impl From<image::ImageError> for PlaceholderError {
    fn from(err: image::ImageError) -> Self {
        PlaceholderError::Encode(err)
    }
}

impl From<axum::extract::rejection::QueryRejection> for PlaceholderError {
    fn from(err: axum::extract::rejection::QueryRejection) -> Self {
        PlaceholderError::MalformedQuery(err.body_text())
    }
}

impl From<tokio::task::JoinError> for PlaceholderError {
    fn from(err: tokio::task::JoinError) -> Self {
        PlaceholderError::InternalServerError(err.to_string())
    }
}

impl IntoResponse for PlaceholderError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let message = self.to_string();
        if status.is_server_error() {
            error!("Error: {}", message);
        } else {
            info!("Bad request: {}", message);
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_bad_requests() {
        for err in [
            PlaceholderError::MissingPrompt,
            PlaceholderError::MalformedQuery("bad".to_string()),
            PlaceholderError::InvalidParameter("width"),
            PlaceholderError::DimensionsTooLarge,
            PlaceholderError::DimensionsTooSmall,
        ] {
            assert_eq!(err.status(), StatusCode::BAD_REQUEST, "{err}");
        }
        assert_eq!(
            PlaceholderError::InternalServerError("boom".to_string()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn messages_match_api_contract() {
        assert_eq!(
            PlaceholderError::MissingPrompt.to_string(),
            "Missing 'prompt' query parameter"
        );
        assert_eq!(
            PlaceholderError::DimensionsTooLarge.to_string(),
            "Maximum dimensions are 2000x2000"
        );
        assert_eq!(
            PlaceholderError::InvalidParameter("height").to_string(),
            "Invalid 'height' query parameter"
        );
    }
}
