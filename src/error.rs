use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BrailleError {
    #[error("Could not read image: {0}")]
    UnreadableImage(String),

    #[error("Not enough Braille dots detected (found {found}, need at least 2)")]
    InsufficientDots { found: usize },

    #[error("Degenerate dot geometry: {0}")]
    DegenerateGeometry(String),

    #[error("Braille detection timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Image too large: {size} bytes (max: {max} bytes)")]
    ImageTooLarge { size: usize, max: usize },

    #[error("Missing image in request")]
    MissingFile,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl BrailleError {
    /// Stable machine-readable code reported alongside the message
    pub fn code(&self) -> &'static str {
        match self {
            BrailleError::UnreadableImage(_) => "UNREADABLE_IMAGE",
            BrailleError::InsufficientDots { .. } => "INSUFFICIENT_DOTS",
            BrailleError::DegenerateGeometry(_) => "DEGENERATE_GEOMETRY",
            BrailleError::Timeout { .. } => "TIMEOUT",
            BrailleError::ImageTooLarge { .. } => "IMAGE_TOO_LARGE",
            BrailleError::MissingFile => "MISSING_FILE",
            BrailleError::InvalidRequest(_) => "INVALID_REQUEST",
            BrailleError::UnsupportedLanguage(_) => "UNSUPPORTED_LANGUAGE",
            BrailleError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            BrailleError::UnreadableImage(_)
            | BrailleError::MissingFile
            | BrailleError::InvalidRequest(_)
            | BrailleError::UnsupportedLanguage(_) => StatusCode::BAD_REQUEST,
            BrailleError::InsufficientDots { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            BrailleError::ImageTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            BrailleError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            BrailleError::DegenerateGeometry(_) | BrailleError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for BrailleError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: self.code().to_string(),
        });

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_dots_maps_to_unprocessable() {
        let err = BrailleError::InsufficientDots { found: 1 };
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.code(), "INSUFFICIENT_DOTS");
        assert!(err.to_string().contains("found 1"));
    }

    #[test]
    fn test_client_errors_are_bad_request() {
        assert_eq!(
            BrailleError::UnreadableImage("garbage".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(BrailleError::MissingFile.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            BrailleError::UnsupportedLanguage("klingon".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }
}
