/// Error handling for the upload boundary
///
/// - `ErrorResponse`: the JSON body every failed request answers with
/// - `IntoErrorResponse`: status code, machine code and log level per error
/// - `UploadError`: every way an analysis upload can be refused
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use warp::http::StatusCode;
use warp::reply::{self, Response};
use warp::Reply;

/// Standard error response format for all API endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Machine-readable error code (e.g., "no_file_part")
    pub error: String,
    /// Human-readable error message
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(
        error: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: Some(details),
        }
    }

    pub fn into_response(self, status: StatusCode) -> Response {
        reply::with_status(reply::json(&self), status).into_response()
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

/// Error classification for logging levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Client errors (4xx), expected during normal operation
    Client,
    /// Server errors (5xx)
    Server,
}

pub trait IntoErrorResponse {
    fn status_code(&self) -> StatusCode;

    fn error_code(&self) -> &'static str;

    fn error_message(&self) -> String;

    fn error_details(&self) -> Option<serde_json::Value> {
        None
    }

    fn severity(&self) -> ErrorSeverity {
        if self.status_code().is_server_error() {
            ErrorSeverity::Server
        } else {
            ErrorSeverity::Client
        }
    }

    fn to_error_response(&self) -> ErrorResponse {
        if let Some(details) = self.error_details() {
            ErrorResponse::with_details(self.error_code(), self.error_message(), details)
        } else {
            ErrorResponse::new(self.error_code(), self.error_message())
        }
    }

    /// Convert to HTTP response, logging at the level of its severity
    fn into_http_response(self) -> Response
    where
        Self: Sized,
    {
        let status = self.status_code();
        let error_response = self.to_error_response();

        match self.severity() {
            ErrorSeverity::Client => tracing::info!(
                code = %error_response.error,
                message = %error_response.message,
                "client error"
            ),
            ErrorSeverity::Server => tracing::error!(
                code = %error_response.error,
                message = %error_response.message,
                "server error"
            ),
        }

        error_response.into_response(status)
    }
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("No file part")]
    NoFilePart,
    #[error("No selected file")]
    NoSelectedFile,
    #[error("No parameters provided")]
    NoParameters,
    #[error("Invalid parameters format")]
    InvalidParameters(#[source] serde_json::Error),
    #[error("Missing one or more parameters")]
    MissingParameters,
    #[error("Uploaded file is not valid UTF-8 text")]
    InvalidTranscript,
    #[error("Failed to stage upload: {0}")]
    Staging(#[from] std::io::Error),
    #[error("Malformed multipart form: {0}")]
    InvalidForm(String),
}

impl IntoErrorResponse for UploadError {
    fn status_code(&self) -> StatusCode {
        match self {
            UploadError::Staging(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            UploadError::NoFilePart => "no_file_part",
            UploadError::NoSelectedFile => "no_selected_file",
            UploadError::NoParameters => "no_parameters",
            UploadError::InvalidParameters(_) => "invalid_parameters",
            UploadError::MissingParameters => "missing_parameters",
            UploadError::InvalidTranscript => "invalid_transcript",
            UploadError::Staging(_) => "staging_failed",
            UploadError::InvalidForm(_) => "invalid_form",
        }
    }

    fn error_message(&self) -> String {
        self.to_string()
    }

    fn error_details(&self) -> Option<serde_json::Value> {
        match self {
            UploadError::InvalidParameters(err) => Some(serde_json::json!({
                "line": err.line(),
                "column": err.column(),
                "reason": err.to_string(),
            })),
            _ => None,
        }
    }
}
