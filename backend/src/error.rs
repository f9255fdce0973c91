//! Error types for the Dropload relay.
//!
//! - [`ConfigError`] - invalid environment configuration
//! - [`HostError`] - failures talking to a file host
//! - [`RelayError`] - request-level failures of `POST /upload`
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use axum::http::StatusCode;
use thiserror::Error;

use crate::hosts::Service;

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while reading the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable holds a value that cannot be parsed.
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
}

// =============================================================================
// File Host Errors
// =============================================================================

/// Errors from a file hosting service.
#[derive(Debug, Error)]
pub enum HostError {
    /// Transport-level failure.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The host answered with a failure status.
    #[error("{service} returned {status}: {message}")]
    Api {
        service: Service,
        status: u16,
        message: String,
    },

    /// The host answered 2xx but the body is unusable.
    #[error("Invalid response from {service}: {message}")]
    InvalidResponse { service: Service, message: String },
}

// =============================================================================
// Relay Errors
// =============================================================================

/// Failures of a single upload request.
///
/// Each variant maps onto an HTTP status and a `{"error": ...}` body.
#[derive(Debug, Error)]
pub enum RelayError {
    /// No file field in the form.
    #[error("No file provided")]
    MissingFile,

    /// File field present but without a name.
    #[error("No file selected")]
    EmptyFileName,

    /// `service` is not one of the known services.
    #[error("Unsupported service: {0}")]
    UnknownService(String),

    /// `service` is known but not configured on this server.
    #[error("Service not available: {0}")]
    ServiceUnavailable(Service),

    /// The multipart body could not be read.
    #[error("{message}")]
    Multipart { status: StatusCode, message: String },

    /// The host rejected or failed the upload.
    #[error("Failed to upload file: {0}")]
    Host(#[from] HostError),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::MissingFile
            | RelayError::EmptyFileName
            | RelayError::UnknownService(_)
            | RelayError::ServiceUnavailable(_) => StatusCode::BAD_REQUEST,
            RelayError::Multipart { status, .. } => *status,
            RelayError::Host(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for host operations.
pub type HostResult<T> = Result<T, HostError>;

/// Result type for relay requests.
pub type RelayResult<T> = Result<T, RelayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_error_becomes_server_error() {
        let host_err = HostError::Api {
            service: Service::Imgur,
            status: 400,
            message: "File type invalid (1)".into(),
        };
        let relay_err: RelayError = host_err.into();
        assert_eq!(relay_err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            relay_err.to_string(),
            "Failed to upload file: imgur returned 400: File type invalid (1)"
        );
    }

    #[test]
    fn test_validation_errors_are_bad_requests() {
        assert_eq!(RelayError::MissingFile.status(), StatusCode::BAD_REQUEST);
        assert_eq!(RelayError::EmptyFileName.to_string(), "No file selected");
        assert_eq!(
            RelayError::UnknownService("dropbox".into()).to_string(),
            "Unsupported service: dropbox"
        );
    }
}
