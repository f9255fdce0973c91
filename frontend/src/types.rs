//! Common types used across the frontend application.
//!
//! This module centralizes type definitions shared by the upload
//! controller, the services and the components.
//!
//! # Categories
//!
//! - **File Types** - the selected file and its metadata
//! - **Service Types** - upload destinations offered to the user
//! - **API Types** - `/upload` response structures
//! - **Error Types** - upload cycle errors

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::{FALLBACK_ERROR_MESSAGE, INVALID_RESPONSE_MESSAGE};

// =============================================================================
// File Types
// =============================================================================

/// A user-chosen file the controller can inspect and upload.
///
/// Implemented for `web_sys::File` in the browser; tests use plain structs.
pub trait FileSource: Clone {
    /// File name as reported by the browser.
    fn name(&self) -> String;
    /// MIME type, empty when the browser could not tell.
    fn mime_type(&self) -> String;
    /// Size in bytes.
    fn size(&self) -> u64;
    /// Last modification time, milliseconds since the Unix epoch.
    fn last_modified(&self) -> f64;

    /// Snapshot of the metadata, used for logging and display.
    fn info(&self) -> FileInfo {
        FileInfo {
            name: self.name(),
            mime_type: self.mime_type(),
            size: self.size(),
            last_modified: self.last_modified(),
        }
    }
}

impl FileSource for web_sys::File {
    fn name(&self) -> String {
        web_sys::File::name(self)
    }

    fn mime_type(&self) -> String {
        self.type_()
    }

    fn size(&self) -> u64 {
        web_sys::Blob::size(self) as u64
    }

    fn last_modified(&self) -> f64 {
        web_sys::File::last_modified(self)
    }
}

/// Metadata of a selected file.
#[derive(Clone, Debug, PartialEq)]
pub struct FileInfo {
    pub name: String,
    pub mime_type: String,
    pub size: u64,
    pub last_modified: f64,
}

impl FileInfo {
    /// Last modification time rendered in the browser's local time zone.
    pub fn last_modified_display(&self) -> String {
        chrono::DateTime::from_timestamp_millis(self.last_modified as i64)
            .map(|utc| {
                utc.with_timezone(&chrono::Local)
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string()
            })
            .unwrap_or_else(|| "unknown".to_string())
    }
}

// =============================================================================
// Service Types
// =============================================================================

/// Upload destination the server forwards the file to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Service {
    Catbox,
    Imgur,
}

impl Service {
    /// Value sent in the `service` form field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Service::Catbox => "catbox",
            Service::Imgur => "imgur",
        }
    }

    /// Label shown next to the radio button.
    pub fn label(&self) -> &'static str {
        match self {
            Service::Catbox => "Catbox",
            Service::Imgur => "Imgur",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Service {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "catbox" => Ok(Service::Catbox),
            "imgur" => Ok(Service::Imgur),
            other => Err(format!("Unknown service: {}", other)),
        }
    }
}

// =============================================================================
// API Response Types
// =============================================================================

/// Successful upload as reported by `POST /upload`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UploadResult {
    /// Public link to the hosted file
    pub link: String,
    /// Service that hosted the file, when the server reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
}

/// Raw success body. Image endpoints answer with `image_url` instead of
/// (or next to) `link`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct UploadResponseBody {
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl UploadResponseBody {
    /// Resolve the body into a result, preferring `link` over `image_url`.
    pub fn into_result(self) -> AppResult<UploadResult> {
        let link = self
            .link
            .filter(|l| !l.is_empty())
            .or(self.image_url.filter(|l| !l.is_empty()))
            .ok_or_else(|| UploadError::Server(INVALID_RESPONSE_MESSAGE.to_string()))?;

        Ok(UploadResult {
            link,
            service: self.service.filter(|s| !s.is_empty()),
        })
    }
}

/// Error body sent by the server on non-200 responses.
#[derive(Clone, Debug, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

// =============================================================================
// Error Types
// =============================================================================

/// Errors ending an upload cycle.
///
/// `Display` yields exactly the text shown in the error panel.
#[derive(Clone, Debug, PartialEq)]
pub enum UploadError {
    /// Submit without an active selection.
    NoFileSelected,
    /// Non-image file picked in an image-only form.
    InvalidFileType(String),
    /// Submit without choosing a destination service.
    NoServiceSelected,
    /// The request never produced an HTTP response.
    Network,
    /// The server answered with a failure status.
    Server(String),
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadError::NoFileSelected => write!(f, "Please select a file."),
            UploadError::InvalidFileType(mime) if mime.is_empty() => {
                write!(f, "Please select an image file.")
            }
            UploadError::InvalidFileType(mime) => {
                write!(f, "Please select an image file (got {}).", mime)
            }
            UploadError::NoServiceSelected => write!(f, "Please select an upload service."),
            UploadError::Network => write!(f, "Network error occurred"),
            UploadError::Server(msg) if msg.trim().is_empty() => {
                write!(f, "{}", FALLBACK_ERROR_MESSAGE)
            }
            UploadError::Server(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for UploadError {}

/// Result type alias for frontend operations.
pub type AppResult<T> = Result<T, UploadError>;
