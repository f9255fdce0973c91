//! Application configuration.
//!
//! Centralized configuration for the Dropload frontend. Values are
//! compiled in; the page is served by the relay from the same origin, so
//! the upload endpoint is a plain path.

use std::time::Duration;

use crate::types::Service;

/// Upload endpoint, relative to the page origin.
pub const UPLOAD_ENDPOINT: &str = "/upload";

/// How long the progress bar stays visible after reaching 100%.
pub const PROGRESS_HIDE_DELAY: Duration = Duration::from_millis(1000);

/// Shown when a failed response carries no usable message.
pub const FALLBACK_ERROR_MESSAGE: &str = "An error occurred while uploading the file.";

/// Shown when a 200 response does not contain a link.
pub const INVALID_RESPONSE_MESSAGE: &str = "Invalid response from server";

/// Services offered by the multi-service form, in display order.
pub const SERVICES: &[Service] = &[Service::Catbox, Service::Imgur];

/// Multipart field carrying the file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileField {
    File,
    Image,
}

impl FileField {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileField::File => "file",
            FileField::Image => "image",
        }
    }
}

/// Feature set of an upload form.
///
/// An empty `services` list means the form has no service concept: no radio
/// buttons, no `service` field and raw links in the result panel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UploadVariant {
    pub field: FileField,
    pub image_only: bool,
    pub services: &'static [Service],
    pub preview: bool,
    pub progress: bool,
}

impl UploadVariant {
    /// Any file type, Catbox or Imgur, with preview and progress.
    pub const MULTI_SERVICE: UploadVariant = UploadVariant {
        field: FileField::File,
        image_only: false,
        services: SERVICES,
        preview: true,
        progress: true,
    };

    /// Images only, single destination chosen by the server.
    pub const IMAGE_ONLY: UploadVariant = UploadVariant {
        field: FileField::Image,
        image_only: true,
        services: &[],
        preview: true,
        progress: true,
    };

    /// Whether the user has to pick a service before submitting.
    pub fn has_services(&self) -> bool {
        !self.services.is_empty()
    }

    /// Value for the file input's `accept` attribute.
    pub fn accept(&self) -> &'static str {
        if self.image_only {
            "image/*"
        } else {
            "*/*"
        }
    }
}

/// Variant the application is built with.
pub const UPLOAD_VARIANT: UploadVariant = UploadVariant::MULTI_SERVICE;
