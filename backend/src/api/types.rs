//! REST API types for frontend integration.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::hosts::Service;

/// Response sent to the browser after a successful upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub success: bool,

    /// Public link to the hosted file
    pub link: String,

    /// Service that stored the file
    pub service: Service,

    /// Same as `link`; only set for uploads sent under the `image` field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl UploadResponse {
    pub fn new(link: String, service: Service, image_field: bool) -> Self {
        Self {
            success: true,
            image_url: image_field.then(|| link.clone()),
            link,
            service,
        }
    }
}

/// Create an error response
pub fn error_response(error: &str) -> Value {
    json!({ "error": error })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_upload_response_shape() {
        let response = UploadResponse::new("https://x/y".into(), Service::Catbox, false);
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            json!({ "success": true, "link": "https://x/y", "service": "catbox" })
        );
    }

    #[test]
    fn test_image_upload_response_shape() {
        let response = UploadResponse::new("https://i.imgur.com/a.png".into(), Service::Imgur, true);
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["image_url"], "https://i.imgur.com/a.png");
        assert_eq!(value["service"], "imgur");
    }
}
