//! Imgur image uploads (API v3, anonymous with a client id).

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::Value;

use super::{FileHost, Service, UploadFile};
use crate::error::{HostError, HostResult};

pub const IMGUR_API_URL: &str = "https://api.imgur.com/3/image";

pub struct ImgurHost {
    client: reqwest::Client,
    endpoint: String,
    client_id: String,
}

/// Imgur API envelope
#[derive(Debug, Deserialize)]
struct ImgurResponse {
    #[serde(default)]
    data: ImgurData,
    #[serde(default)]
    success: bool,
}

#[derive(Debug, Default, Deserialize)]
struct ImgurData {
    #[serde(default)]
    link: Option<String>,
    /// A string, or an object with a `message`
    #[serde(default)]
    error: Option<Value>,
}

impl ImgurData {
    fn error_message(&self) -> Option<String> {
        match self.error.as_ref()? {
            Value::String(s) => Some(s.clone()),
            Value::Object(obj) => obj.get("message")?.as_str().map(str::to_string),
            _ => None,
        }
    }
}

impl ImgurHost {
    pub fn new(client: reqwest::Client, client_id: String) -> Self {
        Self {
            client,
            endpoint: IMGUR_API_URL.to_string(),
            client_id,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl FileHost for ImgurHost {
    fn service(&self) -> Service {
        Service::Imgur
    }

    async fn upload(&self, file: UploadFile) -> HostResult<String> {
        let name = file.file_name.clone();
        let part = Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.content_type)?;
        let form = Form::new()
            .text("type", "file")
            .text("name", name)
            .part("image", part);

        let response = self
            .client
            .post(&self.endpoint)
            .header(AUTHORIZATION, format!("Client-ID {}", self.client_id))
            .multipart(form)
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        parse_imgur_response(status, &body)
    }
}

/// Extract the image link from an Imgur reply.
pub fn parse_imgur_response(status: u16, body: &str) -> HostResult<String> {
    let parsed = serde_json::from_str::<ImgurResponse>(body);

    if !(200..300).contains(&status) {
        let message = parsed
            .ok()
            .and_then(|r| r.data.error_message())
            .unwrap_or_else(|| summarize(body));
        return Err(HostError::Api {
            service: Service::Imgur,
            status,
            message,
        });
    }

    let response = parsed.map_err(|e| HostError::InvalidResponse {
        service: Service::Imgur,
        message: e.to_string(),
    })?;

    match response.data.link {
        Some(link) if response.success && !link.is_empty() => Ok(link),
        _ => Err(HostError::InvalidResponse {
            service: Service::Imgur,
            message: response
                .data
                .error_message()
                .unwrap_or_else(|| "missing link".to_string()),
        }),
    }
}

/// First line of a non-JSON body, capped so HTML error pages stay readable.
fn summarize(body: &str) -> String {
    let line = body.trim().lines().next().unwrap_or("").trim();
    if line.is_empty() {
        return "empty response".to_string();
    }
    line.chars().take(200).collect()
}
