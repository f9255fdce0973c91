//! catbox.moe uploads.
//!
//! The API takes a multipart form with `reqtype=fileupload`, an optional
//! `userhash` and the file under `fileToUpload`, and answers with the link
//! as plain text.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use super::{FileHost, Service, UploadFile};
use crate::error::{HostError, HostResult};

pub const CATBOX_API_URL: &str = "https://catbox.moe/user/api.php";

pub struct CatboxHost {
    client: reqwest::Client,
    endpoint: String,
    userhash: Option<String>,
}

impl CatboxHost {
    /// Without a userhash uploads are anonymous.
    pub fn new(client: reqwest::Client, userhash: Option<String>) -> Self {
        Self {
            client,
            endpoint: CATBOX_API_URL.to_string(),
            userhash,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl FileHost for CatboxHost {
    fn service(&self) -> Service {
        Service::Catbox
    }

    async fn upload(&self, file: UploadFile) -> HostResult<String> {
        let part = Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.content_type)?;

        let mut form = Form::new().text("reqtype", "fileupload");
        if let Some(userhash) = &self.userhash {
            form = form.text("userhash", userhash.clone());
        }
        let form = form.part("fileToUpload", part);

        let response = self.client.post(&self.endpoint).multipart(form).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        parse_catbox_response(status, &body)
    }
}

/// Extract the link from a Catbox reply.
pub fn parse_catbox_response(status: u16, body: &str) -> HostResult<String> {
    let text = body.trim();

    if !(200..300).contains(&status) {
        return Err(HostError::Api {
            service: Service::Catbox,
            status,
            message: if text.is_empty() { "empty response".to_string() } else { text.to_string() },
        });
    }

    if text.starts_with("http://") || text.starts_with("https://") {
        Ok(text.to_string())
    } else {
        Err(HostError::InvalidResponse {
            service: Service::Catbox,
            message: text.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[test]
    fn test_link_body() {
        let link = parse_catbox_response(200, "https://files.catbox.moe/abc123.png\n").unwrap();
        assert_eq!(link, "https://files.catbox.moe/abc123.png");
    }

    #[test]
    fn test_error_text_with_ok_status() {
        let err = parse_catbox_response(200, "No files given.").unwrap_err();
        assert!(matches!(err, HostError::InvalidResponse { .. }));
        assert!(err.to_string().contains("No files given."));
    }

    #[test]
    fn test_failure_status() {
        let err = parse_catbox_response(412, "").unwrap_err();
        assert_eq!(err.to_string(), "catbox returned 412: empty response");
    }

    #[tokio::test]
    async fn test_upload_posts_catbox_form() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/user/api.php")
            .match_header("content-type", Matcher::Regex("^multipart/form-data; boundary=".into()))
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#"name="reqtype"\r\n\r\nfileupload\r\n"#.into()),
                Matcher::Regex(r#"name="userhash"\r\n\r\nhash42\r\n"#.into()),
                Matcher::Regex(r#"name="fileToUpload"; filename="cat.png""#.into()),
                Matcher::Regex(r#"Content-Type: image/png\r\n\r\npixels"#.into()),
            ]))
            .with_status(200)
            .with_body("https://files.catbox.moe/abc123.png\n")
            .create_async()
            .await;

        let host = CatboxHost::new(reqwest::Client::new(), Some("hash42".into()))
            .with_endpoint(format!("{}/user/api.php", server.url()));
        let file = UploadFile::new("cat.png", Some("image/png"), b"pixels".to_vec());

        assert_eq!(host.upload(file).await.unwrap(), "https://files.catbox.moe/abc123.png");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_upload_reports_catbox_failure() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .with_status(412)
            .with_body("No files given.")
            .create_async()
            .await;

        let host = CatboxHost::new(reqwest::Client::new(), None).with_endpoint(server.url());
        let err = host
            .upload(UploadFile::new("a.txt", Some("text/plain"), b"hi".to_vec()))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "catbox returned 412: No files given.");
        mock.assert_async().await;
    }
}
