//! HTTP server for the Dropload relay.
//!
//! Receives browser uploads and forwards them to the chosen file host.
//!
//! # API Endpoints
//!
//! | Method | Path       | Description                                 |
//! |--------|------------|---------------------------------------------|
//! | GET    | `/health`  | Health check and available services         |
//! | POST   | `/upload`  | Multipart upload (`file`/`image`, `service`)|
//! | GET    | `/*`       | Built frontend from the static directory    |

use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, State},
    http::{header, Method, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::Instrument;
use uuid::Uuid;

use super::types::{error_response, UploadResponse};
use crate::config::Config;
use crate::error::{RelayError, RelayResult};
use crate::hosts::{HostRegistry, Service, UploadFile};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub hosts: HostRegistry,
    pub default_service: Service,
}

/// Build the application router.
pub fn app(config: &Config, hosts: HostRegistry) -> Router {
    let state = AppState {
        hosts,
        default_service: config.default_service,
    };

    // Permissive CORS so a dev server on another port can post uploads
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE]);

    let index = config.static_dir.join("index.html");
    let frontend = ServeDir::new(&config.static_dir).fallback(ServeFile::new(index));

    Router::new()
        .route("/health", get(health))
        .route("/upload", post(upload))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .fallback_service(frontend)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Start the HTTP server
pub async fn start_server(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    let hosts = HostRegistry::from_config(&config)?;
    let services = hosts.services();
    let app = app(&config, hosts);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(
        %addr,
        ?services,
        static_dir = %config.static_dir.display(),
        "Dropload relay running on http://localhost:{}",
        config.port
    );
    tracing::info!("   POST /upload - Upload a file");
    tracing::info!("   GET  /health - Health check");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "dropload",
        "version": env!("CARGO_PKG_VERSION"),
        "services": state.hosts.services(),
        "defaultService": state.default_service,
    }))
}

/// Upload endpoint
async fn upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, (StatusCode, Json<Value>)> {
    let span = tracing::info_span!("upload", id = %Uuid::new_v4());

    relay_upload(&state, multipart)
        .instrument(span.clone())
        .await
        .map(Json)
        .map_err(|e| {
            let status = e.status();
            span.in_scope(|| {
                if status.is_server_error() {
                    tracing::error!(%status, "{}", e);
                } else {
                    tracing::warn!(%status, "{}", e);
                }
            });
            (status, Json(error_response(&e.to_string())))
        })
}

/// File part as received from the browser.
struct ReceivedFile {
    field: String,
    file_name: String,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

async fn relay_upload(state: &AppState, mut multipart: Multipart) -> RelayResult<UploadResponse> {
    let mut received: Option<ReceivedFile> = None;
    let mut service_value: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            // One file per submission; later file fields are ignored
            "file" | "image" if received.is_none() => {
                let file_name = field.file_name().unwrap_or("").to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(multipart_error)?.to_vec();
                received = Some(ReceivedFile {
                    field: name.clone(),
                    file_name,
                    content_type,
                    bytes,
                });
            }
            "service" => {
                service_value = Some(field.text().await.map_err(multipart_error)?);
            }
            _ => {}
        }
    }

    let received = received.ok_or(RelayError::MissingFile)?;
    if received.file_name.trim().is_empty() {
        return Err(RelayError::EmptyFileName);
    }

    let service = match service_value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
        Some(value) => value
            .parse::<Service>()
            .map_err(|_| RelayError::UnknownService(value))?,
        None => state.default_service,
    };

    let host = state
        .hosts
        .get(service)
        .ok_or(RelayError::ServiceUnavailable(service))?;

    let image_field = received.field == "image";
    let file = UploadFile::new(
        &received.file_name,
        received.content_type.as_deref(),
        received.bytes,
    );

    tracing::info!(
        file = %file.file_name,
        content_type = %file.content_type,
        bytes = file.len(),
        %service,
        "Forwarding upload"
    );

    let link = host.upload(file).await?;
    tracing::info!(%link, %service, "Upload complete");

    Ok(UploadResponse::new(link, service, image_field))
}

fn multipart_error(e: MultipartError) -> RelayError {
    RelayError::Multipart {
        status: e.status(),
        message: e.body_text(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{HostError, HostResult};
    use crate::hosts::FileHost;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    const BOUNDARY: &str = "dropload-test-boundary";

    /// Records what it receives and answers with a fixed link or failure.
    struct StubHost {
        service: Service,
        fail: bool,
        received: Mutex<Vec<UploadFile>>,
    }

    impl StubHost {
        fn new(service: Service) -> Arc<Self> {
            Arc::new(Self { service, fail: false, received: Mutex::new(vec![]) })
        }

        fn failing(service: Service) -> Arc<Self> {
            Arc::new(Self { service, fail: true, received: Mutex::new(vec![]) })
        }
    }

    #[async_trait]
    impl FileHost for StubHost {
        fn service(&self) -> Service {
            self.service
        }

        async fn upload(&self, file: UploadFile) -> HostResult<String> {
            let link = format!("https://{}.example/{}", self.service, file.file_name);
            self.received.lock().unwrap().push(file);
            if self.fail {
                return Err(HostError::Api {
                    service: self.service,
                    status: 503,
                    message: "over capacity".into(),
                });
            }
            Ok(link)
        }
    }

    /// (field name, file name, content)
    fn multipart_request(parts: &[(&str, Option<&str>, &str)]) -> Request<Body> {
        let mut body = String::new();
        for (name, file_name, content) in parts {
            body.push_str(&format!("--{}\r\n", BOUNDARY));
            match file_name {
                Some(file_name) => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: image/png\r\n\r\n",
                    name, file_name
                )),
                None => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                    name
                )),
            }
            body.push_str(content);
            body.push_str("\r\n");
        }
        body.push_str(&format!("--{}--\r\n", BOUNDARY));

        Request::builder()
            .method("POST")
            .uri("/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn test_config() -> Config {
        Config {
            static_dir: std::env::temp_dir().join("dropload-no-frontend"),
            ..Config::default()
        }
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_upload_routes_to_requested_service() {
        let catbox = StubHost::new(Service::Catbox);
        let hosts = HostRegistry::new()
            .with(catbox.clone())
            .with(StubHost::new(Service::Imgur));
        let router = app(&test_config(), hosts);

        let (status, body) = send(
            router,
            multipart_request(&[
                ("file", Some("my cat.png"), "PNGDATA"),
                ("service", None, "catbox"),
            ]),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["link"], "https://catbox.example/my_cat.png");
        assert_eq!(body["service"], "catbox");
        assert!(body.get("image_url").is_none());

        let received = catbox.received.lock().unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].bytes, b"PNGDATA");
        assert_eq!(received[0].content_type, "image/png");
    }

    #[tokio::test]
    async fn test_image_field_uses_default_service() {
        let imgur = StubHost::new(Service::Imgur);
        let router = app(&test_config(), HostRegistry::new().with(imgur.clone()));

        let (status, body) = send(router, multipart_request(&[("image", Some("a.png"), "x")])).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["service"], "imgur");
        assert_eq!(body["image_url"], "https://imgur.example/a.png");
        assert_eq!(imgur.received.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_file_is_rejected() {
        let router = app(&test_config(), HostRegistry::new().with(StubHost::new(Service::Imgur)));

        let (status, body) = send(router, multipart_request(&[("service", None, "imgur")])).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No file provided");
    }

    #[tokio::test]
    async fn test_empty_file_name_is_rejected() {
        let router = app(&test_config(), HostRegistry::new().with(StubHost::new(Service::Imgur)));

        let (status, body) = send(router, multipart_request(&[("image", Some(""), "x")])).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No file selected");
    }

    #[tokio::test]
    async fn test_unknown_service_is_rejected() {
        let catbox = StubHost::new(Service::Catbox);
        let router = app(&test_config(), HostRegistry::new().with(catbox.clone()));

        let (status, body) = send(
            router,
            multipart_request(&[("file", Some("a.txt"), "x"), ("service", None, "dropbox")]),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Unsupported service: dropbox");
        assert!(catbox.received.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unconfigured_service_is_rejected() {
        let router = app(&test_config(), HostRegistry::new().with(StubHost::new(Service::Catbox)));

        let (status, body) = send(
            router,
            multipart_request(&[("file", Some("a.txt"), "x"), ("service", None, "imgur")]),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Service not available: imgur");
    }

    #[tokio::test]
    async fn test_host_failure_is_reported() {
        let router = app(&test_config(), HostRegistry::new().with(StubHost::failing(Service::Catbox)));

        let (status, body) = send(
            router,
            multipart_request(&[("file", Some("a.txt"), "x"), ("service", None, "catbox")]),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body["error"],
            "Failed to upload file: catbox returned 503: over capacity"
        );
    }

    #[tokio::test]
    async fn test_oversized_upload_is_rejected() {
        let config = Config {
            max_upload_bytes: 64,
            ..test_config()
        };
        let catbox = StubHost::new(Service::Catbox);
        let router = app(&config, HostRegistry::new().with(catbox.clone()));
        let big = "x".repeat(4096);

        let (status, body) = send(
            router,
            multipart_request(&[("file", Some("big.bin"), &big), ("service", None, "catbox")]),
        )
        .await;

        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert!(body["error"].is_string());
        assert!(catbox.received.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_health_lists_services() {
        let router = app(&test_config(), HostRegistry::new().with(StubHost::new(Service::Catbox)));

        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(router, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["services"], json!(["catbox"]));
        assert_eq!(body["defaultService"], "imgur");
    }

    #[tokio::test]
    async fn test_frontend_is_served_for_other_paths() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>dropload</h1>").unwrap();
        let config = Config {
            static_dir: dir.path().to_path_buf(),
            ..Config::default()
        };

        for uri in ["/", "/some/client/route"] {
            let router = app(&config, HostRegistry::new());
            let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
            let response = router.oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{}", uri);
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
            assert_eq!(&bytes[..], b"<h1>dropload</h1>");
        }
    }

    #[tokio::test]
    async fn test_missing_frontend_keeps_api_available() {
        let config = test_config();
        assert!(!config.static_dir.exists());

        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app(&config, HostRegistry::new()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, _) = send(app(&config, HostRegistry::new()), request).await;
        assert_eq!(status, StatusCode::OK);
    }
}
