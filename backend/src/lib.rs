//! # Dropload - upload relay
//!
//! Dropload receives files uploaded from the browser form and forwards them
//! to a file hosting service (Catbox or Imgur), answering with the public
//! link.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Browser   │────▶│ POST /upload│────▶│ HostRegistry│────▶│ Catbox/Imgur│
//! │ (multipart) │     │  (validate) │     │  (service)  │     │   (link)    │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dropload::{Config, server::start_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::from_env().unwrap();
//!     start_server(config).await.unwrap();
//! }
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`config`] - Environment configuration
//! - [`hosts`] - File host adapters and registry
//! - [`api`] - HTTP API server

// Core modules
pub mod error;
pub mod config;

// Hosting services
pub mod hosts;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{ConfigError, HostError, RelayError};

// =============================================================================
// Re-exports - Configuration
// =============================================================================

pub use config::Config;

// =============================================================================
// Re-exports - Hosts
// =============================================================================

pub use hosts::{
    sanitize_file_name,
    CatboxHost,
    FileHost,
    HostRegistry,
    ImgurHost,
    Service,
    UploadFile,
};

// =============================================================================
// Re-exports - API
// =============================================================================

pub use api::types::{UploadResponse, error_response};

// Server
pub mod server {
    pub use crate::api::server::{app, start_server, AppState};
}
