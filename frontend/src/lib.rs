//! Dropload - Frontend Rust/Leptos Application
//!
//! A WebAssembly frontend for picking or dropping a file, previewing it
//! and uploading it through the relay's `POST /upload` endpoint.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        App                                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Hero (title, description)                                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  UploadSection                                               │
//! │  ├── service radios (multi-service variant)                  │
//! │  ├── drop zone + file input                                  │
//! │  ├── FilePreview                                             │
//! │  ├── ProgressBar                                             │
//! │  └── ResultPanel / ErrorPanel                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`config`] - Endpoint, timings and upload variants
//! - [`types`] - Common types (Service, UploadResult, UploadError, ...)
//! - [`controller`] - DOM-free upload controller and view state
//! - [`components`] - UI components
//! - [`services`] - Browser I/O (XHR upload, file preview)

use leptos::*;
use leptos_meta::{provide_meta_context, Title};
use leptos_router::*;
use wasm_bindgen::prelude::*;

// =============================================================================
// Module declarations
// =============================================================================

pub mod config;
pub mod types;
pub mod controller;
pub mod components;
pub mod services;

// =============================================================================
// Re-exports
// =============================================================================

// Configuration
pub use config::*;

// Types
pub use types::{
    // Files
    FileInfo, FileSource,
    // Services
    Service,
    // API
    UploadResult, UploadResponseBody, ErrorBody,
    // Errors
    UploadError, AppResult,
};

// Controller
pub use controller::{
    submit, UploadForm, UploadRequest, UploadTransport, UploadView, ProgressState, ResultLink,
};

// Components
pub use components::*;

// Services
pub use services::*;

// =============================================================================
// Application Entry Point
// =============================================================================

/// WASM entry point - called automatically by trunk.
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();

    _ = console_log::init_with_level(log::Level::Debug);

    log::info!("Dropload - Starting Leptos App");

    mount_to_body(|| view! { <App/> });
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text="Dropload"/>
        <Router>
            <main>
                <Routes>
                    <Route path="/" view=MainContent/>
                </Routes>
            </main>
        </Router>
    }
}

#[component]
fn MainContent() -> impl IntoView {
    view! {
        <div class="container">
            <Hero variant=UPLOAD_VARIANT/>
            <UploadSection variant=UPLOAD_VARIANT/>
        </div>
    }
}
