//! Upload controller: selection, validation, submission and view state.
//!
//! The controller is free of DOM access so the whole
//! select → validate → upload → render cycle can be exercised natively.
//! Components keep an [`UploadForm`] and an [`UploadView`] in signals and
//! hand a transport to [`submit`].
//!
//! ```text
//!  select_file ──▶ UploadForm ──build_request──▶ UploadTransport::send
//!                                                  │ progress
//!                                                  ▼
//!  render_result / render_error ◀── UploadView ◀── ProgressState
//! ```

use std::time::Duration;

use crate::config::{FileField, UploadVariant, PROGRESS_HIDE_DELAY, UPLOAD_ENDPOINT};
use crate::services::preview::Preview;
use crate::types::{AppResult, FileSource, Service, UploadError, UploadResult};

// =============================================================================
// Form State
// =============================================================================

/// Multipart request for a single submission.
#[derive(Clone, Debug)]
pub struct UploadRequest<F> {
    /// Endpoint path
    pub endpoint: &'static str,
    /// Field name carrying the file
    pub field: FileField,
    /// File to send
    pub file: F,
    /// Destination, only for multi-service forms
    pub service: Option<Service>,
}

/// User input of the upload form: the active file and the chosen service.
#[derive(Clone, Debug)]
pub struct UploadForm<F> {
    variant: UploadVariant,
    selection: Option<F>,
    selection_id: u64,
    service: Option<Service>,
}

impl<F: FileSource> UploadForm<F> {
    pub fn new(variant: UploadVariant) -> Self {
        Self {
            variant,
            selection: None,
            selection_id: 0,
            service: None,
        }
    }

    /// Currently active file.
    pub fn selection(&self) -> Option<&F> {
        self.selection.as_ref()
    }

    /// Incremented on every accepted selection. Lets late preview reads
    /// detect that the file they were started for has been replaced.
    pub fn selection_id(&self) -> u64 {
        self.selection_id
    }

    pub fn service(&self) -> Option<Service> {
        self.service
    }

    /// Make `file` the active selection.
    ///
    /// Image-only forms reject anything that is not `image/*` and keep the
    /// previous selection.
    pub fn select_file(&mut self, file: F) -> AppResult<u64> {
        let mime = file.mime_type();
        if self.variant.image_only && !mime.starts_with("image/") {
            log::warn!("Rejected {} ({}): not an image", file.name(), mime);
            return Err(UploadError::InvalidFileType(mime));
        }

        log::debug!("Selected {} ({}, {} bytes)", file.name(), mime, file.size());
        self.selection = Some(file);
        self.selection_id += 1;
        Ok(self.selection_id)
    }

    /// Choose the destination. Only services offered by the form are accepted.
    pub fn select_service(&mut self, service: Service) -> AppResult<()> {
        if !self.variant.services.contains(&service) {
            return Err(UploadError::NoServiceSelected);
        }
        self.service = Some(service);
        Ok(())
    }

    /// Choose the destination from a radio button value.
    pub fn select_service_value(&mut self, value: &str) -> AppResult<()> {
        let service = value
            .parse::<Service>()
            .map_err(|_| UploadError::NoServiceSelected)?;
        self.select_service(service)
    }

    /// Validate the form and build the request for one submission.
    pub fn build_request(&self) -> AppResult<UploadRequest<F>> {
        let file = self.selection.clone().ok_or(UploadError::NoFileSelected)?;

        let service = if self.variant.has_services() {
            Some(self.service.ok_or(UploadError::NoServiceSelected)?)
        } else {
            None
        };

        Ok(UploadRequest {
            endpoint: UPLOAD_ENDPOINT,
            field: self.variant.field,
            file,
            service,
        })
    }
}

// =============================================================================
// Transport
// =============================================================================

/// Sends an [`UploadRequest`] and reports upload progress in percent.
#[allow(async_fn_in_trait)]
pub trait UploadTransport<F: FileSource> {
    async fn send(
        &self,
        request: UploadRequest<F>,
        on_progress: Box<dyn Fn(f64)>,
    ) -> AppResult<UploadResult>;
}

/// Percentage of `loaded` over `total`, or `None` when the total is unknown.
pub fn progress_percent(loaded: f64, total: f64) -> Option<f64> {
    if total.is_nan() || total <= 0.0 {
        return None;
    }
    Some((loaded / total * 100.0).clamp(0.0, 100.0))
}

/// Run one submission: validate, log the file details, then send.
///
/// Validation failures return before the transport is touched.
pub async fn submit<F, T>(
    form: &UploadForm<F>,
    transport: &T,
    on_progress: impl Fn(f64) + 'static,
) -> AppResult<UploadResult>
where
    F: FileSource,
    T: UploadTransport<F>,
{
    let request = form.build_request()?;

    let info = request.file.info();
    log::info!("Uploading file: {}", info.name);
    log::info!("File details:");
    log::info!("- Type: {}", info.mime_type);
    log::info!("- Size: {} bytes", info.size);
    log::info!("- Last Modified: {}", info.last_modified_display());
    if let Some(service) = request.service {
        log::info!("Selected Service: {}", service);
    }

    match transport.send(request, Box::new(on_progress)).await {
        Ok(result) => {
            log::info!("Upload successful: {}", result.link);
            Ok(result)
        }
        Err(e) => {
            log::error!("Upload failed: {}", e);
            Err(e)
        }
    }
}

// =============================================================================
// View State
// =============================================================================

/// Hyperlink shown in the result panel.
#[derive(Clone, Debug, PartialEq)]
pub struct ResultLink {
    pub href: String,
    pub label: String,
}

/// Token returned when the bar reaches 100%; hand it back to
/// [`ProgressState::hide`] once `delay` has elapsed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HideProgress {
    generation: u64,
    pub delay: Duration,
}

/// Progress bar state for the current upload.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProgressState {
    visible: bool,
    percent: f64,
    generation: u64,
}

impl ProgressState {
    /// Reset for a new upload; timers from earlier uploads become stale.
    pub fn begin(&mut self) {
        self.generation += 1;
        self.visible = false;
        self.percent = 0.0;
    }

    /// Record a progress tick. Returns a hide token once 100% is reached.
    pub fn update(&mut self, percent: f64) -> Option<HideProgress> {
        self.visible = true;
        self.percent = percent.clamp(0.0, 100.0);

        (self.percent >= 100.0).then_some(HideProgress {
            generation: self.generation,
            delay: PROGRESS_HIDE_DELAY,
        })
    }

    /// Hide the bar if `token` still belongs to the current upload.
    pub fn hide(&mut self, token: HideProgress) -> bool {
        if token.generation != self.generation || self.percent < 100.0 {
            return false;
        }
        self.visible = false;
        true
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn percent(&self) -> f64 {
        self.percent
    }

    /// Text drawn inside the bar, e.g. `42.50%`.
    pub fn label(&self) -> String {
        format!("{:.2}%", self.percent)
    }
}

/// What the page shows: result/error panels, progress and preview.
#[derive(Clone, Debug, PartialEq)]
pub struct UploadView {
    variant: UploadVariant,
    pub result: Option<ResultLink>,
    pub error: Option<String>,
    pub progress: ProgressState,
    pub preview: Option<Preview>,
    pub uploading: bool,
}

impl UploadView {
    pub fn new(variant: UploadVariant) -> Self {
        Self {
            variant,
            result: None,
            error: None,
            progress: ProgressState::default(),
            preview: None,
            uploading: false,
        }
    }

    /// Mark a submission as in flight. Panels are left as they are until
    /// the submission renders.
    pub fn begin_upload(&mut self) {
        self.uploading = true;
        self.progress.begin();
    }

    /// Record a progress tick, ignored when the form has no progress bar.
    pub fn record_progress(&mut self, percent: f64) -> Option<HideProgress> {
        if !self.variant.progress {
            return None;
        }
        self.progress.update(percent)
    }

    /// Show the link panel and hide the error panel.
    pub fn render_result(&mut self, result: &UploadResult) {
        let service = result
            .service
            .as_deref()
            .filter(|_| self.variant.has_services());

        self.result = Some(ResultLink {
            href: result.link.clone(),
            label: link_label(&result.link, service),
        });
        self.error = None;
    }

    /// Show the error panel with `message` and hide the link panel.
    pub fn render_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.result = None;
    }

    /// Render the outcome of a submission and leave the uploading state.
    pub fn finish(&mut self, outcome: &AppResult<UploadResult>) {
        self.uploading = false;
        match outcome {
            Ok(result) => self.render_result(result),
            Err(e) => self.render_error(e.to_string()),
        }
    }

    /// Replace the preview. Unsupported file types clear it.
    pub fn show_preview(&mut self, preview: Option<Preview>) {
        if self.variant.preview {
            self.preview = preview;
        }
    }
}

/// `"<Service> Link: <link>"`, or the bare link without a service.
pub fn link_label(link: &str, service: Option<&str>) -> String {
    match service.filter(|s| !s.is_empty()) {
        Some(service) => format!("{} Link: {}", capitalize(service), link),
        None => link.to_string(),
    }
}

/// Uppercase the first character.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
