//! Local file preview.
//!
//! Reads the selected file as a data URL with a `FileReader` so images and
//! videos can be shown before anything is uploaded. Other types get no
//! preview.

use futures::channel::oneshot;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{File, FileReader};

use crate::types::FileSource;

/// Element used to display a preview.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PreviewKind {
    Image,
    Video,
}

impl PreviewKind {
    /// Preview element for a MIME type, `None` when it cannot be previewed.
    pub fn from_mime(mime: &str) -> Option<Self> {
        if mime.starts_with("image/") {
            Some(PreviewKind::Image)
        } else if mime.starts_with("video/") {
            Some(PreviewKind::Video)
        } else {
            None
        }
    }
}

/// A preview ready to be rendered.
#[derive(Clone, Debug, PartialEq)]
pub struct Preview {
    pub kind: PreviewKind,
    /// `data:` URL of the file content
    pub src: String,
}

/// Build the preview for `file`.
///
/// Unsupported types and read failures yield `None`; a failed preview is
/// never reported to the user.
pub async fn load_preview(file: File) -> Option<Preview> {
    let kind = PreviewKind::from_mime(&file.mime_type())?;

    match read_data_url(&file).await {
        Ok(src) => Some(Preview { kind, src }),
        Err(e) => {
            log::warn!("Preview skipped for {}: {}", FileSource::name(&file), e);
            None
        }
    }
}

/// Read `file` into a `data:` URL without blocking the UI thread.
pub async fn read_data_url(file: &File) -> Result<String, String> {
    let reader = FileReader::new().map_err(|e| format!("Failed to create FileReader: {:?}", e))?;

    let (tx, rx) = oneshot::channel::<Result<String, String>>();
    let tx = Rc::new(RefCell::new(Some(tx)));

    let onload = {
        let tx = tx.clone();
        let reader = reader.clone();
        Closure::wrap(Box::new(move |_: web_sys::Event| {
            let result = reader
                .result()
                .ok()
                .and_then(|v| v.as_string())
                .ok_or_else(|| "FileReader returned no data".to_string());
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(result);
            }
        }) as Box<dyn FnMut(web_sys::Event)>)
    };

    let onerror = {
        let tx = tx.clone();
        Closure::wrap(Box::new(move |_: web_sys::Event| {
            if let Some(tx) = tx.borrow_mut().take() {
                let _ = tx.send(Err("Failed to read file".to_string()));
            }
        }) as Box<dyn FnMut(web_sys::Event)>)
    };

    reader.set_onload(Some(onload.as_ref().unchecked_ref()));
    reader.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    reader
        .read_as_data_url(file)
        .map_err(|e| format!("Failed to read file: {:?}", e))?;

    // The closures must outlive the read.
    let result = rx.await.map_err(|_| "FileReader dropped".to_string())?;

    reader.set_onload(None);
    reader.set_onerror(None);
    drop(onload);
    drop(onerror);

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_kind_from_mime() {
        assert_eq!(PreviewKind::from_mime("image/png"), Some(PreviewKind::Image));
        assert_eq!(PreviewKind::from_mime("video/mp4"), Some(PreviewKind::Video));
        assert_eq!(PreviewKind::from_mime("application/pdf"), None);
        assert_eq!(PreviewKind::from_mime(""), None);
    }
}
