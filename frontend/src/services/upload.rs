//! HTTP upload of the selected file to the relay.
//!
//! `fetch` exposes no upload progress, so the transport drives an
//! `XMLHttpRequest` and forwards its `upload.onprogress` events.

use futures::channel::oneshot;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{File, FormData, ProgressEvent, XmlHttpRequest};

use crate::config::{FALLBACK_ERROR_MESSAGE, INVALID_RESPONSE_MESSAGE};
use crate::controller::{progress_percent, UploadRequest, UploadTransport};
use crate::types::{AppResult, ErrorBody, UploadError, UploadResponseBody, UploadResult};

/// Browser transport backed by `XMLHttpRequest`.
#[derive(Clone, Copy, Debug, Default)]
pub struct XhrTransport;

impl UploadTransport<File> for XhrTransport {
    async fn send(
        &self,
        request: UploadRequest<File>,
        on_progress: Box<dyn Fn(f64)>,
    ) -> AppResult<UploadResult> {
        let form_data = build_form_data(&request)?;

        let xhr = XmlHttpRequest::new().map_err(|e| js_failure("create XMLHttpRequest", e))?;
        xhr.open_with_async("POST", request.endpoint, true)
            .map_err(|e| js_failure("open request", e))?;

        // `None` means the request failed before any response arrived.
        let (tx, rx) = oneshot::channel::<Option<(u16, String)>>();
        let tx = Rc::new(RefCell::new(Some(tx)));

        let onprogress = Closure::wrap(Box::new(move |event: ProgressEvent| {
            if !event.length_computable() {
                return;
            }
            if let Some(percent) = progress_percent(event.loaded(), event.total()) {
                log::debug!("Upload progress: {:.2}%", percent);
                on_progress(percent);
            }
        }) as Box<dyn FnMut(ProgressEvent)>);

        let onload = {
            let tx = tx.clone();
            let xhr = xhr.clone();
            Closure::wrap(Box::new(move |_: web_sys::Event| {
                let status = xhr.status().unwrap_or(0);
                let body = xhr.response_text().ok().flatten().unwrap_or_default();
                if let Some(tx) = tx.borrow_mut().take() {
                    let _ = tx.send(Some((status, body)));
                }
            }) as Box<dyn FnMut(web_sys::Event)>)
        };

        let onerror = {
            let tx = tx.clone();
            Closure::wrap(Box::new(move |_: web_sys::Event| {
                log::error!("Network error occurred during upload");
                if let Some(tx) = tx.borrow_mut().take() {
                    let _ = tx.send(None);
                }
            }) as Box<dyn FnMut(web_sys::Event)>)
        };

        let upload = xhr.upload().map_err(|e| js_failure("access upload target", e))?;
        upload.set_onprogress(Some(onprogress.as_ref().unchecked_ref()));
        xhr.set_onload(Some(onload.as_ref().unchecked_ref()));
        xhr.set_onerror(Some(onerror.as_ref().unchecked_ref()));

        xhr.send_with_opt_form_data(Some(&form_data))
            .map_err(|e| js_failure("send request", e))?;

        let outcome = rx.await.map_err(|_| UploadError::Network)?;

        upload.set_onprogress(None);
        xhr.set_onload(None);
        xhr.set_onerror(None);
        drop((onprogress, onload, onerror));

        match outcome {
            Some((status, body)) => {
                if status == 200 {
                    log::info!("Upload response: {}", body);
                } else {
                    log::error!("Upload failed. Status: {}, Response: {}", status, body);
                }
                interpret_response(status, &body)
            }
            None => Err(UploadError::Network),
        }
    }
}

/// Multipart body: the file under the variant's field, plus `service`.
fn build_form_data(request: &UploadRequest<File>) -> AppResult<FormData> {
    let form_data = FormData::new().map_err(|e| js_failure("create FormData", e))?;

    form_data
        .append_with_blob(request.field.as_str(), &request.file)
        .map_err(|e| js_failure("append file", e))?;

    if let Some(service) = request.service {
        form_data
            .append_with_str("service", service.as_str())
            .map_err(|e| js_failure("append service", e))?;
    }

    Ok(form_data)
}

fn js_failure(action: &str, err: JsValue) -> UploadError {
    log::error!("Failed to {}: {:?}", action, err);
    UploadError::Network
}

/// Turn a completed HTTP exchange into the upload outcome.
///
/// Only status 200 counts as success. Failures carry the `error` field of a
/// JSON object body, the contents of a JSON string, or the raw text of any
/// other body. Blank messages become a generic one.
pub fn interpret_response(status: u16, body: &str) -> AppResult<UploadResult> {
    if status == 0 {
        return Err(UploadError::Network);
    }

    if status == 200 {
        return serde_json::from_str::<UploadResponseBody>(body)
            .map_err(|_| UploadError::Server(INVALID_RESPONSE_MESSAGE.to_string()))?
            .into_result();
    }

    Err(UploadError::Server(error_message(body)))
}

fn error_message(body: &str) -> String {
    let text = body.trim();

    let message = match serde_json::from_str::<serde_json::Value>(text) {
        Ok(value @ serde_json::Value::Object(_)) => serde_json::from_value::<ErrorBody>(value)
            .map(|e| e.error.trim().to_string())
            .unwrap_or_default(),
        Ok(serde_json::Value::String(s)) => s.trim().to_string(),
        _ => text.to_string(),
    };

    if message.is_empty() {
        FALLBACK_ERROR_MESSAGE.to_string()
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_response() {
        let result = interpret_response(200, r#"{"link":"https://x/y","service":"catbox"}"#).unwrap();
        assert_eq!(result.link, "https://x/y");
        assert_eq!(result.service.as_deref(), Some("catbox"));
    }

    #[test]
    fn test_image_endpoint_response() {
        let result = interpret_response(
            200,
            r#"{"success":true,"link":"https://i.imgur.com/a.png","image_url":"https://i.imgur.com/a.png"}"#,
        )
        .unwrap();
        assert_eq!(result.link, "https://i.imgur.com/a.png");
        assert_eq!(result.service, None);
    }

    #[test]
    fn test_json_error_body() {
        assert_eq!(
            interpret_response(413, r#"{"error":"file too large"}"#),
            Err(UploadError::Server("file too large".into()))
        );
    }

    #[test]
    fn test_plain_text_error_body() {
        assert_eq!(
            interpret_response(502, "Bad Gateway\n"),
            Err(UploadError::Server("Bad Gateway".into()))
        );
    }

    #[test]
    fn test_scalar_json_error_body_is_shown() {
        assert_eq!(
            interpret_response(500, "404"),
            Err(UploadError::Server("404".into()))
        );
        assert_eq!(
            interpret_response(500, "\"quota exceeded\""),
            Err(UploadError::Server("quota exceeded".into()))
        );
        assert_eq!(
            interpret_response(500, "null"),
            Err(UploadError::Server("null".into()))
        );
    }

    #[test]
    fn test_error_without_message_uses_fallback() {
        let expected = Err(UploadError::Server(FALLBACK_ERROR_MESSAGE.into()));
        assert_eq!(interpret_response(500, ""), expected);
        assert_eq!(interpret_response(500, r#"{"detail":"nope"}"#), expected);
        assert_eq!(interpret_response(500, r#"{"error":""}"#), expected);
        assert_eq!(interpret_response(500, r#""  ""#), expected);
    }

    #[test]
    fn test_other_success_codes_are_failures() {
        assert!(interpret_response(201, r#"{"link":"https://x/y"}"#).is_err());
    }

    #[test]
    fn test_malformed_success_body() {
        assert_eq!(
            interpret_response(200, "<html>"),
            Err(UploadError::Server(INVALID_RESPONSE_MESSAGE.into()))
        );
    }

    #[test]
    fn test_status_zero_is_network_error() {
        assert_eq!(interpret_response(0, ""), Err(UploadError::Network));
    }
}
