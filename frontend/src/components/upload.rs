//! Upload form with drag & drop, service choice, preview and progress.
//!
//! Owns the [`UploadForm`] and [`UploadView`] signals and wires DOM events
//! to the controller.

use gloo_timers::future::TimeoutFuture;
use leptos::*;
use web_sys::{File, HtmlInputElement};

use crate::components::{ErrorPanel, FilePreview, ProgressBar, ResultPanel};
use crate::config::UploadVariant;
use crate::controller::{submit, UploadForm, UploadView};
use crate::services::{load_preview, XhrTransport};

#[component]
pub fn UploadSection(variant: UploadVariant) -> impl IntoView {
    let form = create_rw_signal(UploadForm::<File>::new(variant));
    let state = create_rw_signal(UploadView::new(variant));
    let (dragging, set_dragging) = create_signal(false);

    let preview = create_memo(move |_| state.with(|s| s.preview.clone()));
    let progress = create_memo(move |_| state.with(|s| s.progress.clone()));
    let result = create_memo(move |_| state.with(|s| s.result.clone()));
    let error = create_memo(move |_| state.with(|s| s.error.clone()));
    let uploading = create_memo(move |_| state.with(|s| s.uploading));

    // Shared by the file input and the drop zone
    let accept_file = move |file: File| match form.try_update(|f| f.select_file(file.clone())) {
        Some(Ok(selection_id)) => {
            if !variant.preview {
                return;
            }
            spawn_local(async move {
                let loaded = load_preview(file).await;
                // A newer selection owns the preview now
                if form.with_untracked(|f| f.selection_id()) == selection_id {
                    state.update(|s| s.show_preview(loaded));
                }
            });
        }
        Some(Err(e)) => state.update(|s| s.render_error(e.to_string())),
        None => {}
    };

    let on_file_change = move |ev: ev::Event| {
        let input: HtmlInputElement = event_target(&ev);
        if let Some(file) = input.files().and_then(|files| files.get(0)) {
            accept_file(file);
        }
    };

    let on_drag_over = move |ev: ev::DragEvent| {
        ev.prevent_default();
        set_dragging.set(true);
    };

    let on_drag_leave = move |_: ev::DragEvent| set_dragging.set(false);

    let on_drop = move |ev: ev::DragEvent| {
        ev.prevent_default();
        set_dragging.set(false);
        let file = ev
            .data_transfer()
            .and_then(|dt| dt.files())
            .and_then(|files| files.get(0));
        if let Some(file) = file {
            accept_file(file);
        }
    };

    let on_service_change = move |ev: ev::Event| {
        let value = event_target_value(&ev);
        if form.try_update(|f| f.select_service_value(&value)).is_some_and(|r| r.is_err()) {
            log::warn!("Ignoring unknown service: {}", value);
        }
    };

    let on_submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        if uploading.get_untracked() {
            return;
        }

        let snapshot = form.get_untracked();
        state.update(|s| s.begin_upload());

        spawn_local(async move {
            let on_progress = move |percent: f64| {
                let Some(token) = state.try_update(|s| s.record_progress(percent)).flatten() else {
                    return;
                };
                spawn_local(async move {
                    TimeoutFuture::new(token.delay.as_millis() as u32).await;
                    state.update(|s| {
                        s.progress.hide(token);
                    });
                });
            };

            let outcome = submit(&snapshot, &XhrTransport, on_progress).await;
            state.update(|s| s.finish(&outcome));
        });
    };

    view! {
        <form class="upload-section" id="uploadForm" on:submit=on_submit>
            {variant.has_services().then(|| view! {
                <fieldset class="service-options">
                    <legend>"Upload to"</legend>
                    {variant.services.iter().map(|service| view! {
                        <label class="service-option">
                            <input
                                type="radio"
                                name="uploadService"
                                value=service.as_str()
                                on:change=on_service_change
                            />
                            {service.label()}
                        </label>
                    }).collect_view()}
                </fieldset>
            })}

            <label
                for="fileInput"
                class="drop-zone"
                class:dragging=move || dragging.get()
                on:dragover=on_drag_over
                on:dragleave=on_drag_leave
                on:drop=on_drop
            >
                <div class="upload-icon">"📤"</div>
                <div class="upload-text">
                    {move || if uploading.get() {
                        "Uploading..."
                    } else if variant.image_only {
                        "Drop an image here or click to choose one"
                    } else {
                        "Drop a file here or click to choose one"
                    }}
                </div>
            </label>

            <input
                type="file"
                id="fileInput"
                accept=variant.accept()
                style="display:none"
                on:change=on_file_change
            />

            <FilePreview preview=preview/>

            <button type="submit" class="upload-button" disabled=move || uploading.get()>
                "Upload"
            </button>

            <ProgressBar progress=progress/>
            <ResultPanel result=result/>
            <ErrorPanel error=error/>
        </form>
    }
}
