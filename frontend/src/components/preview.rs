//! Inline preview of the selected image or video.

use leptos::*;

use crate::services::{Preview, PreviewKind};

#[component]
pub fn FilePreview(#[prop(into)] preview: Signal<Option<Preview>>) -> impl IntoView {
    let src_for = move |kind: PreviewKind| {
        preview.with(|p| p.as_ref().filter(|p| p.kind == kind).map(|p| p.src.clone()))
    };
    let shows = move |kind: PreviewKind| preview.with(|p| p.as_ref().is_some_and(|p| p.kind == kind));

    view! {
        <div id="filePreview" class="file-preview" class:hidden=move || preview.with(|p| p.is_none())>
            <img
                id="previewImg"
                alt="Preview"
                class:hidden=move || !shows(PreviewKind::Image)
                src=move || src_for(PreviewKind::Image)
            />
            <video
                id="previewVideo"
                controls=true
                class:hidden=move || !shows(PreviewKind::Video)
                src=move || src_for(PreviewKind::Video)
            />
        </div>
    }
}
