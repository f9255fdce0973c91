//! Hero section component

use leptos::*;

use crate::config::UploadVariant;

#[component]
pub fn Hero(variant: UploadVariant) -> impl IntoView {
    view! {
        <div class="hero">
            <h1>"Dropload"</h1>
            <p class="subtitle">
                {if variant.image_only {
                    "Drop an image, check the preview and get a shareable link."
                } else {
                    "Drop any file, pick where it should go and get a shareable link."
                }}
            </p>
        </div>
    }
}
