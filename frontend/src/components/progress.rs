use leptos::*;

use crate::controller::ProgressState;

#[component]
pub fn ProgressBar(#[prop(into)] progress: Signal<ProgressState>) -> impl IntoView {
    view! {
        <div
            class="progress-bar"
            id="progressBarContainer"
            class:hidden=move || !progress.with(|p| p.is_visible())
        >
            <div
                class="progress-fill"
                id="uploadProgress"
                style=move || format!("width: {}%;", progress.with(|p| p.percent()))
            >
                {move || progress.with(|p| p.label())}
            </div>
        </div>
    }
}
