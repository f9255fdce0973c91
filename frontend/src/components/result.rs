//! Result and error panels. At most one of them is visible.

use leptos::*;

use crate::controller::ResultLink;

#[component]
pub fn ResultPanel(#[prop(into)] result: Signal<Option<ResultLink>>) -> impl IntoView {
    view! {
        <div id="result" class="result-panel" class:hidden=move || result.with(|r| r.is_none())>
            <a
                id="fileLink"
                target="_blank"
                rel="noopener"
                href=move || result.with(|r| r.as_ref().map(|l| l.href.clone()))
            >
                {move || result.with(|r| r.as_ref().map(|l| l.label.clone()).unwrap_or_default())}
            </a>
        </div>
    }
}

#[component]
pub fn ErrorPanel(#[prop(into)] error: Signal<Option<String>>) -> impl IntoView {
    view! {
        <div id="error" class="error-message" class:hidden=move || error.with(|e| e.is_none())>
            {move || error.get().unwrap_or_default()}
        </div>
    }
}
