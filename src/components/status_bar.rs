//! Status Components
//!
//! Loading indicator, error line and server health badge.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::TodoApi;
use crate::context::use_app_context;
use crate::store::TodoStateStoreFields;

/// Loading text and the current error message, if any
#[component]
pub fn StatusBar() -> impl IntoView {
    let ctx = use_app_context();
    let is_loading = ctx.store.is_loading();
    let error_message = ctx.store.error_message();

    view! {
        <Show when=move || is_loading.get()>
            <p class="loading">"Loading..."</p>
        </Show>
        <Show when=move || !error_message.read().is_empty()>
            <p class="error">
                {move || error_message.get()}
                <button class="dismiss-btn" on:click=move |_| ctx.store.write().dismiss_error()>"×"</button>
            </p>
        </Show>
    }
}

/// Probes `/api/health` once on mount
#[component]
pub fn HealthBadge() -> impl IntoView {
    let ctx = use_app_context();
    let (online, set_online) = signal::<Option<bool>>(None);

    Effect::new(move |_| {
        let api = ctx.api();
        spawn_local(async move {
            let result = api.health().await;
            if let Err(err) = &result {
                log::warn!("health probe failed: {}", err);
            }
            set_online.set(Some(result.is_ok()));
        });
    });

    view! {
        <span class=move || match online.get() {
            Some(true) => "health online",
            Some(false) => "health offline",
            None => "health unknown",
        }>
            {move || match online.get() {
                Some(true) => "online",
                Some(false) => "offline",
                None => "…",
            }}
        </span>
    }
}

/// Recent log lines from the console logger, refreshed on demand
#[component]
pub fn LogPanel() -> impl IntoView {
    let (lines, set_lines) = signal(Vec::<String>::new());
    let (open, set_open) = signal(false);

    let toggle = move |_| {
        if !open.get() {
            set_lines.set(console_logger::recent());
        }
        set_open.update(|o| *o = !*o);
    };

    view! {
        <div class="log-panel">
            <button class="log-toggle" on:click=toggle>
                {move || if open.get() { "Hide log" } else { "Show log" }}
            </button>
            <Show when=move || open.get()>
                <button class="log-refresh" on:click=move |_| set_lines.set(console_logger::recent())>
                    "Refresh"
                </button>
                <pre class="log-lines">{move || lines.get().join("\n")}</pre>
            </Show>
        </div>
    }
}
