//! Todo Frontend App
//!
//! Main application component.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::api::HttpTodoApi;
use crate::components::{HealthBadge, LogPanel, NewTodoForm, StatusBar, TodoList};
use crate::config::ApiConfig;
use crate::context::AppContext;
use crate::store::{TodoState, TodoStateStoreFields};
use crate::sync::Intent;

#[component]
pub fn App() -> impl IntoView {
    let config = ApiConfig::from_env();
    log::info!(
        "todo API at {} (stale policy {:?})",
        config.collection_url(),
        config.stale_policy
    );

    let store = Store::new(TodoState::new(config.stale_policy));
    let ctx = AppContext::new(store, HttpTodoApi::new(config));

    // Provide context to all children
    provide_context(ctx);

    // Load todos on mount
    Effect::new(move |_| ctx.dispatch(Intent::Load));

    let items = store.items();

    view! {
        <div class="container">
            <header class="title-bar">
                <h1>"Todos"</h1>
                <HealthBadge />
            </header>

            <NewTodoForm />
            <StatusBar />
            <TodoList />

            <p class="item-count">
                {move || format!(
                    "{} todos, {} completed",
                    items.read().len(),
                    store.with(|state| state.completed_count()),
                )}
            </p>

            <LogPanel />
        </div>
    }
}
