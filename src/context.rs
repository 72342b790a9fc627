//! Application Context
//!
//! Shared handles provided via Leptos Context API.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::HttpTodoApi;
use crate::store::AppStore;
use crate::sync::{self, Intent};

/// App-wide handles provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Todo state
    pub store: AppStore,
    /// API client (not `Send` on wasm, so kept in local storage)
    api: StoredValue<HttpTodoApi, LocalStorage>,
}

impl AppContext {
    pub fn new(store: AppStore, api: HttpTodoApi) -> Self {
        Self {
            store,
            api: StoredValue::new_local(api),
        }
    }

    pub fn api(&self) -> HttpTodoApi {
        self.api.get_value()
    }

    /// Run an intent in the background; the store is updated when it settles
    pub fn dispatch(&self, intent: Intent) {
        let store = self.store;
        let api = self.api();
        spawn_local(async move {
            sync::dispatch(&store, &api, intent).await;
        });
    }
}

/// Get the app context
pub fn use_app_context() -> AppContext {
    use_context::<AppContext>().expect("AppContext should be provided")
}
