//! Todo List Component

use leptos::prelude::*;

use crate::components::TodoRow;
use crate::context::use_app_context;
use crate::store::TodoStateStoreFields;

/// All cached todos in store order
#[component]
pub fn TodoList() -> impl IntoView {
    let ctx = use_app_context();
    let items = ctx.store.items();

    view! {
        <ul class="list">
            // Rows read their record from the store, so key on id only
            <For
                each=move || items.get()
                key=|todo| todo.id.clone()
                children=move |todo| view! { <TodoRow id=todo.id /> }
            />
        </ul>
    }
}
