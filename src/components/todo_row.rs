//! Todo Row Component
//!
//! One todo: checkbox toggle, editable title, complete and delete buttons.

use leptos::prelude::*;
use wasm_bindgen::JsCast;

use crate::context::use_app_context;
use crate::models::TodoId;
use crate::store::TodoStateStoreFields;
use crate::sync::Intent;

fn input_of(ev: &web_sys::Event) -> Option<web_sys::HtmlInputElement> {
    ev.target().and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok())
}

/// A single todo row.
///
/// Inputs always show the cached record. On commit the DOM is put back to
/// that record and only a confirmed response changes it, so a failed
/// toggle or rename leaves the row as it was. Renames are sent when the
/// title input commits (blur or Enter), not per keystroke.
#[component]
pub fn TodoRow(id: TodoId) -> impl IntoView {
    let ctx = use_app_context();
    let items = ctx.store.items();

    let entry = Memo::new({
        let id = id.clone();
        move |_| items.with(|items| items.iter().find(|todo| todo.id == id).cloned())
    });
    let completed = move || entry.with(|todo| todo.as_ref().is_some_and(|t| t.completed));
    let title = move || entry.with(|todo| todo.as_ref().map(|t| t.title.clone()).unwrap_or_default());

    let toggle_id = id.clone();
    let rename_id = id.clone();
    let complete_id = id.clone();
    let delete_id = id;

    view! {
        <li class=move || if completed() { "item completed" } else { "item" }>
            <input
                type="checkbox"
                prop:checked=completed
                on:change=move |ev| {
                    if let Some(input) = input_of(&ev) {
                        input.set_checked(completed());
                    }
                    ctx.dispatch(Intent::Toggle(toggle_id.clone()));
                }
            />
            <input
                class="title"
                prop:value=title
                on:change=move |ev| {
                    let Some(input) = input_of(&ev) else {
                        return;
                    };
                    let value = input.value();
                    let cached = title();
                    input.set_value(&cached);
                    if value != cached {
                        ctx.dispatch(Intent::Rename(rename_id.clone(), value));
                    }
                }
            />
            <Show when=move || !completed()>
                <button
                    class="complete"
                    on:click={
                        let complete_id = complete_id.clone();
                        move |_| ctx.dispatch(Intent::MarkCompleted(complete_id.clone()))
                    }
                >
                    "Complete"
                </button>
            </Show>
            <button class="delete" on:click=move |_| ctx.dispatch(Intent::Delete(delete_id.clone()))>
                "Delete"
            </button>
        </li>
    }
}

