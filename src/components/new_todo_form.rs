//! New Todo Form Component
//!
//! Text input bound to the draft title; submitting dispatches `Add`.

use leptos::prelude::*;
use wasm_bindgen::JsCast;

use crate::context::use_app_context;
use crate::store::TodoStateStoreFields;
use crate::sync::Intent;

#[component]
pub fn NewTodoForm() -> impl IntoView {
    let ctx = use_app_context();
    let draft = ctx.store.draft_title();

    let add_todo = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        ctx.dispatch(Intent::Add);
    };

    view! {
        <form class="add-form" on:submit=add_todo>
            <input
                type="text"
                placeholder="Add a new todo"
                prop:value=move || draft.get()
                on:input=move |ev| {
                    if let Some(input) = ev.target().and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok()) {
                        draft.set(input.value());
                    }
                }
            />
            <button type="submit">"Add"</button>
        </form>
    }
}
