//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::models::Todo;
use crate::sync::{RequestLedger, StalePolicy, StateHandle};

/// Client-side view of the todo collection plus transient UI flags
#[derive(Clone, Debug, Default, PartialEq, Store)]
pub struct TodoState {
    /// Cached todos, load order with new ones first
    pub items: Vec<Todo>,
    /// A load is in flight
    pub is_loading: bool,
    /// Last failure text, empty when there is none
    pub error_message: String,
    /// Unsent title in the new-todo form
    pub draft_title: String,
    /// Generation stamps of dispatched requests
    pub ledger: RequestLedger,
    pub stale_policy: StalePolicy,
}

impl TodoState {
    pub fn new(stale_policy: StalePolicy) -> Self {
        Self {
            stale_policy,
            ..Default::default()
        }
    }

    pub fn completed_count(&self) -> usize {
        self.items.iter().filter(|todo| todo.completed).count()
    }
}

/// Type alias for the store
pub type AppStore = Store<TodoState>;

impl StateHandle for AppStore {
    fn with_state<R>(&self, f: impl FnOnce(&mut TodoState) -> R) -> R {
        f(&mut self.write())
    }
}
