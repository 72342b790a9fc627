//! UI Components
//!
//! Reusable Leptos components.

mod new_todo_form;
mod todo_row;
mod todo_list;
mod status_bar;

pub use new_todo_form::NewTodoForm;
pub use todo_row::TodoRow;
pub use todo_list::TodoList;
pub use status_bar::{HealthBadge, LogPanel, StatusBar};
