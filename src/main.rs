//! Todo Frontend Entry Point

mod api;
mod app;
mod components;
mod config;
mod context;
mod models;
mod store;
mod sync;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    if let Err(err) = console_logger::init(log::LevelFilter::Debug) {
        web_sys::console::warn_1(&format!("logger already installed: {}", err).into());
    }
    mount_to_body(App);
}
