//! Fridge Tracker Frontend Entry Point

mod commands;
mod context;
mod store;
mod components;
mod app;

use app::App;
use fridge_core::config::{KEY_VAR, URL_VAR};
use fridge_core::StoreConfig;
use leptos::prelude::*;
use log::LevelFilter;

fn main() {
    console_error_panic_hook::set_once();
    let level = if cfg!(debug_assertions) { LevelFilter::Debug } else { LevelFilter::Info };
    if let Err(e) = console_logger::init_logger("Buzdolabi", level) {
        web_sys::console::error_1(&format!("logger init failed: {}", e).into());
    }

    // Baked in at build time; the page cannot run without them
    let config = StoreConfig::from_values(option_env!("FRIDGE_STORE_URL"), option_env!("FRIDGE_STORE_KEY"))
        .unwrap_or_else(|e| panic!("set {} and {} when building: {}", URL_VAR, KEY_VAR, e));

    mount_to_body(move || view! { <App config=config /> });
}
