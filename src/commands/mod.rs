//! Browser Transports
//!
//! Platform bindings the core controllers run on: the realtime socket,
//! the local executor and the address bar.

mod location;
mod realtime;

use std::rc::Rc;

use leptos::task::spawn_local;

use fridge_core::sync::Spawner;

// Re-export all public items
pub use location::*;
pub use realtime::RealtimeFeed;

/// Spawner handing controller work to the page's local executor
pub fn local_spawner() -> Spawner {
    Rc::new(|task| spawn_local(task))
}
