//! Application Context
//!
//! Shared services provided via Leptos Context API.

use std::rc::Rc;

use leptos::prelude::*;

use fridge_core::repository::{ChangeFeed, ItemStore, RestStore};
use fridge_core::sync::expiry::Today;
use fridge_core::sync::{PageBus, PageEvent, Spawner};
use fridge_core::{FridgeId, StoreConfig};

use crate::commands::{self, RealtimeFeed};

/// Store clients, the page bus and the executor every controller is built on
#[derive(Clone)]
pub struct Services {
    pub store: Rc<dyn ItemStore>,
    pub feed: Rc<dyn ChangeFeed>,
    pub bus: PageBus,
    pub spawner: Spawner,
    pub today: Today,
}

impl Services {
    pub fn connect(config: StoreConfig) -> Self {
        Self {
            store: Rc::new(RestStore::new(config.clone())),
            feed: Rc::new(RealtimeFeed::new(config)),
            bus: PageBus::new(),
            spawner: commands::local_spawner(),
            today: Rc::new(|| chrono::Local::now().date_naive()),
        }
    }
}

/// App-wide handle provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Single-threaded services live in local storage
    services: StoredValue<Services, LocalStorage>,
}

impl AppContext {
    pub fn new(services: Services) -> Self {
        Self { services: StoredValue::new_local(services) }
    }

    pub fn services(&self) -> Services {
        self.services.get_value()
    }

    /// Ask the add-item modal to open for a fridge
    pub fn open_add_form(&self, fridge: FridgeId) {
        self.services.with_value(|s| s.bus.emit(PageEvent::OpenAddForm(fridge)));
    }
}

pub fn use_app_context() -> AppContext {
    expect_context::<AppContext>()
}
