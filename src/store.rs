//! Dashboard State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity over the
//! page-level data: fridge cards, expiry alerts and the current toast.

use leptos::prelude::*;
use reactive_stores::Store;

use fridge_core::sync::{ExpiryBuckets, FridgeCard, Notice};
use fridge_core::FridgeId;

/// Page-level state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct DashboardState {
    /// One card per fridge, in fridge order
    pub cards: Vec<FridgeCard>,
    /// Items expiring within the alert window
    pub expiry: ExpiryBuckets,
    /// Toast currently shown
    pub notice: Option<Notice>,
    /// Bumped per toast so a stale timer cannot hide a newer one
    pub notice_serial: u32,
}

impl DashboardState {
    pub fn new() -> Self {
        Self {
            cards: FridgeId::ALL.iter().map(|f| FridgeCard::new(*f, 0)).collect(),
            ..Default::default()
        }
    }
}

/// Type alias for the store
pub type DashboardStore = Store<DashboardState>;

/// Get the dashboard store from context
pub fn use_dashboard_store() -> DashboardStore {
    expect_context::<DashboardStore>()
}

// ========================
// Store Helper Functions
// ========================

pub fn store_set_cards(store: &DashboardStore, cards: &[FridgeCard]) {
    store.cards().set(cards.to_vec());
}

pub fn store_set_expiry(store: &DashboardStore, buckets: &ExpiryBuckets) {
    store.expiry().set(buckets.clone());
}

/// Show a toast; returns its serial for the matching hide
pub fn store_show_notice(store: &DashboardStore, notice: Notice) -> u32 {
    let serial = store.notice_serial().get_untracked().wrapping_add(1);
    store.notice_serial().set(serial);
    store.notice().set(Some(notice));
    serial
}

/// Hide the toast if it is still the one `serial` refers to
pub fn store_hide_notice(store: &DashboardStore, serial: u32) {
    if store.notice_serial().get_untracked() == serial {
        store.notice().set(None);
    }
}
