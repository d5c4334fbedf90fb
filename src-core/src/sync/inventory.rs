//! Inventory View Controller
//!
//! State holder for one fridge's item table. The store is the single
//! source of truth: every reload trigger re-fetches the full list, and an
//! optimistic delete that the store rejects is undone by re-fetching rather
//! than by re-inserting locally.

use std::cell::RefCell;
use std::rc::Rc;

use uuid::Uuid;

use super::bus::{PageBus, PageEvent};
use super::{dedup_by_id, spawn_on, LocalTask, Spawner};
use crate::domain::{FridgeId, FridgeItem};
use crate::repository::{ChangeFeed, ChangeFilter, ItemStore, SubscriptionHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
}

/// What the view renders
#[derive(Debug, Clone, PartialEq)]
pub struct InventorySnapshot {
    pub phase: Phase,
    pub items: Vec<FridgeItem>,
}

impl InventorySnapshot {
    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }
}

type RenderHook = Rc<dyn Fn(&InventorySnapshot)>;

struct Inner {
    fridge: FridgeId,
    store: Rc<dyn ItemStore>,
    feed: Rc<dyn ChangeFeed>,
    bus: PageBus,
    spawner: Spawner,
    state: RefCell<InventorySnapshot>,
    render: RefCell<Option<RenderHook>>,
}

/// Controller behind one fridge's inventory table
#[derive(Clone)]
pub struct InventorySync {
    inner: Rc<Inner>,
}

/// Subscriptions of a mounted view; releasing tears the view down
#[must_use = "dropping the mount guard unsubscribes the view"]
pub struct MountedView {
    _feed: SubscriptionHandle,
    _bus: SubscriptionHandle,
}

impl MountedView {
    pub(crate) fn from_handles(feed: SubscriptionHandle, bus: SubscriptionHandle) -> Self {
        Self { _feed: feed, _bus: bus }
    }

    pub fn release(self) {}
}

impl InventorySync {
    pub fn new(
        fridge: FridgeId,
        store: Rc<dyn ItemStore>,
        feed: Rc<dyn ChangeFeed>,
        bus: PageBus,
        spawner: Spawner,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                fridge,
                store,
                feed,
                bus,
                spawner,
                state: RefCell::new(InventorySnapshot { phase: Phase::Loading, items: Vec::new() }),
                render: RefCell::new(None),
            }),
        }
    }

    pub fn fridge(&self) -> FridgeId {
        self.inner.fridge
    }

    pub fn snapshot(&self) -> InventorySnapshot {
        self.inner.state.borrow().clone()
    }

    /// Called with the new state after every change
    pub fn on_render(&self, hook: impl Fn(&InventorySnapshot) + 'static) {
        *self.inner.render.borrow_mut() = Some(Rc::new(hook));
    }

    /// Start the view: initial load, remote change subscription, page bus
    /// subscription. Dropping the returned guard stops both subscriptions.
    pub fn mount(&self) -> MountedView {
        let weak = Rc::downgrade(&self.inner);
        let reload = spawn_on(weak, self.inner.spawner.clone(), |inner| {
            Box::pin(async move {
                let view = InventorySync { inner };
                view.reload().await
            }) as LocalTask
        });

        let feed = self.inner.feed.subscribe(
            ChangeFilter::fridge(self.inner.fridge),
            reload.clone(),
            reload.clone(),
        );

        let fridge = self.inner.fridge;
        let on_page_reload = reload.clone();
        let bus = self.inner.bus.subscribe(move |event| {
            if event == PageEvent::DataChanged(fridge) {
                on_page_reload();
            }
        });

        log::debug!("[SYNC] fridge {} mounted", fridge);
        reload();
        MountedView::from_handles(feed, bus)
    }

    /// Fetch the full list again.
    ///
    /// A failed fetch keeps the previous list; the failure is only logged.
    pub async fn reload(&self) {
        self.update(|state| state.phase = Phase::Loading);

        match self.inner.store.list_by_fridge(self.inner.fridge).await {
            Ok(items) => {
                let items = dedup_by_id(items);
                log::debug!("[SYNC] fridge {} reloaded {} items", self.inner.fridge, items.len());
                self.update(|state| {
                    state.items = items;
                    state.phase = Phase::Ready;
                });
            }
            Err(e) => {
                log::warn!("[SYNC] fridge {} reload failed: {}", self.inner.fridge, e);
                self.update(|state| state.phase = Phase::Ready);
            }
        }
    }

    /// Remove an item: locally first, then at the store.
    ///
    /// On failure the list is re-fetched and the store's message returned.
    pub async fn delete(&self, id: Uuid) -> Result<(), String> {
        self.update(|state| state.items.retain(|item| item.id != id));

        match self.inner.store.delete_by_id(id).await {
            Ok(()) => {
                self.inner.bus.emit(PageEvent::DataChanged(self.inner.fridge));
                self.inner.bus.emit(PageEvent::RefreshRequested);
                Ok(())
            }
            Err(e) => {
                log::warn!("[SYNC] delete of {} failed, restoring from store: {}", id, e);
                self.reload().await;
                Err(e.message().to_string())
            }
        }
    }

    fn update(&self, change: impl FnOnce(&mut InventorySnapshot)) {
        let snapshot = {
            let mut state = self.inner.state.borrow_mut();
            change(&mut state);
            state.clone()
        };
        let hook = self.inner.render.borrow().clone();
        if let Some(hook) = hook {
            hook(&snapshot);
        }
    }
}
