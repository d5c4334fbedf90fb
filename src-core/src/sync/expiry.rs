//! Expiry Alert Controller
//!
//! Watches every fridge for items expiring within the next week and splits
//! them into overdue and upcoming. Reloads on any remote change to the item
//! table and on any fridge's page broadcast.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::NaiveDate;

use super::bus::{PageBus, PageEvent};
use super::inventory::MountedView;
use super::{dedup_by_id, spawn_on, LocalTask, Spawner};
use crate::domain::capacity::{expiry_threshold, partition_by_urgency};
use crate::domain::FridgeItem;
use crate::repository::{ChangeFeed, ChangeFilter, ItemStore, SubscriptionHandle};

/// Source of "today" at call time
pub type Today = Rc<dyn Fn() -> NaiveDate>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpiryBuckets {
    pub overdue: Vec<FridgeItem>,
    pub upcoming: Vec<FridgeItem>,
}

impl ExpiryBuckets {
    /// The panel is hidden when nothing is expiring
    pub fn is_empty(&self) -> bool {
        self.overdue.is_empty() && self.upcoming.is_empty()
    }
}

struct Inner {
    store: Rc<dyn ItemStore>,
    feed: Rc<dyn ChangeFeed>,
    bus: PageBus,
    spawner: Spawner,
    today: Today,
    items: RefCell<Vec<FridgeItem>>,
    render: RefCell<Option<Rc<dyn Fn(&ExpiryBuckets)>>>,
}

#[derive(Clone)]
pub struct ExpiryAlerts {
    inner: Rc<Inner>,
}

impl ExpiryAlerts {
    pub fn new(
        store: Rc<dyn ItemStore>,
        feed: Rc<dyn ChangeFeed>,
        bus: PageBus,
        spawner: Spawner,
        today: Today,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                store,
                feed,
                bus,
                spawner,
                today,
                items: RefCell::new(Vec::new()),
                render: RefCell::new(None),
            }),
        }
    }

    pub fn on_render(&self, hook: impl Fn(&ExpiryBuckets) + 'static) {
        *self.inner.render.borrow_mut() = Some(Rc::new(hook));
    }

    pub fn mount(&self) -> MountedView {
        let reload = spawn_on(Rc::downgrade(&self.inner), self.inner.spawner.clone(), |inner| {
            Box::pin(async move {
                let view = ExpiryAlerts { inner };
                view.reload().await
            }) as LocalTask
        });

        let feed: SubscriptionHandle =
            self.inner.feed.subscribe(ChangeFilter::all_items(), reload.clone(), reload.clone());

        let on_page_reload = reload.clone();
        let bus = self.inner.bus.subscribe(move |event| {
            if let PageEvent::DataChanged(_) = event {
                on_page_reload();
            }
        });

        reload();
        MountedView::from_handles(feed, bus)
    }

    /// Fetch everything expiring by today + 7 days
    pub async fn reload(&self) {
        let threshold = expiry_threshold((self.inner.today)());
        match self.inner.store.list_expiring_by(threshold).await {
            Ok(items) => {
                log::debug!("[EXPIRY] {} items expire by {}", items.len(), threshold);
                *self.inner.items.borrow_mut() = dedup_by_id(items);
                self.render();
            }
            Err(e) => log::warn!("[EXPIRY] reload failed: {}", e),
        }
    }

    /// Current partition, evaluated against today
    pub fn buckets(&self) -> ExpiryBuckets {
        let (overdue, upcoming) = partition_by_urgency(&self.inner.items.borrow(), (self.inner.today)());
        ExpiryBuckets { overdue, upcoming }
    }

    fn render(&self) {
        let hook = self.inner.render.borrow().clone();
        if let Some(hook) = hook {
            hook(&self.buckets());
        }
    }
}
