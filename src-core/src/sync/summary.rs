//! Fridge Summary Controller
//!
//! Item counts behind the three fridge cards. Counts are page-level data:
//! they load on mount and again whenever a page refresh is requested.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use super::bus::{PageBus, PageEvent};
use super::{spawn_on, LocalTask, Spawner};
use crate::domain::capacity::fill_percent;
use crate::domain::{FridgeId, MAX_CAPACITY};
use crate::repository::{ItemStore, SubscriptionHandle};

/// Everything one fridge card shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FridgeCard {
    pub fridge: FridgeId,
    pub count: u32,
    pub capacity: u32,
    pub percent: u8,
}

impl FridgeCard {
    pub fn new(fridge: FridgeId, count: u32) -> Self {
        Self { fridge, count, capacity: MAX_CAPACITY, percent: fill_percent(count, MAX_CAPACITY) }
    }
}

struct Inner {
    store: Rc<dyn ItemStore>,
    bus: PageBus,
    spawner: Spawner,
    counts: RefCell<BTreeMap<FridgeId, u32>>,
    render: RefCell<Option<Rc<dyn Fn(&[FridgeCard])>>>,
}

#[derive(Clone)]
pub struct FridgeSummary {
    inner: Rc<Inner>,
}

impl FridgeSummary {
    pub fn new(store: Rc<dyn ItemStore>, bus: PageBus, spawner: Spawner) -> Self {
        Self {
            inner: Rc::new(Inner {
                store,
                bus,
                spawner,
                counts: RefCell::new(FridgeId::ALL.iter().map(|f| (*f, 0)).collect()),
                render: RefCell::new(None),
            }),
        }
    }

    pub fn on_render(&self, hook: impl Fn(&[FridgeCard]) + 'static) {
        *self.inner.render.borrow_mut() = Some(Rc::new(hook));
    }

    pub fn mount(&self) -> SubscriptionHandle {
        let reload = spawn_on(Rc::downgrade(&self.inner), self.inner.spawner.clone(), |inner| {
            Box::pin(async move {
                let view = FridgeSummary { inner };
                view.reload().await
            }) as LocalTask
        });

        let on_refresh = reload.clone();
        let bus = self.inner.bus.subscribe(move |event| {
            if event == PageEvent::RefreshRequested {
                on_refresh();
            }
        });
        reload();
        bus
    }

    /// Count every fridge again; a failed count keeps the previous value
    pub async fn reload(&self) {
        for fridge in FridgeId::ALL {
            match self.inner.store.count_by_fridge(fridge).await {
                Ok(count) => {
                    self.inner.counts.borrow_mut().insert(fridge, count);
                }
                Err(e) => log::warn!("[SUMMARY] count for fridge {} failed: {}", fridge, e),
            }
        }

        let cards = self.cards();
        let hook = self.inner.render.borrow().clone();
        if let Some(hook) = hook {
            hook(&cards);
        }
    }

    pub fn cards(&self) -> Vec<FridgeCard> {
        self.inner
            .counts
            .borrow()
            .iter()
            .map(|(fridge, count)| FridgeCard::new(*fridge, *count))
            .collect()
    }
}
