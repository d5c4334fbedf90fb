//! Page Bus
//!
//! In-page broadcast channel shared by the views of one tab. Replaces
//! ambient window events with an object injected into each controller.
//! Fire-and-forget: no acknowledgement, any number of listeners.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::domain::FridgeId;
use crate::repository::SubscriptionHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageEvent {
    /// Open the add-item form pre-set to a fridge
    OpenAddForm(FridgeId),
    /// Items of a fridge changed through this tab
    DataChanged(FridgeId),
    /// Page-level data (fridge counts) should be fetched again
    RefreshRequested,
}

type Listener = Rc<dyn Fn(PageEvent)>;

#[derive(Default)]
struct BusInner {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

#[derive(Clone, Default)]
pub struct PageBus {
    inner: Rc<RefCell<BusInner>>,
}

impl PageBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: impl Fn(PageEvent) + 'static) -> SubscriptionHandle {
        let id = {
            let mut inner = self.inner.borrow_mut();
            inner.next_id += 1;
            let id = inner.next_id;
            inner.listeners.push((id, Rc::new(listener)));
            id
        };

        let weak: Weak<RefCell<BusInner>> = Rc::downgrade(&self.inner);
        SubscriptionHandle::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().listeners.retain(|(l, _)| *l != id);
            }
        })
    }

    /// Deliver `event` to every current listener.
    ///
    /// Listeners may subscribe or emit again from inside the call.
    pub fn emit(&self, event: PageEvent) {
        let listeners: Vec<Listener> = self.inner.borrow().listeners.iter().map(|(_, l)| l.clone()).collect();
        log::debug!("[BUS] {:?} -> {} listeners", event, listeners.len());
        for listener in listeners {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}
