//! In-Memory Store
//!
//! `ItemStore` + `ChangeFeed` kept in process. Change notifications are
//! delivered synchronously to every matching subscriber, so several
//! controllers sharing one `MemoryStore` behave like several browser
//! sessions on one backend. Used by the test suites.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use super::traits::{ChangeCallback, ChangeFeed, ChangeFilter, ChangeKind, ItemStore, SubscriptionHandle};
use crate::domain::{DomainError, DomainResult, FridgeId, FridgeItem, NewFridgeItem};

/// Operations a failure can be injected into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    List,
    Count,
    Create,
    Delete,
}

/// Calls the store has served so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub lists: u32,
    pub counts: u32,
    pub creates: u32,
    pub deletes: u32,
}

struct Subscriber {
    id: u64,
    filter: ChangeFilter,
    on_insert: ChangeCallback,
    on_delete: ChangeCallback,
}

struct MemoryInner {
    rows: Vec<FridgeItem>,
    next_id: u128,
    clock: DateTime<Utc>,
    subscribers: Vec<Subscriber>,
    next_subscriber: u64,
    failures: Vec<(StoreOp, String)>,
    calls: CallCounts,
}

#[derive(Clone)]
pub struct MemoryStore {
    inner: Rc<RefCell<MemoryInner>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(MemoryInner {
                rows: Vec::new(),
                next_id: 1,
                clock: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().unwrap_or_default(),
                subscribers: Vec::new(),
                next_subscriber: 1,
                failures: Vec::new(),
                calls: CallCounts::default(),
            })),
        }
    }

    /// Make the next `op` fail with `message`
    pub fn fail_next(&self, op: StoreOp, message: &str) {
        self.inner.borrow_mut().failures.push((op, message.to_string()));
    }

    /// Put a row in verbatim, bypassing id assignment and notifications.
    ///
    /// Lets tests reproduce a store answer that carries the same id twice.
    pub fn insert_raw(&self, item: FridgeItem) {
        self.inner.borrow_mut().rows.push(item);
    }

    pub fn rows(&self) -> Vec<FridgeItem> {
        self.inner.borrow().rows.clone()
    }

    pub fn calls(&self) -> CallCounts {
        self.inner.borrow().calls
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    fn take_failure(&self, op: StoreOp) -> DomainResult<()> {
        let mut inner = self.inner.borrow_mut();
        match inner.failures.iter().position(|(o, _)| *o == op) {
            Some(index) => {
                let (_, message) = inner.failures.remove(index);
                Err(DomainError::Store(message))
            }
            None => Ok(()),
        }
    }

    /// Run the callbacks of every subscriber interested in `item`.
    ///
    /// Callbacks are collected first so they may touch the store again.
    fn notify(&self, kind: ChangeKind, item: &FridgeItem) {
        let callbacks: Vec<ChangeCallback> = self
            .inner
            .borrow()
            .subscribers
            .iter()
            .filter(|s| s.filter.matches(item))
            .map(|s| match kind {
                ChangeKind::Insert => s.on_insert.clone(),
                ChangeKind::Delete => s.on_delete.clone(),
            })
            .collect();
        for callback in callbacks {
            callback();
        }
    }
}

#[async_trait(?Send)]
impl ItemStore for MemoryStore {
    async fn list_by_fridge(&self, fridge: FridgeId) -> DomainResult<Vec<FridgeItem>> {
        self.inner.borrow_mut().calls.lists += 1;
        self.take_failure(StoreOp::List)?;
        let mut rows: Vec<FridgeItem> = self
            .inner
            .borrow()
            .rows
            .iter()
            .filter(|item| item.fridge_id == fridge)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn list_expiring_by(&self, threshold: NaiveDate) -> DomainResult<Vec<FridgeItem>> {
        self.inner.borrow_mut().calls.lists += 1;
        self.take_failure(StoreOp::List)?;
        let mut rows: Vec<FridgeItem> = self
            .inner
            .borrow()
            .rows
            .iter()
            .filter(|item| item.expiration_date <= threshold)
            .cloned()
            .collect();
        rows.sort_by_key(|item| item.expiration_date);
        Ok(rows)
    }

    async fn count_by_fridge(&self, fridge: FridgeId) -> DomainResult<u32> {
        self.inner.borrow_mut().calls.counts += 1;
        self.take_failure(StoreOp::Count)?;
        let count = self.inner.borrow().rows.iter().filter(|item| item.fridge_id == fridge).count();
        Ok(count as u32)
    }

    async fn create(&self, item: &NewFridgeItem) -> DomainResult<()> {
        self.inner.borrow_mut().calls.creates += 1;
        self.take_failure(StoreOp::Create)?;
        let stored = {
            let mut inner = self.inner.borrow_mut();
            let id = Uuid::from_u128(inner.next_id);
            inner.next_id += 1;
            inner.clock = inner.clock + Duration::seconds(1);
            let stored = item.clone().into_item(id, inner.clock);
            inner.rows.push(stored.clone());
            stored
        };
        self.notify(ChangeKind::Insert, &stored);
        Ok(())
    }

    async fn delete_by_id(&self, id: Uuid) -> DomainResult<()> {
        self.inner.borrow_mut().calls.deletes += 1;
        self.take_failure(StoreOp::Delete)?;
        let removed = {
            let mut inner = self.inner.borrow_mut();
            let position = inner.rows.iter().position(|item| item.id == id);
            position.map(|index| inner.rows.remove(index))
        };
        // Deleting a missing row is not an error for the store either
        if let Some(removed) = removed {
            self.notify(ChangeKind::Delete, &removed);
        }
        Ok(())
    }
}

impl ChangeFeed for MemoryStore {
    fn subscribe(
        &self,
        filter: ChangeFilter,
        on_insert: ChangeCallback,
        on_delete: ChangeCallback,
    ) -> SubscriptionHandle {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_subscriber;
            inner.next_subscriber += 1;
            inner.subscribers.push(Subscriber { id, filter, on_insert, on_delete });
            id
        };

        let weak: Weak<RefCell<MemoryInner>> = Rc::downgrade(&self.inner);
        SubscriptionHandle::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().subscribers.retain(|s| s.id != id);
            }
        })
    }
}
