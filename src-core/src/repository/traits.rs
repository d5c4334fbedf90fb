//! Repository Layer - Core Traits
//!
//! Defines the abstract interfaces for store access.
//! Implementations: PostgREST over HTTP, in-memory.
//!
//! Everything here runs on one cooperative thread, so the async traits
//! are `?Send` and callbacks are plain `Rc<dyn Fn()>`.

use std::rc::Rc;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{DomainResult, FridgeId, FridgeItem, NewFridgeItem};

/// Table holding every fridge item
pub const ITEMS_TABLE: &str = "fridge_items";

/// Read/write access to the item table
#[async_trait(?Send)]
pub trait ItemStore {
    /// Items of one fridge, newest first
    async fn list_by_fridge(&self, fridge: FridgeId) -> DomainResult<Vec<FridgeItem>>;

    /// Items of every fridge expiring on or before `threshold`, soonest first
    async fn list_expiring_by(&self, threshold: NaiveDate) -> DomainResult<Vec<FridgeItem>>;

    /// Number of items in one fridge
    async fn count_by_fridge(&self, fridge: FridgeId) -> DomainResult<u32>;

    async fn create(&self, item: &NewFridgeItem) -> DomainResult<()>;

    async fn delete_by_id(&self, id: Uuid) -> DomainResult<()>;
}

/// Row-level change kinds the feed reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Insert,
    Delete,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Insert => "INSERT",
            ChangeKind::Delete => "DELETE",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "INSERT" => Some(ChangeKind::Insert),
            "DELETE" => Some(ChangeKind::Delete),
            _ => None,
        }
    }
}

/// Which rows a change subscription covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeFilter {
    pub table: &'static str,
    /// `None` = every row of the table
    pub fridge: Option<FridgeId>,
}

impl ChangeFilter {
    pub fn fridge(fridge: FridgeId) -> Self {
        Self { table: ITEMS_TABLE, fridge: Some(fridge) }
    }

    pub fn all_items() -> Self {
        Self { table: ITEMS_TABLE, fridge: None }
    }

    /// PostgREST-style row filter, e.g. `fridge_id=eq.2`
    pub fn row_filter(&self) -> Option<String> {
        self.fridge.map(|f| format!("fridge_id=eq.{}", f.number()))
    }

    /// Channel name the realtime service knows this subscription by
    pub fn channel_name(&self) -> String {
        match self.fridge {
            Some(f) => format!("{}_{}", self.table, f.number()),
            None => format!("{}_all", self.table),
        }
    }

    pub fn matches(&self, item: &FridgeItem) -> bool {
        self.fridge.map_or(true, |f| item.fridge_id == f)
    }
}

pub type ChangeCallback = Rc<dyn Fn()>;

/// Source of asynchronous insert/delete notifications
pub trait ChangeFeed {
    /// Start delivering notifications for rows matching `filter`.
    ///
    /// Delivery stops once the returned handle is released or dropped.
    fn subscribe(
        &self,
        filter: ChangeFilter,
        on_insert: ChangeCallback,
        on_delete: ChangeCallback,
    ) -> SubscriptionHandle;
}

/// Keeps a subscription alive; releasing (or dropping) it unsubscribes
#[must_use = "dropping the handle ends the subscription"]
pub struct SubscriptionHandle {
    release: Option<Box<dyn FnOnce()>>,
}

impl SubscriptionHandle {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self { release: Some(Box::new(release)) }
    }

    pub fn release(mut self) {
        self.run_release();
    }

    fn run_release(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        self.run_release();
    }
}

impl std::fmt::Debug for SubscriptionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionHandle")
            .field("active", &self.release.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_filter_expressions() {
        assert_eq!(ChangeFilter::fridge(FridgeId::Second).row_filter().as_deref(), Some("fridge_id=eq.2"));
        assert_eq!(ChangeFilter::all_items().row_filter(), None);
        assert_eq!(ChangeFilter::fridge(FridgeId::Shared).channel_name(), "fridge_items_3");
        assert_eq!(ChangeFilter::all_items().channel_name(), "fridge_items_all");
    }

    #[test]
    fn test_handle_releases_once() {
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        let handle = SubscriptionHandle::new(move || c.set(c.get() + 1));
        handle.release();
        assert_eq!(count.get(), 1);

        let c = count.clone();
        {
            let _handle = SubscriptionHandle::new(move || c.set(c.get() + 1));
        }
        assert_eq!(count.get(), 2);
    }
}
