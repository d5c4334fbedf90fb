//! Sync Layer
//!
//! Per-view controllers that keep local state in line with the store.
//! Every trigger (mount, remote change, page broadcast) re-runs a full
//! fetch; nothing is patched incrementally.

pub mod bus;
pub mod deep_link;
pub mod expiry;
pub mod form;
pub mod inventory;
pub mod summary;


use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::rc::{Rc, Weak};

use crate::domain::{Entity, FridgeItem};

pub use bus::{PageBus, PageEvent};
pub use expiry::{ExpiryAlerts, ExpiryBuckets};
pub use form::{AddItemForm, FormSnapshot, Notice, NoticeKind, SubmitOutcome};
pub use inventory::{InventorySnapshot, InventorySync, MountedView, Phase};
pub use summary::{FridgeCard, FridgeSummary};

/// A unit of work handed to the platform's local executor
pub type LocalTask = Pin<Box<dyn Future<Output = ()>>>;

/// Runs a task on the current thread's executor (`spawn_local` in the browser)
pub type Spawner = Rc<dyn Fn(LocalTask)>;

/// Collapse a fetch result to unique ids.
///
/// An id keeps the slot of its first appearance and the values of its last.
pub fn dedup_by_id(items: Vec<FridgeItem>) -> Vec<FridgeItem> {
    let mut slots: HashMap<<FridgeItem as Entity>::Id, usize> = HashMap::with_capacity(items.len());
    let mut unique: Vec<FridgeItem> = Vec::with_capacity(items.len());
    for item in items {
        match slots.get(&item.id()) {
            Some(&slot) => unique[slot] = item,
            None => {
                slots.insert(item.id(), unique.len());
                unique.push(item);
            }
        }
    }
    unique
}

/// Callback that spawns `run` on a controller, as long as it is still alive.
///
/// Holding only a weak reference keeps subscriptions from extending the
/// controller's lifetime.
pub(crate) fn spawn_on<T: 'static>(
    weak: Weak<T>,
    spawner: Spawner,
    run: fn(Rc<T>) -> LocalTask,
) -> Rc<dyn Fn()> {
    Rc::new(move || {
        if let Some(inner) = weak.upgrade() {
            spawner(run(inner));
        }
    })
}

#[cfg(test)]
mod dedup_tests {
    use super::*;
    use crate::domain::{FridgeId, Position};
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn make_item(id: u128, name: &str) -> FridgeItem {
        FridgeItem {
            id: Uuid::from_u128(id),
            fridge_id: FridgeId::First,
            name: name.to_string(),
            expiration_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            is_common_use: false,
            location_shelf: 1,
            location_position: Position::Left,
            added_by: "test".to_string(),
            created_at: None,
        }
    }

    #[test]
    fn test_dedup_keeps_later_values() {
        let items = vec![make_item(1, "old"), make_item(2, "b"), make_item(1, "new"), make_item(3, "c")];
        let unique = dedup_by_id(items);
        let names: Vec<_> = unique.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["new", "b", "c"]);
    }

    #[test]
    fn test_dedup_without_duplicates_is_identity() {
        let items = vec![make_item(3, "c"), make_item(1, "a")];
        assert_eq!(dedup_by_id(items.clone()), items);
    }
}
