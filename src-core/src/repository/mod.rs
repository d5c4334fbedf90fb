//! Repository Layer
//!
//! Store access abstractions and implementations.

mod traits;
mod query;
mod rest;
#[cfg(any(test, feature = "test-util"))]
mod memory;
pub mod realtime;


pub use traits::{
    ChangeCallback, ChangeFeed, ChangeFilter, ChangeKind, ItemStore, SubscriptionHandle, ITEMS_TABLE,
};
pub use query::{parse_content_range_total, Order, TableQuery};
pub use rest::{store_error_message, RestStore};
#[cfg(any(test, feature = "test-util"))]
pub use memory::{CallCounts, MemoryStore, StoreOp};
