//! Domain Layer
//!
//! Contains all domain entities and core abstractions.
//! This layer has NO external dependencies (except serde, chrono and uuid).

mod entity;
mod fridge;
mod item;
pub mod capacity;
pub mod date;

pub use entity::{Entity, DomainError, DomainResult, StoreError};
pub use fridge::{FridgeId, MAX_CAPACITY};
pub use item::{FridgeItem, NewFridgeItem, Position};
