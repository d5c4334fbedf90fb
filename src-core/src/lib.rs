//! Fridge Tracker Core
//!
//! Layered architecture:
//! - domain: Core entities, date codec and capacity rules
//! - repository: Store access abstractions, PostgREST client and realtime codec
//! - sync: Per-view controllers keeping local state in line with the store
//! - config: Store endpoint configuration

pub mod config;
pub mod domain;
pub mod repository;
pub mod sync;

pub use config::StoreConfig;
pub use domain::{DomainError, DomainResult, StoreError, FridgeId, FridgeItem, NewFridgeItem, Position};
