//! Inventory domain module (session-scoped, in-memory).
//!
//! This crate contains business rules for the inventory list, implemented purely
//! as deterministic domain logic (no IO, no HTTP, no storage).

pub mod item;
pub mod store;

pub use item::{ItemName, ItemRecord, Quantity};
pub use store::{InventoryStore, Removal, StoreState};
