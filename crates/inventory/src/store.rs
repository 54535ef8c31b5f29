//! Session-owned inventory list.
//!
//! The store is the only legal mutation path for the list: every record it
//! holds went through [`InventoryStore::add`] validation, and records only
//! leave through [`InventoryStore::remove_by_name`].

use serde::Serialize;

use stockroom_core::{DomainError, DomainResult};

use crate::item::{ItemName, ItemRecord, Quantity};

/// Coarse state of a store, derived solely from its length.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreState {
    Empty,
    NonEmpty,
}

/// Outcome of a removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    pub name: ItemName,
    /// Number of records dropped. Zero means nothing matched and the store is unchanged.
    pub removed: usize,
}

/// Ordered, insertion-preserving list of item records.
///
/// Duplicates by name are allowed; each `add` appends an independent record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InventoryStore {
    items: Vec<ItemRecord>,
}

impl InventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `{trim(name), quantity}` to the end of the list.
    ///
    /// Both inputs are validated before anything is touched, so a failed call
    /// leaves the list as it was.
    pub fn add(&mut self, name: &str, quantity: i64) -> DomainResult<&ItemRecord> {
        let name = ItemName::parse(name)?;
        let quantity = Quantity::new(quantity)?;
        Ok(self.push(ItemRecord { name, quantity }))
    }

    /// Append an already-validated record.
    pub fn push(&mut self, record: ItemRecord) -> &ItemRecord {
        self.items.push(record);
        &self.items[self.items.len() - 1]
    }

    /// Remove every record whose name equals `name` (exact, case-sensitive).
    ///
    /// The selector is trimmed first. A selector with no matches is a no-op.
    pub fn remove_by_name(&mut self, name: &str) -> DomainResult<Removal> {
        let name = ItemName::parse(name)
            .map_err(|_| DomainError::validation("no item selected"))?;

        let before = self.items.len();
        self.items.retain(|item| item.name != name);
        let removed = before - self.items.len();

        Ok(Removal { name, removed })
    }

    /// Read-only view of the current list, in order.
    pub fn snapshot(&self) -> &[ItemRecord] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn state(&self) -> StoreState {
        if self.items.is_empty() {
            StoreState::Empty
        } else {
            StoreState::NonEmpty
        }
    }

    /// Names present in the list, each once, in order of first appearance.
    pub fn distinct_names(&self) -> Vec<&ItemName> {
        let mut names: Vec<&ItemName> = Vec::new();
        for item in &self.items {
            if !names.contains(&&item.name) {
                names.push(&item.name);
            }
        }
        names
    }

    pub fn total_quantity(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity.get()))
            .sum()
    }
}
