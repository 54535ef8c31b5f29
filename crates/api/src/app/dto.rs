use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::SessionId;
use stockroom_inventory::{InventoryStore, ItemRecord, Removal, StoreState};

// -------------------------
// User-facing messages
// -------------------------

pub const EMPTY_PLACEHOLDER: &str = "Inventory is empty. Add a new item above!";
pub const NAME_REQUIRED: &str = "Enter an item name to add it.";
pub const NOT_SELECTED: &str = "No item selected for removal.";

pub fn added_message(record: &ItemRecord) -> String {
    format!("Added: {}x {} to inventory!", record.quantity, record.name)
}

pub fn removed_message(removal: &Removal) -> String {
    format!("Removed all entries for: {}", removal.name)
}

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    #[serde(default)]
    pub name: String,
    pub quantity: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RemoveItemRequest {
    pub name: Option<String>,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct SessionStarted {
    pub session_id: SessionId,
    pub started_at: DateTime<Utc>,
}

/// Everything the client needs to re-render the inventory after any call.
#[derive(Debug, Serialize)]
pub struct InventoryView {
    pub items: Vec<ItemRecord>,
    pub state: StoreState,
    pub total_quantity: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<&'static str>,
}

impl InventoryView {
    pub fn render(store: &InventoryStore, message: Option<String>) -> Self {
        Self {
            items: store.snapshot().to_vec(),
            state: store.state(),
            total_quantity: store.total_quantity(),
            message,
            placeholder: store.is_empty().then_some(EMPTY_PLACEHOLDER),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NamesView {
    pub names: Vec<String>,
}

impl NamesView {
    pub fn render(store: &InventoryStore) -> Self {
        Self {
            names: store
                .distinct_names()
                .into_iter()
                .map(|n| n.as_str().to_string())
                .collect(),
        }
    }
}
