use serde::{Deserialize, Serialize};

use stockroom_core::{DomainError, DomainResult, ValueObject};

/// Item name: trimmed, never empty.
///
/// Doubles as the (non-unique) key for removal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemName(String);

impl ItemName {
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for ItemName {}

impl core::fmt::Display for ItemName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ItemName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ItemName> for String {
    fn from(value: ItemName) -> Self {
        value.0
    }
}

/// Number of units held by a single record (always >= 1).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    pub const MIN: Quantity = Quantity(1);

    pub fn new(value: i64) -> DomainResult<Self> {
        if value < 1 {
            return Err(DomainError::validation("quantity must be at least 1"));
        }
        let value = u32::try_from(value)
            .map_err(|_| DomainError::validation("quantity is too large"))?;
        Ok(Self(value))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl ValueObject for Quantity {}

impl Default for Quantity {
    fn default() -> Self {
        Self::MIN
    }
}

impl core::fmt::Display for Quantity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl TryFrom<i64> for Quantity {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for u32 {
    fn from(value: Quantity) -> Self {
        value.0
    }
}

/// A single `{name, quantity}` entry in an inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub name: ItemName,
    pub quantity: Quantity,
}

impl ValueObject for ItemRecord {}
