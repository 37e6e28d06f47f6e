//! Inventory item model shared by the inventory and consultation views.

use serde::{Deserialize, Serialize};

/// Category given to items that first appear through a consultation.
pub const CONSULTATION_CATEGORY: &str = "Used in Consultation";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: i64,
    pub name: String,
    pub quantity: i64,
    pub category: String,
}

/// Create / edit form for an item. Every field is required.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ItemForm {
    pub name: String,
    pub quantity: Option<i64>,
    pub category: String,
}

/// Query parameters for listing items.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InventoryQuery {
    pub search: Option<String>,
    pub category: Option<String>,
}

/// Newline-separated item names, as typed into the consultation form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UsageRequest {
    pub items: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AddByNameRequest {
    pub name: String,
}

/// Result of adding one item by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "item", rename_all = "camelCase")]
pub enum AddOutcome {
    Created(InventoryItem),
    Existing(InventoryItem),
}

/// Result of a usage batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UsageReport {
    pub created: Vec<InventoryItem>,
    pub existing: Vec<InventoryItem>,
}
