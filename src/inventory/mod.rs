//! Shared inventory store.
//!
//! One ordered sequence of items shared by the inventory view and the
//! consultation view. Every mutation replaces the whole sequence under the
//! write guard, so readers see either the old or the new sequence. The
//! sequence is written through to the `inventory` key and loaded at startup,
//! like every other partition.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::db::{keys, read_json_or_default, write_json, KeyValueStore};
use crate::errors::AppError;
use crate::ids::IdGenerator;
use crate::models::{AddOutcome, InventoryItem, ItemForm, UsageReport, CONSULTATION_CATEGORY};

pub struct InventoryStore<S: KeyValueStore> {
    storage: Arc<S>,
    items: RwLock<Vec<InventoryItem>>,
    ids: IdGenerator,
}

impl<S: KeyValueStore> InventoryStore<S> {
    /// Empty store; call [`InventoryStore::load`] once at startup.
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            storage,
            items: RwLock::new(Vec::new()),
            ids: IdGenerator::new(),
        }
    }

    /// Load the persisted sequence. Malformed content loads as empty.
    pub async fn load(&self) -> Result<(), AppError> {
        let loaded: Vec<InventoryItem> =
            read_json_or_default(self.storage.as_ref(), keys::INVENTORY).await?;

        self.ids
            .observe(loaded.iter().map(|i| i.id).max().unwrap_or_default());
        tracing::info!("Loaded {} inventory items", loaded.len());

        *self.items.write().await = loaded;
        Ok(())
    }

    /// Current sequence in insertion order.
    pub async fn list(&self) -> Vec<InventoryItem> {
        self.items.read().await.clone()
    }

    /// Replace the whole sequence.
    pub async fn replace(&self, new_items: Vec<InventoryItem>) -> Result<(), AppError> {
        let mut items = self.items.write().await;
        write_json(self.storage.as_ref(), keys::INVENTORY, &new_items).await?;

        self.ids
            .observe(new_items.iter().map(|i| i.id).max().unwrap_or_default());
        *items = new_items;
        Ok(())
    }

    /// Add an item by name unless one already exists under the same name,
    /// compared case-insensitively. An existing record is left untouched.
    pub async fn add_by_name(&self, name: &str) -> Result<AddOutcome, AppError> {
        let mut report = self.record_usage(name).await?;
        match (report.created.pop(), report.existing.pop()) {
            (Some(created), _) => Ok(AddOutcome::Created(created)),
            (None, Some(existing)) => Ok(AddOutcome::Existing(existing)),
            (None, None) => Err(AppError::Validation("Item name is required".to_string())),
        }
    }

    /// Apply [`InventoryStore::add_by_name`] to every non-blank line of `text`.
    ///
    /// Lines are trimmed; names repeated within the batch are only created once.
    pub async fn record_usage(&self, text: &str) -> Result<UsageReport, AppError> {
        let names: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect();

        let mut items = self.items.write().await;
        let mut next = items.clone();
        let mut report = UsageReport::default();

        for name in names {
            let wanted = name.to_lowercase();
            match next.iter().find(|item| item.name.to_lowercase() == wanted) {
                Some(existing) => report.existing.push(existing.clone()),
                None => {
                    let item = InventoryItem {
                        id: self.ids.next()?,
                        name: name.to_string(),
                        quantity: 1,
                        category: CONSULTATION_CATEGORY.to_string(),
                    };
                    next.push(item.clone());
                    report.created.push(item);
                }
            }
        }

        if !report.created.is_empty() {
            write_json(self.storage.as_ref(), keys::INVENTORY, &next).await?;
            *items = next;
            tracing::debug!("Added {} inventory items from usage", report.created.len());
        }
        Ok(report)
    }

    /// Create an item from the inventory form.
    pub async fn create(&self, form: ItemForm) -> Result<InventoryItem, AppError> {
        let (name, quantity, category) = validate(form)?;

        let mut items = self.items.write().await;
        let item = InventoryItem {
            id: self.ids.next()?,
            name,
            quantity,
            category,
        };
        let mut next = items.clone();
        next.push(item.clone());

        write_json(self.storage.as_ref(), keys::INVENTORY, &next).await?;
        *items = next;
        Ok(item)
    }

    pub async fn update(&self, id: i64, form: ItemForm) -> Result<InventoryItem, AppError> {
        let (name, quantity, category) = validate(form)?;

        let mut items = self.items.write().await;
        let mut next = items.clone();
        let item = next
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Inventory item {} not found", id)))?;
        item.name = name;
        item.quantity = quantity;
        item.category = category;
        let updated = item.clone();

        write_json(self.storage.as_ref(), keys::INVENTORY, &next).await?;
        *items = next;
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        let mut items = self.items.write().await;
        let next: Vec<InventoryItem> = items.iter().filter(|i| i.id != id).cloned().collect();
        if next.len() == items.len() {
            return Err(AppError::NotFound(format!("Inventory item {} not found", id)));
        }

        write_json(self.storage.as_ref(), keys::INVENTORY, &next).await?;
        *items = next;
        Ok(())
    }

    /// Items whose name or category contains `term` (case-insensitive), then
    /// restricted to exactly `category` when given.
    pub async fn search(&self, term: Option<&str>, category: Option<&str>) -> Vec<InventoryItem> {
        let term = term.map(str::to_lowercase).unwrap_or_default();
        let category = category.filter(|c| !c.is_empty());

        self.items
            .read()
            .await
            .iter()
            .filter(|item| {
                item.name.to_lowercase().contains(&term)
                    || item.category.to_lowercase().contains(&term)
            })
            .filter(|item| category.is_none_or(|c| item.category == c))
            .cloned()
            .collect()
    }

    /// Distinct categories in first-seen order.
    pub async fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = Vec::new();
        for item in self.items.read().await.iter() {
            if !categories.contains(&item.category) {
                categories.push(item.category.clone());
            }
        }
        categories
    }
}

fn validate(form: ItemForm) -> Result<(String, i64, String), AppError> {
    let name = form.name.trim().to_string();
    let category = form.category.trim().to_string();

    let quantity = match form.quantity {
        Some(quantity) if !name.is_empty() && !category.is_empty() => quantity,
        _ => {
            return Err(AppError::Validation(
                "Name, quantity and category are required".to_string(),
            ))
        }
    };
    if quantity < 0 {
        return Err(AppError::Validation(
            "Quantity cannot be negative".to_string(),
        ));
    }

    Ok((name, quantity, category))
}
