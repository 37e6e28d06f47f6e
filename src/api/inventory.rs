//! Inventory endpoints, shared by admin and doctor.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use super::{gate, success, ApiResult};
use crate::models::{
    AddByNameRequest, AddOutcome, InventoryItem, InventoryQuery, ItemForm, UsageReport,
    UsageRequest,
};
use crate::AppState;

const INVENTORY_VIEW: &str = "/inventory";

/// GET /api/inventory - List items, optionally filtered.
pub async fn list_inventory(
    State(state): State<AppState>,
    Query(query): Query<InventoryQuery>,
) -> ApiResult<Vec<InventoryItem>> {
    gate(&state, INVENTORY_VIEW).await?;

    let items = if query.search.is_none() && query.category.is_none() {
        state.inventory.list().await
    } else {
        state
            .inventory
            .search(query.search.as_deref(), query.category.as_deref())
            .await
    };
    success(items)
}

/// PUT /api/inventory - Replace the whole sequence.
pub async fn replace_inventory(
    State(state): State<AppState>,
    Json(items): Json<Vec<InventoryItem>>,
) -> ApiResult<Vec<InventoryItem>> {
    gate(&state, INVENTORY_VIEW).await?;
    state.inventory.replace(items).await?;
    success(state.inventory.list().await)
}

/// GET /api/inventory/categories - Distinct categories.
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Vec<String>> {
    gate(&state, INVENTORY_VIEW).await?;
    success(state.inventory.categories().await)
}

/// POST /api/inventory/items - Create an item.
pub async fn create_item(
    State(state): State<AppState>,
    Json(form): Json<ItemForm>,
) -> ApiResult<InventoryItem> {
    gate(&state, INVENTORY_VIEW).await?;
    success(state.inventory.create(form).await?)
}

/// PUT /api/inventory/items/{id} - Edit an item.
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(form): Json<ItemForm>,
) -> ApiResult<InventoryItem> {
    gate(&state, INVENTORY_VIEW).await?;
    success(state.inventory.update(id, form).await?)
}

/// DELETE /api/inventory/items/{id} - Delete an item.
pub async fn delete_item(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<()> {
    gate(&state, INVENTORY_VIEW).await?;
    state.inventory.delete(id).await?;
    success(())
}

/// POST /api/inventory/usage - Add items by name, skipping existing names.
pub async fn record_usage(
    State(state): State<AppState>,
    Json(request): Json<UsageRequest>,
) -> ApiResult<UsageReport> {
    gate(&state, INVENTORY_VIEW).await?;
    success(state.inventory.record_usage(&request.items).await?)
}

/// POST /api/inventory/items/by-name - Add one item unless the name exists.
pub async fn add_item_by_name(
    State(state): State<AppState>,
    Json(request): Json<AddByNameRequest>,
) -> ApiResult<AddOutcome> {
    gate(&state, INVENTORY_VIEW).await?;
    success(state.inventory.add_by_name(&request.name).await?)
}
