//! Read access to the partitions owned by the CRUD views.

use axum::extract::{Path, State};
use serde_json::Value;

use super::{gate, success, ApiResult};
use crate::db::{keys, read_json_or_default};
use crate::errors::AppError;
use crate::AppState;

/// GET /api/storage/{key} - Raw JSON of an external partition.
pub async fn get_partition(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<Value> {
    gate(&state, crate::routing::DEFAULT_PATH).await?;

    if !keys::EXTERNAL_PARTITIONS.contains(&key.as_str()) {
        return Err(AppError::NotFound(format!("Unknown partition '{}'", key)));
    }

    let value: Value = read_json_or_default(state.storage.as_ref(), &key).await?;
    success(match value {
        Value::Null => Value::Array(Vec::new()),
        other => other,
    })
}
