//! REST API module.
//!
//! Every endpoint that backs a dashboard view is gated by that view's
//! reachability for the signed-in role.

mod consultations;
mod doctors;
mod inventory;
mod session;
mod storage;

pub use consultations::*;
pub use doctors::*;
pub use inventory::*;
pub use session::*;
pub use storage::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::Identity;
use crate::AppState;

/// Success response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, AppError>;

/// Create a successful API response.
pub fn success<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(ApiResponse::new(data))
}

/// Current identity, provided the view at `view_path` renders for it.
async fn gate(state: &AppState, view_path: &str) -> Result<Identity, AppError> {
    let identity = state.session.current_identity().await;
    crate::auth::require_view(identity, view_path)
}
