//! Doctor registration endpoints (admin).

use axum::{
    extract::{Path, State},
    Json,
};

use super::{gate, success, ApiResult};
use crate::models::{DoctorForm, DoctorRecord};
use crate::AppState;

const LIST_VIEW: &str = "/doctor";
const REGISTRATION_VIEW: &str = "/doctor-registration";

/// GET /api/doctors - List registered doctors.
pub async fn list_doctors(State(state): State<AppState>) -> ApiResult<Vec<DoctorRecord>> {
    gate(&state, LIST_VIEW).await?;
    success(state.doctors.list().await?)
}

/// POST /api/doctors - Register a doctor.
pub async fn register_doctor(
    State(state): State<AppState>,
    Json(form): Json<DoctorForm>,
) -> ApiResult<DoctorRecord> {
    gate(&state, REGISTRATION_VIEW).await?;
    success(state.doctors.register(form).await?)
}

/// PUT /api/doctors/{id} - Edit a doctor.
pub async fn update_doctor(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(form): Json<DoctorForm>,
) -> ApiResult<DoctorRecord> {
    gate(&state, REGISTRATION_VIEW).await?;
    success(state.doctors.update(id, form).await?)
}

/// DELETE /api/doctors/{id} - Remove a doctor.
pub async fn delete_doctor(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<()> {
    gate(&state, REGISTRATION_VIEW).await?;
    state.doctors.delete(id).await?;
    success(())
}
