//! Consultation endpoints (doctor).

use axum::{extract::State, Json};
use serde::Serialize;
use serde_json::Value;

use super::{gate, success, ApiResult};
use crate::models::{Consultation, ConsultationForm, UsageReport};
use crate::AppState;

const CONSULTATION_VIEW: &str = "/consultation";

#[derive(Debug, Serialize)]
pub struct ConsultationRecorded {
    pub consultation: Consultation,
    pub inventory: UsageReport,
}

/// GET /api/consultations - Stored consultations.
pub async fn list_consultations(State(state): State<AppState>) -> ApiResult<Vec<Value>> {
    gate(&state, CONSULTATION_VIEW).await?;
    success(state.consultations.list().await?)
}

/// POST /api/consultations - Record a consultation and update inventory.
pub async fn record_consultation(
    State(state): State<AppState>,
    Json(form): Json<ConsultationForm>,
) -> ApiResult<ConsultationRecorded> {
    let doctor = gate(&state, CONSULTATION_VIEW).await?;
    let (consultation, inventory) = state
        .consultations
        .record(&doctor, form, &state.inventory)
        .await?;
    success(ConsultationRecorded {
        consultation,
        inventory,
    })
}
