//! Consultation log under the `consultations` key.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::db::{keys, read_json_for_update, read_json_or_default, write_json, KeyValueStore};
use crate::errors::AppError;
use crate::ids::IdGenerator;
use crate::inventory::InventoryStore;
use crate::models::{Consultation, ConsultationForm, Identity, UsageReport};

pub struct ConsultationLog<S: KeyValueStore> {
    storage: Arc<S>,
    ids: IdGenerator,
    write_lock: Mutex<()>,
}

impl<S: KeyValueStore> ConsultationLog<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            storage,
            ids: IdGenerator::new(),
            write_lock: Mutex::new(()),
        }
    }

    /// Stored consultations. Records written by other views are returned as-is.
    pub async fn list(&self) -> Result<Vec<Value>, AppError> {
        read_json_or_default(self.storage.as_ref(), keys::CONSULTATIONS).await
    }

    /// Record a consultation by `doctor` and add the items it used to the
    /// shared inventory.
    ///
    /// The consultation is written first. If the inventory update then fails,
    /// the log is restored to its previous content and the error returned, so
    /// neither partition changes on failure.
    pub async fn record(
        &self,
        doctor: &Identity,
        form: ConsultationForm,
        inventory: &InventoryStore<S>,
    ) -> Result<(Consultation, UsageReport), AppError> {
        if form.patient_name.trim().is_empty() || form.diagnosis.trim().is_empty() {
            return Err(AppError::Validation(
                "Patient and diagnosis are required".to_string(),
            ));
        }

        let doctor_name = match doctor.name.trim() {
            "" => "Unknown Doctor".to_string(),
            name => name.to_string(),
        };
        let consultation = Consultation {
            id: self.ids.next()?,
            doctor_name,
            patient_name: form.patient_name,
            diagnosis: form.diagnosis,
            prescription: form.prescription,
            dosage: form.dosage,
            notes: form.notes,
            inventory: form.inventory,
            date: Utc::now().date_naive().to_string(),
        };

        let _guard = self.write_lock.lock().await;
        let previous: Vec<Value> =
            read_json_for_update(self.storage.as_ref(), keys::CONSULTATIONS).await?;
        let mut consultations = previous.clone();
        consultations.push(serde_json::to_value(&consultation)?);
        write_json(self.storage.as_ref(), keys::CONSULTATIONS, &consultations).await?;

        let usage = match inventory.record_usage(&consultation.inventory).await {
            Ok(usage) => usage,
            Err(e) => {
                if let Err(rollback) =
                    write_json(self.storage.as_ref(), keys::CONSULTATIONS, &previous).await
                {
                    tracing::error!(
                        "Failed to withdraw consultation {}: {}",
                        consultation.id,
                        rollback
                    );
                }
                return Err(e);
            }
        };

        tracing::info!(
            "Recorded consultation for {} by {}",
            consultation.patient_name,
            consultation.doctor_name
        );
        Ok((consultation, usage))
    }
}
