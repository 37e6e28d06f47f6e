//! Consultation record appended to the `consultations` partition.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consultation {
    pub id: i64,
    pub doctor_name: String,
    pub patient_name: String,
    pub diagnosis: String,
    pub prescription: String,
    pub dosage: String,
    pub notes: String,
    /// Items used, one per line.
    pub inventory: String,
    pub date: String,
}

/// Dosage preselected on the consultation form.
pub const DEFAULT_DOSAGE: &str = "Twice a day";

/// Consultation form; omitted fields take the form's initial values.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConsultationForm {
    pub patient_name: String,
    pub diagnosis: String,
    pub prescription: String,
    pub dosage: String,
    pub notes: String,
    pub inventory: String,
}

impl Default for ConsultationForm {
    fn default() -> Self {
        Self {
            patient_name: String::new(),
            diagnosis: String::new(),
            prescription: String::new(),
            dosage: DEFAULT_DOSAGE.to_string(),
            notes: String::new(),
            inventory: String::new(),
        }
    }
}
