//! Doctor credential record, as stored under the `doctors` key.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Role;
use crate::errors::AppError;

fn doctor_role() -> String {
    Role::Doctor.as_str().to_string()
}

/// A registered doctor. Passwords are kept in clear text, exactly as the
/// dashboard always stored them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorRecord {
    pub id: i64,
    pub name: String,
    pub specialization: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub image: String,
    #[serde(default = "doctor_role")]
    pub role: String,
    /// Fields written by other versions of the registration form.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DoctorRecord {
    /// The whole record as a login profile.
    pub fn into_profile(self) -> Result<Map<String, Value>, AppError> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(AppError::Internal(format!(
                "Doctor record serialized to non-object: {}",
                other
            ))),
        }
    }
}

/// Registration / edit form for a doctor.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DoctorForm {
    pub name: String,
    pub specialization: String,
    pub username: String,
    pub password: String,
    pub image: Option<String>,
}

/// Login form.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub role: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}
