//! Doctor credential store under the `doctors` key.
//!
//! Written by the admin registration view, read by doctor login.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::db::{keys, read_json_for_update, read_json_or_default, write_json, KeyValueStore};
use crate::errors::AppError;
use crate::ids::IdGenerator;
use crate::models::{DoctorForm, DoctorRecord, Role};

/// Uploaded pictures must stay under this size once decoded.
pub const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;

pub struct DoctorDirectory<S: KeyValueStore> {
    storage: Arc<S>,
    ids: IdGenerator,
    // serializes read-modify-write cycles on the partition
    write_lock: Mutex<()>,
}

impl<S: KeyValueStore> DoctorDirectory<S> {
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            storage,
            ids: IdGenerator::new(),
            write_lock: Mutex::new(()),
        }
    }

    /// All registered doctors. Unreadable content counts as none.
    pub async fn list(&self) -> Result<Vec<DoctorRecord>, AppError> {
        read_json_or_default(self.storage.as_ref(), keys::DOCTORS).await
    }

    // Mutations refuse to run over a partition they cannot parse.
    async fn load_for_update(&self) -> Result<Vec<DoctorRecord>, AppError> {
        read_json_for_update(self.storage.as_ref(), keys::DOCTORS).await
    }

    pub async fn register(&self, form: DoctorForm) -> Result<DoctorRecord, AppError> {
        validate(&form)?;

        let _guard = self.write_lock.lock().await;
        let mut doctors = self.load_for_update().await?;
        ensure_unique_username(&doctors, &form.username, None)?;

        self.ids
            .observe(doctors.iter().map(|d| d.id).max().unwrap_or_default());
        let record = DoctorRecord {
            id: self.ids.next()?,
            name: form.name,
            specialization: form.specialization,
            username: form.username,
            password: form.password,
            image: form.image.unwrap_or_default(),
            role: Role::Doctor.as_str().to_string(),
            extra: Default::default(),
        };

        doctors.push(record.clone());
        write_json(self.storage.as_ref(), keys::DOCTORS, &doctors).await?;

        tracing::info!("Registered doctor {} ({})", record.name, record.username);
        Ok(record)
    }

    pub async fn update(&self, id: i64, form: DoctorForm) -> Result<DoctorRecord, AppError> {
        validate(&form)?;

        let _guard = self.write_lock.lock().await;
        let mut doctors = self.load_for_update().await?;
        ensure_unique_username(&doctors, &form.username, Some(id))?;

        let record = doctors
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Doctor {} not found", id)))?;

        record.name = form.name;
        record.specialization = form.specialization;
        record.username = form.username;
        record.password = form.password;
        if let Some(image) = form.image {
            record.image = image;
        }
        record.role = Role::Doctor.as_str().to_string();
        let updated = record.clone();

        write_json(self.storage.as_ref(), keys::DOCTORS, &doctors).await?;
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        let _guard = self.write_lock.lock().await;
        let mut doctors = self.load_for_update().await?;

        let before = doctors.len();
        doctors.retain(|d| d.id != id);
        if doctors.len() == before {
            return Err(AppError::NotFound(format!("Doctor {} not found", id)));
        }

        write_json(self.storage.as_ref(), keys::DOCTORS, &doctors).await
    }
}

fn validate(form: &DoctorForm) -> Result<(), AppError> {
    let required = [
        &form.name,
        &form.specialization,
        &form.username,
        &form.password,
    ];
    if required.iter().any(|field| field.trim().is_empty()) {
        return Err(AppError::Validation(
            "Please fill all required fields.".to_string(),
        ));
    }

    if let Some(image) = form.image.as_deref() {
        validate_image(image)?;
    }
    Ok(())
}

/// Data URLs must carry an image type and decode to at most [`MAX_IMAGE_BYTES`].
/// Plain URLs and the empty string are accepted as-is.
fn validate_image(image: &str) -> Result<(), AppError> {
    let Some(rest) = image.strip_prefix("data:") else {
        return Ok(());
    };

    if !rest.starts_with("image/") {
        return Err(AppError::Validation(
            "Please upload a valid image file (e.g., PNG, JPG).".to_string(),
        ));
    }

    let payload = rest.split_once(',').map(|(_, data)| data).unwrap_or_default();
    let decoded_len = payload.trim_end_matches('=').len() * 3 / 4;
    if decoded_len > MAX_IMAGE_BYTES {
        return Err(AppError::Validation(
            "Image size must be less than 2MB.".to_string(),
        ));
    }
    Ok(())
}

fn ensure_unique_username(
    doctors: &[DoctorRecord],
    username: &str,
    except_id: Option<i64>,
) -> Result<(), AppError> {
    let taken = doctors
        .iter()
        .any(|d| d.username == username && Some(d.id) != except_id);
    if taken {
        return Err(AppError::Conflict(format!(
            "Username '{}' is already registered",
            username
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::test_support::MemoryStore;

    fn form(username: &str) -> DoctorForm {
        DoctorForm {
            name: "Jane Doe".to_string(),
            specialization: "Orthodontics".to_string(),
            username: username.to_string(),
            password: "pw1".to_string(),
            image: None,
        }
    }

    #[tokio::test]
    async fn test_register_persists_doctor_record() {
        let storage = Arc::new(MemoryStore::new());
        let directory = DoctorDirectory::new(storage.clone());

        let record = directory.register(form("drjane")).await.unwrap();

        assert_eq!(record.role, "doctor");
        assert_eq!(record.image, "");
        assert!(record.id > 0);

        let stored: Value = serde_json::from_str(&storage.raw("doctors").unwrap()).unwrap();
        assert_eq!(stored[0]["username"], json!("drjane"));
        assert_eq!(stored[0]["role"], json!("doctor"));
        assert_eq!(directory.list().await.unwrap(), vec![record]);
    }

    #[tokio::test]
    async fn test_register_requires_all_fields() {
        let directory = DoctorDirectory::new(Arc::new(MemoryStore::new()));

        let mut missing = form("drjane");
        missing.specialization = "  ".to_string();

        let err = directory.register(missing).await.unwrap_err();
        assert_eq!(
            err,
            AppError::Validation("Please fill all required fields.".to_string())
        );
        assert!(directory.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_username_is_a_conflict() {
        let directory = DoctorDirectory::new(Arc::new(MemoryStore::new()));
        directory.register(form("drjane")).await.unwrap();

        let err = directory.register(form("drjane")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(directory.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_image_rules() {
        let directory = DoctorDirectory::new(Arc::new(MemoryStore::new()));

        let mut pdf = form("a");
        pdf.image = Some("data:application/pdf;base64,AAAA".to_string());
        assert!(matches!(
            directory.register(pdf).await,
            Err(AppError::Validation(_))
        ));

        let mut huge = form("b");
        huge.image = Some(format!(
            "data:image/png;base64,{}",
            "A".repeat(MAX_IMAGE_BYTES / 3 * 4 + 8)
        ));
        assert!(matches!(
            directory.register(huge).await,
            Err(AppError::Validation(_))
        ));

        let mut ok = form("c");
        ok.image = Some("data:image/png;base64,iVBORw0KGgo=".to_string());
        assert!(directory.register(ok).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_keeps_id_and_unknown_fields() {
        let storage = Arc::new(MemoryStore::with_entry(
            "doctors",
            r#"[{"id":5,"name":"Old","specialization":"X","username":"drold","password":"p","image":"pic.png","role":"doctor","phone":"123"}]"#,
        ));
        let directory = DoctorDirectory::new(storage);

        let mut changes = form("drnew");
        changes.name = "New".to_string();
        let updated = directory.update(5, changes).await.unwrap();

        assert_eq!(updated.id, 5);
        assert_eq!(updated.name, "New");
        assert_eq!(updated.image, "pic.png");
        assert_eq!(updated.extra["phone"], json!("123"));

        assert!(matches!(
            directory.update(6, form("x")).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete() {
        let directory = DoctorDirectory::new(Arc::new(MemoryStore::new()));
        let record = directory.register(form("drjane")).await.unwrap();

        directory.delete(record.id).await.unwrap();
        assert!(directory.list().await.unwrap().is_empty());
        assert!(matches!(
            directory.delete(record.id).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_malformed_partition_reads_as_empty() {
        let directory = DoctorDirectory::new(Arc::new(MemoryStore::with_entry("doctors", "oops")));
        assert!(directory.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mutations_leave_unreadable_partition_untouched() {
        let seeded = r#"[{"id":1,"name":"No Specialty","username":"drold","password":"p"},{"id":2,"name":"Bob","specialization":"Endo","username":"drbob","password":"p2"}]"#;
        let storage = Arc::new(MemoryStore::with_entry("doctors", seeded));
        let directory = DoctorDirectory::new(storage.clone());

        assert!(matches!(
            directory.register(form("drjane")).await,
            Err(AppError::Storage(_))
        ));
        assert!(matches!(
            directory.update(2, form("drbob")).await,
            Err(AppError::Storage(_))
        ));
        assert!(matches!(
            directory.delete(2).await,
            Err(AppError::Storage(_))
        ));
        assert_eq!(storage.raw("doctors").as_deref(), Some(seeded));
    }
}
