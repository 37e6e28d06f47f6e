//! Session store: who is currently using the dashboard.
//!
//! One identity per process, mirrored to durable storage under `currentUser`
//! so a restart lands back in the same session.

use std::future::Future;
use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::RwLock;

use crate::db::{keys, write_json, KeyValueStore};
use crate::errors::AppError;
use crate::models::{Identity, Role};

/// Read access to the current identity, injected wherever a handler or the
/// route resolver needs to know who is signed in.
pub trait SessionAccess: Send + Sync {
    fn current_identity(&self) -> impl Future<Output = Option<Identity>> + Send;
}

pub struct SessionStore<S: KeyValueStore> {
    storage: Arc<S>,
    current: RwLock<Option<Identity>>,
}

impl<S: KeyValueStore> SessionStore<S> {
    /// Start with no session; call [`SessionStore::restore`] once at startup.
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            storage,
            current: RwLock::new(None),
        }
    }

    /// Load the persisted identity, if any.
    ///
    /// Malformed content is removed and the store stays signed out. Nothing
    /// here is reported to the caller.
    pub async fn restore(&self) {
        let mut current = self.current.write().await;

        let raw = match self.storage.get(keys::CURRENT_USER).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                *current = None;
                return;
            }
            Err(e) => {
                tracing::warn!("Could not read persisted session, starting signed out: {}", e);
                *current = None;
                return;
            }
        };

        match serde_json::from_str::<Identity>(&raw) {
            Ok(identity) => {
                tracing::info!(
                    "Restored session for {} (role: {})",
                    identity.name,
                    identity.role.as_str()
                );
                *current = Some(identity);
            }
            Err(e) => {
                tracing::warn!("Discarding malformed persisted session: {}", e);
                *current = None;
                if let Err(e) = self.storage.remove(keys::CURRENT_USER).await {
                    tracing::warn!("Failed to clear malformed session: {}", e);
                }
            }
        }
    }

    /// Sign in with an already validated profile.
    ///
    /// The identity is persisted before it becomes current; if the write
    /// fails the previous session is left untouched.
    pub async fn login(&self, role: Role, profile: Map<String, Value>) -> Result<Identity, AppError> {
        let identity = Identity::from_profile(role, profile)?;

        let mut current = self.current.write().await;
        write_json(self.storage.as_ref(), keys::CURRENT_USER, &identity).await?;
        *current = Some(identity.clone());

        tracing::info!("Signed in {} as {}", identity.name, role);
        Ok(identity)
    }

    /// Sign out. Calling this while signed out is a no-op.
    pub async fn logout(&self) -> Result<(), AppError> {
        let mut current = self.current.write().await;
        self.storage.remove(keys::CURRENT_USER).await?;

        if let Some(previous) = current.take() {
            tracing::info!("Signed out {}", previous.name);
        }
        Ok(())
    }

    pub async fn current_identity(&self) -> Option<Identity> {
        self.current.read().await.clone()
    }
}

impl<S: KeyValueStore> SessionAccess for SessionStore<S> {
    async fn current_identity(&self) -> Option<Identity> {
        SessionStore::current_identity(self).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::test_support::MemoryStore;

    fn profile(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    /// Simulates a reload: a fresh store over the same storage.
    async fn reload(storage: &Arc<MemoryStore>) -> SessionStore<MemoryStore> {
        let session = SessionStore::new(storage.clone());
        session.restore().await;
        session
    }

    #[tokio::test]
    async fn test_starts_signed_out() {
        let session = reload(&Arc::new(MemoryStore::new())).await;
        assert_eq!(session.current_identity().await, None);
    }

    #[tokio::test]
    async fn test_login_is_visible_and_persisted_immediately() {
        let storage = Arc::new(MemoryStore::new());
        let session = SessionStore::new(storage.clone());

        let identity = session
            .login(Role::Admin, profile(json!({ "name": "Admin" })))
            .await
            .unwrap();

        assert_eq!(session.current_identity().await, Some(identity));
        let persisted: Value =
            serde_json::from_str(&storage.raw("currentUser").unwrap()).unwrap();
        assert_eq!(persisted, json!({ "role": "admin", "name": "Admin" }));
    }

    #[tokio::test]
    async fn test_restore_round_trips_identity() {
        let storage = Arc::new(MemoryStore::new());
        let doctor = json!({
            "id": 42,
            "name": "Jane Doe",
            "specialization": "Endodontics",
            "username": "drjane",
            "password": "pw1",
            "image": "data:image/png;base64,AAAA",
        });

        let stored = SessionStore::new(storage.clone())
            .login(Role::Doctor, profile(doctor))
            .await
            .unwrap();

        let restored = reload(&storage).await.current_identity().await;
        assert_eq!(restored, Some(stored));
    }

    #[tokio::test]
    async fn test_logout_then_reload_stays_signed_out() {
        let storage = Arc::new(MemoryStore::new());
        let session = SessionStore::new(storage.clone());
        session
            .login(Role::Admin, profile(json!({ "name": "Admin" })))
            .await
            .unwrap();

        session.logout().await.unwrap();

        assert_eq!(session.current_identity().await, None);
        assert_eq!(storage.raw("currentUser"), None);
        assert_eq!(reload(&storage).await.current_identity().await, None);
    }

    #[tokio::test]
    async fn test_logout_is_idempotent() {
        let storage = Arc::new(MemoryStore::new());
        let session = SessionStore::new(storage.clone());

        session.logout().await.unwrap();
        session.logout().await.unwrap();

        assert_eq!(session.current_identity().await, None);
        assert_eq!(storage.raw("currentUser"), None);
    }

    #[tokio::test]
    async fn test_malformed_session_is_cleared() {
        let storage = Arc::new(MemoryStore::with_entry("currentUser", "{\"role\": \"adm"));

        let session = reload(&storage).await;

        assert_eq!(session.current_identity().await, None);
        assert_eq!(storage.raw("currentUser"), None);
    }

    #[tokio::test]
    async fn test_session_without_role_is_malformed() {
        let storage = Arc::new(MemoryStore::with_entry("currentUser", r#"{"name":"Ghost"}"#));

        let session = reload(&storage).await;

        assert_eq!(session.current_identity().await, None);
        assert_eq!(storage.raw("currentUser"), None);
    }

    #[tokio::test]
    async fn test_unrecognized_role_is_restored_without_access() {
        let storage = Arc::new(MemoryStore::with_entry(
            "currentUser",
            r#"{"role":"receptionist","name":"Rita"}"#,
        ));

        let identity = reload(&storage).await.current_identity().await.unwrap();

        assert_eq!(identity.role(), None);
        assert_eq!(identity.name, "Rita");
    }

    #[tokio::test]
    async fn test_failed_write_keeps_previous_session() {
        let storage = Arc::new(MemoryStore::new());
        let session = SessionStore::new(storage.clone());
        let admin = session
            .login(Role::Admin, profile(json!({ "name": "Admin" })))
            .await
            .unwrap();

        storage.fail_writes(true);
        let err = session
            .login(Role::Doctor, profile(json!({ "name": "Jane" })))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Storage(_)));
        assert_eq!(session.current_identity().await, Some(admin));
    }

    #[tokio::test]
    async fn test_login_rejects_profile_without_name() {
        let storage = Arc::new(MemoryStore::new());
        let session = SessionStore::new(storage.clone());

        let err = session
            .login(Role::Doctor, profile(json!({ "username": "drjane" })))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(session.current_identity().await, None);
        assert_eq!(storage.raw("currentUser"), None);
    }
}
