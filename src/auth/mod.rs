//! Credential checks and the API access gate.
//!
//! Authentication is local: the credential store lives in the same storage
//! the operator controls, and the admin pair is a hardcoded literal. Neither
//! is hardened here.

use serde_json::{json, Map, Value};
use subtle::ConstantTimeEq;

use crate::errors::AppError;
use crate::models::{DoctorRecord, Identity, Role};
use crate::routing::{resolve, Resolution};

/// The single admin credential pair.
pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin123";

pub const INVALID_ADMIN: &str = "Invalid admin credentials.";
pub const INVALID_DOCTOR: &str = "Invalid doctor credentials.";
pub const SIGN_IN_REQUIRED: &str = "Please sign in.";

/// Check entered credentials for `role` and return the profile to sign in with.
///
/// Admin: exact match on the hardcoded pair, profile `{name: "Admin"}`.
/// Doctor: exact match of both username and password against some record in
/// `doctors`; the whole record becomes the profile.
pub fn authenticate(
    role: Role,
    username: &str,
    password: &str,
    doctors: &[DoctorRecord],
) -> Result<Map<String, Value>, AppError> {
    match role {
        Role::Admin => {
            let username_ok = constant_time_compare(username, ADMIN_USERNAME);
            let password_ok = constant_time_compare(password, ADMIN_PASSWORD);
            if username_ok && password_ok {
                let mut profile = Map::new();
                profile.insert("name".to_string(), json!("Admin"));
                Ok(profile)
            } else {
                Err(AppError::Unauthorized(INVALID_ADMIN.to_string()))
            }
        }
        Role::Doctor => doctors
            .iter()
            .find(|doc| {
                let username_ok = constant_time_compare(&doc.username, username);
                let password_ok = constant_time_compare(&doc.password, password);
                username_ok && password_ok
            })
            .cloned()
            .ok_or_else(|| AppError::Unauthorized(INVALID_DOCTOR.to_string()))?
            .into_profile(),
    }
}

/// Allow an API call only if `view_path` renders for the identity.
///
/// Endpoints that back a view share that view's reachability: no session or a
/// role that reaches nothing is `Unauthorized`, a role that would be
/// redirected away is `Forbidden`.
pub fn require_view(identity: Option<Identity>, view_path: &str) -> Result<Identity, AppError> {
    let resolution = resolve(identity.as_ref(), view_path);
    match identity {
        Some(identity) if resolution.view().is_some() => Ok(identity),
        Some(identity) if matches!(resolution, Resolution::Redirect { .. }) => {
            Err(AppError::Forbidden(format!(
                "Role '{}' cannot access {}",
                identity.role.as_str(),
                view_path
            )))
        }
        _ => Err(AppError::Unauthorized(SIGN_IN_REQUIRED.to_string())),
    }
}

/// Perform constant-time string comparison.
fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jane() -> DoctorRecord {
        serde_json::from_value(json!({
            "id": 1,
            "name": "Jane Doe",
            "specialization": "Orthodontics",
            "username": "drjane",
            "password": "pw1",
            "image": "",
            "role": "doctor"
        }))
        .unwrap()
    }

    fn identity(role: &str) -> Identity {
        serde_json::from_value(json!({ "role": role, "name": "X" })).unwrap()
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("test-key-123", "test-key-123"));
        assert!(!constant_time_compare("test-key-123", "test-key-124"));
        assert!(!constant_time_compare("short", "much-longer-key"));
        assert!(constant_time_compare("", ""));
        assert!(!constant_time_compare("", "not-empty"));
    }

    #[test]
    fn test_admin_pair() {
        let profile = authenticate(Role::Admin, "admin", "admin123", &[]).unwrap();
        assert_eq!(Value::Object(profile), json!({ "name": "Admin" }));

        for (user, pass) in [("admin", "admin"), ("Admin", "admin123"), ("", ""), ("admin", "admin123 ")] {
            let err = authenticate(Role::Admin, user, pass, &[]).unwrap_err();
            assert_eq!(err, AppError::Unauthorized(INVALID_ADMIN.to_string()));
        }
    }

    #[test]
    fn test_doctor_exact_match_returns_full_record() {
        let profile = authenticate(Role::Doctor, "drjane", "pw1", &[jane()]).unwrap();

        assert_eq!(profile["name"], json!("Jane Doe"));
        assert_eq!(profile["specialization"], json!("Orthodontics"));
        assert_eq!(profile["username"], json!("drjane"));
        assert_eq!(profile["id"], json!(1));
    }

    #[test]
    fn test_doctor_mismatch_is_rejected() {
        for (user, pass) in [("drjane", "pw2"), ("DrJane", "pw1"), ("drjohn", "pw1"), ("admin", "admin123")] {
            let err = authenticate(Role::Doctor, user, pass, &[jane()]).unwrap_err();
            assert_eq!(err, AppError::Unauthorized(INVALID_DOCTOR.to_string()));
        }
        assert!(authenticate(Role::Doctor, "drjane", "pw1", &[]).is_err());
    }

    #[test]
    fn test_doctor_credentials_do_not_open_admin() {
        assert!(authenticate(Role::Admin, "drjane", "pw1", &[jane()]).is_err());
    }

    #[test]
    fn test_require_view() {
        assert_eq!(
            require_view(None, "/inventory").unwrap_err(),
            AppError::Unauthorized(SIGN_IN_REQUIRED.to_string())
        );
        assert!(require_view(Some(identity("admin")), "/doctor-registration").is_ok());
        assert!(matches!(
            require_view(Some(identity("doctor")), "/doctor-registration"),
            Err(AppError::Forbidden(_))
        ));
        assert!(require_view(Some(identity("doctor")), "/consultation").is_ok());
        assert!(matches!(
            require_view(Some(identity("receptionist")), "/dashboard"),
            Err(AppError::Unauthorized(_))
        ));
    }
}
