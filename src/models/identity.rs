//! Authenticated principal and its role.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::AppError;

/// Access class that decides which views are reachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Doctor,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Admin, Role::Doctor];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Doctor => "doctor",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            "doctor" => Some(Role::Doctor),
            _ => None,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role string carried by a stored identity.
///
/// Anything that is not a known [`Role`] is kept verbatim so it survives a
/// save/restore cycle, but it never grants access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RoleClaim {
    Known(Role),
    Unrecognized(String),
}

impl RoleClaim {
    pub fn role(&self) -> Option<Role> {
        match self {
            RoleClaim::Known(role) => Some(*role),
            RoleClaim::Unrecognized(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RoleClaim::Known(role) => role.as_str(),
            RoleClaim::Unrecognized(raw) => raw,
        }
    }
}

impl From<String> for RoleClaim {
    fn from(raw: String) -> Self {
        match Role::parse(&raw) {
            Some(role) => RoleClaim::Known(role),
            None => RoleClaim::Unrecognized(raw),
        }
    }
}

impl From<RoleClaim> for String {
    fn from(claim: RoleClaim) -> Self {
        match claim {
            RoleClaim::Known(role) => role.as_str().to_string(),
            RoleClaim::Unrecognized(raw) => raw,
        }
    }
}

impl From<Role> for RoleClaim {
    fn from(role: Role) -> Self {
        RoleClaim::Known(role)
    }
}

/// The current user: role, display name, optional picture and whatever
/// role-specific profile fields came with the login (kept opaque).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub role: RoleClaim,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

impl Identity {
    /// Merge `role` into `profile` and validate the result.
    ///
    /// The `role` argument overrides any `role` field already present in the
    /// profile record.
    pub fn from_profile(role: Role, mut profile: Map<String, Value>) -> Result<Self, AppError> {
        profile.insert("role".to_string(), Value::String(role.as_str().to_string()));

        serde_json::from_value(Value::Object(profile))
            .map_err(|e| AppError::Validation(format!("Invalid profile data: {}", e)))
    }

    pub fn role(&self) -> Option<Role> {
        self.role.role()
    }

    /// Picture to show next to the greeting.
    pub fn avatar(&self) -> Avatar {
        if let Some(image) = self.image.as_deref().filter(|i| !i.trim().is_empty()) {
            return Avatar::Image(image.to_string());
        }

        match self.name.trim().chars().next() {
            Some(first) => Avatar::Initial(first.to_uppercase().collect()),
            None => Avatar::Placeholder,
        }
    }
}

/// Avatar fallback chain: image, then initial, then a generic placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum Avatar {
    Image(String),
    Initial(String),
    Placeholder,
}
