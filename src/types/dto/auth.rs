use crate::types::internal::Identity;
use poem_openapi::Object;
use serde::{Deserialize, Serialize};

/// Request model for admin login
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Username for authentication
    pub username: String,

    /// Password for authentication
    pub password: String,
}

/// Public view of an admin identity
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct AdminIdentityView {
    /// Admin ID (UUID)
    pub id: String,

    /// Username
    pub username: String,

    /// Role tier
    pub role: String,

    /// Normalized super-admin flag
    pub is_super_admin: bool,

    /// Active flag
    pub is_active: bool,

    /// Permission matrix (module -> action -> granted)
    pub permissions: serde_json::Value,
}

impl AdminIdentityView {
    pub fn from_identity(identity: &Identity) -> Self {
        Self {
            id: identity.id.clone(),
            username: identity.username.clone(),
            role: identity.role.as_str().to_string(),
            is_super_admin: identity.is_super_admin,
            is_active: identity.is_active,
            permissions: identity
                .permissions
                .as_ref()
                .map(|m| m.to_value())
                .unwrap_or(serde_json::Value::Null),
        }
    }
}

/// Response model for login
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Signed bearer token
    pub token: String,

    /// Number of seconds until the token expires
    pub expires_in: i64,

    /// The authenticated identity
    pub identity: AdminIdentityView,
}

/// Request model for the super-admin elevation step
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ElevationRequest {
    /// Password, re-checked against the stored hash
    pub password: String,
}

/// Response model for the super-admin elevation step
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ElevationResponse {
    /// Short-lived elevated bearer token
    pub token: String,

    /// Number of seconds until the elevated token expires
    pub expires_in: i64,
}
