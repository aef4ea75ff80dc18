use crate::types::db::admin_user;
use poem_openapi::Object;
use serde::{Deserialize, Serialize};

/// Request model for creating an admin account
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct CreateAdminRequest {
    /// Username for the new admin
    pub username: String,

    /// Initial password
    pub password: String,

    /// Role tier (Admin, Moderator or SuperAdmin)
    pub role: String,

    /// Super-admin flag
    #[oai(default)]
    pub is_super_admin: bool,

    /// Permission matrix (module -> action -> granted)
    pub permissions: serde_json::Value,
}

/// Request model for replacing an admin's permission matrix
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct UpdatePermissionsRequest {
    /// Permission matrix (module -> action -> granted)
    pub permissions: serde_json::Value,
}

/// Request model for toggling an admin's active flag
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct SetActiveRequest {
    /// New active flag value
    pub is_active: bool,
}

/// Administrative view of an admin account (no credentials)
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct AdminView {
    /// Admin ID (UUID)
    pub id: String,

    /// Username
    pub username: String,

    /// Role tier
    pub role: String,

    /// Stored super-admin flag
    pub is_super_admin: bool,

    /// Active flag
    pub is_active: bool,

    /// Permission matrix
    pub permissions: serde_json::Value,

    /// Creation time (Unix timestamp)
    pub created_at: i64,
}

impl AdminView {
    pub fn from_record(record: &admin_user::Model) -> Self {
        Self {
            id: record.id.clone(),
            username: record.username.clone(),
            role: record.role.clone(),
            is_super_admin: record.is_super_admin,
            is_active: record.is_active,
            permissions: serde_json::from_str(&record.permissions)
                .unwrap_or(serde_json::Value::Null),
            created_at: record.created_at,
        }
    }
}
