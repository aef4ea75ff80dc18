use crate::types::db::audit_log;
use poem_openapi::Object;
use serde::{Deserialize, Serialize};

/// View of a single audit entry
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct AuditLogView {
    /// Entry ID
    pub id: i64,

    /// ID of the acting admin
    pub admin_id: String,

    /// Username of the acting admin (snapshot at action time)
    pub admin_username: String,

    /// Recorded action type
    pub action_type: String,

    /// Target module, when the action was module-scoped
    pub module: Option<String>,

    /// Target item ID, when known
    pub item_id: Option<i64>,

    /// Structured action details
    pub action_details: serde_json::Value,

    /// Originating IP address
    pub ip_address: Option<String>,

    /// Originating user agent
    pub user_agent: Option<String>,

    /// Outcome (success or failure)
    pub status: String,

    /// Entry time (RFC 3339)
    pub created_at: String,
}

impl AuditLogView {
    pub fn from_record(record: &audit_log::Model) -> Self {
        Self {
            id: record.id,
            admin_id: record.admin_id.clone(),
            admin_username: record.admin_username.clone(),
            action_type: record.action_type.clone(),
            module: record.module.clone(),
            item_id: record.item_id,
            action_details: serde_json::from_str(&record.action_details)
                .unwrap_or(serde_json::Value::Null),
            ip_address: record.ip_address.clone(),
            user_agent: record.user_agent.clone(),
            status: record.status.clone(),
            created_at: record.created_at.clone(),
        }
    }
}

/// Response model for audit queries
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct AuditLogListResponse {
    /// Matching entries, newest first
    pub logs: Vec<AuditLogView>,

    /// Requested page size (0 means the server default)
    pub limit: u64,

    /// Requested offset
    pub offset: u64,
}
