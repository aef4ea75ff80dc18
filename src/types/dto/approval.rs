use crate::types::db::pending_approval;
use poem_openapi::Object;
use serde::{Deserialize, Serialize};

/// View of a pending or resolved approval
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ApprovalView {
    /// Approval ID
    pub id: i64,

    /// ID of the admin who submitted the request
    pub requesting_admin_id: String,

    /// Username of the requesting admin (snapshot at submission time)
    pub requesting_admin_username: String,

    /// Deferred action (create, edit or delete)
    pub action_type: String,

    /// Target module
    pub module: String,

    /// The deferred mutation payload
    pub item_data: serde_json::Value,

    /// Current status (pending, approved or rejected)
    pub status: String,

    /// ID of the reviewing super-admin, once resolved
    pub reviewed_by: Option<String>,

    /// Username of the reviewer (snapshot at review time)
    pub reviewed_by_username: Option<String>,

    /// Review time (Unix timestamp), once resolved
    pub reviewed_at: Option<i64>,

    /// Reviewer notes (mandatory for rejections)
    pub review_notes: Option<String>,

    /// Submission time (Unix timestamp)
    pub created_at: i64,
}

impl ApprovalView {
    pub fn from_record(record: &pending_approval::Model) -> Self {
        Self {
            id: record.id,
            requesting_admin_id: record.requesting_admin_id.clone(),
            requesting_admin_username: record.requesting_admin_username.clone(),
            action_type: record.action_type.clone(),
            module: record.module.clone(),
            item_data: serde_json::from_str(&record.item_data)
                .unwrap_or(serde_json::Value::Null),
            status: record.status.clone(),
            reviewed_by: record.reviewed_by.clone(),
            reviewed_by_username: record.reviewed_by_username.clone(),
            reviewed_at: record.reviewed_at,
            review_notes: record.review_notes.clone(),
            created_at: record.created_at,
        }
    }
}

/// Request model for rejecting an approval
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct RejectRequest {
    /// Member-facing reason for the rejection
    pub notes: String,
}

/// Response model for an executed approval
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ApprovalDecisionResponse {
    /// The resolved approval
    pub approval: ApprovalView,

    /// ID of the content item the replay touched
    pub item_id: i64,
}

/// Response returned when a mutation was deferred into the approval queue
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct SubmittedResponse {
    /// Always true; the mutation has not been performed
    pub pending: bool,

    /// ID of the recorded approval request
    pub approval_id: i64,
}
