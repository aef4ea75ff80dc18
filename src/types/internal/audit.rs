use crate::types::internal::permissions::Module;
use crate::types::internal::request_meta::RequestMeta;
use std::fmt;

/// Action types recorded in the audit log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    LoginSuccess,
    LoginFailure,
    SuperAdminElevation,
    Create,
    Edit,
    Delete,
    SubmitApproval,
    ApproveApproval,
    RejectApproval,
    CreateAdmin,
    UpdatePermissions,
    UpdateActiveFlag,
    UpdateModuleSetting,
}

impl AuditAction {
    /// String representation for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LoginSuccess => "login_success",
            Self::LoginFailure => "login_failure",
            Self::SuperAdminElevation => "superadmin_elevation",
            Self::Create => "create",
            Self::Edit => "edit",
            Self::Delete => "delete",
            Self::SubmitApproval => "submit_approval",
            Self::ApproveApproval => "approve_approval",
            Self::RejectApproval => "reject_approval",
            Self::CreateAdmin => "create_admin",
            Self::UpdatePermissions => "update_permissions",
            Self::UpdateActiveFlag => "update_active_flag",
            Self::UpdateModuleSetting => "update_module_setting",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome recorded with every audit entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditStatus {
    Success,
    Failure,
}

impl AuditStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }
}

impl fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A fully assembled audit entry ready for insertion
///
/// The acting admin's username is denormalized into the entry so audit
/// history stays intact if the admin record is later deleted.
#[derive(Debug, Clone)]
pub struct NewAuditEntry {
    pub admin_id: String,
    pub admin_username: String,
    pub action: AuditAction,
    pub module: Option<Module>,
    pub item_id: Option<i64>,
    pub details: serde_json::Value,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub status: AuditStatus,
}

impl NewAuditEntry {
    pub fn new(admin_id: impl Into<String>, admin_username: impl Into<String>, action: AuditAction) -> Self {
        Self {
            admin_id: admin_id.into(),
            admin_username: admin_username.into(),
            action,
            module: None,
            item_id: None,
            details: serde_json::Value::Null,
            ip_address: None,
            user_agent: None,
            status: AuditStatus::Success,
        }
    }

    pub fn module(mut self, module: Module) -> Self {
        self.module = Some(module);
        self
    }

    pub fn item_id(mut self, item_id: i64) -> Self {
        self.item_id = Some(item_id);
        self
    }

    pub fn details(mut self, details: serde_json::Value) -> Self {
        self.details = details;
        self
    }

    pub fn meta(mut self, meta: &RequestMeta) -> Self {
        self.ip_address = meta.ip_address.clone();
        self.user_agent = meta.user_agent.clone();
        self
    }

    pub fn failure(mut self) -> Self {
        self.status = AuditStatus::Failure;
        self
    }
}

/// Filters and pagination for audit queries
#[derive(Debug, Clone, Default)]
pub struct AuditQuery {
    /// Substring match against username, module and details
    pub search: Option<String>,
    pub module: Option<Module>,
    pub admin_id: Option<String>,
    pub limit: u64,
    pub offset: u64,
}
