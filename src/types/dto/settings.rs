use crate::types::db::module_setting;
use poem_openapi::Object;
use serde::{Deserialize, Serialize};

/// View of a module's approval-requirement flags
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct ModuleSettingView {
    /// Module name
    pub module: String,

    /// Defer permitted creates into the approval queue
    pub requires_approval_for_create: bool,

    /// Defer permitted edits into the approval queue
    pub requires_approval_for_edit: bool,

    /// Defer permitted deletes into the approval queue
    pub requires_approval_for_delete: bool,
}

impl ModuleSettingView {
    pub fn from_record(record: &module_setting::Model) -> Self {
        Self {
            module: record.module.clone(),
            requires_approval_for_create: record.requires_approval_for_create,
            requires_approval_for_edit: record.requires_approval_for_edit,
            requires_approval_for_delete: record.requires_approval_for_delete,
        }
    }
}

/// Request model for updating a module's approval-requirement flags
///
/// Absent fields keep their current value.
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct UpdateModuleSettingRequest {
    pub requires_approval_for_create: Option<bool>,
    pub requires_approval_for_edit: Option<bool>,
    pub requires_approval_for_delete: Option<bool>,
}
