use crate::errors::InternalError;
use crate::types::db::module_setting::{self, ActiveModel, Entity as ModuleSetting};
use crate::types::dto::settings::UpdateModuleSettingRequest;
use crate::types::internal::Module;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};

/// SettingStore manages the per-module approval-requirement flags
///
/// Follows an ensure-row pattern: a missing row is created with all flags
/// off, so reads never have to special-case absent configuration.
pub struct SettingStore {
    db: DatabaseConnection,
}

impl SettingStore {
    /// Create a new SettingStore with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Ensure the row for a module exists
    ///
    /// Creates the row with default values (no approval requirements) if it
    /// doesn't exist.
    async fn ensure_setting_exists(&self, module: Module) -> Result<(), InternalError> {
        let setting = ModuleSetting::find_by_id(module.as_str())
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("check_module_setting_exists", e))?;

        if setting.is_none() {
            let new_setting = ActiveModel {
                module: Set(module.as_str().to_string()),
                requires_approval_for_create: Set(false),
                requires_approval_for_edit: Set(false),
                requires_approval_for_delete: Set(false),
                updated_at: Set(Utc::now().timestamp()),
            };

            new_setting
                .insert(&self.db)
                .await
                .map_err(|e| InternalError::database("create_module_setting", e))?;
        }

        Ok(())
    }

    /// Get the setting row for a module
    pub async fn get(&self, module: Module) -> Result<module_setting::Model, InternalError> {
        self.ensure_setting_exists(module).await?;

        ModuleSetting::find_by_id(module.as_str())
            .one(&self.db)
            .await
            .map_err(|e| InternalError::database("get_module_setting", e))?
            .ok_or_else(|| InternalError::database(
                "get_module_setting",
                sea_orm::DbErr::RecordNotFound(module.as_str().to_string()),
            ))
    }

    /// List the settings for every module
    pub async fn list(&self) -> Result<Vec<module_setting::Model>, InternalError> {
        let mut settings = Vec::with_capacity(Module::ALL.len());
        for module in Module::ALL {
            settings.push(self.get(module).await?);
        }
        Ok(settings)
    }

    /// Update a module's flags; absent fields keep their current value
    pub async fn update(
        &self,
        module: Module,
        update: &UpdateModuleSettingRequest,
    ) -> Result<module_setting::Model, InternalError> {
        let current = self.get(module).await?;

        let mut active: ActiveModel = current.into();
        if let Some(value) = update.requires_approval_for_create {
            active.requires_approval_for_create = Set(value);
        }
        if let Some(value) = update.requires_approval_for_edit {
            active.requires_approval_for_edit = Set(value);
        }
        if let Some(value) = update.requires_approval_for_delete {
            active.requires_approval_for_delete = Set(value);
        }
        active.updated_at = Set(Utc::now().timestamp());

        active
            .update(&self.db)
            .await
            .map_err(|e| InternalError::database("update_module_setting", e))
    }
}
