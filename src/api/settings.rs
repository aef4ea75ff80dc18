use crate::api::{require_super_admin, Api, BearerAuth};
use crate::errors::AdminError;
use crate::services::{AuditLogger, TokenService};
use crate::stores::SettingStore;
use crate::types::dto::settings::{ModuleSettingView, UpdateModuleSettingRequest};
use crate::types::internal::{AuditAction, Module, NewAuditEntry};
use poem::Request;
use poem_openapi::param::Path;
use poem_openapi::{payload::Json, OpenApi, Tags};
use serde_json::json;
use std::sync::Arc;

/// Super-admin endpoints for per-module approval requirements
pub struct SettingsApi {
    tokens: Arc<TokenService>,
    settings: Arc<SettingStore>,
    audit: Arc<AuditLogger>,
}

impl SettingsApi {
    pub fn new(
        tokens: Arc<TokenService>,
        settings: Arc<SettingStore>,
        audit: Arc<AuditLogger>,
    ) -> Self {
        Self {
            tokens,
            settings,
            audit,
        }
    }
}

/// API tags for settings endpoints
#[derive(Tags)]
enum SettingsTags {
    /// Approval-requirement settings
    Settings,
}

impl Api for SettingsApi {}

#[OpenApi(prefix_path = "/settings")]
impl SettingsApi {
    /// List the approval-requirement flags for every module
    #[oai(path = "/approval", method = "get", tag = "SettingsTags::Settings")]
    async fn list(&self, auth: BearerAuth) -> Result<Json<Vec<ModuleSettingView>>, AdminError> {
        let identity = self.tokens.verify(&auth.0.token)?;
        require_super_admin(&identity)?;

        let settings = self
            .settings
            .list()
            .await
            .map_err(AdminError::from_internal_error)?;

        Ok(Json(
            settings.iter().map(ModuleSettingView::from_record).collect(),
        ))
    }

    /// Update a module's approval-requirement flags
    #[oai(path = "/approval/:module", method = "put", tag = "SettingsTags::Settings")]
    async fn update(
        &self,
        req: &Request,
        auth: BearerAuth,
        module: Path<String>,
        body: Json<UpdateModuleSettingRequest>,
    ) -> Result<Json<ModuleSettingView>, AdminError> {
        let meta = self.request_meta(req);
        let identity = self.tokens.verify(&auth.0.token)?;
        require_super_admin(&identity)?;

        let module = Module::parse(&module.0)
            .ok_or_else(|| AdminError::validation(format!("unknown module: {}", module.0)))?;

        let record = self
            .settings
            .update(module, &body.0)
            .await
            .map_err(AdminError::from_internal_error)?;

        self.audit
            .record(
                NewAuditEntry::new(
                    identity.id.clone(),
                    identity.username.clone(),
                    AuditAction::UpdateModuleSetting,
                )
                .module(module)
                .details(json!({
                    "requires_approval_for_create": record.requires_approval_for_create,
                    "requires_approval_for_edit": record.requires_approval_for_edit,
                    "requires_approval_for_delete": record.requires_approval_for_delete,
                }))
                .meta(&meta),
            )
            .await;

        Ok(Json(ModuleSettingView::from_record(&record)))
    }
}
