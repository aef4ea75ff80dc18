use crate::api::{require_super_admin, Api, BearerAuth};
use crate::errors::AdminError;
use crate::services::{AuditLogger, TokenService};
use crate::stores::{CredentialStore, NewAdmin};
use crate::types::dto::admin::{
    AdminView, CreateAdminRequest, SetActiveRequest, UpdatePermissionsRequest,
};
use crate::types::internal::{AdminRole, AuditAction, NewAuditEntry, PermissionMatrix};
use poem::Request;
use poem_openapi::param::Path;
use poem_openapi::{payload::Json, OpenApi, Tags};
use serde_json::json;
use std::sync::Arc;

/// Super-admin account management endpoints
///
/// Admin records are created here and their permission matrix and active
/// flag mutate only here.
pub struct AdminsApi {
    tokens: Arc<TokenService>,
    credentials: Arc<CredentialStore>,
    audit: Arc<AuditLogger>,
}

impl AdminsApi {
    pub fn new(
        tokens: Arc<TokenService>,
        credentials: Arc<CredentialStore>,
        audit: Arc<AuditLogger>,
    ) -> Self {
        Self {
            tokens,
            credentials,
            audit,
        }
    }
}

/// API tags for admin management endpoints
#[derive(Tags)]
enum AdminTags {
    /// Admin account management
    Admins,
}

impl Api for AdminsApi {}

#[OpenApi(prefix_path = "/admins")]
impl AdminsApi {
    /// Create an admin account
    #[oai(path = "/", method = "post", tag = "AdminTags::Admins")]
    async fn create(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<CreateAdminRequest>,
    ) -> Result<Json<AdminView>, AdminError> {
        let meta = self.request_meta(req);
        let identity = self.tokens.verify(&auth.0.token)?;
        require_super_admin(&identity)?;

        let role = AdminRole::parse(&body.role)
            .ok_or_else(|| AdminError::validation(format!("unknown role: {}", body.role)))?;

        let permissions = PermissionMatrix::from_value(&body.permissions)
            .map_err(|e| AdminError::validation(format!("invalid permission matrix: {}", e)))?;

        let record = self
            .credentials
            .create_admin(NewAdmin {
                username: body.username.clone(),
                password: body.password.clone(),
                role,
                is_super_admin: body.is_super_admin,
                permissions,
            })
            .await
            .map_err(AdminError::from_internal_error)?;

        self.audit
            .record(
                NewAuditEntry::new(
                    identity.id.clone(),
                    identity.username.clone(),
                    AuditAction::CreateAdmin,
                )
                .details(json!({
                    "target_admin_id": record.id,
                    "target_username": record.username,
                    "role": record.role,
                }))
                .meta(&meta),
            )
            .await;

        Ok(Json(AdminView::from_record(&record)))
    }

    /// List admin accounts
    #[oai(path = "/", method = "get", tag = "AdminTags::Admins")]
    async fn list(&self, auth: BearerAuth) -> Result<Json<Vec<AdminView>>, AdminError> {
        let identity = self.tokens.verify(&auth.0.token)?;
        require_super_admin(&identity)?;

        let records = self
            .credentials
            .list()
            .await
            .map_err(AdminError::from_internal_error)?;

        Ok(Json(records.iter().map(AdminView::from_record).collect()))
    }

    /// Replace an admin's permission matrix
    ///
    /// Outstanding tokens keep their embedded snapshot until they expire;
    /// that staleness window is a documented property of the token design.
    #[oai(path = "/:id/permissions", method = "put", tag = "AdminTags::Admins")]
    async fn set_permissions(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<String>,
        body: Json<UpdatePermissionsRequest>,
    ) -> Result<Json<AdminView>, AdminError> {
        let meta = self.request_meta(req);
        let identity = self.tokens.verify(&auth.0.token)?;
        require_super_admin(&identity)?;

        let permissions = PermissionMatrix::from_value(&body.permissions)
            .map_err(|e| AdminError::validation(format!("invalid permission matrix: {}", e)))?;

        let record = self
            .credentials
            .set_permissions(&id.0, &permissions)
            .await
            .map_err(AdminError::from_internal_error)?;

        self.audit
            .record(
                NewAuditEntry::new(
                    identity.id.clone(),
                    identity.username.clone(),
                    AuditAction::UpdatePermissions,
                )
                .details(json!({
                    "target_admin_id": record.id,
                    "permissions": permissions.to_value(),
                }))
                .meta(&meta),
            )
            .await;

        Ok(Json(AdminView::from_record(&record)))
    }

    /// Toggle an admin's active flag
    #[oai(path = "/:id/active", method = "put", tag = "AdminTags::Admins")]
    async fn set_active(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<String>,
        body: Json<SetActiveRequest>,
    ) -> Result<Json<AdminView>, AdminError> {
        let meta = self.request_meta(req);
        let identity = self.tokens.verify(&auth.0.token)?;
        require_super_admin(&identity)?;

        let record = self
            .credentials
            .set_active(&id.0, body.is_active)
            .await
            .map_err(AdminError::from_internal_error)?;

        self.audit
            .record(
                NewAuditEntry::new(
                    identity.id.clone(),
                    identity.username.clone(),
                    AuditAction::UpdateActiveFlag,
                )
                .details(json!({
                    "target_admin_id": record.id,
                    "is_active": record.is_active,
                }))
                .meta(&meta),
            )
            .await;

        Ok(Json(AdminView::from_record(&record)))
    }
}
