use crate::api::{Api, BearerAuth};
use crate::content::{self, HandlerRegistry};
use crate::errors::AdminError;
use crate::services::{ApprovalService, AuditLogger, PermissionEngine, TokenService};
use crate::types::dto::approval::SubmittedResponse;
use crate::types::dto::content::MutationResponse;
use crate::types::internal::{
    AccessDecision, Action, AuditAction, Module, NewAuditEntry, RequestMeta,
};
use poem::Request;
use poem_openapi::param::Path;
use poem_openapi::{payload::Json, ApiResponse, OpenApi, Tags};
use sea_orm::DatabaseConnection;
use serde_json::json;
use std::sync::Arc;

/// Guarded content mutation endpoints
///
/// Every route runs through the permission engine; a Defer outcome records
/// a pending approval and answers 202 instead of mutating anything.
pub struct ContentApi {
    db: DatabaseConnection,
    tokens: Arc<TokenService>,
    engine: Arc<PermissionEngine>,
    approvals: Arc<ApprovalService>,
    registry: Arc<HandlerRegistry>,
    audit: Arc<AuditLogger>,
}

impl ContentApi {
    pub fn new(
        db: DatabaseConnection,
        tokens: Arc<TokenService>,
        engine: Arc<PermissionEngine>,
        approvals: Arc<ApprovalService>,
        registry: Arc<HandlerRegistry>,
        audit: Arc<AuditLogger>,
    ) -> Self {
        Self {
            db,
            tokens,
            engine,
            approvals,
            registry,
            audit,
        }
    }
}

/// API tags for content endpoints
#[derive(Tags)]
enum ContentTags {
    /// Guarded content mutations
    Content,
}

/// Outcome of a guarded mutation request
#[derive(ApiResponse)]
pub enum MutationApiResponse {
    /// Mutation executed directly
    #[oai(status = 200)]
    Ok(Json<MutationResponse>),

    /// Mutation deferred into the approval queue
    #[oai(status = 202)]
    Accepted(Json<SubmittedResponse>),
}

impl Api for ContentApi {}

#[OpenApi(prefix_path = "/content")]
impl ContentApi {
    /// Create an item in a module
    #[oai(path = "/:module", method = "post", tag = "ContentTags::Content")]
    async fn create_item(
        &self,
        req: &Request,
        auth: BearerAuth,
        module: Path<String>,
        body: Json<serde_json::Value>,
    ) -> Result<MutationApiResponse, AdminError> {
        self.mutate(req, auth, &module.0, Action::Create, None, body.0)
            .await
    }

    /// Edit an item in a module
    #[oai(path = "/:module/:id", method = "put", tag = "ContentTags::Content")]
    async fn edit_item(
        &self,
        req: &Request,
        auth: BearerAuth,
        module: Path<String>,
        id: Path<i64>,
        body: Json<serde_json::Value>,
    ) -> Result<MutationApiResponse, AdminError> {
        self.mutate(req, auth, &module.0, Action::Edit, Some(id.0), body.0)
            .await
    }

    /// Delete an item in a module
    #[oai(path = "/:module/:id", method = "delete", tag = "ContentTags::Content")]
    async fn delete_item(
        &self,
        req: &Request,
        auth: BearerAuth,
        module: Path<String>,
        id: Path<i64>,
    ) -> Result<MutationApiResponse, AdminError> {
        self.mutate(req, auth, &module.0, Action::Delete, Some(id.0), json!({}))
            .await
    }
}

impl ContentApi {
    /// Shared guard-then-dispatch path for all three mutations
    async fn mutate(
        &self,
        req: &Request,
        auth: BearerAuth,
        module_raw: &str,
        action: Action,
        target: Option<i64>,
        payload: serde_json::Value,
    ) -> Result<MutationApiResponse, AdminError> {
        let meta = self.request_meta(req);
        let identity = self.tokens.verify(&auth.0.token)?;

        let module = Module::parse(module_raw)
            .ok_or_else(|| AdminError::validation(format!("unknown module: {}", module_raw)))?;

        let decision = self
            .engine
            .authorize(&identity, module, action)
            .await
            .map_err(AdminError::from_internal_error)?;

        match decision {
            AccessDecision::Deny(reason) => {
                self.deny_audit(&identity, module, action, &reason, &meta).await;
                Err(AdminError::forbidden(reason))
            }
            AccessDecision::Defer => {
                // The stored payload must carry the target id so the replay
                // can find it later
                let mut item_data = payload;
                if let Some(id) = target {
                    if let Some(map) = item_data.as_object_mut() {
                        map.insert("id".to_string(), json!(id));
                    } else {
                        item_data = json!({ "id": id });
                    }
                }

                let approval = self
                    .approvals
                    .submit(&identity, action, module, item_data)
                    .await
                    .map_err(AdminError::from_internal_error)?;

                self.audit
                    .record(
                        NewAuditEntry::new(
                            identity.id.clone(),
                            identity.username.clone(),
                            AuditAction::SubmitApproval,
                        )
                        .module(module)
                        .details(json!({
                            "approval_id": approval.id,
                            "action": action.as_str(),
                        }))
                        .meta(&meta),
                    )
                    .await;

                Ok(MutationApiResponse::Accepted(Json(SubmittedResponse {
                    pending: true,
                    approval_id: approval.id,
                })))
            }
            AccessDecision::Allow => {
                let outcome =
                    match content::execute(&self.db, &self.registry, module, action, target, &payload)
                        .await
                    {
                        Ok(outcome) => outcome,
                        Err(e) => {
                            self.audit
                                .record(
                                    NewAuditEntry::new(
                                        identity.id.clone(),
                                        identity.username.clone(),
                                        mutation_audit_action(action),
                                    )
                                    .module(module)
                                    .details(json!({"error": e.to_string()}))
                                    .meta(&meta)
                                    .failure(),
                                )
                                .await;
                            return Err(AdminError::from_internal_error(e));
                        }
                    };

                self.audit
                    .record(
                        NewAuditEntry::new(
                            identity.id.clone(),
                            identity.username.clone(),
                            mutation_audit_action(action),
                        )
                        .module(module)
                        .item_id(outcome.item_id)
                        .meta(&meta),
                    )
                    .await;

                Ok(MutationApiResponse::Ok(Json(MutationResponse {
                    id: outcome.item_id,
                    module: module.to_string(),
                    action: action.to_string(),
                })))
            }
        }
    }

    async fn deny_audit(
        &self,
        identity: &crate::types::internal::Identity,
        module: Module,
        action: Action,
        reason: &str,
        meta: &RequestMeta,
    ) {
        self.audit
            .record(
                NewAuditEntry::new(
                    identity.id.clone(),
                    identity.username.clone(),
                    mutation_audit_action(action),
                )
                .module(module)
                .details(json!({"decision": "deny", "reason": reason}))
                .meta(meta)
                .failure(),
            )
            .await;
    }
}

fn mutation_audit_action(action: Action) -> AuditAction {
    match action {
        Action::Create => AuditAction::Create,
        Action::Edit => AuditAction::Edit,
        Action::Delete => AuditAction::Delete,
    }
}
