use crate::api::{require_super_admin, Api, BearerAuth};
use crate::errors::AdminError;
use crate::services::{ApprovalService, TokenService};
use crate::types::dto::approval::{ApprovalDecisionResponse, ApprovalView, RejectRequest};
use crate::types::internal::ApprovalStatus;
use poem::Request;
use poem_openapi::param::{Path, Query};
use poem_openapi::{payload::Json, OpenApi, Tags};
use std::sync::Arc;

/// Super-admin review endpoints for the approval queue
pub struct ApprovalsApi {
    tokens: Arc<TokenService>,
    approvals: Arc<ApprovalService>,
}

impl ApprovalsApi {
    pub fn new(tokens: Arc<TokenService>, approvals: Arc<ApprovalService>) -> Self {
        Self { tokens, approvals }
    }
}

/// API tags for approval endpoints
#[derive(Tags)]
enum ApprovalTags {
    /// Supervised approval workflow
    Approvals,
}

impl Api for ApprovalsApi {}

#[OpenApi(prefix_path = "/approvals")]
impl ApprovalsApi {
    /// List approval requests, newest first
    #[oai(path = "/", method = "get", tag = "ApprovalTags::Approvals")]
    async fn list(
        &self,
        auth: BearerAuth,
        status: Query<Option<String>>,
    ) -> Result<Json<Vec<ApprovalView>>, AdminError> {
        let identity = self.tokens.verify(&auth.0.token)?;
        require_super_admin(&identity)?;

        let status = match &status.0 {
            None => None,
            Some(raw) => Some(
                ApprovalStatus::parse(raw)
                    .ok_or_else(|| AdminError::validation(format!("unknown status: {}", raw)))?,
            ),
        };

        let records = self
            .approvals
            .list(status)
            .await
            .map_err(AdminError::from_internal_error)?;

        Ok(Json(records.iter().map(ApprovalView::from_record).collect()))
    }

    /// Approve a pending request and replay its mutation
    #[oai(path = "/:id/approve", method = "post", tag = "ApprovalTags::Approvals")]
    async fn approve(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i64>,
    ) -> Result<Json<ApprovalDecisionResponse>, AdminError> {
        let meta = self.request_meta(req);
        let identity = self.tokens.verify(&auth.0.token)?;
        require_super_admin(&identity)?;

        let (approval, outcome) = self
            .approvals
            .approve(id.0, &identity, &meta)
            .await
            .map_err(AdminError::from_internal_error)?;

        Ok(Json(ApprovalDecisionResponse {
            approval: ApprovalView::from_record(&approval),
            item_id: outcome.item_id,
        }))
    }

    /// Reject a pending request with member-facing notes
    #[oai(path = "/:id/reject", method = "post", tag = "ApprovalTags::Approvals")]
    async fn reject(
        &self,
        req: &Request,
        auth: BearerAuth,
        id: Path<i64>,
        body: Json<RejectRequest>,
    ) -> Result<Json<ApprovalView>, AdminError> {
        let meta = self.request_meta(req);
        let identity = self.tokens.verify(&auth.0.token)?;
        require_super_admin(&identity)?;

        let approval = self
            .approvals
            .reject(id.0, &identity, &body.notes, &meta)
            .await
            .map_err(AdminError::from_internal_error)?;

        Ok(Json(ApprovalView::from_record(&approval)))
    }
}
