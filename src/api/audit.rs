use crate::api::{require_super_admin, BearerAuth};
use crate::errors::AdminError;
use crate::services::audit_logger::export_csv;
use crate::services::TokenService;
use crate::stores::AuditStore;
use crate::types::dto::audit::{AuditLogListResponse, AuditLogView};
use crate::types::internal::{AuditQuery, Module};
use poem_openapi::param::Query;
use poem_openapi::payload::{Json, PlainText, Response};
use poem_openapi::{OpenApi, Tags};
use std::sync::Arc;

/// Super-admin audit log endpoints
pub struct AuditApi {
    tokens: Arc<TokenService>,
    store: Arc<AuditStore>,
}

impl AuditApi {
    pub fn new(tokens: Arc<TokenService>, store: Arc<AuditStore>) -> Self {
        Self { tokens, store }
    }
}

/// API tags for audit endpoints
#[derive(Tags)]
enum AuditTags {
    /// Audit log access
    AuditLogs,
}

#[OpenApi(prefix_path = "/audit-logs")]
impl AuditApi {
    /// Query audit entries, newest first
    #[oai(path = "/", method = "get", tag = "AuditTags::AuditLogs")]
    async fn query(
        &self,
        auth: BearerAuth,
        search: Query<Option<String>>,
        module: Query<Option<String>>,
        admin_id: Query<Option<String>>,
        limit: Query<Option<u64>>,
        offset: Query<Option<u64>>,
    ) -> Result<Json<AuditLogListResponse>, AdminError> {
        let identity = self.tokens.verify(&auth.0.token)?;
        require_super_admin(&identity)?;

        let module = match &module.0 {
            None => None,
            Some(raw) => Some(
                Module::parse(raw)
                    .ok_or_else(|| AdminError::validation(format!("unknown module: {}", raw)))?,
            ),
        };

        let query = AuditQuery {
            search: search.0.filter(|s| !s.trim().is_empty()),
            module,
            admin_id: admin_id.0,
            limit: limit.0.unwrap_or(0),
            offset: offset.0.unwrap_or(0),
        };

        let rows = self
            .store
            .query(&query)
            .await
            .map_err(AdminError::from_internal_error)?;

        Ok(Json(AuditLogListResponse {
            logs: rows.iter().map(AuditLogView::from_record).collect(),
            limit: query.limit,
            offset: query.offset,
        }))
    }

    /// Export the audit log as CSV
    ///
    /// Bounded to the most recent rows; see the store's export cap.
    #[oai(path = "/export", method = "get", tag = "AuditTags::AuditLogs")]
    async fn export(&self, auth: BearerAuth) -> Result<Response<PlainText<String>>, AdminError> {
        let identity = self.tokens.verify(&auth.0.token)?;
        require_super_admin(&identity)?;

        let rows = self
            .store
            .fetch_for_export()
            .await
            .map_err(AdminError::from_internal_error)?;

        let csv = export_csv(&rows);

        Ok(Response::new(PlainText(csv))
            .header("Content-Type", "text/csv")
            .header(
                "Content-Disposition",
                "attachment; filename=\"audit-logs.csv\"",
            ))
    }
}
