use crate::errors::internal::AuditError;
use crate::errors::InternalError;
use crate::types::db::audit_log::{self, Entity as AuditLog};
use crate::types::internal::{AuditQuery, NewAuditEntry};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

/// Default page size for audit queries
const DEFAULT_PAGE_SIZE: u64 = 50;

/// Largest page size a caller can request
const MAX_PAGE_SIZE: u64 = 200;

/// Upper bound on rows included in a CSV export
pub const EXPORT_MAX_ROWS: u64 = 10_000;

/// Repository for the append-only audit log
pub struct AuditStore {
    db: DatabaseConnection,
}

impl AuditStore {
    /// Create a new AuditStore with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Write an audit entry over the given connection
    ///
    /// Takes a connection so the approval workflow can write its decision
    /// entries inside the same transaction as the mutation they describe.
    /// Other callers pass the plain connection and go through the
    /// fire-and-log wrapper in the audit logger service.
    pub async fn insert(
        &self,
        conn: &impl ConnectionTrait,
        entry: NewAuditEntry,
    ) -> Result<(), InternalError> {
        let details = serde_json::to_string(&entry.details).map_err(|e| {
            InternalError::Audit(AuditError::Serialization {
                message: e.to_string(),
            })
        })?;

        let record = audit_log::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            admin_id: Set(entry.admin_id),
            admin_username: Set(entry.admin_username),
            action_type: Set(entry.action.as_str().to_string()),
            module: Set(entry.module.map(|m| m.as_str().to_string())),
            item_id: Set(entry.item_id),
            action_details: Set(details),
            ip_address: Set(entry.ip_address),
            user_agent: Set(entry.user_agent),
            status: Set(entry.status.as_str().to_string()),
            created_at: Set(Utc::now().to_rfc3339()),
        };

        record
            .insert(conn)
            .await
            .map_err(|e| InternalError::database("insert_audit_entry", e))?;

        Ok(())
    }

    /// Plain-connection insert for callers outside a transaction
    pub async fn append(&self, entry: NewAuditEntry) -> Result<(), InternalError> {
        self.insert(&self.db, entry).await
    }

    /// Query audit entries, newest first
    ///
    /// The search filter is a substring match against the acting username,
    /// the action type and the structured details. Limit is clamped to
    /// MAX_PAGE_SIZE; zero means the default page size.
    pub async fn query(&self, q: &AuditQuery) -> Result<Vec<audit_log::Model>, InternalError> {
        let limit = match q.limit {
            0 => DEFAULT_PAGE_SIZE,
            n => n.min(MAX_PAGE_SIZE),
        };

        let mut find = AuditLog::find();

        if let Some(module) = q.module {
            find = find.filter(audit_log::Column::Module.eq(module.as_str()));
        }
        if let Some(admin_id) = &q.admin_id {
            find = find.filter(audit_log::Column::AdminId.eq(admin_id.clone()));
        }
        if let Some(search) = &q.search {
            find = find.filter(
                Condition::any()
                    .add(audit_log::Column::AdminUsername.contains(search.as_str()))
                    .add(audit_log::Column::ActionType.contains(search.as_str()))
                    .add(audit_log::Column::ActionDetails.contains(search.as_str())),
            );
        }

        find.order_by_desc(audit_log::Column::Id)
            .limit(limit)
            .offset(q.offset)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("query_audit_entries", e))
    }

    /// Fetch rows for a CSV export, newest first, bounded by EXPORT_MAX_ROWS
    pub async fn fetch_for_export(&self) -> Result<Vec<audit_log::Model>, InternalError> {
        AuditLog::find()
            .order_by_desc(audit_log::Column::Id)
            .limit(EXPORT_MAX_ROWS)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("fetch_audit_export", e))
    }
}
