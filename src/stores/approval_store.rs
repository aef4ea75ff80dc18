use crate::errors::InternalError;
use crate::types::db::pending_approval::{self, Entity as PendingApproval};
use crate::types::internal::{Action, ApprovalStatus, Module};
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

/// Input for recording a deferred mutation
#[derive(Debug)]
pub struct NewApproval {
    pub requesting_admin_id: String,
    pub requesting_admin_username: String,
    pub action: Action,
    pub module: Module,
    pub item_data: serde_json::Value,
}

/// ApprovalStore persists deferred mutations and their status transitions
///
/// The only writes a resolved row ever sees happen through the guarded
/// updates below, whose `status = 'pending'` predicate serializes racing
/// reviewers: exactly one update affects a row, the other observes zero
/// rows affected.
pub struct ApprovalStore {
    db: DatabaseConnection,
}

impl ApprovalStore {
    /// Create a new ApprovalStore with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Persist a new pending approval
    pub async fn insert(&self, new: NewApproval) -> Result<pending_approval::Model, InternalError> {
        let item_data = serde_json::to_string(&new.item_data)
            .map_err(|e| InternalError::parse("item_data", e))?;

        let record = pending_approval::ActiveModel {
            id: sea_orm::ActiveValue::NotSet,
            requesting_admin_id: Set(new.requesting_admin_id),
            requesting_admin_username: Set(new.requesting_admin_username),
            action_type: Set(new.action.as_str().to_string()),
            module: Set(new.module.as_str().to_string()),
            item_data: Set(item_data),
            status: Set(ApprovalStatus::Pending.as_str().to_string()),
            reviewed_by: Set(None),
            reviewed_by_username: Set(None),
            reviewed_at: Set(None),
            review_notes: Set(None),
            created_at: Set(Utc::now().timestamp()),
        };

        record
            .insert(&self.db)
            .await
            .map_err(|e| InternalError::database("insert_pending_approval", e))
    }

    /// List approvals, newest first, optionally filtered by status
    pub async fn list(
        &self,
        status: Option<ApprovalStatus>,
    ) -> Result<Vec<pending_approval::Model>, InternalError> {
        let mut query = PendingApproval::find();

        if let Some(status) = status {
            query = query.filter(pending_approval::Column::Status.eq(status.as_str()));
        }

        query
            .order_by_desc(pending_approval::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| InternalError::database("list_approvals", e))
    }

    /// Fetch an approval by id over the given connection
    ///
    /// Takes a connection so the approval workflow can read inside its
    /// transaction.
    pub async fn find_by_id(
        &self,
        conn: &impl ConnectionTrait,
        id: i64,
    ) -> Result<Option<pending_approval::Model>, InternalError> {
        PendingApproval::find_by_id(id)
            .one(conn)
            .await
            .map_err(|e| InternalError::database("find_approval_by_id", e))
    }

    /// Flip a pending approval to approved
    ///
    /// Returns the number of rows affected. Zero means the row was no
    /// longer pending when the update ran - the caller lost a race and must
    /// treat the approval as already processed.
    pub async fn mark_approved(
        &self,
        conn: &impl ConnectionTrait,
        id: i64,
        reviewer_id: &str,
        reviewer_username: &str,
        reviewed_at: i64,
    ) -> Result<u64, InternalError> {
        let result = PendingApproval::update_many()
            .col_expr(
                pending_approval::Column::Status,
                Expr::value(ApprovalStatus::Approved.as_str()),
            )
            .col_expr(
                pending_approval::Column::ReviewedBy,
                Expr::value(reviewer_id),
            )
            .col_expr(
                pending_approval::Column::ReviewedByUsername,
                Expr::value(reviewer_username),
            )
            .col_expr(
                pending_approval::Column::ReviewedAt,
                Expr::value(reviewed_at),
            )
            .filter(pending_approval::Column::Id.eq(id))
            .filter(pending_approval::Column::Status.eq(ApprovalStatus::Pending.as_str()))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("mark_approval_approved", e))?;

        Ok(result.rows_affected)
    }

    /// Flip a pending approval to rejected
    ///
    /// Same guarded-update contract as mark_approved.
    pub async fn mark_rejected(
        &self,
        conn: &impl ConnectionTrait,
        id: i64,
        reviewer_id: &str,
        reviewer_username: &str,
        notes: &str,
        reviewed_at: i64,
    ) -> Result<u64, InternalError> {
        let result = PendingApproval::update_many()
            .col_expr(
                pending_approval::Column::Status,
                Expr::value(ApprovalStatus::Rejected.as_str()),
            )
            .col_expr(
                pending_approval::Column::ReviewedBy,
                Expr::value(reviewer_id),
            )
            .col_expr(
                pending_approval::Column::ReviewedByUsername,
                Expr::value(reviewer_username),
            )
            .col_expr(
                pending_approval::Column::ReviewedAt,
                Expr::value(reviewed_at),
            )
            .col_expr(pending_approval::Column::ReviewNotes, Expr::value(notes))
            .filter(pending_approval::Column::Id.eq(id))
            .filter(pending_approval::Column::Status.eq(ApprovalStatus::Pending.as_str()))
            .exec(conn)
            .await
            .map_err(|e| InternalError::database("mark_approval_rejected", e))?;

        Ok(result.rows_affected)
    }
}
