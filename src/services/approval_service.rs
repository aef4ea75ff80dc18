use crate::content::{HandlerRegistry, MutationOutcome};
use crate::errors::internal::{ApprovalError, DatabaseError};
use crate::errors::InternalError;
use crate::stores::{ApprovalStore, AuditStore, NewApproval};
use crate::types::db::pending_approval;
use crate::types::internal::{
    Action, ApprovalStatus, AuditAction, Identity, Module, NewAuditEntry, RequestMeta,
};
use chrono::Utc;
use sea_orm::{DatabaseConnection, TransactionTrait};
use serde_json::json;
use std::sync::Arc;

/// Minimum length of a rejection reason; reject notes are member-facing
const MIN_REJECT_NOTES_CHARS: usize = 10;

/// The supervised-approval workflow
///
/// Records deferred mutations, lists them for review, and on a super-admin
/// decision either replays the stored mutation transactionally exactly once
/// or discards it. The decision's audit entry commits atomically with the
/// decision itself.
pub struct ApprovalService {
    db: DatabaseConnection,
    approvals: Arc<ApprovalStore>,
    audit: Arc<AuditStore>,
    registry: Arc<HandlerRegistry>,
}

impl ApprovalService {
    pub fn new(
        db: DatabaseConnection,
        approvals: Arc<ApprovalStore>,
        audit: Arc<AuditStore>,
        registry: Arc<HandlerRegistry>,
    ) -> Self {
        Self {
            db,
            approvals,
            audit,
            registry,
        }
    }

    /// Record a deferred mutation; never performs it
    ///
    /// Edit and delete submissions must carry the target id in their item
    /// data - that is a data-entry error to reject here, at submission time,
    /// not something to discover during replay.
    pub async fn submit(
        &self,
        requester: &Identity,
        action: Action,
        module: Module,
        item_data: serde_json::Value,
    ) -> Result<pending_approval::Model, InternalError> {
        if matches!(action, Action::Edit | Action::Delete) && target_id(&item_data).is_none() {
            return Err(ApprovalError::MissingTargetId {
                action: action.as_str().to_string(),
            }
            .into());
        }

        self.approvals
            .insert(NewApproval {
                requesting_admin_id: requester.id.clone(),
                requesting_admin_username: requester.username.clone(),
                action,
                module,
                item_data,
            })
            .await
    }

    /// List approvals, newest first, optionally filtered by status
    pub async fn list(
        &self,
        status: Option<ApprovalStatus>,
    ) -> Result<Vec<pending_approval::Model>, InternalError> {
        self.approvals.list(status).await
    }

    /// Approve a pending record and replay its mutation, exactly once
    ///
    /// Runs as a single transaction: re-fetch and assert pending, dispatch
    /// the stored mutation through the handler registry, flip the status
    /// under a `status = 'pending'` guard, write the audit entry, commit.
    /// Every early return before the commit drops the transaction, which
    /// rolls it back - the approval stays pending and no partial mutation
    /// becomes visible.
    pub async fn approve(
        &self,
        approval_id: i64,
        reviewer: &Identity,
        meta: &RequestMeta,
    ) -> Result<(pending_approval::Model, MutationOutcome), InternalError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|source| DatabaseError::TransactionBegin { source })?;

        let approval = self
            .approvals
            .find_by_id(&txn, approval_id)
            .await?
            .ok_or(ApprovalError::NotFound { id: approval_id })?;

        if approval.status != ApprovalStatus::Pending.as_str() {
            return Err(ApprovalError::AlreadyProcessed { id: approval_id }.into());
        }

        // A row recorded for a module or action the replay path cannot
        // execute fails loudly instead of reporting a success that never
        // happened.
        let module = Module::parse(&approval.module).ok_or_else(|| unsupported(&approval))?;
        let action = Action::parse(&approval.action_type).ok_or_else(|| unsupported(&approval))?;
        let handler = self
            .registry
            .get(module)
            .ok_or_else(|| unsupported(&approval))?;

        let item_data: serde_json::Value = serde_json::from_str(&approval.item_data)
            .map_err(|e| InternalError::parse("item_data", e))?;

        let outcome = match action {
            Action::Create => handler.create(&txn, &item_data).await?,
            Action::Edit => {
                let id = target_id(&item_data).ok_or(ApprovalError::MissingTargetId {
                    action: action.as_str().to_string(),
                })?;
                handler.edit(&txn, id, &item_data).await?
            }
            Action::Delete => {
                let id = target_id(&item_data).ok_or(ApprovalError::MissingTargetId {
                    action: action.as_str().to_string(),
                })?;
                handler.delete(&txn, id).await?
            }
        };

        // The guarded update is the serialization point for racing
        // reviewers: zero rows means someone else resolved the record after
        // our fetch, so the replayed mutation must be rolled back too.
        let now = Utc::now().timestamp();
        let rows = self
            .approvals
            .mark_approved(&txn, approval_id, &reviewer.id, &reviewer.username, now)
            .await?;
        if rows == 0 {
            return Err(ApprovalError::AlreadyProcessed { id: approval_id }.into());
        }

        self.audit
            .insert(
                &txn,
                NewAuditEntry::new(
                    reviewer.id.clone(),
                    reviewer.username.clone(),
                    AuditAction::ApproveApproval,
                )
                .module(module)
                .item_id(outcome.item_id)
                .details(json!({
                    "approval_id": approval_id,
                    "action": action.as_str(),
                    "requested_by": approval.requesting_admin_username,
                }))
                .meta(meta),
            )
            .await?;

        txn.commit()
            .await
            .map_err(|source| DatabaseError::TransactionCommit { source })?;

        let resolved = self
            .approvals
            .find_by_id(&self.db, approval_id)
            .await?
            .ok_or(ApprovalError::NotFound { id: approval_id })?;

        Ok((resolved, outcome))
    }

    /// Reject a pending record without side effects
    ///
    /// Notes are mandatory and must carry a minimum length. The guarded
    /// update gives the same race behavior as approve: the loser observes
    /// AlreadyProcessed.
    pub async fn reject(
        &self,
        approval_id: i64,
        reviewer: &Identity,
        notes: &str,
        meta: &RequestMeta,
    ) -> Result<pending_approval::Model, InternalError> {
        let notes = notes.trim();
        if notes.chars().count() < MIN_REJECT_NOTES_CHARS {
            return Err(ApprovalError::NotesTooShort {
                min: MIN_REJECT_NOTES_CHARS,
            }
            .into());
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|source| DatabaseError::TransactionBegin { source })?;

        let approval = self
            .approvals
            .find_by_id(&txn, approval_id)
            .await?
            .ok_or(ApprovalError::NotFound { id: approval_id })?;

        if approval.status != ApprovalStatus::Pending.as_str() {
            return Err(ApprovalError::AlreadyProcessed { id: approval_id }.into());
        }

        let now = Utc::now().timestamp();
        let rows = self
            .approvals
            .mark_rejected(&txn, approval_id, &reviewer.id, &reviewer.username, notes, now)
            .await?;
        if rows == 0 {
            return Err(ApprovalError::AlreadyProcessed { id: approval_id }.into());
        }

        self.audit
            .insert(
                &txn,
                NewAuditEntry::new(
                    reviewer.id.clone(),
                    reviewer.username.clone(),
                    AuditAction::RejectApproval,
                )
                .details(json!({
                    "approval_id": approval_id,
                    "module": approval.module,
                    "action": approval.action_type,
                    "requested_by": approval.requesting_admin_username,
                    "notes": notes,
                }))
                .meta(meta),
            )
            .await?;

        txn.commit()
            .await
            .map_err(|source| DatabaseError::TransactionCommit { source })?;

        self.approvals
            .find_by_id(&self.db, approval_id)
            .await?
            .ok_or_else(|| ApprovalError::NotFound { id: approval_id }.into())
    }
}

/// Extract the target id an edit/delete payload must carry
fn target_id(item_data: &serde_json::Value) -> Option<i64> {
    item_data.get("id").and_then(|v| v.as_i64())
}

fn unsupported(approval: &pending_approval::Model) -> InternalError {
    ApprovalError::UnsupportedAction {
        module: approval.module.clone(),
        action: approval.action_type.clone(),
    }
    .into()
}
