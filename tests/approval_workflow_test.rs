mod common;

use club_admin_backend::content::{self, HandlerRegistry};
use club_admin_backend::errors::internal::ApprovalError;
use club_admin_backend::errors::InternalError;
use club_admin_backend::services::ApprovalService;
use club_admin_backend::types::db::member;
use club_admin_backend::types::dto::settings::UpdateModuleSettingRequest;
use club_admin_backend::types::internal::{
    AccessDecision, Action, ApprovalStatus, Module, PermissionMatrix, RequestMeta,
};
use sea_orm::EntityTrait;
use serde_json::json;
use std::sync::Arc;

/// Flag members.create as requiring approval
async fn require_member_create_approval(harness: &common::TestHarness) {
    harness
        .settings
        .update(
            Module::Members,
            &UpdateModuleSettingRequest {
                requires_approval_for_create: Some(true),
                requires_approval_for_edit: None,
                requires_approval_for_delete: None,
            },
        )
        .await
        .expect("Failed to update module setting");
}

fn member_payload() -> serde_json::Value {
    json!({
        "name": "Ada Lovelace",
        "department": "EEE",
        "email": "ada@example.org"
    })
}

#[tokio::test]
async fn test_moderator_without_permission_is_denied_with_no_record() {
    let harness = common::setup().await;
    require_member_create_approval(&harness).await;

    // Scenario A: no members.create grant at all
    let moderator = harness
        .create_moderator("mod-a", "password-a", PermissionMatrix::new())
        .await;

    let decision = harness
        .engine
        .authorize(&moderator, Module::Members, Action::Create)
        .await
        .unwrap();

    assert!(matches!(decision, AccessDecision::Deny(_)));

    // No record anywhere: no approval, no member
    let approvals = harness.approval_service.list(None).await.unwrap();
    assert!(approvals.is_empty());
    let members = member::Entity::find().all(&harness.db).await.unwrap();
    assert!(members.is_empty());
}

#[tokio::test]
async fn test_permitted_create_defers_into_single_pending_approval() {
    let harness = common::setup().await;
    require_member_create_approval(&harness).await;

    let matrix = PermissionMatrix::new().grant(Module::Members, Action::Create);
    let moderator = harness.create_moderator("mod-b", "password-b", matrix).await;

    let decision = harness
        .engine
        .authorize(&moderator, Module::Members, Action::Create)
        .await
        .unwrap();
    assert_eq!(decision, AccessDecision::Defer);

    let approval = harness
        .approval_service
        .submit(&moderator, Action::Create, Module::Members, member_payload())
        .await
        .unwrap();

    assert_eq!(approval.status, "pending");
    assert_eq!(approval.requesting_admin_username, "mod-b");

    // Exactly one pending record, zero content store mutations
    let pending = harness
        .approval_service
        .list(Some(ApprovalStatus::Pending))
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);

    let members = member::Entity::find().all(&harness.db).await.unwrap();
    assert!(members.is_empty());
}

#[tokio::test]
async fn test_reject_resolves_without_side_effects_and_audits() {
    let harness = common::setup().await;
    require_member_create_approval(&harness).await;

    let matrix = PermissionMatrix::new().grant(Module::Members, Action::Create);
    let moderator = harness.create_moderator("mod-c", "password-c", matrix).await;
    let reviewer = harness.create_super_admin("root-c", "root-password").await;

    let approval = harness
        .approval_service
        .submit(&moderator, Action::Create, Module::Members, member_payload())
        .await
        .unwrap();

    // Scenario B: super-admin rejects with member-facing notes
    let rejected = harness
        .approval_service
        .reject(
            approval.id,
            &reviewer,
            "insufficient detail",
            &RequestMeta::internal(),
        )
        .await
        .unwrap();

    assert_eq!(rejected.status, "rejected");
    assert_eq!(rejected.review_notes.as_deref(), Some("insufficient detail"));
    assert_eq!(rejected.reviewed_by_username.as_deref(), Some("root-c"));
    assert!(rejected.reviewed_at.is_some());

    // No member was created
    let members = member::Entity::find().all(&harness.db).await.unwrap();
    assert!(members.is_empty());

    // The reject decision was audited
    let entries = harness
        .audit_store
        .query(&Default::default())
        .await
        .unwrap();
    assert!(entries
        .iter()
        .any(|e| e.action_type == "reject_approval" && e.admin_username == "root-c"));
}

#[tokio::test]
async fn test_reject_requires_minimum_notes_length() {
    let harness = common::setup().await;
    require_member_create_approval(&harness).await;

    let matrix = PermissionMatrix::new().grant(Module::Members, Action::Create);
    let moderator = harness.create_moderator("mod-d", "password-d", matrix).await;
    let reviewer = harness.create_super_admin("root-d", "root-password").await;

    let approval = harness
        .approval_service
        .submit(&moderator, Action::Create, Module::Members, member_payload())
        .await
        .unwrap();

    let result = harness
        .approval_service
        .reject(approval.id, &reviewer, "too short", &RequestMeta::internal())
        .await;

    assert!(matches!(
        result,
        Err(InternalError::Approval(ApprovalError::NotesTooShort { .. }))
    ));

    // The record is untouched
    let pending = harness
        .approval_service
        .list(Some(ApprovalStatus::Pending))
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);
}

#[tokio::test]
async fn test_approve_replays_the_exact_submitted_mutation() {
    let harness = common::setup().await;
    require_member_create_approval(&harness).await;

    let matrix = PermissionMatrix::new().grant(Module::Members, Action::Create);
    let moderator = harness.create_moderator("mod-e", "password-e", matrix).await;
    let reviewer = harness.create_super_admin("root-e", "root-password").await;

    let approval = harness
        .approval_service
        .submit(&moderator, Action::Create, Module::Members, member_payload())
        .await
        .unwrap();

    // Scenario C: approval replays the deferred create
    let (resolved, outcome) = harness
        .approval_service
        .approve(approval.id, &reviewer, &RequestMeta::internal())
        .await
        .unwrap();

    assert_eq!(resolved.status, "approved");
    assert_eq!(resolved.reviewed_by_username.as_deref(), Some("root-e"));

    // Exactly one member row, with the original item data verbatim
    let members = member::Entity::find().all(&harness.db).await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].id, outcome.item_id);
    assert_eq!(members[0].name, "Ada Lovelace");
    assert_eq!(members[0].department, "EEE");
    assert_eq!(members[0].email.as_deref(), Some("ada@example.org"));

    // The approve decision was audited with the item id
    let entries = harness
        .audit_store
        .query(&Default::default())
        .await
        .unwrap();
    assert!(entries
        .iter()
        .any(|e| e.action_type == "approve_approval" && e.item_id == Some(outcome.item_id)));
}

#[tokio::test]
async fn test_second_approve_observes_already_processed() {
    let harness = common::setup().await;
    require_member_create_approval(&harness).await;

    let matrix = PermissionMatrix::new().grant(Module::Members, Action::Create);
    let moderator = harness.create_moderator("mod-f", "password-f", matrix).await;
    let reviewer = harness.create_super_admin("root-f", "root-password").await;

    let approval = harness
        .approval_service
        .submit(&moderator, Action::Create, Module::Members, member_payload())
        .await
        .unwrap();

    harness
        .approval_service
        .approve(approval.id, &reviewer, &RequestMeta::internal())
        .await
        .unwrap();

    let second = harness
        .approval_service
        .approve(approval.id, &reviewer, &RequestMeta::internal())
        .await;

    assert!(matches!(
        second,
        Err(InternalError::Approval(ApprovalError::AlreadyProcessed { .. }))
    ));

    // Exactly one mutation happened
    let members = member::Entity::find().all(&harness.db).await.unwrap();
    assert_eq!(members.len(), 1);
}

#[tokio::test]
async fn test_concurrent_approve_and_reject_resolve_exactly_once() {
    let harness = common::setup().await;
    require_member_create_approval(&harness).await;

    let matrix = PermissionMatrix::new().grant(Module::Members, Action::Create);
    let moderator = harness.create_moderator("mod-g", "password-g", matrix).await;
    let reviewer = harness.create_super_admin("root-g", "root-password").await;

    let approval = harness
        .approval_service
        .submit(&moderator, Action::Create, Module::Members, member_payload())
        .await
        .unwrap();

    let approve_meta = RequestMeta::internal();
    let reject_meta = RequestMeta::internal();
    let approve = harness
        .approval_service
        .approve(approval.id, &reviewer, &approve_meta);
    let reject = harness.approval_service.reject(
        approval.id,
        &reviewer,
        "rejected in a race for testing",
        &reject_meta,
    );

    let (approve_result, reject_result) = tokio::join!(approve, reject);

    // Exactly one side wins; the loser observes AlreadyProcessed
    let ok_count = [approve_result.is_ok(), reject_result.is_ok()]
        .iter()
        .filter(|ok| **ok)
        .count();
    assert_eq!(ok_count, 1);

    if let Err(e) = &approve_result {
        assert!(matches!(
            e,
            InternalError::Approval(ApprovalError::AlreadyProcessed { .. })
        ));
    }
    if let Err(e) = &reject_result {
        assert!(matches!(
            e,
            InternalError::Approval(ApprovalError::AlreadyProcessed { .. })
        ));
    }

    // The mutation happened at most once, and only if approve won
    let members = member::Entity::find().all(&harness.db).await.unwrap();
    if approve_result.is_ok() {
        assert_eq!(members.len(), 1);
    } else {
        assert!(members.is_empty());
    }
}

#[tokio::test]
async fn test_submit_edit_without_target_id_is_rejected() {
    let harness = common::setup().await;

    let matrix = PermissionMatrix::new().grant(Module::Members, Action::Edit);
    let moderator = harness.create_moderator("mod-h", "password-h", matrix).await;

    let result = harness
        .approval_service
        .submit(
            &moderator,
            Action::Edit,
            Module::Members,
            json!({"name": "No Target"}),
        )
        .await;

    assert!(matches!(
        result,
        Err(InternalError::Approval(ApprovalError::MissingTargetId { .. }))
    ));

    let approvals = harness.approval_service.list(None).await.unwrap();
    assert!(approvals.is_empty());
}

#[tokio::test]
async fn test_approve_edit_replays_against_the_target_row() {
    let harness = common::setup().await;

    // Seed a member through the direct path
    let outcome = content::execute(
        &harness.db,
        &harness.registry,
        Module::Members,
        Action::Create,
        None,
        &member_payload(),
    )
    .await
    .unwrap();

    let matrix = PermissionMatrix::new().grant(Module::Members, Action::Edit);
    let moderator = harness.create_moderator("mod-i", "password-i", matrix).await;
    let reviewer = harness.create_super_admin("root-i", "root-password").await;

    let approval = harness
        .approval_service
        .submit(
            &moderator,
            Action::Edit,
            Module::Members,
            json!({"id": outcome.item_id, "department": "CSE"}),
        )
        .await
        .unwrap();

    harness
        .approval_service
        .approve(approval.id, &reviewer, &RequestMeta::internal())
        .await
        .unwrap();

    let updated = member::Entity::find_by_id(outcome.item_id)
        .one(&harness.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.department, "CSE");
    // Untouched fields keep their values
    assert_eq!(updated.name, "Ada Lovelace");
}

#[tokio::test]
async fn test_approve_with_unregistered_handler_fails_loudly_and_stays_pending() {
    let harness = common::setup().await;
    require_member_create_approval(&harness).await;

    // A service wired with an empty registry cannot replay anything
    let crippled = ApprovalService::new(
        harness.db.clone(),
        harness.approvals.clone(),
        harness.audit_store.clone(),
        Arc::new(HandlerRegistry::new()),
    );

    let matrix = PermissionMatrix::new().grant(Module::Members, Action::Create);
    let moderator = harness.create_moderator("mod-j", "password-j", matrix).await;
    let reviewer = harness.create_super_admin("root-j", "root-password").await;

    let approval = crippled
        .submit(&moderator, Action::Create, Module::Members, member_payload())
        .await
        .unwrap();

    let result = crippled
        .approve(approval.id, &reviewer, &RequestMeta::internal())
        .await;

    assert!(matches!(
        result,
        Err(InternalError::Approval(ApprovalError::UnsupportedAction { .. }))
    ));

    // The record stays pending and is retriable through a working service
    let pending = harness
        .approval_service
        .list(Some(ApprovalStatus::Pending))
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);

    let (resolved, _) = harness
        .approval_service
        .approve(approval.id, &reviewer, &RequestMeta::internal())
        .await
        .unwrap();
    assert_eq!(resolved.status, "approved");
}

#[tokio::test]
async fn test_direct_write_and_replay_produce_the_same_member() {
    let harness = common::setup().await;

    // Direct Allow path
    let direct = content::execute(
        &harness.db,
        &harness.registry,
        Module::Members,
        Action::Create,
        None,
        &member_payload(),
    )
    .await
    .unwrap();

    // Deferred path with identical item data
    require_member_create_approval(&harness).await;
    let matrix = PermissionMatrix::new().grant(Module::Members, Action::Create);
    let moderator = harness.create_moderator("mod-k", "password-k", matrix).await;
    let reviewer = harness.create_super_admin("root-k", "root-password").await;

    let approval = harness
        .approval_service
        .submit(&moderator, Action::Create, Module::Members, member_payload())
        .await
        .unwrap();
    let (_, replayed) = harness
        .approval_service
        .approve(approval.id, &reviewer, &RequestMeta::internal())
        .await
        .unwrap();

    let direct_row = member::Entity::find_by_id(direct.item_id)
        .one(&harness.db)
        .await
        .unwrap()
        .unwrap();
    let replayed_row = member::Entity::find_by_id(replayed.item_id)
        .one(&harness.db)
        .await
        .unwrap()
        .unwrap();

    // Same mutation either way
    assert_eq!(direct_row.name, replayed_row.name);
    assert_eq!(direct_row.department, replayed_row.department);
    assert_eq!(direct_row.email, replayed_row.email);
}
