mod common;

use club_admin_backend::errors::internal::{CredentialError, TokenError};
use club_admin_backend::errors::InternalError;
use club_admin_backend::types::internal::{
    AccessDecision, Action, Identity, Module, PermissionMatrix,
};

#[tokio::test]
async fn test_verify_credentials_round_trip() {
    let harness = common::setup().await;
    harness.create_super_admin("root", "root-password").await;

    let record = harness
        .credentials
        .verify_credentials("root", "root-password")
        .await
        .unwrap();
    assert_eq!(record.username, "root");

    let identity = Identity::from_record(&record);
    assert!(identity.is_super_admin);
}

#[tokio::test]
async fn test_verify_credentials_rejects_wrong_password() {
    let harness = common::setup().await;
    harness.create_super_admin("root", "root-password").await;

    let result = harness
        .credentials
        .verify_credentials("root", "wrong-password")
        .await;

    assert!(matches!(
        result,
        Err(InternalError::Credential(CredentialError::InvalidCredentials))
    ));
}

#[tokio::test]
async fn test_duplicate_username_is_rejected() {
    let harness = common::setup().await;
    harness.create_super_admin("root", "root-password").await;

    let result = harness
        .credentials
        .create_admin(club_admin_backend::stores::NewAdmin {
            username: "root".to_string(),
            password: "other-password".to_string(),
            role: club_admin_backend::types::internal::AdminRole::Moderator,
            is_super_admin: false,
            permissions: PermissionMatrix::new(),
        })
        .await;

    assert!(matches!(
        result,
        Err(InternalError::Credential(CredentialError::DuplicateUsername(_)))
    ));
}

#[tokio::test]
async fn test_issued_token_verifies_and_tampered_token_does_not() {
    let harness = common::setup().await;
    let moderator = harness
        .create_moderator(
            "mina",
            "mina-password",
            PermissionMatrix::new().grant(Module::Members, Action::Create),
        )
        .await;

    let token = harness.tokens.issue(&moderator, None).unwrap();
    let decoded = harness.tokens.verify(&token).unwrap();
    assert_eq!(decoded.id, moderator.id);

    let mut tampered = token.clone();
    tampered.push('x');
    assert_eq!(harness.tokens.verify(&tampered), Err(TokenError::Malformed));
}

#[tokio::test]
async fn test_stale_token_stops_authorizing_after_deactivation() {
    let harness = common::setup().await;
    let moderator = harness
        .create_moderator(
            "mina",
            "mina-password",
            PermissionMatrix::new().grant(Module::Members, Action::Create),
        )
        .await;

    // T0: token issued while the account is active
    let token = harness.tokens.issue(&moderator, None).unwrap();
    let identity = harness.tokens.verify(&token).unwrap();

    let before = harness
        .engine
        .authorize(&identity, Module::Members, Action::Create)
        .await
        .unwrap();
    assert_eq!(before, AccessDecision::Allow);

    // T1: the account is deactivated
    harness
        .credentials
        .set_active(&moderator.id, false)
        .await
        .unwrap();

    // T2: verification still succeeds - the token itself is intact - but
    // authorization re-reads the current active flag and denies
    let identity = harness.tokens.verify(&token).unwrap();
    let after = harness
        .engine
        .authorize(&identity, Module::Members, Action::Create)
        .await
        .unwrap();
    assert_eq!(after, AccessDecision::Deny("account deactivated".to_string()));
}

#[tokio::test]
async fn test_permission_change_does_not_revoke_outstanding_token() {
    let harness = common::setup().await;
    let moderator = harness
        .create_moderator(
            "mina",
            "mina-password",
            PermissionMatrix::new().grant(Module::Members, Action::Create),
        )
        .await;

    let token = harness.tokens.issue(&moderator, None).unwrap();

    // The matrix is revoked after issuance
    harness
        .credentials
        .set_permissions(&moderator.id, &PermissionMatrix::new())
        .await
        .unwrap();

    // The embedded snapshot stays authoritative for the token's lifetime -
    // this staleness window is a documented property of the design
    let identity = harness.tokens.verify(&token).unwrap();
    let decision = harness
        .engine
        .authorize(&identity, Module::Members, Action::Create)
        .await
        .unwrap();
    assert_eq!(decision, AccessDecision::Allow);
}

#[tokio::test]
async fn test_fresh_login_after_permission_change_sees_new_matrix() {
    let harness = common::setup().await;
    let moderator = harness
        .create_moderator(
            "mina",
            "mina-password",
            PermissionMatrix::new().grant(Module::Members, Action::Create),
        )
        .await;

    harness
        .credentials
        .set_permissions(&moderator.id, &PermissionMatrix::new())
        .await
        .unwrap();

    // Re-authentication is the only path to a new snapshot
    let record = harness
        .credentials
        .verify_credentials("mina", "mina-password")
        .await
        .unwrap();
    let identity = Identity::from_record(&record);

    let decision = harness
        .engine
        .authorize(&identity, Module::Members, Action::Create)
        .await
        .unwrap();
    assert!(matches!(decision, AccessDecision::Deny(_)));
}
