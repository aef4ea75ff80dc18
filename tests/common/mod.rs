// Common test utilities for integration tests

use club_admin_backend::config::AuthConfig;
use club_admin_backend::content::HandlerRegistry;
use club_admin_backend::services::{ApprovalService, AuditLogger, PermissionEngine, TokenService};
use club_admin_backend::stores::{
    ApprovalStore, AuditStore, CredentialStore, NewAdmin, SettingStore,
};
use club_admin_backend::types::internal::{AdminRole, Identity, PermissionMatrix};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::sync::Arc;

/// Fully wired service graph over an in-memory database
pub struct TestHarness {
    pub db: DatabaseConnection,
    pub credentials: Arc<CredentialStore>,
    pub approvals: Arc<ApprovalStore>,
    pub audit_store: Arc<AuditStore>,
    pub settings: Arc<SettingStore>,
    pub tokens: Arc<TokenService>,
    pub audit: Arc<AuditLogger>,
    pub engine: Arc<PermissionEngine>,
    pub registry: Arc<HandlerRegistry>,
    pub approval_service: Arc<ApprovalService>,
}

pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: "test-secret-key-minimum-32-characters-long".to_string(),
        token_ttl_minutes: 720,
        elevated_ttl_minutes: 30,
        password_pepper: "test-pepper-for-integration".to_string(),
    }
}

/// Creates a test database with migrations applied
///
/// A single pooled connection keeps racing transactions deterministic:
/// whoever checks the connection out first commits first.
pub async fn setup_test_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:".to_string());
    options.max_connections(1);

    let db = Database::connect(options)
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Build the full service graph the way main() wires it
pub async fn setup() -> TestHarness {
    let db = setup_test_db().await;
    let config = test_auth_config();

    let credentials = Arc::new(CredentialStore::new(
        db.clone(),
        config.password_pepper.clone(),
    ));
    let approvals = Arc::new(ApprovalStore::new(db.clone()));
    let audit_store = Arc::new(AuditStore::new(db.clone()));
    let settings = Arc::new(SettingStore::new(db.clone()));

    let tokens = Arc::new(TokenService::new(&config));
    let audit = Arc::new(AuditLogger::new(audit_store.clone()));
    let engine = Arc::new(PermissionEngine::new(credentials.clone(), settings.clone()));
    let registry = Arc::new(HandlerRegistry::with_all_modules());
    let approval_service = Arc::new(ApprovalService::new(
        db.clone(),
        approvals.clone(),
        audit_store.clone(),
        registry.clone(),
    ));

    TestHarness {
        db,
        credentials,
        approvals,
        audit_store,
        settings,
        tokens,
        audit,
        engine,
        registry,
        approval_service,
    }
}

impl TestHarness {
    /// Create a super-admin account and return its identity
    pub async fn create_super_admin(&self, username: &str, password: &str) -> Identity {
        let record = self
            .credentials
            .create_admin(NewAdmin {
                username: username.to_string(),
                password: password.to_string(),
                role: AdminRole::SuperAdmin,
                is_super_admin: true,
                permissions: PermissionMatrix::new(),
            })
            .await
            .expect("Failed to create super-admin");

        Identity::from_record(&record)
    }

    /// Create a moderator account with the given matrix and return its
    /// identity
    pub async fn create_moderator(
        &self,
        username: &str,
        password: &str,
        permissions: PermissionMatrix,
    ) -> Identity {
        let record = self
            .credentials
            .create_admin(NewAdmin {
                username: username.to_string(),
                password: password.to_string(),
                role: AdminRole::Moderator,
                is_super_admin: false,
                permissions,
            })
            .await
            .expect("Failed to create moderator");

        Identity::from_record(&record)
    }
}
