use club_admin_backend::api::{
    AdminsApi, ApprovalsApi, AuditApi, AuthApi, ContentApi, HealthApi, SettingsApi,
};
use club_admin_backend::config::{self, AuthConfig};
use club_admin_backend::content::HandlerRegistry;
use club_admin_backend::services::{
    crypto, ApprovalService, AuditLogger, PermissionEngine, TokenService,
};
use club_admin_backend::stores::{
    ApprovalStore, AuditStore, CredentialStore, NewAdmin, SettingStore,
};
use club_admin_backend::types::internal::{AdminRole, PermissionMatrix};
use poem::{listener::TcpListener, Route, Server};
use poem_openapi::OpenApiService;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    config::init_logging().expect("Failed to initialize logging");

    let auth_config = AuthConfig::from_env().expect("Invalid auth configuration");

    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://club_admin.db?mode=rwc".to_string());

    let db = config::init_database(&database_url)
        .await
        .expect("Failed to connect to database");

    config::run_migrations(&db)
        .await
        .expect("Failed to run migrations");

    // Stores
    let credentials = Arc::new(CredentialStore::new(
        db.clone(),
        auth_config.password_pepper.clone(),
    ));
    let approvals = Arc::new(ApprovalStore::new(db.clone()));
    let audit_store = Arc::new(AuditStore::new(db.clone()));
    let settings = Arc::new(SettingStore::new(db.clone()));

    // Services
    let tokens = Arc::new(TokenService::new(&auth_config));
    let audit = Arc::new(AuditLogger::new(audit_store.clone()));
    let engine = Arc::new(PermissionEngine::new(credentials.clone(), settings.clone()));
    let registry = Arc::new(HandlerRegistry::with_all_modules());
    let approval_service = Arc::new(ApprovalService::new(
        db.clone(),
        approvals.clone(),
        audit_store.clone(),
        registry.clone(),
    ));

    seed_super_admin(&credentials).await;

    let api_service = OpenApiService::new(
        (
            AuthApi::new(credentials.clone(), tokens.clone(), audit.clone()),
            ContentApi::new(
                db.clone(),
                tokens.clone(),
                engine.clone(),
                approval_service.clone(),
                registry.clone(),
                audit.clone(),
            ),
            ApprovalsApi::new(tokens.clone(), approval_service.clone()),
            AuditApi::new(tokens.clone(), audit_store.clone()),
            AdminsApi::new(tokens.clone(), credentials.clone(), audit.clone()),
            SettingsApi::new(tokens.clone(), settings.clone(), audit.clone()),
            HealthApi,
        ),
        "Club Admin Backend",
        "0.1.0",
    )
    .server("http://localhost:3000/api");

    let ui = api_service.swagger_ui();

    let app = Route::new()
        .nest("/api", api_service)
        .nest("/swagger", ui);

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    tracing::info!("listening on {}", bind_addr);

    Server::new(TcpListener::bind(bind_addr)).run(app).await
}

/// Seed the bootstrap super-admin when none exists
///
/// Username and password come from BOOTSTRAP_ADMIN_USERNAME /
/// BOOTSTRAP_ADMIN_PASSWORD; without a configured password a generated one
/// is logged exactly once.
async fn seed_super_admin(credentials: &Arc<CredentialStore>) {
    match credentials.super_admin_exists().await {
        Ok(true) => return,
        Ok(false) => {}
        Err(e) => {
            tracing::error!(error = %e, "could not check for an existing super-admin");
            return;
        }
    }

    let username = std::env::var("BOOTSTRAP_ADMIN_USERNAME")
        .unwrap_or_else(|_| "superadmin".to_string());
    let (password, generated) = match std::env::var("BOOTSTRAP_ADMIN_PASSWORD") {
        Ok(password) => (password, false),
        Err(_) => (crypto::generate_secure_password(), true),
    };

    match credentials
        .create_admin(NewAdmin {
            username,
            password: password.clone(),
            role: AdminRole::SuperAdmin,
            is_super_admin: true,
            permissions: PermissionMatrix::new(),
        })
        .await
    {
        Ok(record) => {
            if generated {
                tracing::info!(
                    username = %record.username,
                    password = %password,
                    "seeded bootstrap super-admin with a generated password; change it after first login"
                );
            } else {
                tracing::info!(username = %record.username, "seeded bootstrap super-admin");
            }
        }
        Err(e) => tracing::error!(error = %e, "failed to seed bootstrap super-admin"),
    }
}
