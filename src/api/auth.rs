use crate::api::{Api, BearerAuth};
use crate::errors::api::auth::AuthError;
use crate::services::{AuditLogger, TokenService};
use crate::stores::CredentialStore;
use crate::types::dto::auth::{
    AdminIdentityView, ElevationRequest, ElevationResponse, LoginRequest, LoginResponse,
};
use crate::types::internal::{AuditAction, Identity, NewAuditEntry};
use poem::Request;
use poem_openapi::{payload::Json, OpenApi, Tags};
use serde_json::json;
use std::sync::Arc;

/// Authentication API endpoints
pub struct AuthApi {
    credentials: Arc<CredentialStore>,
    tokens: Arc<TokenService>,
    audit: Arc<AuditLogger>,
}

impl AuthApi {
    /// Create a new AuthApi with its collaborators
    pub fn new(
        credentials: Arc<CredentialStore>,
        tokens: Arc<TokenService>,
        audit: Arc<AuditLogger>,
    ) -> Self {
        Self {
            credentials,
            tokens,
            audit,
        }
    }
}

/// API tags for authentication endpoints
#[derive(Tags)]
enum AuthTags {
    /// Authentication endpoints
    Authentication,
}

impl Api for AuthApi {}

#[OpenApi(prefix_path = "/auth")]
impl AuthApi {
    /// Login with username and password to receive a bearer token
    #[oai(path = "/login", method = "post", tag = "AuthTags::Authentication")]
    async fn login(
        &self,
        req: &Request,
        body: Json<LoginRequest>,
    ) -> Result<Json<LoginResponse>, AuthError> {
        let meta = self.request_meta(req);

        let record = match self
            .credentials
            .verify_credentials(&body.username, &body.password)
            .await
        {
            Ok(record) => record,
            Err(e) => {
                self.audit
                    .record(
                        NewAuditEntry::new("unknown", body.username.clone(), AuditAction::LoginFailure)
                            .details(json!({"username": body.username}))
                            .meta(&meta)
                            .failure(),
                    )
                    .await;
                return Err(AuthError::from_internal_error(e));
            }
        };

        let identity = Identity::from_record(&record);

        // Deactivated accounts are refused at the door; a token issued here
        // would be denied on every use anyway
        if !identity.is_active && !identity.is_super_admin {
            self.audit
                .record(
                    NewAuditEntry::new(
                        identity.id.clone(),
                        identity.username.clone(),
                        AuditAction::LoginFailure,
                    )
                    .details(json!({"reason": "account_deactivated"}))
                    .meta(&meta)
                    .failure(),
                )
                .await;
            return Err(AuthError::account_deactivated());
        }

        let token = self
            .tokens
            .issue(&identity, None)
            .map_err(AuthError::from_internal_error)?;

        self.audit
            .record(
                NewAuditEntry::new(
                    identity.id.clone(),
                    identity.username.clone(),
                    AuditAction::LoginSuccess,
                )
                .meta(&meta),
            )
            .await;

        Ok(Json(LoginResponse {
            token,
            expires_in: self.tokens.token_ttl_seconds(),
            identity: AdminIdentityView::from_identity(&identity),
        }))
    }

    /// Re-check the password and issue a short-lived elevated token
    ///
    /// Requires an already-valid token. The caller's stored record must be
    /// super-admin; the elevated token carries the flag asserted.
    #[oai(path = "/verify-superadmin", method = "post", tag = "AuthTags::Authentication")]
    async fn verify_superadmin(
        &self,
        req: &Request,
        auth: BearerAuth,
        body: Json<ElevationRequest>,
    ) -> Result<Json<ElevationResponse>, AuthError> {
        let meta = self.request_meta(req);
        let caller = self.tokens.verify(&auth.0.token)?;

        let record = self
            .credentials
            .find_by_id(&caller.id)
            .await
            .map_err(AuthError::from_internal_error)?
            .ok_or_else(AuthError::invalid_credentials)?;

        if let Err(e) = self.credentials.verify_password(&record, &body.password) {
            self.audit
                .record(
                    NewAuditEntry::new(
                        caller.id.clone(),
                        caller.username.clone(),
                        AuditAction::SuperAdminElevation,
                    )
                    .details(json!({"reason": "password_mismatch"}))
                    .meta(&meta)
                    .failure(),
                )
                .await;
            return Err(AuthError::from_internal_error(e));
        }

        let identity = Identity::from_record(&record);
        if !identity.is_super_admin {
            self.audit
                .record(
                    NewAuditEntry::new(
                        identity.id.clone(),
                        identity.username.clone(),
                        AuditAction::SuperAdminElevation,
                    )
                    .details(json!({"reason": "not_super_admin"}))
                    .meta(&meta)
                    .failure(),
                )
                .await;
            return Err(AuthError::forbidden("Super-admin privileges required"));
        }

        let token = self
            .tokens
            .issue_elevated(&identity)
            .map_err(AuthError::from_internal_error)?;

        self.audit
            .record(
                NewAuditEntry::new(
                    identity.id.clone(),
                    identity.username.clone(),
                    AuditAction::SuperAdminElevation,
                )
                .meta(&meta),
            )
            .await;

        Ok(Json(ElevationResponse {
            token,
            expires_in: self.tokens.elevated_ttl_seconds(),
        }))
    }

    /// Decode the presented token and return its identity snapshot
    #[oai(path = "/whoami", method = "get", tag = "AuthTags::Authentication")]
    async fn whoami(&self, auth: BearerAuth) -> Result<Json<AdminIdentityView>, AuthError> {
        let identity = self.tokens.verify(&auth.0.token)?;
        Ok(Json(AdminIdentityView::from_identity(&identity)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;
    use crate::stores::{AuditStore, NewAdmin};
    use crate::types::internal::{AdminRole, PermissionMatrix};
    use migration::{Migrator, MigratorTrait};
    use poem_openapi::auth::Bearer;
    use sea_orm::Database;

    fn test_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret-key-minimum-32-characters-long".to_string(),
            token_ttl_minutes: 720,
            elevated_ttl_minutes: 30,
            password_pepper: "test-pepper-for-api-tests".to_string(),
        }
    }

    async fn setup_api() -> (AuthApi, Arc<CredentialStore>, Arc<TokenService>) {
        // Create in-memory SQLite database for testing
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");

        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        let config = test_config();
        let credentials = Arc::new(CredentialStore::new(
            db.clone(),
            config.password_pepper.clone(),
        ));
        let tokens = Arc::new(TokenService::new(&config));
        let audit = Arc::new(AuditLogger::new(Arc::new(AuditStore::new(db))));

        let api = AuthApi::new(credentials.clone(), tokens.clone(), audit);
        (api, credentials, tokens)
    }

    async fn add_admin(
        credentials: &CredentialStore,
        username: &str,
        password: &str,
        role: AdminRole,
        is_super_admin: bool,
    ) -> String {
        credentials
            .create_admin(NewAdmin {
                username: username.to_string(),
                password: password.to_string(),
                role,
                is_super_admin,
                permissions: PermissionMatrix::new(),
            })
            .await
            .expect("Failed to create admin")
            .id
    }

    fn empty_request() -> Request {
        Request::builder().finish()
    }

    #[tokio::test]
    async fn test_login_with_valid_credentials_returns_token_and_identity() {
        let (api, credentials, tokens) = setup_api().await;
        add_admin(&credentials, "root", "root-password", AdminRole::SuperAdmin, true).await;

        let result = api
            .login(
                &empty_request(),
                Json(LoginRequest {
                    username: "root".to_string(),
                    password: "root-password".to_string(),
                }),
            )
            .await;

        assert!(result.is_ok());
        let response = result.unwrap();
        assert_eq!(response.identity.username, "root");
        assert!(response.identity.is_super_admin);
        assert_eq!(response.expires_in, 720 * 60);

        // The returned token verifies and carries the identity
        let decoded = tokens.verify(&response.token).unwrap();
        assert_eq!(decoded.username, "root");
        assert!(decoded.is_super_admin);
    }

    #[tokio::test]
    async fn test_login_with_invalid_credentials_returns_401() {
        let (api, credentials, _tokens) = setup_api().await;
        add_admin(&credentials, "root", "root-password", AdminRole::SuperAdmin, true).await;

        let result = api
            .login(
                &empty_request(),
                Json(LoginRequest {
                    username: "root".to_string(),
                    password: "wrong-password".to_string(),
                }),
            )
            .await;

        match result {
            Err(AuthError::InvalidCredentials(_)) => {}
            other => panic!("Expected InvalidCredentials, got {:?}", other.err()),
        }
    }

    #[tokio::test]
    async fn test_login_of_unknown_user_returns_401() {
        let (api, _credentials, _tokens) = setup_api().await;

        let result = api
            .login(
                &empty_request(),
                Json(LoginRequest {
                    username: "nobody".to_string(),
                    password: "whatever".to_string(),
                }),
            )
            .await;

        match result {
            Err(AuthError::InvalidCredentials(_)) => {}
            other => panic!("Expected InvalidCredentials, got {:?}", other.err()),
        }
    }

    #[tokio::test]
    async fn test_login_of_deactivated_moderator_is_refused() {
        let (api, credentials, _tokens) = setup_api().await;
        let id = add_admin(&credentials, "mina", "mina-password", AdminRole::Moderator, false).await;
        credentials.set_active(&id, false).await.unwrap();

        let result = api
            .login(
                &empty_request(),
                Json(LoginRequest {
                    username: "mina".to_string(),
                    password: "mina-password".to_string(),
                }),
            )
            .await;

        match result {
            Err(AuthError::AccountDeactivated(_)) => {}
            other => panic!("Expected AccountDeactivated, got {:?}", other.err()),
        }
    }

    #[tokio::test]
    async fn test_whoami_returns_the_token_identity() {
        let (api, credentials, tokens) = setup_api().await;
        let id = add_admin(&credentials, "mina", "mina-password", AdminRole::Moderator, false).await;

        let record = credentials.find_by_id(&id).await.unwrap().unwrap();
        let token = tokens.issue(&Identity::from_record(&record), None).unwrap();

        let view = api.whoami(BearerAuth(Bearer { token })).await.unwrap();
        assert_eq!(view.username, "mina");
        assert!(!view.is_super_admin);
    }

    #[tokio::test]
    async fn test_whoami_with_garbage_token_returns_401() {
        let (api, _credentials, _tokens) = setup_api().await;

        let result = api
            .whoami(BearerAuth(Bearer {
                token: "not-a-token".to_string(),
            }))
            .await;

        match result {
            Err(AuthError::InvalidToken(_)) => {}
            other => panic!("Expected InvalidToken, got {:?}", other.err()),
        }
    }

    #[tokio::test]
    async fn test_elevation_issues_short_lived_super_admin_token() {
        let (api, credentials, tokens) = setup_api().await;
        let id = add_admin(&credentials, "root", "root-password", AdminRole::SuperAdmin, true).await;

        let record = credentials.find_by_id(&id).await.unwrap().unwrap();
        let token = tokens.issue(&Identity::from_record(&record), None).unwrap();

        let response = api
            .verify_superadmin(
                &empty_request(),
                BearerAuth(Bearer { token }),
                Json(ElevationRequest {
                    password: "root-password".to_string(),
                }),
            )
            .await
            .unwrap();

        assert_eq!(response.expires_in, 30 * 60);
        let decoded = tokens.verify(&response.token).unwrap();
        assert!(decoded.is_super_admin);
    }

    #[tokio::test]
    async fn test_elevation_with_wrong_password_returns_401() {
        let (api, credentials, tokens) = setup_api().await;
        let id = add_admin(&credentials, "root", "root-password", AdminRole::SuperAdmin, true).await;

        let record = credentials.find_by_id(&id).await.unwrap().unwrap();
        let token = tokens.issue(&Identity::from_record(&record), None).unwrap();

        let result = api
            .verify_superadmin(
                &empty_request(),
                BearerAuth(Bearer { token }),
                Json(ElevationRequest {
                    password: "guessed-wrong".to_string(),
                }),
            )
            .await;

        match result {
            Err(AuthError::InvalidCredentials(_)) => {}
            other => panic!("Expected InvalidCredentials, got {:?}", other.err()),
        }
    }

    #[tokio::test]
    async fn test_elevation_of_non_super_admin_is_forbidden() {
        let (api, credentials, tokens) = setup_api().await;
        let id = add_admin(&credentials, "mina", "mina-password", AdminRole::Moderator, false).await;

        let record = credentials.find_by_id(&id).await.unwrap().unwrap();
        let token = tokens.issue(&Identity::from_record(&record), None).unwrap();

        let result = api
            .verify_superadmin(
                &empty_request(),
                BearerAuth(Bearer { token }),
                Json(ElevationRequest {
                    password: "mina-password".to_string(),
                }),
            )
            .await;

        match result {
            Err(AuthError::Forbidden(_)) => {}
            other => panic!("Expected Forbidden, got {:?}", other.err()),
        }
    }
}
