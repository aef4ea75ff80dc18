use crate::config::AuthConfig;
use crate::errors::internal::TokenError;
use crate::errors::InternalError;
use crate::types::internal::{AdminRole, Claims, Identity, PermissionMatrix};
use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::fmt;

/// Issues and verifies signed bearer tokens carrying an identity snapshot
///
/// The embedded permission matrix stays authoritative for the token's
/// lifetime; a later permission change does not revoke an outstanding token.
/// There is no refresh or rotation mechanism - re-authentication is the only
/// path to a new token.
pub struct TokenService {
    jwt_secret: String,
    token_ttl_minutes: i64,
    elevated_ttl_minutes: i64,
}

impl TokenService {
    /// Create a new TokenService from the injected auth configuration
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            jwt_secret: config.jwt_secret.clone(),
            token_ttl_minutes: config.token_ttl_minutes,
            elevated_ttl_minutes: config.elevated_ttl_minutes,
        }
    }

    /// Issue a token for the given identity
    ///
    /// # Arguments
    /// * `identity` - The identity snapshot to embed
    /// * `ttl_minutes` - Optional lifetime override; defaults to the
    ///   configured login-token TTL
    pub fn issue(&self, identity: &Identity, ttl_minutes: Option<i64>) -> Result<String, InternalError> {
        let ttl_minutes = ttl_minutes.unwrap_or(self.token_ttl_minutes);
        let now = Utc::now().timestamp();

        let claims = Claims {
            sub: identity.id.clone(),
            username: identity.username.clone(),
            role: identity.role.as_str().to_string(),
            is_super_admin: identity.is_super_admin,
            is_active: identity.is_active,
            permissions: identity
                .permissions
                .as_ref()
                .map(|m| m.to_value())
                .unwrap_or(serde_json::Value::Null),
            iat: now,
            exp: now + ttl_minutes * 60,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| InternalError::crypto("sign_token", e))
    }

    /// Issue the short-lived elevation token with super-admin asserted
    pub fn issue_elevated(&self, identity: &Identity) -> Result<String, InternalError> {
        let mut elevated = identity.clone();
        elevated.is_super_admin = true;
        self.issue(&elevated, Some(self.elevated_ttl_minutes))
    }

    /// Verify a token and return the decoded, normalized identity
    ///
    /// Fails with `Expired` past the embedded expiry and `Malformed` for
    /// anything with a bad signature or structure. On success the permission
    /// snapshot is normalized to a typed matrix (tolerating the
    /// string-encoded form) and the super-admin flag is normalized from role
    /// and flag together.
    pub fn verify(&self, token: &str) -> Result<Identity, TokenError> {
        let validation = Validation::new(Algorithm::HS256);

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Malformed,
        })?;

        Ok(Self::identity_from_claims(token_data.claims))
    }

    fn identity_from_claims(claims: Claims) -> Identity {
        let role = AdminRole::parse_or_moderator(&claims.role);

        let permissions = match PermissionMatrix::from_value(&claims.permissions) {
            Ok(matrix) => Some(matrix),
            Err(e) => {
                tracing::warn!(
                    admin_id = %claims.sub,
                    error = %e,
                    "embedded permission matrix failed to parse"
                );
                None
            }
        };

        Identity {
            id: claims.sub,
            username: claims.username,
            role,
            is_super_admin: Identity::normalize_super_admin(role, claims.is_super_admin),
            is_active: claims.is_active,
            permissions,
        }
    }

    /// Configured lifetime of a login token, in seconds
    pub fn token_ttl_seconds(&self) -> i64 {
        self.token_ttl_minutes * 60
    }

    /// Configured lifetime of an elevation token, in seconds
    pub fn elevated_ttl_seconds(&self) -> i64 {
        self.elevated_ttl_minutes * 60
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_minutes", &self.token_ttl_minutes)
            .field("elevated_ttl_minutes", &self.elevated_ttl_minutes)
            .finish()
    }
}
