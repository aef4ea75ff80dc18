use std::env;
use thiserror::Error;

/// Default lifetime of a login token, in minutes
const DEFAULT_TOKEN_TTL_MINUTES: i64 = 720;

/// Lifetime of a super-admin elevation token, in minutes
const DEFAULT_ELEVATED_TTL_MINUTES: i64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Required environment variable {0} is not set")]
    MissingVar(String),

    #[error("Environment variable {name} has invalid value: {message}")]
    InvalidVar { name: String, message: String },
}

/// Authentication configuration, read from the environment once at startup
///
/// The signing secret and pepper are carried in this object and injected
/// into the services that need them; nothing below the composition root
/// reads the process environment.
#[derive(Clone)]
pub struct AuthConfig {
    /// Secret used to sign and verify bearer tokens
    pub jwt_secret: String,

    /// Lifetime of a login token, in minutes
    pub token_ttl_minutes: i64,

    /// Lifetime of a super-admin elevation token, in minutes
    pub elevated_ttl_minutes: i64,

    /// Server-side secret mixed into password hashing
    pub password_pepper: String,
}

impl AuthConfig {
    /// Load authentication configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| ConfigError::MissingVar("JWT_SECRET".to_string()))?;

        let password_pepper = env::var("PASSWORD_PEPPER")
            .map_err(|_| ConfigError::MissingVar("PASSWORD_PEPPER".to_string()))?;

        let token_ttl_minutes = parse_minutes("ADMIN_TOKEN_TTL_MINUTES", DEFAULT_TOKEN_TTL_MINUTES)?;
        let elevated_ttl_minutes =
            parse_minutes("ELEVATED_TOKEN_TTL_MINUTES", DEFAULT_ELEVATED_TTL_MINUTES)?;

        Ok(Self {
            jwt_secret,
            token_ttl_minutes,
            elevated_ttl_minutes,
            password_pepper,
        })
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_minutes", &self.token_ttl_minutes)
            .field("elevated_ttl_minutes", &self.elevated_ttl_minutes)
            .field("password_pepper", &"<redacted>")
            .finish()
    }
}

fn parse_minutes(name: &str, default: i64) -> Result<i64, ConfigError> {
    match env::var(name) {
        Err(_) => Ok(default),
        Ok(raw) => {
            let minutes: i64 = raw.parse().map_err(|_| ConfigError::InvalidVar {
                name: name.to_string(),
                message: format!("expected an integer number of minutes, got {:?}", raw),
            })?;
            if minutes <= 0 {
                return Err(ConfigError::InvalidVar {
                    name: name.to_string(),
                    message: "must be positive".to_string(),
                });
            }
            Ok(minutes)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_does_not_expose_secrets() {
        let config = AuthConfig {
            jwt_secret: "super-secret-signing-key".to_string(),
            token_ttl_minutes: 720,
            elevated_ttl_minutes: 30,
            password_pepper: "super-secret-pepper".to_string(),
        };

        let debug_output = format!("{:?}", config);
        assert!(!debug_output.contains("super-secret-signing-key"));
        assert!(!debug_output.contains("super-secret-pepper"));
        assert!(debug_output.contains("<redacted>"));
    }
}
