use crate::errors::internal::{
    ApprovalError, ContentError, CredentialError, InternalError, TokenError,
};
use poem_openapi::{payload::Json, ApiResponse, Object};
use std::fmt;

/// Standardized error response for admin endpoints
#[derive(Object, Debug)]
pub struct AdminErrorResponse {
    /// Error code identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code
    pub status_code: u16,
}

/// Error types for guarded admin operations
#[derive(ApiResponse, Debug)]
pub enum AdminError {
    /// Invalid or malformed bearer token
    #[oai(status = 401)]
    InvalidToken(Json<AdminErrorResponse>),

    /// Bearer token has expired
    #[oai(status = 401)]
    ExpiredToken(Json<AdminErrorResponse>),

    /// Permission engine denied the operation, or a super-admin route was
    /// hit without super-admin privileges
    #[oai(status = 403)]
    Forbidden(Json<AdminErrorResponse>),

    /// Request payload failed validation
    #[oai(status = 400)]
    Validation(Json<AdminErrorResponse>),

    /// Target record does not exist
    #[oai(status = 404)]
    NotFound(Json<AdminErrorResponse>),

    /// Approval was already resolved by another reviewer
    #[oai(status = 409)]
    AlreadyProcessed(Json<AdminErrorResponse>),

    /// Approval replay has no handler for this module/action
    #[oai(status = 500)]
    UnsupportedAction(Json<AdminErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<AdminErrorResponse>),
}

impl AdminError {
    /// Create an InvalidToken error
    pub fn invalid_token() -> Self {
        AdminError::InvalidToken(Json(AdminErrorResponse {
            error: "invalid_token".to_string(),
            message: "Invalid or malformed bearer token".to_string(),
            status_code: 401,
        }))
    }

    /// Create an ExpiredToken error
    pub fn expired_token() -> Self {
        AdminError::ExpiredToken(Json(AdminErrorResponse {
            error: "expired_token".to_string(),
            message: "Bearer token has expired".to_string(),
            status_code: 401,
        }))
    }

    /// Create a Forbidden error
    pub fn forbidden(message: impl Into<String>) -> Self {
        AdminError::Forbidden(Json(AdminErrorResponse {
            error: "forbidden".to_string(),
            message: message.into(),
            status_code: 403,
        }))
    }

    /// Create a Forbidden error for super-admin-only routes
    pub fn super_admin_required() -> Self {
        Self::forbidden("Super-admin privileges required")
    }

    /// Create a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        AdminError::Validation(Json(AdminErrorResponse {
            error: "validation_error".to_string(),
            message: message.into(),
            status_code: 400,
        }))
    }

    /// Create a NotFound error
    pub fn not_found(message: impl Into<String>) -> Self {
        AdminError::NotFound(Json(AdminErrorResponse {
            error: "not_found".to_string(),
            message: message.into(),
            status_code: 404,
        }))
    }

    /// Create an AlreadyProcessed error
    pub fn already_processed() -> Self {
        AdminError::AlreadyProcessed(Json(AdminErrorResponse {
            error: "already_processed".to_string(),
            message: "This approval has already been processed".to_string(),
            status_code: 409,
        }))
    }

    /// Create an UnsupportedAction error
    pub fn unsupported_action() -> Self {
        AdminError::UnsupportedAction(Json(AdminErrorResponse {
            error: "unsupported_approval_action".to_string(),
            message: "The approval cannot be executed by this server".to_string(),
            status_code: 500,
        }))
    }

    /// Convert InternalError to AdminError
    ///
    /// This is the explicit conversion point from internal errors to API
    /// errors. Internal error details are logged but not exposed to clients.
    pub fn from_internal_error(err: InternalError) -> Self {
        match &err {
            InternalError::Approval(ApprovalError::NotFound { id }) => {
                tracing::debug!(approval_id = id, "approval not found");
                Self::not_found("Approval not found")
            }
            InternalError::Approval(ApprovalError::AlreadyProcessed { id }) => {
                tracing::debug!(approval_id = id, "approval already processed");
                Self::already_processed()
            }
            InternalError::Approval(ApprovalError::MissingTargetId { .. }) => {
                tracing::debug!("approval submission without target id");
                Self::validation(err.to_string())
            }
            InternalError::Approval(ApprovalError::NotesTooShort { .. }) => {
                Self::validation(err.to_string())
            }
            InternalError::Approval(ApprovalError::UnsupportedAction { module, action }) => {
                // Server defect: an approval exists that the replay path
                // cannot execute. Loud log, generic 500 body.
                tracing::error!(
                    module = module.as_str(),
                    action = action.as_str(),
                    "approval replay dispatch miss"
                );
                Self::unsupported_action()
            }
            InternalError::Content(ContentError::InvalidPayload { .. }) => {
                Self::validation(err.to_string())
            }
            InternalError::Content(ContentError::NotFound { .. }) => {
                Self::not_found(err.to_string())
            }
            InternalError::Credential(CredentialError::UnknownAdmin { .. }) => {
                Self::not_found("Admin not found")
            }
            InternalError::Credential(CredentialError::DuplicateUsername(username)) => {
                tracing::warn!(username = username.as_str(), "duplicate username attempt");
                Self::validation("Username already exists")
            }
            InternalError::Credential(CredentialError::MalformedMatrix { .. }) => {
                Self::validation(err.to_string())
            }
            _ => {
                tracing::error!("unexpected error in admin operation: {}", err);
                Self::internal_server_error()
            }
        }
    }

    /// Create a generic internal server error
    fn internal_server_error() -> Self {
        AdminError::InternalError(Json(AdminErrorResponse {
            error: "internal_error".to_string(),
            message: "An internal error occurred".to_string(),
            status_code: 500,
        }))
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        match self {
            AdminError::InvalidToken(json) => json.0.message.clone(),
            AdminError::ExpiredToken(json) => json.0.message.clone(),
            AdminError::Forbidden(json) => json.0.message.clone(),
            AdminError::Validation(json) => json.0.message.clone(),
            AdminError::NotFound(json) => json.0.message.clone(),
            AdminError::AlreadyProcessed(json) => json.0.message.clone(),
            AdminError::UnsupportedAction(json) => json.0.message.clone(),
            AdminError::InternalError(json) => json.0.message.clone(),
        }
    }
}

impl From<TokenError> for AdminError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => Self::expired_token(),
            TokenError::Malformed => Self::invalid_token(),
        }
    }
}

impl fmt::Display for AdminError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
