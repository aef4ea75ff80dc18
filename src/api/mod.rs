// API layer - HTTP endpoints
pub mod admins;
pub mod approvals;
pub mod audit;
pub mod auth;
pub mod content;
pub mod health;
pub mod settings;

pub use admins::AdminsApi;
pub use approvals::ApprovalsApi;
pub use audit::AuditApi;
pub use auth::AuthApi;
pub use content::ContentApi;
pub use health::HealthApi;
pub use settings::SettingsApi;

use crate::errors::AdminError;
use crate::types::internal::{Identity, RequestMeta};
use poem::Request;
use poem_openapi::auth::Bearer;
use poem_openapi::SecurityScheme;

/// JWT Bearer token authentication
#[derive(SecurityScheme)]
#[oai(
    ty = "bearer",
    key_name = "Authorization",
    key_in = "header",
    bearer_format = "JWT"
)]
pub struct BearerAuth(pub Bearer);

/// Request-metadata extraction shared by the API groups
pub trait Api {
    fn request_meta(&self, req: &Request) -> RequestMeta {
        RequestMeta {
            ip_address: extract_ip_address(req),
            user_agent: req
                .header("User-Agent")
                .map(|ua| ua.to_string()),
        }
    }
}

/// Best-effort client IP extraction
pub fn extract_ip_address(req: &Request) -> Option<String> {
    // Check X-Forwarded-For header (proxy/load balancer)
    if let Some(forwarded) = req.header("X-Forwarded-For") {
        if let Some(ip) = forwarded.split(',').next() {
            let ip = ip.trim();
            if !ip.is_empty() {
                return Some(ip.to_string());
            }
        }
    }

    // Check X-Real-IP header (nginx)
    if let Some(real_ip) = req.header("X-Real-IP") {
        return Some(real_ip.to_string());
    }

    // Fall back to remote address
    req.remote_addr()
        .as_socket_addr()
        .map(|addr| addr.ip().to_string())
}

/// Guard for super-admin-only routes
pub fn require_super_admin(identity: &Identity) -> Result<(), AdminError> {
    if identity.is_super_admin {
        Ok(())
    } else {
        Err(AdminError::super_admin_required())
    }
}
