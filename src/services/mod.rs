// Services layer - Business logic and orchestration
pub mod approval_service;
pub mod audit_logger;
pub mod crypto;
pub mod permission_engine;
pub mod token_service;

pub use approval_service::ApprovalService;
pub use audit_logger::AuditLogger;
pub use permission_engine::PermissionEngine;
pub use token_service::TokenService;
