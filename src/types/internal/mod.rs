// Internal types - not exposed over the API surface
pub mod audit;
pub mod claims;
pub mod decision;
pub mod identity;
pub mod permissions;
pub mod request_meta;

pub use audit::{AuditAction, AuditQuery, AuditStatus, NewAuditEntry};
pub use claims::Claims;
pub use decision::AccessDecision;
pub use identity::{AdminRole, Identity};
pub use permissions::{Action, ApprovalStatus, Module, PermissionMatrix};
pub use request_meta::RequestMeta;
