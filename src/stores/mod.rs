// Stores layer - Data access and repository pattern
pub mod approval_store;
pub mod audit_store;
pub mod credential_store;
pub mod setting_store;

pub use approval_store::{ApprovalStore, NewApproval};
pub use audit_store::AuditStore;
pub use credential_store::{CredentialStore, NewAdmin};
pub use setting_store::SettingStore;
