// Database entities (SeaORM)
pub mod admin_user;
pub mod announcement;
pub mod application;
pub mod audit_log;
pub mod event;
pub mod gallery_item;
pub mod member;
pub mod module_setting;
pub mod pending_approval;
pub mod project;
