pub use sea_orm_migration::prelude::*;

mod m20250810_000001_create_admin_schema;
mod m20250810_000002_create_approval_schema;
mod m20250810_000003_create_audit_schema;
mod m20250810_000004_create_content_schema;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250810_000001_create_admin_schema::Migration),
            Box::new(m20250810_000002_create_approval_schema::Migration),
            Box::new(m20250810_000003_create_audit_schema::Migration),
            Box::new(m20250810_000004_create_content_schema::Migration),
        ]
    }
}
