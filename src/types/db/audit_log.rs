use sea_orm::entity::prelude::*;

/// SeaORM entity for the audit_logs table
///
/// Append-only: rows are never updated or deleted by the application.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "audit_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub admin_id: String,
    pub admin_username: String,
    pub action_type: String,
    pub module: Option<String>,
    pub item_id: Option<i64>,
    pub action_details: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub status: String,
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
