use sea_orm::entity::prelude::*;

/// SeaORM entity for the pending_approvals table
///
/// Status only ever moves pending -> approved or pending -> rejected; a
/// resolved row is immutable. The requesting admin's username is stored
/// denormalized so the row survives deletion of the admin record.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "pending_approvals")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub requesting_admin_id: String,
    pub requesting_admin_username: String,
    pub action_type: String,
    pub module: String,
    pub item_data: String,
    pub status: String,
    pub reviewed_by: Option<String>,
    pub reviewed_by_username: Option<String>,
    pub reviewed_at: Option<i64>,
    pub review_notes: Option<String>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
