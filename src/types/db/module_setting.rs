use sea_orm::entity::prelude::*;

/// SeaORM entity for the module_settings table
///
/// One row per content module. The flags decide whether a permitted
/// mutation is executed directly or deferred into the approval queue.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "module_settings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub module: String,
    pub requires_approval_for_create: bool,
    pub requires_approval_for_edit: bool,
    pub requires_approval_for_delete: bool,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
