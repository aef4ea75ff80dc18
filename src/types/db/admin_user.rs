use sea_orm::entity::prelude::*;

/// SeaORM entity for the admin_users table
///
/// The permission matrix is stored as JSON text and parsed into a typed
/// mapping at the read boundary. Historical audit and approval rows keep a
/// denormalized username snapshot, so rows here may be deleted without
/// corrupting history.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "admin_users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub username: String,
    pub password_hash: String,
    pub role: String,
    pub is_super_admin: bool,
    pub permissions: String,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
