use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create audit_logs table
        manager
            .create_table(
                Table::create()
                    .table(AuditLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AuditLogs::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AuditLogs::AdminId).string().not_null())
                    .col(
                        ColumnDef::new(AuditLogs::AdminUsername)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AuditLogs::ActionType).string().not_null())
                    .col(ColumnDef::new(AuditLogs::Module).string().null())
                    .col(ColumnDef::new(AuditLogs::ItemId).big_integer().null())
                    .col(ColumnDef::new(AuditLogs::ActionDetails).text().not_null())
                    .col(ColumnDef::new(AuditLogs::IpAddress).string().null())
                    .col(ColumnDef::new(AuditLogs::UserAgent).string().null())
                    .col(ColumnDef::new(AuditLogs::Status).string().not_null())
                    .col(ColumnDef::new(AuditLogs::CreatedAt).string().not_null())
                    .to_owned(),
            )
            .await?;

        // Create index on created_at for time-range queries
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_audit_logs_created_at")
                    .table(AuditLogs::Table)
                    .col(AuditLogs::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // Create index on module for filtering by module
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_audit_logs_module")
                    .table(AuditLogs::Table)
                    .col(AuditLogs::Module)
                    .to_owned(),
            )
            .await?;

        // Create index on admin_id for filtering by acting admin
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_audit_logs_admin_id")
                    .table(AuditLogs::Table)
                    .col(AuditLogs::AdminId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AuditLogs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum AuditLogs {
    Table,
    Id,
    AdminId,
    AdminUsername,
    ActionType,
    Module,
    ItemId,
    ActionDetails,
    IpAddress,
    UserAgent,
    Status,
    CreatedAt,
}
