use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create pending_approvals table
        manager
            .create_table(
                Table::create()
                    .table(PendingApprovals::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PendingApprovals::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PendingApprovals::RequestingAdminId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PendingApprovals::RequestingAdminUsername)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PendingApprovals::ActionType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PendingApprovals::Module).string().not_null())
                    .col(ColumnDef::new(PendingApprovals::ItemData).text().not_null())
                    .col(ColumnDef::new(PendingApprovals::Status).string().not_null())
                    .col(ColumnDef::new(PendingApprovals::ReviewedBy).string().null())
                    .col(
                        ColumnDef::new(PendingApprovals::ReviewedByUsername)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PendingApprovals::ReviewedAt)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(PendingApprovals::ReviewNotes).text().null())
                    .col(
                        ColumnDef::new(PendingApprovals::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Create index on status for pending-queue listings
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_pending_approvals_status")
                    .table(PendingApprovals::Table)
                    .col(PendingApprovals::Status)
                    .to_owned(),
            )
            .await?;

        // Create index on module for per-module review
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_pending_approvals_module")
                    .table(PendingApprovals::Table)
                    .col(PendingApprovals::Module)
                    .to_owned(),
            )
            .await?;

        // Create module_settings table
        manager
            .create_table(
                Table::create()
                    .table(ModuleSettings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ModuleSettings::Module)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ModuleSettings::RequiresApprovalForCreate)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ModuleSettings::RequiresApprovalForEdit)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ModuleSettings::RequiresApprovalForDelete)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ModuleSettings::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PendingApprovals::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ModuleSettings::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum PendingApprovals {
    Table,
    Id,
    RequestingAdminId,
    RequestingAdminUsername,
    ActionType,
    Module,
    ItemData,
    Status,
    ReviewedBy,
    ReviewedByUsername,
    ReviewedAt,
    ReviewNotes,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ModuleSettings {
    Table,
    Module,
    RequiresApprovalForCreate,
    RequiresApprovalForEdit,
    RequiresApprovalForDelete,
    UpdatedAt,
}
