use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Shops::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Shops::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Shops::OwnerId).uuid().not_null())
                    .col(ColumnDef::new(Shops::Name).string().not_null())
                    .col(ColumnDef::new(Shops::Description).string())
                    .col(ColumnDef::new(Shops::Address).string())
                    .col(
                        ColumnDef::new(Shops::OpeningStatus)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(Shops::AvatarFile).json())
                    .col(ColumnDef::new(Shops::CoverFile).json())
                    .col(
                        ColumnDef::new(Shops::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Shops::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Shops::Table, Shops::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Shops::Table)
                    .col(Shops::OwnerId)
                    .name("idx_shops_owner_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Shops::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Shops {
    Table,
    Id,
    OwnerId,
    Name,
    Description,
    Address,
    OpeningStatus,
    AvatarFile,
    CoverFile,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
