use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Expenses::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Expenses::CategoryLabel).string().not_null())
                    .col(ColumnDef::new(Expenses::RecordedAt).string().not_null())
                    .col(ColumnDef::new(Expenses::Amount).big_integer().not_null())
                    .col(ColumnDef::new(Expenses::UserId).string().not_null())
                    .to_owned(),
            )
            .await?;

        // Not unique: expenses stamped with the same instant are all kept.
        manager
            .create_index(
                Index::create()
                    .name("idx-expenses-category_label-recorded_at")
                    .table(Expenses::Table)
                    .col(Expenses::CategoryLabel)
                    .col(Expenses::RecordedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Admin listings scan by time across categories.
        manager
            .create_index(
                Index::create()
                    .name("idx-expenses-recorded_at")
                    .table(Expenses::Table)
                    .col(Expenses::RecordedAt)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await
    }
}

/// Learn more at https://docs.rs/sea-query#iden
#[derive(Iden)]
pub enum Expenses {
    Table,
    Id,
    CategoryLabel,
    RecordedAt,
    Amount,
    UserId,
}
