//! Create title table migration.
//!
//! No rating column: the rating is derived from review scores at read time.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Title::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Title::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Title::Name).string_len(256).not_null())
                    .col(ColumnDef::new(Title::Year).small_integer().not_null())
                    .col(ColumnDef::new(Title::Description).text().null())
                    .col(ColumnDef::new(Title::CategoryId).string_len(32).null())
                    .col(
                        ColumnDef::new(Title::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_title_category")
                            .from(Title::Table, Title::CategoryId)
                            .to(Category::Table, Category::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: category_id (for filtering by category)
        manager
            .create_index(
                Index::create()
                    .name("idx_title_category_id")
                    .table(Title::Table)
                    .col(Title::CategoryId)
                    .to_owned(),
            )
            .await?;

        // Index: year (for filtering and ordering)
        manager
            .create_index(
                Index::create()
                    .name("idx_title_year")
                    .table(Title::Table)
                    .col(Title::Year)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Title::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Title {
    Table,
    Id,
    Name,
    Year,
    Description,
    CategoryId,
    CreatedAt,
}

#[derive(Iden)]
enum Category {
    Table,
    Id,
}
