//! Create genre_title association table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GenreTitle::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GenreTitle::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GenreTitle::TitleId).string_len(32).not_null())
                    .col(ColumnDef::new(GenreTitle::GenreId).string_len(32).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_genre_title_title")
                            .from(GenreTitle::Table, GenreTitle::TitleId)
                            .to(Title::Table, Title::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_genre_title_genre")
                            .from(GenreTitle::Table, GenreTitle::GenreId)
                            .to(Genre::Table, Genre::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (title_id, genre_id) - one association row per pair
        manager
            .create_index(
                Index::create()
                    .name("idx_genre_title_pair")
                    .table(GenreTitle::Table)
                    .col(GenreTitle::TitleId)
                    .col(GenreTitle::GenreId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: genre_id (for filtering titles by genre)
        manager
            .create_index(
                Index::create()
                    .name("idx_genre_title_genre_id")
                    .table(GenreTitle::Table)
                    .col(GenreTitle::GenreId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GenreTitle::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum GenreTitle {
    Table,
    Id,
    TitleId,
    GenreId,
}

#[derive(Iden)]
enum Title {
    Table,
    Id,
}

#[derive(Iden)]
enum Genre {
    Table,
    Id,
}
