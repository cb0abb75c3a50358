use super::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Immobilien::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Immobilien::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Immobilien::Titel).string().not_null())
                    .col(ColumnDef::new(Immobilien::Beschreibung).text())
                    .col(ColumnDef::new(Immobilien::Adresse).string())
                    .col(
                        ColumnDef::new(Immobilien::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Immobilien::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Immobilien {
    Table,
    Id,
    Titel,
    Beschreibung,
    Adresse,
    CreatedAt,
}
