use super::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Kontakte::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Kontakte::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Kontakte::Name).string().not_null())
                    .col(ColumnDef::new(Kontakte::Adresse).string())
                    .col(
                        ColumnDef::new(Kontakte::CreatedAt)
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
            .drop_table(Table::drop().table(Kontakte::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Kontakte {
    Table,
    Id,
    Name,
    Adresse,
    CreatedAt,
}
