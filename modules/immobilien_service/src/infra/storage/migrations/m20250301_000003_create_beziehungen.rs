use super::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Beziehungen::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Beziehungen::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Beziehungen::ImmobilienId).uuid().not_null())
                    .col(ColumnDef::new(Beziehungen::KontaktId).uuid().not_null())
                    .col(ColumnDef::new(Beziehungen::Art).string().not_null())
                    .col(ColumnDef::new(Beziehungen::Startdatum).date())
                    .col(ColumnDef::new(Beziehungen::Enddatum).date())
                    .col(ColumnDef::new(Beziehungen::Dienstleistungen).text())
                    .col(
                        ColumnDef::new(Beziehungen::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_beziehungen_immobilien")
                            .from(Beziehungen::Table, Beziehungen::ImmobilienId)
                            .to(Immobilien::Table, Immobilien::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_beziehungen_kontakte")
                            .from(Beziehungen::Table, Beziehungen::KontaktId)
                            .to(Kontakte::Table, Kontakte::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Reconciliation and the tenancy check filter on these
        manager
            .create_index(
                Index::create()
                    .name("idx_beziehungen_immobilien_id")
                    .table(Beziehungen::Table)
                    .col(Beziehungen::ImmobilienId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_beziehungen_kontakt_id")
                    .table(Beziehungen::Table)
                    .col(Beziehungen::KontaktId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_beziehungen_art")
                    .table(Beziehungen::Table)
                    .col(Beziehungen::Art)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Beziehungen::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Beziehungen {
    Table,
    Id,
    ImmobilienId,
    KontaktId,
    Art,
    Startdatum,
    Enddatum,
    Dienstleistungen,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Immobilien {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Kontakte {
    Table,
    Id,
}
