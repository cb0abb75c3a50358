//! Database migrations for immobilien service

use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_immobilien::Migration),
            Box::new(m20250301_000002_create_kontakte::Migration),
            Box::new(m20250301_000003_create_beziehungen::Migration),
        ]
    }
}

mod m20250301_000001_create_immobilien;
mod m20250301_000002_create_kontakte;
mod m20250301_000003_create_beziehungen;
