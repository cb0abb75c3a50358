//! Module wiring and lifecycle

use crate::config::Config;
use crate::domain::{NoOpNotifier, Notifier, Service, TracingNotifier};
use crate::infra::storage::{
    SeaOrmBeziehungenRepository, SeaOrmImmobilienRepository, SeaOrmKontakteRepository,
};
use anyhow::Result;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Immobilien service module
///
/// Owns the domain service built on top of a database connection and
/// exposes it over REST and as an in-process client.
pub struct ImmobilienServiceModule {
    config: Config,
    service: Arc<Service>,
}

impl ImmobilienServiceModule {
    /// Build the module: migrate if configured, then wire repositories and service
    pub async fn init(config: Config, db: Arc<DatabaseConnection>) -> Result<Self> {
        if config.run_migrations {
            Self::migrate(&db).await?;
        }

        // Build repositories
        let immobilien_repo = Arc::new(SeaOrmImmobilienRepository::new(db.clone()));
        let kontakte_repo = Arc::new(SeaOrmKontakteRepository::new(db.clone()));
        let beziehungen_repo = Arc::new(SeaOrmBeziehungenRepository::new(db));

        let notifier: Arc<dyn Notifier> = if config.notifications {
            Arc::new(TracingNotifier)
        } else {
            Arc::new(NoOpNotifier)
        };

        let service = Arc::new(Service::new(
            immobilien_repo,
            kontakte_repo,
            beziehungen_repo,
            notifier,
            &config,
        ));

        tracing::info!(
            strategy = ?config.reconcile_strategy,
            open_ended_conflicts = config.open_ended_conflicts,
            "Immobilien service initialized"
        );
        Ok(Self { config, service })
    }

    /// Apply pending schema migrations
    pub async fn migrate(db: &DatabaseConnection) -> Result<()> {
        use crate::infra::storage::migrations::Migrator;
        use sea_orm_migration::MigratorTrait;

        Migrator::up(db, None).await?;
        tracing::info!("Immobilien service migrations completed");
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Domain service handle
    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }

    /// In-process client
    pub fn client(&self) -> Arc<dyn crate::contract::ImmobilienApi> {
        Arc::new(crate::api::native::NativeClient::new(self.service.clone()))
    }

    /// Register the REST routes on `router`
    pub fn register_rest(&self, router: axum::Router) -> axum::Router {
        tracing::info!("Registering immobilien service REST routes");
        crate::api::rest::routes::register_routes(router, self.service.clone())
    }
}
