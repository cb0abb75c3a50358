//! Configuration for immobilien service module

use serde::Deserialize;

/// How an entity's relationship set is replaced on save
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileStrategy {
    /// Delete and insert inside one store transaction
    #[default]
    Transactional,
    /// Delete, then insert as separate store calls
    DeleteThenInsert,
}

/// Immobilien service configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Relationship replacement strategy
    #[serde(default)]
    pub reconcile_strategy: ReconcileStrategy,

    /// Treat a missing end date as open-ended in the tenancy overlap check
    #[serde(default)]
    pub open_ended_conflicts: bool,

    /// Apply schema migrations on startup
    #[serde(default = "default_true")]
    pub run_migrations: bool,

    /// Emit outcome notifications through the tracing notifier
    #[serde(default = "default_true")]
    pub notifications: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reconcile_strategy: ReconcileStrategy::default(),
            open_ended_conflicts: false,
            run_migrations: true,
            notifications: true,
        }
    }
}

fn default_true() -> bool {
    true
}
