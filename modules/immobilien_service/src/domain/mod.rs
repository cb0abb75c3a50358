//! Domain layer - business logic and services

pub mod conflict;
pub mod events;
pub mod reconcile;
pub mod repository;
pub mod service;
pub mod validation;

pub use conflict::{ConflictDetector, DateRange};
pub use events::{NoOpNotifier, Notification, NotificationLevel, Notifier, TracingNotifier};
pub use reconcile::{ReconcileError, ReconcileReport, Reconciler};
pub use repository::{
    BeziehungFilter, BeziehungenRepository, ImmobilienRepository, KontakteRepository,
};
pub use service::Service;
pub use validation::RelationshipValidator;
