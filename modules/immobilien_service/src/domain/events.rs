//! Outcome notifications for immobilien service
//!
//! The service reports create/update/delete outcomes through the `Notifier`
//! port. Validation and reconciliation never notify on their own.
use crate::contract::Table;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Warning,
    Error,
}

/// User-facing outcome of a service operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    /// Table the operation touched
    pub table: Table,
    /// Affected entity, if known
    pub entity_id: Option<Uuid>,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    pub fn success(table: Table, entity_id: Uuid, message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, table, Some(entity_id), message)
    }

    pub fn warning(table: Table, entity_id: Uuid, message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Warning, table, Some(entity_id), message)
    }

    pub fn error(table: Table, entity_id: Option<Uuid>, message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, table, entity_id, message)
    }

    fn new(
        level: NotificationLevel,
        table: Table,
        entity_id: Option<Uuid>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            level,
            table,
            entity_id,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Port for delivering notifications
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one notification
    async fn notify(&self, notification: Notification) -> anyhow::Result<()>;
}

/// No-op notifier for testing or when notifications are disabled
pub struct NoOpNotifier;

#[async_trait::async_trait]
impl Notifier for NoOpNotifier {
    async fn notify(&self, _notification: Notification) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Notifier that turns every notification into a log event
pub struct TracingNotifier;

#[async_trait::async_trait]
impl Notifier for TracingNotifier {
    async fn notify(&self, n: Notification) -> anyhow::Result<()> {
        let entity_id = n.entity_id.map(|id| id.to_string()).unwrap_or_default();
        match n.level {
            NotificationLevel::Success => {
                tracing::info!(table = %n.table, entity_id = %entity_id, "{}", n.message)
            }
            NotificationLevel::Warning => {
                tracing::warn!(table = %n.table, entity_id = %entity_id, "{}", n.message)
            }
            NotificationLevel::Error => {
                tracing::error!(table = %n.table, entity_id = %entity_id, "{}", n.message)
            }
        }
        Ok(())
    }
}
