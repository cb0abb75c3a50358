//! Contract error types for the immobilien service
//!
//! These errors are transport-agnostic and used for inter-module communication.

use thiserror::Error;

use super::model::{FieldError, Table};

/// Store operation that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    Fetch,
    FetchCurrent,
    Create,
    Update,
    Delete,
}

impl StoreOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fetch => "fetch",
            Self::FetchCurrent => "fetch_current",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }
}

impl Table {
    /// Localized message for a failed store operation on this table
    pub fn store_message(&self, operation: StoreOperation) -> &'static str {
        use StoreOperation::*;
        match (self, operation) {
            (Table::Kontakte, Fetch) => "Fehler beim Abrufen der Kontaktdaten",
            (Table::Kontakte, FetchCurrent) => "Fehler beim Abrufen der aktuellen Kontaktdaten",
            (Table::Kontakte, Create) => "Fehler beim Erstellen des Kontakts",
            (Table::Kontakte, Update) => "Fehler beim Aktualisieren des Kontakts",
            (Table::Kontakte, Delete) => "Fehler beim Löschen des Kontakts",
            (Table::Immobilien, Fetch) => "Fehler beim Abrufen der Immobiliendaten",
            (Table::Immobilien, FetchCurrent) => "Fehler beim Abrufen der aktuellen Immobiliendaten",
            (Table::Immobilien, Create) => "Fehler beim Erstellen der Immobilie",
            (Table::Immobilien, Update) => "Fehler beim Aktualisieren der Immobilie",
            (Table::Immobilien, Delete) => "Fehler beim Löschen der Immobilie",
            (Table::Beziehungen, Fetch) => "Fehler beim Abrufen der Beziehungsdaten",
            (Table::Beziehungen, FetchCurrent) => "Fehler beim Abrufen der aktuellen Beziehungsdaten",
            (Table::Beziehungen, Create) => "Fehler beim Erstellen der Beziehung",
            (Table::Beziehungen, Update) => "Fehler beim Aktualisieren der Beziehung",
            (Table::Beziehungen, Delete) => "Fehler beim Löschen der Beziehung",
        }
    }

    /// Localized "not found" message for this table
    pub fn not_found_message(&self) -> &'static str {
        match self {
            Table::Kontakte => "Kontakt nicht gefunden",
            Table::Immobilien => "Immobilie nicht gefunden",
            Table::Beziehungen => "Beziehung nicht gefunden",
        }
    }

    /// Localized "invalid data" message for this table
    pub fn invalid_data_message(&self) -> &'static str {
        match self {
            Table::Kontakte => "Ungültige Kontaktdaten",
            Table::Immobilien => "Ungültige Immobiliendaten",
            Table::Beziehungen => "Ungültige Beziehungsdaten",
        }
    }
}

/// Immobilien service domain errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImmobilienError {
    /// Input violates a domain rule; never touched the store
    #[error("Validierungsfehler: {}", join_messages(.errors))]
    Validation {
        /// Field-scoped errors
        errors: Vec<FieldError>,
    },
    /// Identifier is not a hyphenated UUID
    #[error("Ungültiges UUID-Format")]
    InvalidId {
        /// Submitted identifier
        value: String,
    },
    /// Malformed request payload
    #[error("{}", invalid_data_message(.table))]
    InvalidData {
        /// Table the payload was meant for
        table: Table,
        /// What was wrong
        details: String,
    },
    /// Referenced row does not exist
    #[error("{}", not_found_message(.table))]
    NotFound {
        /// Table searched
        table: Table,
        /// Row identifier
        id: String,
    },
    /// Store call failed
    #[error("{}", store_message(.table, .operation))]
    Store {
        /// Table accessed
        table: Table,
        /// Failed operation
        operation: StoreOperation,
        /// Underlying error detail
        detail: String,
    },
    /// Internal error
    #[error("Interner Serverfehler")]
    Internal,
}

impl ImmobilienError {
    pub fn validation(errors: Vec<FieldError>) -> Self {
        Self::Validation { errors }
    }

    pub fn not_found(table: Table, id: impl ToString) -> Self {
        Self::NotFound {
            table,
            id: id.to_string(),
        }
    }

    pub fn store(table: Table, operation: StoreOperation, err: impl std::fmt::Display) -> Self {
        Self::Store {
            table,
            operation,
            detail: err.to_string(),
        }
    }
}

fn store_message(table: &Table, operation: &StoreOperation) -> &'static str {
    table.store_message(*operation)
}

fn not_found_message(table: &Table) -> &'static str {
    table.not_found_message()
}

fn invalid_data_message(table: &Table) -> &'static str {
    table.invalid_data_message()
}

fn join_messages(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
