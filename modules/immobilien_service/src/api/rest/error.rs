//! HTTP error mapping to RFC-9457 Problem Details

use crate::contract::ImmobilienError;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::dto::FieldErrorDto;

/// RFC-9457 Problem Details for HTTP API errors
#[derive(Debug, Serialize)]
pub struct Problem {
    /// A URI reference that identifies the problem type
    #[serde(rename = "type")]
    pub type_uri: String,

    /// A short, human-readable summary of the problem type
    pub title: String,

    /// The HTTP status code
    pub status: u16,

    /// A human-readable explanation specific to this occurrence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// Field errors of a validation problem (extension member)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldErrorDto>,
}

impl Problem {
    /// Create a new Problem Details response
    pub fn new(status: StatusCode, title: impl Into<String>) -> Self {
        Self {
            type_uri: format!("https://httpstatuses.io/{}", status.as_u16()),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
            errors: Vec::new(),
        }
    }

    /// Add detail message
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Attach field errors
    pub fn with_errors(mut self, errors: Vec<FieldErrorDto>) -> Self {
        self.errors = errors;
        self
    }
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (
            status,
            [(header::CONTENT_TYPE, "application/problem+json")],
            Json(self),
        )
            .into_response()
    }
}

/// Map domain errors to HTTP Problem Details
pub fn map_domain_error(error: ImmobilienError) -> Problem {
    let message = error.to_string();
    match error {
        ImmobilienError::Validation { errors } => {
            Problem::new(StatusCode::BAD_REQUEST, "Validierungsfehler")
                .with_detail(message)
                .with_errors(errors.into_iter().map(Into::into).collect())
        }

        ImmobilienError::InvalidId { value } => {
            Problem::new(StatusCode::BAD_REQUEST, message)
                .with_detail(format!("'{}' is not a hyphenated UUID", value))
        }

        ImmobilienError::InvalidData { details, .. } => {
            Problem::new(StatusCode::BAD_REQUEST, message).with_detail(details)
        }

        ImmobilienError::NotFound { table, id } => Problem::new(StatusCode::NOT_FOUND, message)
            .with_detail(format!("{} with id '{}' was not found", table, id)),

        ImmobilienError::Store { detail, .. } => {
            Problem::new(StatusCode::INTERNAL_SERVER_ERROR, message).with_detail(detail)
        }

        ImmobilienError::Internal => Problem::new(StatusCode::INTERNAL_SERVER_ERROR, message)
            .with_detail("An unexpected error occurred"),
    }
}
