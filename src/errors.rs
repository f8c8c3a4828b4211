//! # Error Handling
//!
//! Request processing distinguishes four failure classes:
//!
//! - **Structural**: the parameter set itself is malformed (missing or
//!   non-numeric scalars, broken column blocks). The whole request is
//!   rejected with a 400.
//! - **Referential, per column**: a requested column name is not declared
//!   in the registry. Client and server disagree about the schema, so the
//!   whole request is rejected with a 400.
//! - **Rendering integrity**: an enumerated stored value has no registered
//!   label. The backing data violates its declared vocabulary; this is a
//!   500 and must not be masked.
//! - **Source**: the backing store failed. Propagated as a 500.
//!
//! Per-order-entry referential errors (an order referencing a missing or
//! placeholder column) never reach this module; the decoder drops the
//! single entry and continues.
//!
//! **Never expose internal errors to users.** Store errors and integrity
//! details are logged through `tracing` but the response body stays
//! generic.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;

/// Failure of a [`DataSource`](crate::source::DataSource) call.
///
/// Adapters keep the public `message` generic and put driver detail into
/// `internal`, which is logged but never serialized into a response.
#[derive(Debug)]
pub struct SourceError {
    pub message: String,
    pub internal: Option<String>,
}

impl SourceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), internal: None }
    }

    pub fn with_internal(message: impl Into<String>, internal: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            internal: Some(internal.into()),
        }
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SourceError {}

/// Error type for table request processing, mapping each failure class to
/// an HTTP status at the Axum boundary.
#[derive(Debug)]
pub enum DataTablesError {
    /// 400 - the parameter set is structurally invalid.
    BadRequest {
        /// User-facing error message
        message: String,
    },

    /// 400 - a requested column is not declared in the registry.
    UnknownColumn {
        /// The column name the client sent
        name: String,
    },

    /// 500 - an enumerated stored value has no registered label.
    ChoiceIntegrity {
        /// Field whose vocabulary was violated (logged, not sent to user)
        field: String,
        /// The offending stored value (logged, not sent to user)
        stored: String,
    },

    /// 500 - backing store failure (details logged, not exposed).
    Source {
        /// User-facing generic message
        message: String,
        /// Internal error details (logged, not sent to user)
        internal: Option<String>,
    },
}

impl DataTablesError {
    /// Create a 400 Bad Request error for a structural decode failure.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest { message: message.into() }
    }

    /// Create a 400 error for a column name missing from the registry.
    pub fn unknown_column(name: impl Into<String>) -> Self {
        Self::UnknownColumn { name: name.into() }
    }

    /// Create a 500 error for a stored value outside its declared vocabulary.
    pub fn choice_integrity(field: impl Into<String>, stored: impl Into<String>) -> Self {
        Self::ChoiceIntegrity {
            field: field.into(),
            stored: stored.into(),
        }
    }

    /// Get the HTTP status code for this error
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } | Self::UnknownColumn { .. } => StatusCode::BAD_REQUEST,
            Self::ChoiceIntegrity { .. } | Self::Source { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the user-facing error message (sanitized)
    fn user_message(&self) -> String {
        match self {
            Self::BadRequest { message } => message.clone(),
            Self::UnknownColumn { name } => format!("unknown column '{name}'"),
            Self::ChoiceIntegrity { .. } | Self::Source { .. } => {
                "Internal server error".to_string()
            }
        }
    }

    /// Log internal error details (not sent to user)
    ///
    /// Uses the `tracing` crate - only logs if the host application has
    /// enabled tracing. No output otherwise.
    fn log_internal(&self) {
        match self {
            Self::ChoiceIntegrity { field, stored } => {
                tracing::error!(
                    field = %field,
                    stored = %stored,
                    "enumerated value has no registered label"
                );
            }
            Self::Source { message, internal } => {
                tracing::error!(
                    message = %message,
                    internal = ?internal,
                    "backing store error"
                );
            }
            _ => {
                tracing::debug!(
                    error = %self.user_message(),
                    status = %self.status_code(),
                    "table request rejected"
                );
            }
        }
    }
}

/// Error response sent to users (sanitized)
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for DataTablesError {
    fn into_response(self) -> Response {
        self.log_internal();
        let status = self.status_code();
        let response = ErrorResponse { error: self.user_message() };
        (status, Json(response)).into_response()
    }
}

impl fmt::Display for DataTablesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for DataTablesError {}

impl From<SourceError> for DataTablesError {
    fn from(err: SourceError) -> Self {
        Self::Source {
            message: err.message,
            internal: err.internal,
        }
    }
}
