//! Error handling for the N2K logistics booking server
//!
//! Every failure reaches the client as a small structured body:
//! `{"error": {"code", "message", "fields"?}}`. Driver details stay in the logs.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::{AllocationError, FieldError, UnresolvedReference};
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    /// One or more reference names did not match a row
    #[error("Invalid reference data: {}", describe_references(.0))]
    InvalidReference(Vec<UnresolvedReference>),

    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Uniqueness violation (LR number)
    #[error("Conflict: {message}")]
    Conflict { resource: String, message: String },

    /// Delete blocked by rows referencing the target
    #[error("{0} is referenced by other records")]
    ForeignKeyConflict(String),

    /// Failure after a transaction was opened and rolled back
    #[error("Transaction failed: {0}")]
    TransactionFailure(String),

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

fn describe_references(references: &[UnresolvedReference]) -> String {
    references
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl AppError {
    /// Classify a database error raised while writing `resource`.
    ///
    /// Unique violations become [`AppError::Conflict`], foreign key
    /// violations [`AppError::ForeignKeyConflict`]; everything else stays a
    /// database error.
    pub fn from_db(err: sqlx::Error, resource: &str) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return AppError::Conflict {
                    resource: resource.to_string(),
                    message: format!(
                        "Possible duplicate entry for {} (e.g. LR number)",
                        resource
                    ),
                };
            }
            if db_err.is_foreign_key_violation() {
                return AppError::ForeignKeyConflict(resource.to_string());
            }
        }
        AppError::DatabaseError(err)
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "VALIDATION_ERROR",
            AppError::InvalidReference(_) => "INVALID_REFERENCE",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict { .. } => "CONFLICT",
            AppError::ForeignKeyConflict(_) => "FOREIGN_KEY_CONFLICT",
            AppError::TransactionFailure(_) => "TRANSACTION_FAILURE",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::Internal(_) | AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } | AppError::InvalidReference(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } | AppError::ForeignKeyConflict(_) => StatusCode::CONFLICT,
            AppError::TransactionFailure(_)
            | AppError::DatabaseError(_)
            | AppError::Internal(_)
            | AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<FieldError> for AppError {
    fn from(err: FieldError) -> Self {
        AppError::Validation {
            field: err.field,
            message: err.message,
        }
    }
}

impl From<AllocationError> for AppError {
    fn from(err: AllocationError) -> Self {
        match err {
            AllocationError::NoVehicles => AppError::NotFound("Vehicle".to_string()),
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
}

impl ErrorDetail {
    fn from_error(error: &AppError) -> Self {
        let (message, fields) = match error {
            AppError::Validation { field, message } => (message.clone(), vec![field.clone()]),
            AppError::InvalidReference(references) => (
                format!(
                    "Invalid reference data: {} not found",
                    describe_references(references)
                ),
                references.iter().map(|r| r.field().to_string()).collect(),
            ),
            AppError::NotFound(resource) => (format!("{} not found", resource), Vec::new()),
            AppError::Conflict { resource, message } => (message.clone(), vec![resource.clone()]),
            AppError::ForeignKeyConflict(resource) => (
                format!(
                    "Cannot delete {}. It might be referenced by other records.",
                    resource.to_lowercase()
                ),
                Vec::new(),
            ),
            AppError::TransactionFailure(_) => (
                "The operation could not be completed and was rolled back".to_string(),
                Vec::new(),
            ),
            AppError::DatabaseError(_) => ("A database error occurred".to_string(), Vec::new()),
            AppError::Internal(_) | AppError::InternalError(_) => {
                ("An internal server error occurred".to_string(), Vec::new())
            }
        };

        ErrorDetail {
            code: error.code().to_string(),
            message,
            fields,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_detail = ErrorDetail::from_error(&self);

        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
