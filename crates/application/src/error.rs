use std::collections::BTreeMap;

use infrastructure::repositories::{RepositoryError, NON_FIELD_ERRORS};
use thiserror::Error;

/// Field-keyed validation messages, rendered as `{"field": ["msg", ...]}`.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    /// Authentication errors (401)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Authorization errors (403)
    #[error("Authorization failed: {0}")]
    Authorization(String),

    /// Validation errors (400)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Validation errors tied to specific fields (400)
    #[error("Validation failed: {0:?}")]
    InvalidField(FieldErrors),

    /// Not found errors (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Rate limiting errors (429)
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Conflict errors (409) - delete blocked by a protected reference
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Upstream service errors (502)
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Database errors (500)
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Cryptographic errors (500)
    #[error("Cryptographic error: {0}")]
    Cryptographic(String),

    /// Configuration errors (500)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal server errors (500)
    #[error("Internal server error: {0}")]
    Internal(anyhow::Error),
}

impl AppError {
    /// Single-field validation error.
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.into(), vec![message.into()]);
        AppError::InvalidField(errors)
    }

    /// Get HTTP status code for the error
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::Authentication(_) => 401,
            AppError::Authorization(_) => 403,
            AppError::Validation(_) | AppError::InvalidField(_) => 400,
            AppError::NotFound(_) => 404,
            AppError::Conflict(_) => 409,
            AppError::RateLimitExceeded(_) => 429,
            AppError::ExternalService(_) => 502,
            AppError::Database(sea_orm::DbErr::RecordNotFound(_)) => 404,
            AppError::Database(_)
            | AppError::Internal(_)
            | AppError::Cryptographic(_)
            | AppError::Configuration(_) => 500,
        }
    }

    /// Get error code string
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Authentication(_) => "AUTHENTICATION_FAILED",
            AppError::Authorization(_) => "AUTHORIZATION_FAILED",
            AppError::Validation(_) | AppError::InvalidField(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) | AppError::Database(sea_orm::DbErr::RecordNotFound(_)) => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::RateLimitExceeded(_) => "RATE_LIMITED",
            AppError::ExternalService(_) => "EXTERNAL_SERVICE_ERROR",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Cryptographic(_) => "CRYPTOGRAPHIC_ERROR",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get retry after seconds (for rate limiting)
    pub fn retry_after_seconds(&self) -> Option<u64> {
        match self {
            AppError::RateLimitExceeded(_) => Some(60),
            _ => None,
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => AppError::NotFound("Not found.".to_string()),
            RepositoryError::UniqueViolation(field) if field == NON_FIELD_ERRORS => AppError::field(
                field,
                "The fields document, signer, signature_value must make a unique set.",
            ),
            RepositoryError::UniqueViolation(field) => {
                let message = format!("A record with this {} already exists.", field.replace('_', " "));
                AppError::field(field, message)
            }
            RepositoryError::MissingReference(field) => {
                AppError::field(field, "Invalid pk - object does not exist.")
            }
            RepositoryError::ReferencedBy(table) => AppError::Conflict(format!(
                "Cannot delete: it is referenced by other objects ({}).",
                table
            )),
            RepositoryError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        AppError::Authentication(format!("JWT error: {}", err))
    }
}

impl From<argon2::password_hash::Error> for AppError {
    fn from(err: argon2::password_hash::Error) -> Self {
        AppError::Cryptographic(format!("Password hashing error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        let errors: FieldErrors = err
            .field_errors()
            .iter()
            .map(|(field, errors)| {
                let messages = errors
                    .iter()
                    .map(|e| {
                        e.message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("Invalid value ({}).", e.code))
                    })
                    .collect();
                (field.to_string(), messages)
            })
            .collect();
        AppError::InvalidField(errors)
    }
}

impl From<infrastructure::storage::StorageError> for AppError {
    fn from(err: infrastructure::storage::StorageError) -> Self {
        AppError::Internal(anyhow::Error::new(err))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;
