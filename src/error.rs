//! Error taxonomy shared by the core and the HTTP boundary.
//!
//! Every failure the service can produce is one of the [`AppError`] variants, so
//! callers branch on the kind instead of inspecting messages.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

/// Name of the unique constraint guarding `links.code`.
pub const LINK_CODE_CONSTRAINT: &str = "links_code_key";

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serializable error payload returned to API clients.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Target URL is blank or lacks an `http://` / `https://` prefix.
    #[error("{message}")]
    InvalidUrl { message: String, details: Value },

    /// Candidate code is already taken. Absorbed by the shorten retry loop.
    #[error("short code '{code}' already exists")]
    DuplicateCode { code: String },

    /// The retry cap was hit without finding a free code.
    #[error("failed to generate a unique short code after {attempts} attempts")]
    GenerationExhausted { attempts: usize },

    /// Code is unknown, or the link behind it has expired.
    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// I/O, transaction or deadline failure in the storage layer.
    #[error("{message}")]
    Storage { message: String, details: Value },

    /// Request body rejected before reaching the core.
    #[error("{message}")]
    Validation { message: String, details: Value },
}

impl AppError {
    pub fn invalid_url(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidUrl {
            message: message.into(),
            details,
        }
    }

    pub fn duplicate_code(code: impl Into<String>) -> Self {
        Self::DuplicateCode { code: code.into() }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn storage(message: impl Into<String>, details: Value) -> Self {
        Self::Storage {
            message: message.into(),
            details,
        }
    }

    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    /// HTTP status for this error kind.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidUrl { .. } | AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::DuplicateCode { .. } => StatusCode::CONFLICT,
            AppError::GenerationExhausted { .. } | AppError::Storage { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Converts the error into the client-facing payload.
    ///
    /// Storage details stay server-side.
    pub fn to_error_info(&self) -> ErrorInfo {
        let message = self.to_string();
        match self {
            AppError::InvalidUrl { details, .. } => ErrorInfo {
                code: "invalid_url",
                message,
                details: details.clone(),
            },
            AppError::DuplicateCode { code } => ErrorInfo {
                code: "duplicate_code",
                message,
                details: json!({ "code": code }),
            },
            AppError::GenerationExhausted { attempts } => ErrorInfo {
                code: "generation_exhausted",
                message,
                details: json!({ "attempts": attempts }),
            },
            AppError::NotFound { details, .. } => ErrorInfo {
                code: "not_found",
                message,
                details: details.clone(),
            },
            AppError::Storage { .. } => ErrorInfo {
                code: "storage_error",
                message: "Internal storage error".to_string(),
                details: json!({}),
            },
            AppError::Validation { details, .. } => ErrorInfo {
                code: "validation_error",
                message,
                details: details.clone(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, details = ?self, "request failed");
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error() {
            if db.is_unique_violation() && db.constraint() == Some(LINK_CODE_CONSTRAINT) {
                return AppError::DuplicateCode {
                    code: String::new(),
                };
            }

            if db.is_foreign_key_violation() {
                return AppError::storage(
                    "Foreign key constraint violation",
                    json!({ "constraint": db.constraint() }),
                );
            }
        }

        AppError::storage("Database error", json!({ "reason": e.to_string() }))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(e.field_errors()).unwrap_or_else(|_| json!({}));
        AppError::bad_request("Request validation failed", details)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::invalid_url("bad", json!({})).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::not_found("missing", json!({})).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::duplicate_code("abc123").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::GenerationExhausted { attempts: 10 }.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::storage("db down", json!({})).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_storage_details_are_hidden() {
        let err = AppError::storage("Database error", json!({ "reason": "password leaked" }));
        let info = err.to_error_info();

        assert_eq!(info.code, "storage_error");
        assert_eq!(info.details, json!({}));
        assert!(!info.message.contains("password"));
    }

    #[test]
    fn test_generation_exhausted_message() {
        let err = AppError::GenerationExhausted { attempts: 3 };
        assert!(err.to_string().contains("3 attempts"));
        assert_eq!(err.to_error_info().code, "generation_exhausted");
    }

    #[test]
    fn test_sqlx_row_not_found_maps_to_storage() {
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, AppError::Storage { .. }));
    }
}
