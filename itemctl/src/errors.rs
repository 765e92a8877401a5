use crate::db::errors::DbError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;
use utoipa::ToSchema;

/// Message returned when a user is created or renamed to an email that is taken.
pub const EMAIL_ALREADY_REGISTERED: &str = "Email already registered";

#[derive(ThisError, Debug)]
pub enum Error {
    /// Requested resource not found
    #[error("{resource} with ID {id} not found")]
    NotFound { resource: String, id: String },

    /// Generic internal service error
    #[error("Failed to {operation}")]
    Internal { operation: String },

    /// Database operation error
    #[error(transparent)]
    Database(#[from] DbError),

    /// Conflict with existing data, e.g. a duplicate email
    #[error("Conflict: {message}")]
    Conflict { message: String },
}

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub detail: String,
}

fn is_users_email(table: Option<&str>, constraint: Option<&str>) -> bool {
    matches!((table, constraint), (Some("users"), Some(c)) if c.contains("email"))
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Database(db_err) => match db_err {
                DbError::NotFound => StatusCode::NOT_FOUND,
                DbError::UniqueViolation { constraint, table, .. } if is_users_email(table.as_deref(), constraint.as_deref()) => {
                    StatusCode::BAD_REQUEST
                }
                DbError::UniqueViolation { .. } => StatusCode::CONFLICT,
                DbError::ForeignKeyViolation { .. } => StatusCode::BAD_REQUEST,
                DbError::CheckViolation { .. } => StatusCode::BAD_REQUEST,
                DbError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            // Duplicate emails are reported as 400 to clients
            Error::Conflict { .. } => StatusCode::BAD_REQUEST,
        }
    }

    /// Returns a user-safe error message, without leaking internal implementation details
    pub fn user_message(&self) -> String {
        match self {
            Error::NotFound { resource, .. } => format!("{resource} not found"),
            Error::Internal { .. } => "Internal server error".to_string(),
            Error::Database(db_err) => match db_err {
                DbError::NotFound => "Resource not found".to_string(),
                DbError::UniqueViolation { constraint, table, .. } => {
                    if is_users_email(table.as_deref(), constraint.as_deref()) {
                        EMAIL_ALREADY_REGISTERED.to_string()
                    } else {
                        "Resource already exists".to_string()
                    }
                }
                DbError::ForeignKeyViolation { .. } => "Invalid reference to related resource".to_string(),
                DbError::CheckViolation { .. } => "Invalid data provided".to_string(),
                DbError::Other(_) => "Internal server error".to_string(),
            },
            Error::Conflict { message } => message.clone(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Log full error details for debugging - different log levels based on severity
        match &self {
            Error::Database(DbError::Other(_)) | Error::Internal { .. } => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::Database(_) => {
                tracing::warn!("Database constraint error: {}", self);
            }
            Error::NotFound { .. } => {
                tracing::debug!("Client error: {}", self);
            }
            Error::Conflict { .. } => {
                tracing::warn!("Conflict error: {}", self);
            }
        }

        let body = ErrorBody {
            detail: self.user_message(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn render(error: Error) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_not_found_body() {
        let (status, body) = render(Error::NotFound {
            resource: "User".to_string(),
            id: "7".to_string(),
        })
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, serde_json::json!({ "detail": "User not found" }));
    }

    #[tokio::test]
    async fn test_conflict_is_bad_request() {
        let (status, body) = render(Error::Conflict {
            message: EMAIL_ALREADY_REGISTERED.to_string(),
        })
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "Email already registered");
    }

    #[tokio::test]
    async fn test_email_unique_violation_matches_conflict() {
        let (status, body) = render(Error::Database(DbError::UniqueViolation {
            constraint: Some("users.email".to_string()),
            table: Some("users".to_string()),
            message: "UNIQUE constraint failed: users.email".to_string(),
        }))
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "Email already registered");
    }

    #[tokio::test]
    async fn test_other_unique_violation_is_conflict() {
        let (status, body) = render(Error::Database(DbError::UniqueViolation {
            constraint: Some("items.title".to_string()),
            table: Some("items".to_string()),
            message: "UNIQUE constraint failed: items.title".to_string(),
        }))
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["detail"], "Resource already exists");
    }

    #[tokio::test]
    async fn test_internal_details_not_leaked() {
        let (status, body) = render(Error::Internal {
            operation: "hash password: secret details".to_string(),
        })
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["detail"], "Internal server error");

        let (status, body) = render(Error::Database(DbError::Other(anyhow::anyhow!("disk I/O error")))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["detail"], "Internal server error");
    }
}
