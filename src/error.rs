//! Game error types with HTTP status code mapping.
//!
//! [`GameError`] is the central error type of the server. Each variant
//! maps to a specific HTTP status code and structured JSON error response.

use std::fmt::Display;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 4001,
///     "category": "insufficient_resource",
///     "message": "insufficient coins: need 120, have 100"
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code, category, and message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Stable machine-readable category.
    pub category: &'static str,
    /// Human-readable error message.
    pub message: String,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category              | HTTP Status                  |
/// |-----------|-----------------------|------------------------------|
/// | 1000–1999 | Validation / auth     | 400 Bad Request / 401        |
/// | 2000–2999 | State / Not Found     | 404 Not Found / 409 Conflict |
/// | 3000–3999 | Server                | 500 Internal Server Error    |
/// | 4000–4999 | Game resources        | 422 Unprocessable Entity     |
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// Malformed or out-of-range request data.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Missing, invalid, or expired credentials.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// An entity does not exist or is not visible to the caller.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Entity kind, e.g. `"pet"`.
        kind: &'static str,
        /// Requested identifier.
        id: String,
    },

    /// The request clashes with current state (duplicate, already claimed).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Not enough coins, energy, health, level, or a cooldown is active.
    #[error("{0}")]
    InsufficientResource(String),

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GameError {
    /// Builds a [`GameError::NotFound`].
    pub fn not_found(kind: &'static str, id: impl Display) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidInput(_) => 1001,
            Self::Unauthorized(_) => 1401,
            Self::NotFound { .. } => 2001,
            Self::Conflict(_) => 2002,
            Self::Internal(_) => 3000,
            Self::Persistence(_) => 3001,
            Self::InsufficientResource(_) => 4001,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::InsufficientResource(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Persistence(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the machine-readable category.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::Unauthorized(_) => "unauthorized",
            Self::NotFound { .. } => "not_found",
            Self::Conflict(_) => "conflict",
            Self::InsufficientResource(_) => "insufficient_resource",
            Self::Persistence(_) | Self::Internal(_) => "server_error",
        }
    }

    /// Whether this is a server-side failure.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        matches!(self, Self::Persistence(_) | Self::Internal(_))
    }
}

impl From<JsonRejection> for GameError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status().is_server_error() {
            Self::Internal(rejection.body_text())
        } else {
            Self::InvalidInput(rejection.body_text())
        }
    }
}

impl From<PathRejection> for GameError {
    fn from(rejection: PathRejection) -> Self {
        if rejection.status().is_server_error() {
            Self::Internal(rejection.body_text())
        } else {
            Self::InvalidInput(rejection.body_text())
        }
    }
}

impl IntoResponse for GameError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if self.is_server_error() {
            tracing::error!(error = %self, code = self.error_code(), "request failed");
            "internal server error".to_string()
        } else {
            self.to_string()
        };
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                category: self.category(),
                message,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_table() {
        let cases = [
            (GameError::InvalidInput("x".into()), 400, 1001, "invalid_input"),
            (GameError::Unauthorized("x".into()), 401, 1401, "unauthorized"),
            (GameError::not_found("pet", "abc"), 404, 2001, "not_found"),
            (GameError::Conflict("x".into()), 409, 2002, "conflict"),
            (
                GameError::InsufficientResource("x".into()),
                422,
                4001,
                "insufficient_resource",
            ),
            (GameError::Persistence("x".into()), 500, 3001, "server_error"),
            (GameError::Internal("x".into()), 500, 3000, "server_error"),
        ];
        for (err, status, code, category) in cases {
            assert_eq!(err.status_code().as_u16(), status);
            assert_eq!(err.error_code(), code);
            assert_eq!(err.category(), category);
        }
    }

    #[test]
    fn not_found_message_names_kind() {
        assert_eq!(GameError::not_found("pet", "42").to_string(), "pet not found: 42");
    }

    #[test]
    fn server_errors_hide_details() {
        let response = GameError::Internal("db exploded".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
