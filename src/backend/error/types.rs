/**
 * Boundary Error Types
 *
 * `ApiError` is the single error type handlers return. Every operation in
 * the follow workflow and delivery pipeline fails fast with one of these
 * kinds; the transport conversion in `conversion.rs` turns the kind into an
 * HTTP status and JSON body.
 */

use axum::http::StatusCode;
use thiserror::Error;

/// Boundary error taxonomy
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed input (empty message, invalid status value, bad payload)
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Authenticated identity lacks permission, or no identity at all.
    /// `status` distinguishes 401 (unauthenticated) from 403 (forbidden).
    #[error("Permission error: {message}")]
    Permission {
        status: StatusCode,
        message: String,
    },

    /// Referenced user or message does not exist
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// State conflict: duplicate request, already following, not following,
    /// self-reference
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// An external collaborator (media store) failed after retries
    #[error("Dependency error: {message}")]
    Dependency { message: String },

    /// Unexpected persistence or serialization failure
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// 403: the caller is authenticated but the operation is not permitted
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Permission {
            status: StatusCode::FORBIDDEN,
            message: message.into(),
        }
    }

    /// 401: no usable authenticated identity on the request
    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::Permission {
            status: StatusCode::UNAUTHORIZED,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn dependency(message: impl Into<String>) -> Self {
        Self::Dependency {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Permission { status, .. } => *status,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::BAD_REQUEST,
            Self::Dependency { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable taxonomy kind included in the response body
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation",
            Self::Permission { .. } => "permission",
            Self::NotFound { .. } => "not_found",
            Self::Conflict { .. } => "conflict",
            Self::Dependency { .. } => "dependency",
            Self::Internal { .. } => "internal",
        }
    }

    /// Message shown to the client. Internal and dependency errors get a
    /// generic body; the detail is already in the log.
    pub fn client_message(&self) -> String {
        match self {
            Self::Internal { .. } => "Internal server error".to_string(),
            Self::Dependency { message } => message.clone(),
            Self::Validation { message }
            | Self::Permission { message, .. }
            | Self::NotFound { message }
            | Self::Conflict { message } => message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(
            ApiError::validation("bad").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::forbidden("no").status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::unauthenticated("who").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::not_found("gone").status_code(),
            StatusCode::NOT_FOUND
        );
        // Conflicts surface as 400, matching the REST table
        assert_eq!(
            ApiError::conflict("dup").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::dependency("upload").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::internal("db").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_detail_never_reaches_client() {
        let error = ApiError::internal("connection refused to 10.0.0.3:5432");
        assert_eq!(error.client_message(), "Internal server error");
    }

    #[test]
    fn test_kind_strings() {
        assert_eq!(ApiError::conflict("x").kind(), "conflict");
        assert_eq!(ApiError::forbidden("x").kind(), "permission");
        assert_eq!(ApiError::unauthenticated("x").kind(), "permission");
    }
}
