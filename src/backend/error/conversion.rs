/**
 * Error Conversion
 *
 * Converts domain errors into the boundary taxonomy and the taxonomy into
 * HTTP responses. Handlers only ever `?` their way up; the mapping from a
 * store failure to a status code is decided here, in one place.
 *
 * # Response Format
 *
 * ```json
 * {
 *   "error": "Both users must follow each other to chat",
 *   "kind": "permission",
 *   "status": 403
 * }
 * ```
 */

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::backend::error::types::ApiError;
use crate::backend::media::MediaError;
use crate::backend::messaging::store::MessageStoreError;
use crate::backend::social::store::GraphError;
use crate::backend::users::store::UserStoreError;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("request failed: {}", self);
        } else {
            tracing::debug!("request rejected: {}", self);
        }

        let body = serde_json::json!({
            "error": self.client_message(),
            "kind": self.kind(),
            "status": status.as_u16(),
        });

        (status, Json(body)).into_response()
    }
}

impl From<GraphError> for ApiError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::SelfReference => {
                ApiError::conflict("Operation cannot target the acting user")
            }
            GraphError::UserNotFound => ApiError::not_found("User not found"),
            GraphError::AlreadyFollowing => ApiError::conflict("Already following this user"),
            GraphError::NotFollowing => ApiError::conflict("Not following this user"),
            GraphError::DuplicateRequest => {
                ApiError::conflict("Follow request already pending")
            }
            GraphError::NoSuchRequest => ApiError::conflict("No pending follow request"),
            GraphError::Storage(detail) => ApiError::internal(detail),
        }
    }
}

impl From<UserStoreError> for ApiError {
    fn from(err: UserStoreError) -> Self {
        match err {
            UserStoreError::NotFound => ApiError::not_found("User not found"),
            UserStoreError::HandleTaken => ApiError::conflict("Username already taken"),
            UserStoreError::Storage(detail) => ApiError::internal(detail),
        }
    }
}

impl From<MessageStoreError> for ApiError {
    fn from(err: MessageStoreError) -> Self {
        match err {
            MessageStoreError::NotFound => ApiError::not_found("Message not found"),
            MessageStoreError::Storage(detail) => ApiError::internal(detail),
        }
    }
}

impl From<MediaError> for ApiError {
    fn from(err: MediaError) -> Self {
        match err {
            // A payload that cannot be decoded is the caller's mistake
            MediaError::Decode(detail) => {
                ApiError::validation(format!("Invalid image payload: {}", detail))
            }
            MediaError::Upload(_) => ApiError::dependency("Failed to upload image"),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::internal(format!("serialization failure: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_error_mapping() {
        assert_eq!(
            ApiError::from(GraphError::DuplicateRequest).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(GraphError::UserNotFound).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(GraphError::Storage("boom".into())).kind(),
            "internal"
        );
    }

    #[test]
    fn test_media_error_mapping() {
        let upload = ApiError::from(MediaError::Upload("503 from blob store".into()));
        assert_eq!(upload.kind(), "dependency");
        assert_eq!(upload.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let decode = ApiError::from(MediaError::Decode("bad base64".into()));
        assert_eq!(decode.status_code(), StatusCode::BAD_REQUEST);
    }
}
