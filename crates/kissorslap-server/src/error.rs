use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use kissorslap_store::StoreError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Insufficient points: balance {balance}, required {required}")]
    InsufficientPoints { balance: i64, required: i64 },

    #[error("You have already acted on this user")]
    AlreadyActed,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServerError {
    fn code(&self) -> &'static str {
        match self {
            ServerError::Unauthenticated => "UNAUTHENTICATED",
            ServerError::NotFound(_) => "NOT_FOUND",
            ServerError::BadRequest(_) => "INVALID_ARGUMENT",
            ServerError::InsufficientPoints { .. } => "INSUFFICIENT_POINTS",
            ServerError::AlreadyActed => "ALREADY_ACTED",
            ServerError::Conflict(_) => "CONFLICT",
            ServerError::Forbidden(_) => "FORBIDDEN",
            ServerError::Internal(_) => "INTERNAL",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ServerError::Unauthenticated | ServerError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::BadRequest(_) | ServerError::InsufficientPoints { .. } => {
                StatusCode::BAD_REQUEST
            }
            ServerError::AlreadyActed | ServerError::Conflict(_) => StatusCode::CONFLICT,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut body = serde_json::json!({
            "error": self.to_string(),
            "code": self.code(),
        });

        match &self {
            ServerError::InsufficientPoints { balance, required } => {
                body["balance"] = (*balance).into();
                body["required"] = (*required).into();
            }
            ServerError::Internal(detail) => {
                tracing::error!(error = %detail, "request failed");
                body["error"] = "Internal server error".into();
            }
            _ => {}
        }

        (status, axum::Json(body)).into_response()
    }
}

impl From<StoreError> for ServerError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => ServerError::NotFound("record".into()),
            StoreError::UserNotFound => ServerError::NotFound("user".into()),
            StoreError::TargetNotFound => ServerError::NotFound("target user".into()),
            StoreError::SelfInteraction | StoreError::UsernameTaken => {
                ServerError::Conflict(e.to_string())
            }
            StoreError::InsufficientPoints { balance, required } => {
                ServerError::InsufficientPoints { balance, required }
            }
            StoreError::AlreadyActed => ServerError::AlreadyActed,
            StoreError::NotChatMember => ServerError::Forbidden(e.to_string()),
            StoreError::IncompleteProfile(_)
            | StoreError::InvalidAmount
            | StoreError::InvalidMessage(_)
            | StoreError::Profile(_) => ServerError::BadRequest(e.to_string()),
            StoreError::Sqlite(_)
            | StoreError::Io(_)
            | StoreError::Migration(_)
            | StoreError::Uuid(_)
            | StoreError::ChronoParse(_)
            | StoreError::Corrupt(_) => ServerError::Internal(e.to_string()),
        }
    }
}

// Malformed bodies, paths and query strings are all InvalidArgument.
macro_rules! bad_request_from {
    ($($rejection:ty),+) => {
        $(impl From<$rejection> for ServerError {
            fn from(r: $rejection) -> Self {
                ServerError::BadRequest(r.body_text())
            }
        })+
    };
}

bad_request_from!(JsonRejection, PathRejection, QueryRejection);

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(err: ServerError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_insufficient_points_payload() {
        let err = ServerError::from(StoreError::InsufficientPoints {
            balance: 4,
            required: 10,
        });
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INSUFFICIENT_POINTS");
        assert_eq!(body["balance"], 4);
        assert_eq!(body["required"], 10);
    }

    #[tokio::test]
    async fn test_internal_detail_is_hidden() {
        let err = ServerError::from(StoreError::Corrupt("bad enum".into()));
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ServerError::from(StoreError::AlreadyActed).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServerError::from(StoreError::SelfInteraction).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServerError::from(StoreError::TargetNotFound).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(ServerError::Unauthenticated.status(), StatusCode::FORBIDDEN);
    }
}
