use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::auth::{
    cookies::CookieError, jwt::TokenError, password::HashingError, repo::StoreError,
    validation::ValidationFailure,
};

const INTERNAL_SERVER_ERROR_MESSAGE: &str = "Internal server error";

/// Every way a request handled by this service can fail.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    #[error("email already exists")]
    DuplicateUser,

    #[error("password hashing failed: {0}")]
    Hashing(#[from] HashingError),

    #[error("token error: {0}")]
    Token(#[from] TokenError),

    #[error("cookie error: {0}")]
    Cookie(#[from] CookieError),

    #[error("user store unavailable: {0}")]
    StoreUnavailable(#[source] sqlx::Error),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate => AuthError::DuplicateUser,
            StoreError::Unavailable(e) => AuthError::StoreUnavailable(e),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::Validation(failure) => {
                warn!(details = %failure.details(), "validation failed");
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Validation Failed", "details": failure.details() })),
                )
                    .into_response()
            }
            AuthError::DuplicateUser => {
                warn!("email already exists");
                (
                    StatusCode::CONFLICT,
                    Json(json!({ "error": "Email already exists" })),
                )
                    .into_response()
            }
            internal => {
                error!(error = %internal, detail = ?internal, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": INTERNAL_SERVER_ERROR_MESSAGE })),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(err: AuthError) -> (StatusCode, serde_json::Value) {
        let res = err.into_response();
        let status = res.status();
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn validation_maps_to_400_with_details() {
        let failure = ValidationFailure::single("password", "Password is required");
        let (status, body) = body_json(failure.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({ "error": "Validation Failed", "details": "password: Password is required" })
        );
    }

    #[tokio::test]
    async fn store_duplicate_maps_to_409() {
        let (status, body) = body_json(StoreError::Duplicate.into()).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body, json!({ "error": "Email already exists" }));
    }

    #[tokio::test]
    async fn internal_errors_hide_detail() {
        let err: AuthError = StoreError::Unavailable(sqlx::Error::PoolTimedOut).into();
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Internal server error" }));

        let (status, body) = body_json(TokenError::Expired.into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Internal server error" }));
    }

    #[tokio::test]
    async fn cookie_errors_are_internal() {
        let err: AuthError = CookieError::InvalidName("a=b".into()).into();
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Internal server error" }));
    }

    #[test]
    fn token_display_keeps_clients_blind_to_expiry() {
        let expired = AuthError::from(TokenError::Expired).to_string();
        assert_eq!(expired, "token error: invalid token");
    }
}
