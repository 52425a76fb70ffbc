use axum::{
    extract::{rejection::JsonRejection, FromRef, State},
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::instrument;

use crate::{
    auth::{
        cookies::{CookieManager, TOKEN_COOKIE},
        repo_types::PublicUser,
        services,
        validation::{SignupPayload, ValidationFailure},
    },
    error::AuthError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/sign-up", post(sign_up))
        .route("/api/auth/sign-in", post(sign_in))
        .route("/api/auth/sign-out", post(sign_out))
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub message: &'static str,
    pub user: PublicUser,
}

#[instrument(skip(state, payload))]
pub async fn sign_up(
    State(state): State<AppState>,
    payload: Result<Json<SignupPayload>, JsonRejection>,
) -> Result<(StatusCode, HeaderMap, Json<SignupResponse>), AuthError> {
    let Json(payload) =
        payload.map_err(|rejection| ValidationFailure::single("body", rejection.body_text()))?;

    let registration = services::register(&state, payload).await?;

    let mut headers = HeaderMap::new();
    CookieManager::from_ref(&state).set(&mut headers, TOKEN_COOKIE, &registration.token, None)?;

    Ok((
        StatusCode::CREATED,
        headers,
        Json(SignupResponse {
            message: "User registered",
            user: registration.user,
        }),
    ))
}

pub async fn sign_in() -> Json<Value> {
    Json(json!({ "message": "POST /api/auth/sign-in response" }))
}

pub async fn sign_out() -> Json<Value> {
    Json(json!({ "message": "POST /api/auth/sign-out response" }))
}
